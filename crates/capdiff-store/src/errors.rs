//! Error handling for capdiff-store
//!
//! Wraps capdiff-core ExError with store-specific helpers

use capdiff_core::errors::{ExError, ExErrorKind};
use std::path::Path;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_path(path)
        .with_message(err.to_string())
}

/// Create a precondition error for a directory that must not exist yet
pub fn already_exists(operation: &str, path: &Path) -> ExError {
    ExError::new(ExErrorKind::AlreadyExists)
        .with_op(operation.to_string())
        .with_path(path)
        .with_message("directory already exists, refusing to overwrite")
}

/// Create a precondition error for a directory that must exist
pub fn not_found(operation: &str, path: &Path) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_op(operation.to_string())
        .with_path(path)
        .with_message("directory does not exist")
}

/// Create a precondition error for a path that is not a directory
pub fn not_a_directory(operation: &str, path: &Path) -> ExError {
    ExError::new(ExErrorKind::NotADirectory)
        .with_op(operation.to_string())
        .with_path(path)
        .with_message("path exists but is not a directory")
}

/// Create an inventory validation error
pub fn invalid_inventory(reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidInventory)
        .with_op("load_inventory")
        .with_message(reason.to_string())
}

/// Create a duplicate hostname error
pub fn duplicate_hostname(hostname: &str) -> ExError {
    ExError::new(ExErrorKind::DuplicateHostname)
        .with_op("load_inventory")
        .with_hostname(hostname)
        .with_message(format!("hostname '{}' appears more than once", hostname))
}
