//! capdiff Core - domain kernel for change-window captures
//!
//! This crate provides the pieces shared by the capture orchestrator and the
//! diff reconciler, including:
//! - Inventory record model and deterministic artifact naming
//! - The remote executor seam and its closed failure taxonomy
//! - Run outcome aggregation (per-device, per-command and per-file failures)
//! - Content loading for text and structured artifacts
//! - Side-by-side HTML diff reports
//! - The structured logging facility

pub mod content;
pub mod errors;
pub mod exec;
pub mod logging_facility;
pub mod model;
pub mod outcome;
pub mod report;

// Macros refer to schema constants through this path
pub use capdiff_core_types as core_types;

// Re-export commonly used types
pub use content::LoadedContent;
pub use errors::{ExError, ExErrorKind, Result};
pub use exec::{CommandError, ConnectError, RemoteExecutor, Session};
pub use model::{artifact_file_name, normalize_command, ConnectionDescriptor, InventoryRecord};
pub use outcome::{Failure, FailureReason, FailureScope, RunOutcome};
pub use report::RenderMode;
