//! capdiff Store - file-system persistence
//!
//! Provides:
//! - Inventory file loader with validation
//! - Capture window directories (exclusive create, artifact writes, listing)
//! - Atomic write primitive used for every artifact
//!
//! The file system is the only state store: a window exists if and only if
//! its directory exists.

pub mod atomic;
pub mod errors;
pub mod inventory;
pub mod window;

// Re-export key types
pub use errors::Result;
pub use inventory::{load_inventory, parse_inventory_str};
pub use window::CaptureWindow;
