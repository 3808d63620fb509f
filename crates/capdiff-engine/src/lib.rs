//! capdiff Engine - Orchestration layer
//!
//! Coordinates the domain kernel and the file-system store:
//! - Capture orchestrator: fans a command list out across devices
//! - Diff reconciler: aligns two capture windows and renders reports
//! - Concrete remote executors (system SSH client, scripted replay)

pub mod cancel;
pub mod capture;
pub mod exec;
pub mod reconcile;

pub use cancel::CancelFlag;
pub use capture::{run_capture, CaptureOptions};
pub use reconcile::{default_output_dir, reconcile_inventory, reconcile_windows, ReconcileOptions};
