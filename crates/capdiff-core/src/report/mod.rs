//! Diff report writer.
//!
//! Turns two loaded capture artifacts into a readable side-by-side report.
//!
//! ## Entry point
//!
//! ```ignore
//! use capdiff_core::report::{render, RenderMode};
//!
//! let bytes = render(&before, &after, "pre-change", "post-change", RenderMode::ChangesOnly);
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce byte-identical reports.
//! - **Standalone**: styling is inline, no scripts or external resources.
//! - **Mode is the caller's choice**: the writer never picks full context or
//!   changes-only by itself.
//! - **No side effects**: persistence belongs to the reconciler.

pub mod engine;
pub mod html;
pub mod model;

pub use engine::compute_report;
pub use html::render_html;
pub use model::{DiffCounts, DiffReport, RenderMode, RowKind};

use crate::content::LoadedContent;

/// File extension of persisted diff artifacts
pub const REPORT_EXTENSION: &str = "html";

/// Render a comparison of two artifacts as HTML bytes
pub fn render(
    content_a: &LoadedContent,
    content_b: &LoadedContent,
    label_a: &str,
    label_b: &str,
    mode: RenderMode,
) -> Vec<u8> {
    let report = compute_report(content_a, content_b, label_a, label_b, mode);
    render_html(&report).into_bytes()
}

/// Diff artifact file name for a capture artifact name
pub fn report_file_name(artifact_name: &str) -> String {
    format!("{}.{}", artifact_name, REPORT_EXTENSION)
}
