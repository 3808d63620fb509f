//! Diff reconciler with boundary logging.
//!
//! Aligns the artifact sets of two capture windows and writes one HTML report
//! per artifact present in both. Two flows share the per-artifact step:
//!
//! - [`reconcile_windows`]: every file name found in either window
//! - [`reconcile_inventory`]: the names an inventory says should exist
//!
//! Preconditions (both windows exist, output directory does not) are checked
//! before anything is written. After that each artifact stands alone: a
//! missing, unreadable or unwritable entry is logged, recorded and skipped.

use capdiff_core::content::{self, LoadedContent};
use capdiff_core::errors::Result;
use capdiff_core::model::{artifact_file_name, InventoryRecord};
use capdiff_core::outcome::{FailureReason, FailureScope, RunOutcome};
use capdiff_core::report::{self, report_file_name, RenderMode};
use capdiff_core::{log_op_end, log_op_error, log_op_start};
use capdiff_store::CaptureWindow;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileOptions {
    pub mode: RenderMode,
}

impl ReconcileOptions {
    /// Reports show changed regions only
    pub fn changes_only() -> Self {
        Self {
            mode: RenderMode::ChangesOnly,
        }
    }

    /// Reports keep up to `lines` unchanged lines around each change
    pub fn full_context(lines: usize) -> Self {
        Self {
            mode: RenderMode::FullContext { lines },
        }
    }
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self::changes_only()
    }
}

/// `<a>_<b>_diff`, next to the first window
pub fn default_output_dir(window_a: &Path, window_b: &Path) -> PathBuf {
    let name = format!("{}_{}_diff", dir_label(window_a), dir_label(window_b));
    match window_a.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

/// Diff every artifact the two windows have in common
///
/// Names present in only one window are reported as skipped. Common names
/// are processed in sorted order.
///
/// ## Errors
///
/// - `NotFound` / `NotADirectory`: a window is missing
/// - `AlreadyExists`: `output_dir` already exists
/// - `Io`: a window could not be listed or the output directory created
pub fn reconcile_windows(
    window_a: &Path,
    window_b: &Path,
    output_dir: &Path,
    options: &ReconcileOptions,
) -> Result<RunOutcome> {
    log_op_start!(
        "reconcile_windows",
        window_a = %window_a.display(),
        window_b = %window_b.display(),
        output = %output_dir.display()
    );
    let start = Instant::now();

    let outcome = reconcile_windows_impl(window_a, window_b, output_dir, options).map_err(|e| {
        log_op_error!(
            "reconcile_windows",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "reconcile_windows",
        duration_ms = start.elapsed().as_millis() as u64,
        reports = outcome.artifacts_written,
        failures = outcome.failures.len()
    );
    Ok(outcome)
}

fn reconcile_windows_impl(
    window_a: &Path,
    window_b: &Path,
    output_dir: &Path,
    options: &ReconcileOptions,
) -> Result<RunOutcome> {
    let pair = WindowPair::open(window_a, window_b)?;
    let output = CaptureWindow::create(output_dir)?;
    let mut outcome = RunOutcome::new();

    for name in pair.names_a.difference(&pair.names_b) {
        report_missing(&mut outcome, name, &pair.b);
    }
    for name in pair.names_b.difference(&pair.names_a) {
        report_missing(&mut outcome, name, &pair.a);
    }
    for name in pair.names_a.intersection(&pair.names_b) {
        diff_entry(&pair, &output, name, options.mode, &mut outcome);
    }

    Ok(outcome)
}

/// Diff the artifacts an inventory is expected to have produced
///
/// For every record and command, in inventory order, the expected artifact
/// name is looked up in both windows. A name absent from a window is reported
/// against that window and its siblings continue. Files in the windows that
/// no inventory command maps to are ignored.
///
/// ## Errors
///
/// Same preconditions as [`reconcile_windows`].
pub fn reconcile_inventory(
    window_a: &Path,
    window_b: &Path,
    inventory: &[InventoryRecord],
    output_dir: &Path,
    options: &ReconcileOptions,
) -> Result<RunOutcome> {
    log_op_start!(
        "reconcile_inventory",
        window_a = %window_a.display(),
        window_b = %window_b.display(),
        output = %output_dir.display(),
        devices = inventory.len()
    );
    let start = Instant::now();

    let outcome = reconcile_inventory_impl(window_a, window_b, inventory, output_dir, options)
        .map_err(|e| {
            log_op_error!(
                "reconcile_inventory",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

    log_op_end!(
        "reconcile_inventory",
        duration_ms = start.elapsed().as_millis() as u64,
        reports = outcome.artifacts_written,
        failures = outcome.failures.len()
    );
    Ok(outcome)
}

fn reconcile_inventory_impl(
    window_a: &Path,
    window_b: &Path,
    inventory: &[InventoryRecord],
    output_dir: &Path,
    options: &ReconcileOptions,
) -> Result<RunOutcome> {
    let pair = WindowPair::open(window_a, window_b)?;
    let output = CaptureWindow::create(output_dir)?;
    let mut outcome = RunOutcome::new();
    let mut seen = BTreeSet::new();

    for device in inventory {
        for command in &device.command_list {
            let name = artifact_file_name(&device.hostname, command);
            // repeated or colliding commands share one artifact
            if !seen.insert(name.clone()) {
                continue;
            }

            let in_a = pair.names_a.contains(&name);
            let in_b = pair.names_b.contains(&name);
            if !in_a {
                report_missing(&mut outcome, &name, &pair.a);
            }
            if !in_b {
                report_missing(&mut outcome, &name, &pair.b);
            }
            if in_a && in_b {
                diff_entry(&pair, &output, &name, options.mode, &mut outcome);
            }
        }
    }

    Ok(outcome)
}

struct WindowPair {
    a: CaptureWindow,
    b: CaptureWindow,
    names_a: BTreeSet<String>,
    names_b: BTreeSet<String>,
}

impl WindowPair {
    fn open(window_a: &Path, window_b: &Path) -> Result<Self> {
        let a = CaptureWindow::open(window_a)?;
        let b = CaptureWindow::open(window_b)?;
        let names_a = a.list_file_names()?;
        let names_b = b.list_file_names()?;
        Ok(Self {
            a,
            b,
            names_a,
            names_b,
        })
    }
}

fn report_missing(outcome: &mut RunOutcome, name: &str, missing_from: &CaptureWindow) {
    let window = missing_from.label();
    tracing::warn!(
        file = name,
        window = %window,
        "artifact missing in window, diff skipped"
    );
    outcome.record(
        FailureScope::File {
            name: name.to_string(),
        },
        FailureReason::MissingIn { window },
    );
}

fn diff_entry(
    pair: &WindowPair,
    output: &CaptureWindow,
    name: &str,
    mode: RenderMode,
    outcome: &mut RunOutcome,
) {
    let content_a = content::load(&pair.a.entry_path(name));
    let content_b = content::load(&pair.b.entry_path(name));

    for (loaded, window) in [(&content_a, &pair.a), (&content_b, &pair.b)] {
        if let LoadedContent::Unreadable(reason) = loaded {
            tracing::error!(
                file = name,
                window = %window.label(),
                reason = %reason,
                "artifact unreadable, diff skipped"
            );
            outcome.record(
                FailureScope::File {
                    name: name.to_string(),
                },
                FailureReason::Unreadable(format!("{} (window '{}')", reason, window.label())),
            );
            return;
        }
    }

    let bytes = report::render(
        &content_a,
        &content_b,
        &pair.a.label(),
        &pair.b.label(),
        mode,
    );

    let report_name = report_file_name(name);
    match output.write(&report_name, &bytes) {
        Ok(path) => {
            tracing::info!(file = name, report = %path.display(), "diff report written");
            outcome.record_artifact();
        }
        Err(err) => {
            tracing::error!(
                file = name,
                report = %report_name,
                error = %err,
                "diff report write failed"
            );
            outcome.record(
                FailureScope::File {
                    name: name.to_string(),
                },
                FailureReason::Write(err.to_string()),
            );
        }
    }
}

fn dir_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
