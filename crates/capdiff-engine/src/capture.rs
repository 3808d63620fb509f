//! Capture orchestrator with boundary logging.
//!
//! Runs every inventory command on every device and stores each output as
//! one artifact in a fresh capture window.
//!
//! ## Failure isolation
//!
//! Only worker pool start and window creation can abort a pass, and both
//! happen before any device is contacted. After that a failing device, command or write is logged,
//! recorded in the returned [`RunOutcome`] and skipped.
//!
//! ## Logging Ownership
//!
//! - `log_op_start!` / `log_op_end!` / `log_op_error!` around the pass
//! - `log_op_error!` for every session that fails to open
//! - `tracing::info!/warn!/error!` per command, with `hostname` and `command`

use crate::cancel::CancelFlag;
use capdiff_core::errors::{ExError, ExErrorKind, Result};
use capdiff_core::exec::{
    default_rejection_markers, find_rejection_marker, ConnectError, RemoteExecutor, Session,
};
use capdiff_core::model::{artifact_file_name, InventoryRecord};
use capdiff_core::outcome::{FailureReason, FailureScope, RunOutcome};
use capdiff_core::{log_op_end, log_op_error, log_op_start};
use capdiff_core_types::RunId;
use capdiff_store::CaptureWindow;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::path::Path;
use std::time::Instant;

/// Devices captured concurrently unless the caller says otherwise
pub const DEFAULT_WORKERS: usize = 4;

#[derive(Debug, Clone)]
pub struct CaptureOptions {
    /// Size of the device worker pool; `1` captures devices one at a time
    pub workers: usize,
    /// Substrings that mark an output as a rejected command
    pub rejection_markers: Vec<String>,
    pub cancel: CancelFlag,
    /// Correlates every log event of this pass
    pub run_id: RunId,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            rejection_markers: default_rejection_markers(),
            cancel: CancelFlag::new(),
            run_id: RunId::new(),
        }
    }
}

/// Capture every device of `inventory` into a new window at `window_path`
///
/// ## Errors
///
/// - `AlreadyExists`: `window_path` already exists; nothing was contacted
/// - `Io`: the window directory could not be created
/// - `Internal`: the worker pool could not be started
///
/// Per-device and per-command problems are not errors; they are listed in
/// the returned outcome.
pub fn run_capture(
    window_path: &Path,
    inventory: &[InventoryRecord],
    executor: &dyn RemoteExecutor,
    options: &CaptureOptions,
) -> Result<RunOutcome> {
    log_op_start!(
        "capture",
        window = %window_path.display(),
        devices = inventory.len(),
        run_id = options.run_id.as_str()
    );
    let start = Instant::now();

    let outcome = run_capture_impl(window_path, inventory, executor, options).map_err(|e| {
        log_op_error!(
            "capture",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            run_id = options.run_id.as_str()
        );
        e
    })?;

    if outcome.had_errors() {
        tracing::warn!(
            run_id = options.run_id.as_str(),
            failures = outcome.failures.len(),
            "capture completed with errors"
        );
    }
    log_op_end!(
        "capture",
        duration_ms = start.elapsed().as_millis() as u64,
        artifacts = outcome.artifacts_written,
        failures = outcome.failures.len(),
        run_id = options.run_id.as_str()
    );

    Ok(outcome)
}

fn run_capture_impl(
    window_path: &Path,
    inventory: &[InventoryRecord],
    executor: &dyn RemoteExecutor,
    options: &CaptureOptions,
) -> Result<RunOutcome> {
    // pool first: a failed start must not leave an empty window behind
    let pool = worker_pool(options.workers)?;
    let window = CaptureWindow::create(window_path)?;

    // collect keeps inventory order, so failures are listed deterministically
    let per_device: Vec<RunOutcome> = pool.install(|| {
        inventory
            .par_iter()
            .map(|device| capture_device(&window, device, executor, options))
            .collect()
    });

    Ok(per_device.into_iter().collect())
}

fn worker_pool(workers: usize) -> Result<ThreadPool> {
    ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()
        .map_err(|e| {
            ExError::new(ExErrorKind::Internal)
                .with_op("capture")
                .with_message(format!("failed to start worker pool: {}", e))
        })
}

fn capture_device(
    window: &CaptureWindow,
    device: &InventoryRecord,
    executor: &dyn RemoteExecutor,
    options: &CaptureOptions,
) -> RunOutcome {
    let mut outcome = RunOutcome::new();
    let hostname = device.hostname.as_str();

    if options.cancel.is_cancelled() {
        tracing::warn!(hostname, "capture cancelled before host started");
        outcome.record(
            FailureScope::Device {
                hostname: hostname.to_string(),
            },
            FailureReason::Cancelled,
        );
        return outcome;
    }

    for (earlier, later) in device.artifact_name_collisions() {
        tracing::warn!(
            hostname,
            earlier = %earlier,
            later = %later,
            file = %artifact_file_name(hostname, &later),
            "commands share an artifact name, the later output overwrites the earlier"
        );
    }

    let start = Instant::now();
    let mut session = match executor.open_session(device) {
        Ok(session) => session,
        Err(err) => {
            let reason = match &err {
                ConnectError::AuthFailure(_) => "authentication failed, skipping host",
                ConnectError::Timeout(_) => "connection timed out, skipping host",
                ConnectError::ProtocolError(_) => "SSH negotiation failed, skipping host",
                ConnectError::Unclassified(_) => "unhandled connection error, skipping host",
            };
            log_op_error!(
                "open_session",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                hostname = hostname,
                address = %device.connection.address,
                reason = reason,
                run_id = options.run_id.as_str()
            );
            outcome.record(
                FailureScope::Device {
                    hostname: hostname.to_string(),
                },
                FailureReason::Connect(err),
            );
            return outcome;
        }
    };

    tracing::info!(
        hostname,
        address = %device.connection.address,
        commands = device.command_list.len(),
        "session open"
    );

    for command in &device.command_list {
        capture_command(window, device, session.as_mut(), command, options, &mut outcome);
    }

    if let Err(err) = session.close() {
        tracing::warn!(hostname, error = %err, "session close failed");
    }

    outcome
}

fn capture_command(
    window: &CaptureWindow,
    device: &InventoryRecord,
    session: &mut dyn Session,
    command: &str,
    options: &CaptureOptions,
    outcome: &mut RunOutcome,
) {
    let hostname = device.hostname.as_str();
    let scope = || FailureScope::Command {
        hostname: hostname.to_string(),
        command: command.to_string(),
    };

    let output = match session.send_command(command) {
        Ok(output) => output,
        Err(err) => {
            tracing::error!(hostname, command, error = %err, "command failed, no artifact written");
            outcome.record(scope(), FailureReason::Command(err));
            return;
        }
    };

    if let Some(marker) = find_rejection_marker(&output, &options.rejection_markers) {
        tracing::error!(
            hostname,
            command,
            marker,
            output = %output.trim_end(),
            "device rejected the command, no artifact written"
        );
        outcome.record(
            scope(),
            FailureReason::Rejected {
                marker: marker.to_string(),
            },
        );
        return;
    }

    let name = artifact_file_name(hostname, command);
    match window.write(&name, output.as_bytes()) {
        Ok(path) => {
            tracing::info!(hostname, command, file = %path.display(), "artifact written");
            outcome.record_artifact();
        }
        Err(err) => {
            tracing::error!(hostname, command, file = %name, error = %err, "artifact write failed");
            outcome.record(scope(), FailureReason::Write(err.to_string()));
        }
    }
}
