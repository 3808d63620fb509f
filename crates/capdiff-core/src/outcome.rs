//! Run outcome aggregate
//!
//! Each capture or reconciliation pass returns a [`RunOutcome`] instead of a
//! boolean error flag. Workers build their own outcome and the caller merges
//! them, so no mutable state is shared between devices.

use crate::exec::{CommandError, ConnectError};
use std::fmt;

/// What a failure is about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureScope {
    /// Whole device skipped
    Device { hostname: String },
    /// One command on one device
    Command { hostname: String, command: String },
    /// One artifact name during reconciliation
    File { name: String },
}

/// Why the item failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Connect(ConnectError),
    Command(CommandError),
    /// Device answered with a recognized "command rejected" marker
    Rejected { marker: String },
    /// Artifact or report could not be persisted
    Write(String),
    /// Artifact exists in one window only
    MissingIn { window: String },
    /// Content could not be loaded as text nor as a structured document
    Unreadable(String),
    /// Run was cancelled before this item started
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub scope: FailureScope,
    pub reason: FailureReason,
}

impl fmt::Display for FailureScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureScope::Device { hostname } => write!(f, "host `{}`", hostname),
            FailureScope::Command { hostname, command } => {
                write!(f, "command `{}` on host `{}`", command, hostname)
            }
            FailureScope::File { name } => write!(f, "file `{}`", name),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Connect(err) => write!(f, "{}", err),
            FailureReason::Command(err) => write!(f, "{}", err),
            FailureReason::Rejected { marker } => {
                write!(f, "device rejected the command ({})", marker)
            }
            FailureReason::Write(msg) => write!(f, "write failed: {}", msg),
            FailureReason::MissingIn { window } => {
                write!(f, "missing in window '{}', diff skipped", window)
            }
            FailureReason::Unreadable(msg) => write!(f, "unreadable: {}", msg),
            FailureReason::Cancelled => write!(f, "cancelled before start"),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.scope, self.reason)
    }
}

/// Aggregate result of one capture or reconciliation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutcome {
    pub artifacts_written: usize,
    pub failures: Vec<Failure>,
}

impl RunOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when at least one device, command or file failed
    pub fn had_errors(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn record(&mut self, scope: FailureScope, reason: FailureReason) {
        self.failures.push(Failure { scope, reason });
    }

    pub fn record_artifact(&mut self) {
        self.artifacts_written += 1;
    }

    /// Fold another outcome into this one, keeping failure order
    pub fn merge(&mut self, other: RunOutcome) {
        self.artifacts_written += other.artifacts_written;
        self.failures.extend(other.failures);
    }
}

impl FromIterator<RunOutcome> for RunOutcome {
    fn from_iter<I: IntoIterator<Item = RunOutcome>>(iter: I) -> Self {
        let mut total = RunOutcome::new();
        for outcome in iter {
            total.merge(outcome);
        }
        total
    }
}
