//! Remote executor seam
//!
//! The transport that actually talks to devices lives outside the core. The
//! orchestrator only sees these two traits and the closed failure taxonomy
//! below, which it matches exhaustively.

use crate::model::InventoryRecord;
use thiserror::Error;

/// Markers that mean the device refused the command even though the
/// transport succeeded.
pub const DEFAULT_REJECTION_MARKERS: &[&str] = &[
    "Incomplete command",
    "Ambiguous command",
    "Ambigious",
    "Invalid input detected",
];

/// Failure to establish a session with a device
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectError {
    #[error("authentication failed: {0}")]
    AuthFailure(String),

    #[error("timed out while connecting: {0}")]
    Timeout(String),

    #[error("SSH protocol negotiation or logic error: {0}")]
    ProtocolError(String),

    #[error("unhandled transport error: {0}")]
    Unclassified(String),
}

/// Failure while executing one command inside an open session
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("transport failure while sending command: {0}")]
    Transport(String),

    #[error("command did not complete within {after_secs}s")]
    Timeout { after_secs: u64 },

    #[error("command execution failed: {0}")]
    Failed(String),
}

/// An open session against one device
///
/// Commands are sent strictly in the order the orchestrator calls
/// `send_command`; some platforms keep state between commands.
pub trait Session {
    /// Execute one command and return its raw output text
    fn send_command(&mut self, command: &str) -> Result<String, CommandError>;

    /// Release the session. Called once after the device's command list.
    fn close(&mut self) -> Result<(), CommandError> {
        Ok(())
    }
}

/// Opens sessions against devices described by inventory records
///
/// Implementations are shared by every capture worker, hence `Sync`.
pub trait RemoteExecutor: Send + Sync {
    fn open_session(&self, device: &InventoryRecord) -> Result<Box<dyn Session>, ConnectError>;
}

/// Return the first rejection marker found in `output`, if any
pub fn find_rejection_marker<'a, S: AsRef<str>>(output: &str, markers: &'a [S]) -> Option<&'a str> {
    markers
        .iter()
        .map(|m| m.as_ref())
        .find(|marker| !marker.is_empty() && output.contains(marker))
}

/// Default marker list as owned strings, for option structs
pub fn default_rejection_markers() -> Vec<String> {
    DEFAULT_REJECTION_MARKERS
        .iter()
        .map(|m| m.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_command_is_rejected() {
        let output = "% Incomplete command.\n";
        assert_eq!(
            find_rejection_marker(output, DEFAULT_REJECTION_MARKERS),
            Some("Incomplete command")
        );
    }

    #[test]
    fn test_regular_output_is_not_rejected() {
        let output = "Interface  IP-Address  OK? Method Status  Protocol\nGi0/0 up\n";
        assert_eq!(find_rejection_marker(output, DEFAULT_REJECTION_MARKERS), None);
    }

    #[test]
    fn test_empty_marker_never_matches() {
        let markers = vec![String::new()];
        assert_eq!(find_rejection_marker("anything", &markers), None);
    }

    #[test]
    fn test_custom_markers() {
        let markers = vec!["syntax error".to_string()];
        assert_eq!(
            find_rejection_marker("error: syntax error, expecting <command>", &markers),
            Some("syntax error")
        );
        assert_eq!(
            find_rejection_marker("% Incomplete command.", &markers),
            None
        );
    }
}
