use crate::exec::{CommandError, ConnectError};
use std::path::Path;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every error that can end a capdiff operation, or be logged on behalf of a
/// single device, command or file, maps onto one of these kinds. Each kind has
/// a stable code used in structured logs and in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Preconditions
    /// Target window or diff directory already exists
    AlreadyExists,
    /// Source window directory does not exist
    NotFound,
    /// Path exists but is not a directory
    NotADirectory,

    // Inventory
    /// Inventory file could not be parsed or failed validation
    InvalidInventory,
    /// Two records share a hostname
    DuplicateHostname,

    // Remote execution
    AuthFailure,
    Timeout,
    ProtocolError,
    Transport,
    CommandFailed,

    // Replay / executor configuration
    InvalidExecutorConfig,

    // Integration/IO
    Io,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::NotADirectory => "ERR_NOT_A_DIRECTORY",
            ExErrorKind::InvalidInventory => "ERR_INVALID_INVENTORY",
            ExErrorKind::DuplicateHostname => "ERR_DUPLICATE_HOSTNAME",
            ExErrorKind::AuthFailure => "ERR_AUTH_FAILURE",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::ProtocolError => "ERR_PROTOCOL",
            ExErrorKind::Transport => "ERR_TRANSPORT",
            ExErrorKind::CommandFailed => "ERR_COMMAND_FAILED",
            ExErrorKind::InvalidExecutorConfig => "ERR_INVALID_EXECUTOR_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind plus optional context (operation, path,
/// hostname) for rich log lines and CLI messages.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    hostname: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            hostname: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add file-system path context
    pub fn with_path(mut self, path: &Path) -> Self {
        self.path = Some(path.display().to_string());
        self
    }

    /// Add device context
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(hostname) = &self.hostname {
            write!(f, " (host: {})", hostname)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

impl From<ConnectError> for ExError {
    fn from(err: ConnectError) -> Self {
        let kind = match &err {
            ConnectError::AuthFailure(_) => ExErrorKind::AuthFailure,
            ConnectError::Timeout(_) => ExErrorKind::Timeout,
            ConnectError::ProtocolError(_) => ExErrorKind::ProtocolError,
            ConnectError::Unclassified(_) => ExErrorKind::Transport,
        };
        ExError::new(kind)
            .with_op("open_session")
            .with_message(err.to_string())
    }
}

impl From<CommandError> for ExError {
    fn from(err: CommandError) -> Self {
        let kind = match &err {
            CommandError::Transport(_) => ExErrorKind::Transport,
            CommandError::Timeout { .. } => ExErrorKind::Timeout,
            CommandError::Failed(_) => ExErrorKind::CommandFailed,
        };
        ExError::new(kind)
            .with_op("send_command")
            .with_message(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_error_kind_codes() {
        let cases = [
            (ConnectError::AuthFailure("bad".into()), "ERR_AUTH_FAILURE"),
            (ConnectError::Timeout("slow".into()), "ERR_TIMEOUT"),
            (ConnectError::ProtocolError("kex".into()), "ERR_PROTOCOL"),
            (ConnectError::Unclassified("eof".into()), "ERR_TRANSPORT"),
        ];
        for (err, code) in cases {
            let ex: ExError = err.into();
            assert_eq!(ex.code(), code);
            assert_eq!(ex.op(), Some("open_session"));
        }
    }

    #[test]
    fn test_display_includes_context() {
        let err = ExError::new(ExErrorKind::AlreadyExists)
            .with_op("create_window")
            .with_path(Path::new("pre-change"))
            .with_message("capture window already exists");
        let rendered = err.to_string();

        assert!(rendered.starts_with("[ERR_ALREADY_EXISTS]"));
        assert!(rendered.contains("create_window"));
        assert!(rendered.contains("pre-change"));
    }

    #[test]
    fn test_command_timeout_maps_to_timeout_kind() {
        let ex: ExError = CommandError::Timeout { after_secs: 30 }.into();
        assert_eq!(ex.kind(), ExErrorKind::Timeout);
        assert!(ex.message().contains("30"));
    }
}
