//! Scripted replay executor
//!
//! Answers every command from a table instead of a network. The table is
//! either built in code or loaded from a replay file:
//!
//! ```yaml
//! R1:
//!   commands:
//!     show ip interface brief: |
//!       Gi0/0 up
//!     show bgp: { error: "channel closed" }
//! R2:
//!   connect_error: { kind: auth_failure, message: "bad password" }
//! ```

use capdiff_core::errors::{ExError, ExErrorKind, Result};
use capdiff_core::exec::{CommandError, ConnectError, RemoteExecutor, Session};
use capdiff_core::model::InventoryRecord;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Canned answer for one command
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScriptedResponse {
    Output(String),
    Error { error: String },
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectErrorKind {
    AuthFailure,
    Timeout,
    ProtocolError,
    Unclassified,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptedConnectError {
    pub kind: ConnectErrorKind,
    #[serde(default)]
    pub message: String,
}

impl From<&ScriptedConnectError> for ConnectError {
    fn from(scripted: &ScriptedConnectError) -> Self {
        let message = scripted.message.clone();
        match scripted.kind {
            ConnectErrorKind::AuthFailure => ConnectError::AuthFailure(message),
            ConnectErrorKind::Timeout => ConnectError::Timeout(message),
            ConnectErrorKind::ProtocolError => ConnectError::ProtocolError(message),
            ConnectErrorKind::Unclassified => ConnectError::Unclassified(message),
        }
    }
}

/// Everything scripted for one host
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScriptedDevice {
    #[serde(default)]
    pub connect_error: Option<ScriptedConnectError>,
    #[serde(default)]
    pub commands: HashMap<String, ScriptedResponse>,
}

type CallLog = Arc<Mutex<Vec<(String, String)>>>;

/// Replay executor keyed by hostname
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    devices: HashMap<String, ScriptedDevice>,
    calls: CallLog,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a replay file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ExError::new(ExErrorKind::InvalidExecutorConfig)
                .with_op("load_replay_file")
                .with_path(path)
                .with_message(e.to_string())
        })?;
        Self::from_yaml_str(&content).map_err(|e| e.with_path(path))
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let devices: HashMap<String, ScriptedDevice> =
            serde_yaml::from_str(content).map_err(|e| {
                ExError::new(ExErrorKind::InvalidExecutorConfig)
                    .with_op("load_replay_file")
                    .with_message(format!("YAML parse error: {}", e))
            })?;
        Ok(Self {
            devices,
            calls: CallLog::default(),
        })
    }

    pub fn with_output(
        mut self,
        hostname: &str,
        command: &str,
        output: impl Into<String>,
    ) -> Self {
        self.device_mut(hostname).commands.insert(
            command.to_string(),
            ScriptedResponse::Output(output.into()),
        );
        self
    }

    pub fn with_command_error(mut self, hostname: &str, command: &str, error: &str) -> Self {
        self.device_mut(hostname).commands.insert(
            command.to_string(),
            ScriptedResponse::Error {
                error: error.to_string(),
            },
        );
        self
    }

    pub fn with_connect_error(
        mut self,
        hostname: &str,
        kind: ConnectErrorKind,
        message: &str,
    ) -> Self {
        self.device_mut(hostname).connect_error = Some(ScriptedConnectError {
            kind,
            message: message.to_string(),
        });
        self
    }

    /// `(hostname, command)` pairs in the order they were sent
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn device_mut(&mut self, hostname: &str) -> &mut ScriptedDevice {
        self.devices.entry(hostname.to_string()).or_default()
    }
}

impl RemoteExecutor for ScriptedExecutor {
    fn open_session(
        &self,
        device: &InventoryRecord,
    ) -> std::result::Result<Box<dyn Session>, ConnectError> {
        let scripted = self.devices.get(&device.hostname).ok_or_else(|| {
            ConnectError::Unclassified(format!(
                "no replay entry for host {} ({})",
                device.hostname, device.connection.address
            ))
        })?;

        if let Some(err) = &scripted.connect_error {
            return Err(err.into());
        }

        Ok(Box::new(ScriptedSession {
            hostname: device.hostname.clone(),
            commands: scripted.commands.clone(),
            calls: Arc::clone(&self.calls),
        }))
    }
}

struct ScriptedSession {
    hostname: String,
    commands: HashMap<String, ScriptedResponse>,
    calls: CallLog,
}

impl Session for ScriptedSession {
    fn send_command(&mut self, command: &str) -> std::result::Result<String, CommandError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((self.hostname.clone(), command.to_string()));
        }

        match self.commands.get(command) {
            Some(ScriptedResponse::Output(output)) => Ok(output.clone()),
            Some(ScriptedResponse::Error { error }) => Err(CommandError::Transport(error.clone())),
            None => Err(CommandError::Failed(format!(
                "no scripted response for `{}`",
                command
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capdiff_core::model::ConnectionDescriptor;

    fn device(hostname: &str) -> InventoryRecord {
        InventoryRecord {
            hostname: hostname.to_string(),
            connection: ConnectionDescriptor {
                address: "192.0.2.10".to_string(),
                device_type: "cisco_ios".to_string(),
                port: None,
                username: None,
                password: None,
            },
            command_list: Vec::new(),
        }
    }

    #[test]
    fn test_replay_file_shapes() {
        let yaml = r#"
R1:
  commands:
    show clock: "12:00:00.000 UTC"
    show bgp: { error: "channel closed" }
R2:
  connect_error: { kind: auth_failure, message: "bad password" }
"#;
        let executor = ScriptedExecutor::from_yaml_str(yaml).unwrap();

        let mut session = executor.open_session(&device("R1")).unwrap();
        assert_eq!(session.send_command("show clock").unwrap(), "12:00:00.000 UTC");
        assert_eq!(
            session.send_command("show bgp").unwrap_err(),
            CommandError::Transport("channel closed".to_string())
        );
        assert!(matches!(
            session.send_command("show nothing").unwrap_err(),
            CommandError::Failed(_)
        ));

        assert_eq!(
            executor.open_session(&device("R2")).err(),
            Some(ConnectError::AuthFailure("bad password".to_string()))
        );
    }

    #[test]
    fn test_unknown_host_is_unclassified_connect_error() {
        let executor = ScriptedExecutor::new();
        assert!(matches!(
            executor.open_session(&device("ghost")).err(),
            Some(ConnectError::Unclassified(_))
        ));
    }

    #[test]
    fn test_calls_recorded_in_order() {
        let executor = ScriptedExecutor::new()
            .with_output("R1", "a", "1")
            .with_output("R1", "b", "2");
        let mut session = executor.open_session(&device("R1")).unwrap();
        session.send_command("b").unwrap();
        session.send_command("a").unwrap();

        assert_eq!(
            executor.calls(),
            vec![
                ("R1".to_string(), "b".to_string()),
                ("R1".to_string(), "a".to_string())
            ]
        );
    }

    #[test]
    fn test_bad_replay_yaml() {
        let err = ScriptedExecutor::from_yaml_str("- not\n- a map\n").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidExecutorConfig);
    }
}
