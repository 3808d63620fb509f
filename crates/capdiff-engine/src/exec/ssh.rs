//! System OpenSSH client executor
//!
//! Every command runs as its own `ssh user@host <command>` subprocess, so a
//! "session" is a validated target rather than a live channel. Opening a
//! session runs a probe command once to surface authentication and
//! negotiation failures before the command list starts.
//!
//! Passwords are handed to `sshpass -e` through the child's environment and
//! never appear on a command line.

use capdiff_core::exec::{CommandError, ConnectError, RemoteExecutor, Session};
use capdiff_core::model::InventoryRecord;
use std::io::{self, Read};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;
use wait_timeout::ChildExt;

pub const DEFAULT_SSH_PORT: u16 = 22;

/// ssh exits with 255 when the failure is its own rather than the remote command's
const SSH_ERROR_STATUS: i32 = 255;

/// sshpass exit status for a rejected password
const SSHPASS_BAD_PASSWORD_STATUS: i32 = 5;

/// Executor settings
#[derive(Debug, Clone)]
pub struct SshConfig {
    /// OpenSSH client binary
    pub program: String,
    /// Wrapper used when a record carries a password
    pub sshpass_program: String,
    pub connect_timeout: Duration,
    /// Upper bound for one command, connection time included
    pub command_timeout: Duration,
    /// Remote command run once when a session opens
    pub probe_command: String,
    /// Extra `-o` options passed verbatim, e.g. `StrictHostKeyChecking=accept-new`
    pub extra_options: Vec<String>,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            program: "ssh".to_string(),
            sshpass_program: "sshpass".to_string(),
            connect_timeout: Duration::from_secs(10),
            command_timeout: Duration::from_secs(60),
            probe_command: "exit".to_string(),
            extra_options: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SshExecutor {
    config: SshConfig,
}

impl SshExecutor {
    pub fn new(config: SshConfig) -> Self {
        Self { config }
    }
}

impl RemoteExecutor for SshExecutor {
    fn open_session(&self, device: &InventoryRecord) -> Result<Box<dyn Session>, ConnectError> {
        let command = build_command(&self.config, device, &self.config.probe_command);
        let run = run_with_timeout(command, self.config.command_timeout).map_err(|e| {
            ConnectError::Unclassified(format!(
                "failed to start {}: {}",
                self.config.program, e
            ))
        })?;

        let Some(run) = run else {
            return Err(ConnectError::Timeout(format!(
                "no answer from {} within {}s",
                device.connection.address,
                self.config.command_timeout.as_secs()
            )));
        };

        match run.status.code() {
            Some(SSH_ERROR_STATUS) => Err(classify_ssh_failure(&run.stderr)),
            Some(SSHPASS_BAD_PASSWORD_STATUS) if device.connection.password.is_some() => {
                Err(ConnectError::AuthFailure(format!(
                    "password rejected by {}",
                    device.connection.address
                )))
            }
            None => Err(ConnectError::Unclassified(format!(
                "{} terminated by signal",
                self.config.program
            ))),
            Some(_) => Ok(Box::new(SshSession {
                config: self.config.clone(),
                device: device.clone(),
            })),
        }
    }
}

struct SshSession {
    config: SshConfig,
    device: InventoryRecord,
}

impl Session for SshSession {
    fn send_command(&mut self, command: &str) -> Result<String, CommandError> {
        let process = build_command(&self.config, &self.device, command);
        let run = run_with_timeout(process, self.config.command_timeout)
            .map_err(|e| CommandError::Transport(format!("failed to start ssh: {}", e)))?
            .ok_or(CommandError::Timeout {
                after_secs: self.config.command_timeout.as_secs(),
            })?;

        match run.status.code() {
            Some(0) => Ok(run.stdout),
            Some(SSH_ERROR_STATUS) | None => {
                Err(CommandError::Transport(first_line_or_status(&run)))
            }
            // The device answered; its output still goes through rejection checks
            Some(_) if !run.stdout.is_empty() => Ok(run.stdout),
            Some(_) => Err(CommandError::Failed(first_line_or_status(&run))),
        }
    }
}

/// Map ssh's own diagnostics onto the connect failure taxonomy
pub fn classify_ssh_failure(stderr: &str) -> ConnectError {
    let detail = stderr.trim().to_string();
    if detail.contains("Permission denied") || detail.contains("Authentication failed") {
        ConnectError::AuthFailure(detail)
    } else if detail.contains("timed out") {
        ConnectError::Timeout(detail)
    } else if detail.contains("kex")
        || detail.contains("no matching")
        || detail.contains("Protocol")
    {
        ConnectError::ProtocolError(detail)
    } else {
        ConnectError::Unclassified(detail)
    }
}

/// Assemble the client invocation for one remote command
pub fn build_command(
    config: &SshConfig,
    device: &InventoryRecord,
    remote_command: &str,
) -> Command {
    let conn = &device.connection;

    let mut command = match &conn.password {
        Some(password) => {
            let mut wrapper = Command::new(&config.sshpass_program);
            wrapper
                .arg("-e")
                .arg(&config.program)
                .env("SSHPASS", password.expose());
            wrapper
        }
        None => Command::new(&config.program),
    };

    command
        .arg("-p")
        .arg(conn.port.unwrap_or(DEFAULT_SSH_PORT).to_string())
        .arg("-o")
        .arg(format!("ConnectTimeout={}", config.connect_timeout.as_secs()));
    if conn.password.is_none() {
        command.arg("-o").arg("BatchMode=yes");
    }
    for option in &config.extra_options {
        command.arg("-o").arg(option);
    }

    let target = match &conn.username {
        Some(username) => format!("{}@{}", username, conn.address),
        None => conn.address.clone(),
    };
    command
        .arg(target)
        .arg(remote_command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    command
}

struct CompletedRun {
    status: ExitStatus,
    stdout: String,
    stderr: String,
}

/// Run to completion, or kill the child and return `None` once `timeout` passes
///
/// Pipes are drained on helper threads so large outputs cannot stall the child.
fn run_with_timeout(mut command: Command, timeout: Duration) -> io::Result<Option<CompletedRun>> {
    let mut child = command.spawn()?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let stdout_reader = thread::spawn(move || drain(stdout));
    let stderr_reader = thread::spawn(move || drain(stderr));

    let status = match child.wait_timeout(timeout)? {
        Some(status) => status,
        None => {
            child.kill().ok();
            child.wait().ok();
            return Ok(None);
        }
    };

    let stdout = stdout_reader.join().unwrap_or_default();
    let stderr = stderr_reader.join().unwrap_or_default();
    Ok(Some(CompletedRun {
        status,
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
    }))
}

fn drain<R: Read>(pipe: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buf).ok();
    }
    buf
}

fn first_line_or_status(run: &CompletedRun) -> String {
    run.stderr
        .lines()
        .find(|l| !l.trim().is_empty())
        .map(|l| l.trim().to_string())
        .unwrap_or_else(|| format!("exit status {}", run.status))
}
