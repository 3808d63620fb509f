//! Concrete remote executors
//!
//! Both implement [`capdiff_core::exec::RemoteExecutor`]:
//! - [`SshExecutor`] drives the system OpenSSH client, one subprocess per command
//! - [`ScriptedExecutor`] replays canned responses from a YAML file

pub mod scripted;
pub mod ssh;

pub use scripted::ScriptedExecutor;
pub use ssh::{SshConfig, SshExecutor};
