//! Capture command
//!
//! Usage: capdiff capture -w <WINDOW> -i <INVENTORY> [--executor ssh|replay]

use super::{print_summary, CommandResult};
use capdiff_core::exec::{default_rejection_markers, RemoteExecutor};
use capdiff_core_types::Sensitive;
use capdiff_engine::capture::DEFAULT_WORKERS;
use capdiff_engine::exec::{ScriptedExecutor, SshConfig, SshExecutor};
use capdiff_engine::{run_capture, CaptureOptions};
use capdiff_store::load_inventory;
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExecutorKind {
    /// System OpenSSH client
    Ssh,
    /// Canned responses from --replay-file
    Replay,
}

#[derive(Debug, Args)]
pub struct CaptureArgs {
    /// New capture window directory, e.g. pre-change (must not exist)
    #[arg(short = 'w', long = "window")]
    pub window: PathBuf,

    /// Inventory YAML file
    #[arg(short = 'i', long)]
    pub inventory: PathBuf,

    /// Devices captured concurrently
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Username for inventory records that have none
    #[arg(long, env = "CAPDIFF_USERNAME")]
    pub username: Option<String>,

    /// Environment variable holding the password for records that have none
    #[arg(long, default_value = "CAPDIFF_PASSWORD")]
    pub password_env: String,

    #[arg(long, value_enum, default_value_t = ExecutorKind::Ssh)]
    pub executor: ExecutorKind,

    /// Replay file used by --executor replay
    #[arg(long, required_if_eq("executor", "replay"))]
    pub replay_file: Option<PathBuf>,

    /// OpenSSH client binary
    #[arg(long, default_value = "ssh")]
    pub ssh_program: String,

    /// Extra `-o` option for the SSH client (repeatable)
    #[arg(long = "ssh-option")]
    pub ssh_options: Vec<String>,

    /// Seconds allowed for the TCP/SSH handshake
    #[arg(long, default_value_t = 10)]
    pub connect_timeout: u64,

    /// Seconds allowed for one command
    #[arg(long, default_value_t = 60)]
    pub command_timeout: u64,

    /// Additional rejection marker (repeatable)
    #[arg(long = "reject-marker")]
    pub reject_markers: Vec<String>,
}

/// Execute capture command
pub fn execute(args: CaptureArgs) -> CommandResult {
    let mut inventory = load_inventory(&args.inventory)?;

    let password = std::env::var(&args.password_env)
        .ok()
        .filter(|p| !p.is_empty())
        .map(Sensitive::new);
    for record in &mut inventory {
        record.fill_default_credentials(args.username.as_deref(), password.as_ref());
    }

    let executor: Box<dyn RemoteExecutor> = match args.executor {
        ExecutorKind::Ssh => Box::new(SshExecutor::new(SshConfig {
            program: args.ssh_program,
            connect_timeout: Duration::from_secs(args.connect_timeout),
            command_timeout: Duration::from_secs(args.command_timeout),
            extra_options: args.ssh_options,
            ..SshConfig::default()
        })),
        ExecutorKind::Replay => {
            let path = args
                .replay_file
                .ok_or("--replay-file is required with --executor replay")?;
            Box::new(ScriptedExecutor::from_file(&path)?)
        }
    };

    let mut rejection_markers = default_rejection_markers();
    rejection_markers.extend(args.reject_markers);
    let options = CaptureOptions {
        workers: args.workers,
        rejection_markers,
        ..CaptureOptions::default()
    };

    println!(
        "Capturing {} device(s) into {} (run {})",
        inventory.len(),
        args.window.display(),
        options.run_id
    );
    let outcome = run_capture(&args.window, &inventory, executor.as_ref(), &options)?;
    print_summary("capture", "artifact(s)", &outcome);

    Ok(outcome)
}
