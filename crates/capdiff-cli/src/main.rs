//! capdiff CLI
//!
//! Command-line interface for capturing device command output around a
//! change and diffing the two captures.
//!
//! Exit codes: `0` clean, `1` fatal error, `3` finished with per-item errors.

use capdiff_core::logging_facility::{init, Profile};
use clap::{Parser, Subcommand, ValueEnum};

mod commands;

const EXIT_FATAL: i32 = 1;
const EXIT_COMPLETED_WITH_ERRORS: i32 = 3;

#[derive(Debug, Parser)]
#[command(name = "capdiff")]
#[command(
    about = "capdiff - capture device output before and after a change, then diff it",
    long_about = None
)]
struct Cli {
    /// Log line format on stderr
    #[arg(long, value_enum, global = true, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the inventory's commands on every device into a new capture window
    Capture(commands::capture::CaptureArgs),
    /// Diff every artifact two capture windows have in common
    Diff(commands::diff::DiffArgs),
    /// Diff the artifacts an inventory should have produced in two windows
    DiffInventory(commands::diff::DiffInventoryArgs),
}

fn main() {
    let cli = Cli::parse();

    init(match cli.log_format {
        LogFormat::Text => Profile::Development,
        LogFormat::Json => Profile::Production,
    });

    let result = match cli.command {
        Commands::Capture(args) => commands::capture::execute(args),
        Commands::Diff(args) => commands::diff::execute(args),
        Commands::DiffInventory(args) => commands::diff::execute_inventory(args),
    };

    match result {
        Ok(outcome) if outcome.had_errors() => std::process::exit(EXIT_COMPLETED_WITH_ERRORS),
        Ok(_) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(EXIT_FATAL);
        }
    }
}
