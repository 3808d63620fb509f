//! Diff commands
//!
//! Usage:
//! - capdiff diff --w1 <A> --w2 <B> [-o <OUT>]
//! - capdiff diff-inventory --w1 <A> --w2 <B> -i <INVENTORY> [-o <OUT>] [--context N]

use super::{print_summary, CommandResult};
use capdiff_core::report::RenderMode;
use capdiff_engine::{default_output_dir, reconcile_inventory, reconcile_windows, ReconcileOptions};
use capdiff_store::load_inventory;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Earlier capture window (left side of every report)
    #[arg(long = "w1")]
    pub window_a: PathBuf,

    /// Later capture window (right side of every report)
    #[arg(long = "w2")]
    pub window_b: PathBuf,

    /// Report directory (must not exist) [default: <w1>_<w2>_diff]
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct DiffInventoryArgs {
    #[command(flatten)]
    pub windows: DiffArgs,

    /// Inventory YAML file naming the expected artifacts
    #[arg(short = 'i', long)]
    pub inventory: PathBuf,

    /// Unchanged lines kept around each change
    #[arg(long, default_value_t = RenderMode::DEFAULT_CONTEXT_LINES)]
    pub context: usize,
}

impl DiffArgs {
    fn output_dir(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_dir(&self.window_a, &self.window_b))
    }
}

/// Execute diff command (changes-only reports)
pub fn execute(args: DiffArgs) -> CommandResult {
    let output = args.output_dir();
    println!(
        "Diffing {} against {} into {}",
        args.window_a.display(),
        args.window_b.display(),
        output.display()
    );

    let outcome = reconcile_windows(
        &args.window_a,
        &args.window_b,
        &output,
        &ReconcileOptions::changes_only(),
    )?;
    print_summary("diff", "report(s)", &outcome);

    Ok(outcome)
}

/// Execute diff-inventory command (full-context reports)
pub fn execute_inventory(args: DiffInventoryArgs) -> CommandResult {
    let inventory = load_inventory(&args.inventory)?;
    let windows = &args.windows;
    let output = windows.output_dir();
    println!(
        "Diffing {} against {} for {} device(s) into {}",
        windows.window_a.display(),
        windows.window_b.display(),
        inventory.len(),
        output.display()
    );

    let outcome = reconcile_inventory(
        &windows.window_a,
        &windows.window_b,
        &inventory,
        &output,
        &ReconcileOptions::full_context(args.context),
    )?;
    print_summary("diff-inventory", "report(s)", &outcome);

    Ok(outcome)
}
