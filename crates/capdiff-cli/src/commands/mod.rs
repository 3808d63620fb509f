pub mod capture;
pub mod diff;

use capdiff_core::outcome::RunOutcome;

pub type CommandResult = Result<RunOutcome, Box<dyn std::error::Error>>;

/// Print the end-of-run summary on stdout
pub fn print_summary(pass: &str, noun: &str, outcome: &RunOutcome) {
    if outcome.had_errors() {
        println!(
            "{} completed with errors: {} {} written, {} failure(s)",
            pass,
            outcome.artifacts_written,
            noun,
            outcome.failures.len()
        );
        for failure in &outcome.failures {
            println!("  - {}", failure);
        }
    } else {
        println!(
            "{} completed cleanly: {} {} written",
            pass, outcome.artifacts_written, noun
        );
    }
}
