//! Shared runner for the cargo invocations behind `check` and `test`.

use std::process::Command;
use std::time::Instant;

use anyhow::{Context, Result};
use colored::Colorize;

/// What a failing step does to the overall run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnFailure {
    /// Abort with an error
    Fail,
    /// Print a warning and carry on
    Warn,
}

/// Run `cargo <args>` under a label, printing a timed pass/fail line.
///
/// Returns the captured stdout on success.
pub fn step(label: &str, args: &[&str], on_failure: OnFailure) -> Result<Option<String>> {
    println!("{}", format!("  {label}...").cyan());
    let start = Instant::now();

    let output = Command::new("cargo")
        .args(args)
        .output()
        .with_context(|| format!("Failed to run cargo {}", args.join(" ")))?;

    if !output.status.success() {
        match on_failure {
            OnFailure::Fail => {
                eprintln!("{}", format!("  ✗ {label} failed").red().bold());
                eprintln!();
                eprintln!("{}", String::from_utf8_lossy(&output.stdout));
                eprintln!("{}", String::from_utf8_lossy(&output.stderr));
                anyhow::bail!("{label} failed");
            }
            OnFailure::Warn => {
                eprintln!("{}", format!("  ⚠ {label} reported problems").yellow().bold());
                eprintln!("{}", String::from_utf8_lossy(&output.stderr));
                println!();
                return Ok(None);
            }
        }
    }

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    println!(
        "{}",
        format!("  ✓ {label} passed in {:.2}s", start.elapsed().as_secs_f64()).green()
    );
    println!();
    Ok(Some(stdout))
}
