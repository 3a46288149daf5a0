use anyhow::Result;
use colored::Colorize;
use std::time::Instant;

use crate::cargo::{step, OnFailure};

/// Crates that must build without `std` for the board.
const NO_STD_CRATES: &[&str] = &["platform", "library", "playback", "ui"];

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking the player crates...".cyan().bold());
    println!();

    let total_start = Instant::now();

    step("Host build", &["check", "--workspace", "--all-targets"], OnFailure::Fail)?;

    let mut no_std = vec!["check", "--target", "thumbv7em-none-eabihf"];
    for krate in NO_STD_CRATES {
        no_std.extend(["-p", krate]);
    }
    step("no_std build (thumbv7em)", &no_std, OnFailure::Fail)?;

    step(
        "Clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
        OnFailure::Warn,
    )?;

    if step("Formatting", &["fmt", "--all", "--check"], OnFailure::Warn)?.is_none() {
        eprintln!("     Run 'cargo fmt --all' to fix");
    }

    println!(
        "{}",
        format!("✓ All checks completed in {:.2}s", total_start.elapsed().as_secs_f64())
            .green()
            .bold()
    );
    println!();

    Ok(())
}
