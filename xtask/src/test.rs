use anyhow::Result;
use colored::Colorize;
use std::time::Instant;

use crate::cargo::{step, OnFailure};

pub fn run(unit_only: bool, integration_only: bool) -> Result<()> {
    println!();
    println!("{}", "🧪 Running tests...".cyan().bold());
    println!();

    let total_start = Instant::now();

    if !integration_only {
        let out = step("Unit tests", &["test", "--lib", "--workspace"], OnFailure::Fail)?;
        print_summary(out.as_deref());
    }

    if !unit_only {
        let out = step("Integration tests", &["test", "--tests", "--workspace"], OnFailure::Fail)?;
        print_summary(out.as_deref());
    }

    // Doc test failures never fail the run.
    let out = step("Doc tests", &["test", "--doc", "--workspace"], OnFailure::Warn)?;
    print_summary(out.as_deref());

    println!(
        "{}",
        format!("✓ All tests completed in {:.2}s", total_start.elapsed().as_secs_f64())
            .green()
            .bold()
    );
    println!();

    Ok(())
}

fn print_summary(output: Option<&str>) {
    if let Some(output) = output {
        let (passed, failed) = totals(output);
        println!("    {} passed, {} failed", passed, failed);
        println!();
    }
}

/// Sum every `test result:` line of a cargo test run.
fn totals(output: &str) -> (u32, u32) {
    let mut passed = 0u32;
    let mut failed = 0u32;
    for line in output.lines() {
        let Some(summary) = line.split("test result:").nth(1) else {
            continue;
        };
        for part in summary.split(';') {
            let mut words = part.split_whitespace().rev();
            let (Some(kind), Some(count)) = (words.next(), words.next()) else {
                continue;
            };
            let Ok(count) = count.parse::<u32>() else {
                continue;
            };
            match kind {
                "passed" => passed = passed.saturating_add(count),
                "failed" => failed = failed.saturating_add(count),
                _ => {}
            }
        }
    }
    (passed, failed)
}

#[cfg(test)]
mod tests {
    use super::totals;

    #[test]
    fn totals_add_up_every_result_line() {
        let output = "\
running 3 tests
test result: ok. 3 passed; 0 failed; 0 ignored; 0 measured; 0 filtered out
running 2 tests
test result: FAILED. 1 passed; 1 failed; 0 ignored; 0 measured; 0 filtered out
";
        assert_eq!(totals(output), (4, 1));
    }

    #[test]
    fn totals_of_nothing_is_zero() {
        assert_eq!(totals("no tests here"), (0, 0));
    }
}
