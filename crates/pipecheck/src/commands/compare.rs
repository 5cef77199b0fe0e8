//! Running comparisons and printing their narrative.

use console::style;
use pipecheck::{
    CheckTally, CompareConfig, CycleCheck, ExitCodeMode, RegisterCheck, RunSummary, TestOutcome,
    TestReport, run_all, run_test,
};

use super::list::print_available;
use crate::cli::{EXIT_FAILURE, EXIT_SUCCESS};
use crate::terminal::{self, Progress};

/// Run one test by name.
pub fn cmd_single(config: &CompareConfig, name: &str) -> pipecheck::Result<i32> {
    let name = config.layout.resolve_name(name);
    let report = run_test(config, &name)?;
    print_report(&report);

    Ok(if report.passed() {
        EXIT_SUCCESS
    } else {
        EXIT_FAILURE
    })
}

/// Run every discovered test and print a summary.
pub fn cmd_all(config: &CompareConfig, exit_mode: ExitCodeMode) -> pipecheck::Result<i32> {
    let tests = print_available(&config.layout);
    if tests.is_empty() {
        return Ok(EXIT_FAILURE);
    }

    let progress = Progress::new(tests.len() as u64, "Comparing");
    let summary = run_all(config, &tests, |report| {
        progress.suspend(|| print_report(report));
        progress.inc(1);
    })?;
    progress.finish();

    print_summary(&summary);
    Ok(summary.exit_code(exit_mode))
}

/// Print the per-test narrative.
pub fn print_report(report: &TestReport) {
    let name = &report.name;
    match &report.outcome {
        TestOutcome::MissingFiles(paths) => {
            terminal::error(&format!("Test files for {name} not found"));
            for path in paths {
                eprintln!("  missing: {}", path.display());
            }
        }
        TestOutcome::Completed { registers, cycles } => {
            println!();
            println!("Running test: {}", style(name).bold());
            if let Some(check) = registers {
                print_register_check(check);
            }
            if let Some(check) = cycles {
                print_cycle_check(name, *check);
            }
        }
    }
}

fn print_register_check(check: &RegisterCheck) {
    if check.passed() {
        println!("Register states match exactly between pipeline and single-cycle.");
        return;
    }

    println!("Register state differences found:");
    for (index, mismatch) in &check.differences {
        println!(
            "  R[{}]: pipeline = {}, single_cycle = {}",
            index,
            mismatch.left_display(),
            mismatch.right_display()
        );
    }
}

fn print_cycle_check(name: &str, check: CycleCheck) {
    match check {
        CycleCheck::Matched { actual } => {
            println!("Cycle count matches expected value: {actual}");
        }
        CycleCheck::Mismatch { expected, actual } => {
            println!("Cycle count mismatch: expected {expected}, got {actual}");
        }
        CycleCheck::Unknown { actual } => {
            terminal::warning(&format!("No expected cycle count found for {name}"));
            println!("Cycle count mismatch: expected unknown, got {actual}");
        }
    }
}

/// Print the summary of a sweep, grouped by check.
pub fn print_summary(summary: &RunSummary) {
    println!();
    println!("Summary:");
    if summary.check_type.registers() {
        print_tally("Register State Comparison", "register state", &summary.registers);
    }
    if summary.check_type.cycles() {
        print_tally("Cycle Count Comparison", "cycle count", &summary.cycles);
    }
}

fn print_tally(title: &str, label: &str, tally: &CheckTally) {
    println!();
    println!("{}: {}", style(title).bold(), terminal::verdict(tally.failed == 0));
    println!("Passed: {}", tally.passed);
    println!("Failed: {}", tally.failed);
    if !tally.failed_tests.is_empty() {
        println!();
        println!("Failed {label} tests:");
        for name in &tally.failed_tests {
            println!("  {name}");
        }
    }
}
