//! Aggregate results across a run.

use crate::{CheckType, CompareConfig, Result, TestReport, run_test};

/// Largest exit status that survives truncation on common platforms.
const MAX_EXIT_STATUS: i32 = 255;

/// How the process exit status reports failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitCodeMode {
    /// 0 when everything passed, 1 otherwise.
    #[default]
    Status,
    /// Number of failed checks, saturated at 255.
    Count,
}

/// Pass/fail counts for one kind of check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckTally {
    pub passed: usize,
    pub failed: usize,
    pub failed_tests: Vec<String>,
}

impl CheckTally {
    fn add(&mut self, name: &str, passed: bool) {
        if passed {
            self.passed += 1;
        } else {
            self.failed += 1;
            self.failed_tests.push(name.to_string());
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.passed + self.failed
    }
}

/// Summary of a run over many tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub check_type: CheckType,
    pub registers: CheckTally,
    pub cycles: CheckTally,
}

impl RunSummary {
    #[must_use]
    pub fn new(check_type: CheckType) -> Self {
        Self {
            check_type,
            ..Self::default()
        }
    }

    /// Fold a test report into the tallies of the selected checks.
    pub fn add(&mut self, report: &TestReport) {
        if let Some(passed) = report.registers_passed() {
            self.registers.add(&report.name, passed);
        }
        if let Some(passed) = report.cycles_passed() {
            self.cycles.add(&report.name, passed);
        }
    }

    /// Failed checks of the selected kinds.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        let registers = if self.check_type.registers() {
            self.registers.failed
        } else {
            0
        };
        let cycles = if self.check_type.cycles() {
            self.cycles.failed
        } else {
            0
        };
        registers + cycles
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failure_count() == 0
    }

    /// Process exit status for this summary.
    #[must_use]
    pub fn exit_code(&self, mode: ExitCodeMode) -> i32 {
        match mode {
            ExitCodeMode::Status => i32::from(!self.all_passed()),
            ExitCodeMode::Count => i32::try_from(self.failure_count())
                .map_or(MAX_EXIT_STATUS, |count| count.min(MAX_EXIT_STATUS)),
        }
    }
}

/// Run every test, handing each report to `observe` as it completes.
///
/// # Errors
///
/// Stops at the first log that exists but cannot be read.
pub fn run_all<F>(config: &CompareConfig, tests: &[String], mut observe: F) -> Result<RunSummary>
where
    F: FnMut(&TestReport),
{
    let mut summary = RunSummary::new(config.check_type);
    for name in tests {
        let report = run_test(config, name)?;
        observe(&report);
        summary.add(&report);
    }
    Ok(summary)
}
