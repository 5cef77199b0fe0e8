//! Per-test comparison of the pipelined simulator against the reference.

use std::path::PathBuf;

use pipecheck_log::{Differences, LogError, ParsedLog, compare_registers, parse_log_file};
use tracing::{debug, info_span};

use crate::{ExpectedCycles, LogLayout, Result};

/// Which checks to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckType {
    /// Final register file only.
    Registers,
    /// Pipelined cycle count only.
    Cycles,
    /// Both checks.
    #[default]
    Both,
}

impl CheckType {
    #[must_use]
    pub const fn registers(self) -> bool {
        matches!(self, Self::Registers | Self::Both)
    }

    #[must_use]
    pub const fn cycles(self) -> bool {
        matches!(self, Self::Cycles | Self::Both)
    }
}

/// Settings shared by every test in a run.
///
/// The default reads `logs/`, runs both checks and uses the built-in
/// expected cycle table.
#[derive(Debug, Clone)]
pub struct CompareConfig {
    pub layout: LogLayout,
    pub expected: ExpectedCycles,
    pub check_type: CheckType,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            layout: LogLayout::default(),
            expected: ExpectedCycles::builtin(),
            check_type: CheckType::default(),
        }
    }
}

impl CompareConfig {
    /// Set the log layout.
    #[must_use]
    pub fn with_layout(mut self, layout: LogLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Set the expected cycle table.
    #[must_use]
    pub fn with_expected(mut self, expected: ExpectedCycles) -> Self {
        self.expected = expected;
        self
    }

    /// Set which checks run.
    #[must_use]
    pub const fn with_check_type(mut self, check_type: CheckType) -> Self {
        self.check_type = check_type;
        self
    }
}

/// Result of the register comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterCheck {
    /// Mismatches as (pipeline, reference) pairs.
    pub differences: Differences,
}

impl RegisterCheck {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.differences.is_empty()
    }
}

/// Result of the cycle-count comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleCheck {
    Matched { actual: u64 },
    Mismatch { expected: u64, actual: u64 },
    /// The test has no entry in the expectation table.
    Unknown { actual: u64 },
}

impl CycleCheck {
    /// Compare a measured count against the table entry for `name`.
    #[must_use]
    pub fn evaluate(expected: &ExpectedCycles, name: &str, actual: u64) -> Self {
        match expected.get(name) {
            Some(expected) if expected == actual => Self::Matched { actual },
            Some(expected) => Self::Mismatch { expected, actual },
            None => Self::Unknown { actual },
        }
    }

    #[must_use]
    pub const fn passed(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }

    #[must_use]
    pub const fn actual(&self) -> u64 {
        match *self {
            Self::Matched { actual } | Self::Mismatch { actual, .. } | Self::Unknown { actual } => {
                actual
            }
        }
    }
}

/// What happened when a test ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    /// One or both logs are absent; every requested check fails.
    MissingFiles(Vec<PathBuf>),
    /// Both logs were read. A check is `None` when it was not requested.
    Completed {
        registers: Option<RegisterCheck>,
        cycles: Option<CycleCheck>,
    },
}

/// Report for a single test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestReport {
    pub name: String,
    pub check_type: CheckType,
    pub outcome: TestOutcome,
}

impl TestReport {
    /// Register check verdict, `None` if it was not requested.
    #[must_use]
    pub fn registers_passed(&self) -> Option<bool> {
        if !self.check_type.registers() {
            return None;
        }
        match &self.outcome {
            TestOutcome::MissingFiles(_) => Some(false),
            TestOutcome::Completed { registers, .. } => {
                Some(registers.as_ref().is_some_and(RegisterCheck::passed))
            }
        }
    }

    /// Cycle check verdict, `None` if it was not requested.
    #[must_use]
    pub fn cycles_passed(&self) -> Option<bool> {
        if !self.check_type.cycles() {
            return None;
        }
        match &self.outcome {
            TestOutcome::MissingFiles(_) => Some(false),
            TestOutcome::Completed { cycles, .. } => Some(cycles.is_some_and(|c| c.passed())),
        }
    }

    /// Whether every requested check passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.registers_passed() != Some(false) && self.cycles_passed() != Some(false)
    }
}

/// Run the requested checks for one test.
///
/// Absent logs are reported in the outcome, not as an error.
///
/// # Errors
///
/// Returns an error if a log exists but cannot be read.
pub fn run_test(config: &CompareConfig, name: &str) -> Result<TestReport> {
    let _span = info_span!("test", name = name).entered();
    let check_type = config.check_type;

    let pipeline_path = config.layout.pipeline_log(name);
    let reference_path = config.layout.reference_log(name);

    let missing: Vec<PathBuf> = [&pipeline_path, &reference_path]
        .into_iter()
        .filter(|path| !path.is_file())
        .cloned()
        .collect();
    if !missing.is_empty() {
        debug!(missing = missing.len(), "logs not found");
        let report = TestReport {
            name: name.to_string(),
            check_type,
            outcome: TestOutcome::MissingFiles(missing),
        };
        crate::metrics::record_report(&report);
        return Ok(report);
    }

    let pipeline = timed_parse(&pipeline_path)?;

    let registers = if check_type.registers() {
        let reference = timed_parse(&reference_path)?;
        let differences = compare_registers(&pipeline.registers, &reference.registers);
        debug!(differences = differences.len(), "compared registers");
        Some(RegisterCheck { differences })
    } else {
        None
    };

    let cycles = check_type
        .cycles()
        .then(|| CycleCheck::evaluate(&config.expected, name, pipeline.total_cycles()));

    let report = TestReport {
        name: name.to_string(),
        check_type,
        outcome: TestOutcome::Completed { registers, cycles },
    };
    crate::metrics::record_report(&report);
    Ok(report)
}

fn timed_parse(path: &std::path::Path) -> std::result::Result<ParsedLog, LogError> {
    let start = std::time::Instant::now();
    let parsed = parse_log_file(path)?;
    crate::metrics::record_parse(start.elapsed().as_secs_f64());
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn completed(registers: Option<RegisterCheck>, cycles: Option<CycleCheck>) -> TestOutcome {
        TestOutcome::Completed { registers, cycles }
    }

    #[test]
    fn test_check_type_selection() {
        assert!(CheckType::Both.registers() && CheckType::Both.cycles());
        assert!(CheckType::Registers.registers() && !CheckType::Registers.cycles());
        assert!(!CheckType::Cycles.registers() && CheckType::Cycles.cycles());
        assert_eq!(CheckType::default(), CheckType::Both);
    }

    #[test]
    fn test_default_config_uses_builtin_table() {
        let config = CompareConfig::default();
        assert_eq!(config.expected, ExpectedCycles::builtin());
        assert_eq!(config.check_type, CheckType::Both);
        assert_eq!(config.layout, LogLayout::default());
    }

    #[test]
    fn test_cycle_evaluate() {
        let table = ExpectedCycles::builtin();
        assert_eq!(
            CycleCheck::evaluate(&table, "MIPSPipeline-branch.txt", 138),
            CycleCheck::Matched { actual: 138 }
        );
        assert_eq!(
            CycleCheck::evaluate(&table, "MIPSPipeline-branch.txt", 137),
            CycleCheck::Mismatch {
                expected: 138,
                actual: 137
            }
        );
        let unknown = CycleCheck::evaluate(&table, "T.txt", 138);
        assert_eq!(unknown, CycleCheck::Unknown { actual: 138 });
        assert!(!unknown.passed());
        assert_eq!(unknown.actual(), 138);
    }

    #[test]
    fn test_missing_files_fail_requested_checks() {
        let report = TestReport {
            name: "T.txt".into(),
            check_type: CheckType::Registers,
            outcome: TestOutcome::MissingFiles(vec![PathBuf::from("logs/pipeline/T.txt")]),
        };
        assert_eq!(report.registers_passed(), Some(false));
        assert_eq!(report.cycles_passed(), None);
        assert!(!report.passed());
    }

    #[test]
    fn test_report_verdicts() {
        let report = TestReport {
            name: "T.txt".into(),
            check_type: CheckType::Both,
            outcome: completed(
                Some(RegisterCheck {
                    differences: Differences::new(),
                }),
                Some(CycleCheck::Unknown { actual: 3 }),
            ),
        };
        assert_eq!(report.registers_passed(), Some(true));
        assert_eq!(report.cycles_passed(), Some(false));
        assert!(!report.passed());
    }

    #[test]
    fn test_run_test_missing_logs() {
        let root = tempfile::tempdir().unwrap();
        let config = CompareConfig::default().with_layout(LogLayout::under(root.path()));

        let report = run_test(&config, "T.txt").unwrap();
        match &report.outcome {
            TestOutcome::MissingFiles(paths) => assert_eq!(paths.len(), 2),
            other @ TestOutcome::Completed { .. } => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(report.registers_passed(), Some(false));
        assert_eq!(report.cycles_passed(), Some(false));
    }
}
