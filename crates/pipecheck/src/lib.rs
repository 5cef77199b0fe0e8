//! Pipeline simulator validation.
//!
//! Compares the final register file printed by a pipelined CPU simulator with
//! the one printed by a single-cycle reference simulator for the same program,
//! and checks the pipelined run's total cycle count against an expected value.
//!
//! # Example
//!
//! ```ignore
//! use pipecheck::{CompareConfig, ExpectedCycles, LogLayout, run_test};
//!
//! let config = CompareConfig::default()
//!     .with_layout(LogLayout::under("logs"))
//!     .with_expected(ExpectedCycles::builtin());
//! let report = run_test(&config, "MIPSPipeline-branch.txt")?;
//! assert!(report.passed());
//! ```

mod check;
mod expectations;
mod layout;
pub mod metrics;
mod summary;

pub use check::{
    CheckType, CompareConfig, CycleCheck, RegisterCheck, TestOutcome, TestReport, run_test,
};
pub use expectations::ExpectedCycles;
pub use layout::{Discovery, LOG_SUFFIX, LogLayout, discover_tests};
pub use summary::{CheckTally, ExitCodeMode, RunSummary, run_all};

pub use pipecheck_log::{
    Differences, LogError, ParsedLog, REGISTER_COUNT, RegisterMismatch, RegisterSnapshot,
    compare_registers, parse_log_file,
};

use std::path::PathBuf;

use thiserror::Error;

/// Comparison errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Log(#[from] LogError),
    #[error("failed to read expectation file {}: {source}", path.display())]
    ExpectationsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid expectation file {}: {source}", path.display())]
    ExpectationsFormat {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
