//! Register-state log parsing for CPU simulator dumps.
//!
//! Both the pipelined simulator and the single-cycle reference simulator print
//! their architectural state once per cycle:
//!
//! ```text
//! CYCLE 12
//! R[0]: 0
//! R[1]: -4
//! ```
//!
//! This crate extracts the register file from the last cycle block of such a
//! log and compares two register files against each other.

mod diff;
mod parse;
mod snapshot;

pub use diff::{Differences, REGISTER_COUNT, RegisterMismatch, compare_registers};
pub use parse::{LogLine, ParsedLog, parse_log, parse_log_file};
pub use snapshot::RegisterSnapshot;

use std::path::PathBuf;

use thiserror::Error;

/// Log reading errors.
#[derive(Error, Debug)]
pub enum LogError {
    #[error("log file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LogError {
    /// Path of the log that failed.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::NotFound(path) | Self::Io { path, .. } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, LogError>;
