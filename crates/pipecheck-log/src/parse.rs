use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, trace};

use crate::{LogError, RegisterSnapshot, Result};

/// A recognised line of simulator output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLine {
    /// `CYCLE <n>`: starts a new cycle block.
    Cycle(u64),
    /// `R[<index>]: <value>`: one register of the current block.
    Register { index: u32, value: i64 },
}

impl LogLine {
    /// Classify one line of a log.
    ///
    /// Both patterns are anchored at the start of the trimmed line and ignore
    /// whatever follows the captured number, so simulators may append notes.
    /// Anything else, including numbers that overflow, yields `None`.
    ///
    /// # Panics
    ///
    /// Panics only if the built-in line patterns fail to compile.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();

        let cycle_pattern = CYCLE_PATTERN
            .get_or_init(|| Regex::new(r"^CYCLE\s+(\d+)").expect("valid cycle pattern"));
        if let Some(caps) = cycle_pattern.captures(line) {
            let cycle = caps.get(1)?.as_str().parse::<u64>().ok()?;
            return Some(Self::Cycle(cycle));
        }

        let reg_pattern = REG_PATTERN.get_or_init(|| {
            Regex::new(r"^R\[(\d+)\]:\s+(-?\d+)").expect("valid register pattern")
        });
        let caps = reg_pattern.captures(line)?;
        let index = caps.get(1)?.as_str().parse::<u32>().ok()?;
        let value = caps.get(2)?.as_str().parse::<i64>().ok()?;
        Some(Self::Register { index, value })
    }
}

static CYCLE_PATTERN: OnceLock<Regex> = OnceLock::new();
static REG_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Final state extracted from one log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLog {
    /// Registers of the last non-empty cycle block.
    pub registers: RegisterSnapshot,
    /// Value of the last `CYCLE` header, if any was seen.
    pub last_cycle: Option<u64>,
    /// Number of `CYCLE` headers seen.
    pub cycle_blocks: usize,
    /// Lines matching neither pattern.
    pub ignored_lines: usize,
}

impl ParsedLog {
    /// Total cycles executed.
    ///
    /// Headers count from zero, so this is the last header plus one. A log with
    /// no header at all reports one cycle.
    #[must_use]
    pub fn total_cycles(&self) -> u64 {
        self.last_cycle.unwrap_or(0).saturating_add(1)
    }
}

/// Parse a log from any buffered reader.
///
/// A header commits the block accumulated so far (when it holds at least one
/// register) and starts a new one. If the input ends mid-block, the partial
/// block becomes the final snapshot.
///
/// # Errors
///
/// Returns the underlying I/O error if a line cannot be read, including lines
/// that are not valid UTF-8.
pub fn parse_log<R: BufRead>(reader: R) -> std::io::Result<ParsedLog> {
    let mut parsed = ParsedLog::default();
    let mut current = RegisterSnapshot::new();

    for line in reader.lines() {
        let line = line?;
        match LogLine::parse(&line) {
            Some(LogLine::Cycle(cycle)) => {
                parsed.last_cycle = Some(cycle);
                parsed.cycle_blocks += 1;
                if !current.is_empty() {
                    parsed.registers = std::mem::take(&mut current);
                }
            }
            Some(LogLine::Register { index, value }) => current.set(index, value),
            None => {
                trace!(line = %line, "ignoring unrecognised line");
                parsed.ignored_lines += 1;
            }
        }
    }

    if !current.is_empty() {
        parsed.registers = current;
    }

    Ok(parsed)
}

/// Parse a log file.
///
/// # Errors
///
/// Returns [`LogError::NotFound`] if the file does not exist and
/// [`LogError::Io`] for any other read failure.
pub fn parse_log_file(path: &Path) -> Result<ParsedLog> {
    let file = File::open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            LogError::NotFound(path.to_path_buf())
        } else {
            LogError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let parsed = parse_log(BufReader::new(file)).map_err(|source| LogError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(
        path = %path.display(),
        blocks = parsed.cycle_blocks,
        registers = parsed.registers.len(),
        ignored = parsed.ignored_lines,
        "parsed log"
    );
    Ok(parsed)
}
