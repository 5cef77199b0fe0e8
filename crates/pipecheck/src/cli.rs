//! CLI definitions and argument types.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use pipecheck::{CheckType, ExitCodeMode};

/// Exit code for success.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for failure.
pub const EXIT_FAILURE: i32 = 1;

/// Test name that selects every discovered test.
pub const ALL_TESTS: &str = "all";

#[derive(Parser)]
#[command(name = "pipecheck")]
#[command(
    about = "Compare final register state and cycle counts between pipelined and single-cycle simulator logs"
)]
#[command(version)]
pub struct Cli {
    /// Test to run, "all" for every test, or omit to list available tests
    #[arg(value_name = "TEST")]
    pub test_name: Option<String>,

    /// Which checks to perform
    #[arg(long, value_enum, default_value = "both")]
    pub check_type: CheckTypeArg,

    /// Directory containing the pipeline/ and single_cycle/ log directories
    #[arg(long, value_name = "DIR", default_value = "logs")]
    pub logs_dir: PathBuf,

    /// TOML file of expected cycle counts (replaces the built-in table)
    #[arg(long, value_name = "FILE")]
    pub expected: Option<PathBuf>,

    /// How the exit status reports failures when running all tests
    #[arg(long, value_enum, default_value = "status")]
    pub exit_code: ExitCodeArg,

    /// Show metrics summary after execution
    #[arg(long)]
    pub metrics: bool,

    /// Enable debug logging for pipecheck (adds to any RUST_LOG filter)
    #[arg(short, long)]
    pub verbose: bool,
}

/// Check selection argument.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CheckTypeArg {
    /// Final register state only
    Registers,
    /// Pipelined cycle count only
    Cycles,
    /// Registers and cycle count
    Both,
}

impl From<CheckTypeArg> for CheckType {
    fn from(arg: CheckTypeArg) -> Self {
        match arg {
            CheckTypeArg::Registers => Self::Registers,
            CheckTypeArg::Cycles => Self::Cycles,
            CheckTypeArg::Both => Self::Both,
        }
    }
}

/// Exit status convention argument.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ExitCodeArg {
    /// 0 when every check passed, 1 otherwise
    Status,
    /// Number of failed checks (at most 255)
    Count,
}

impl From<ExitCodeArg> for ExitCodeMode {
    fn from(arg: ExitCodeArg) -> Self {
        match arg {
            ExitCodeArg::Status => Self::Status,
            ExitCodeArg::Count => Self::Count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["pipecheck"]).unwrap();
        assert!(cli.test_name.is_none());
        assert_eq!(CheckType::from(cli.check_type), CheckType::Both);
        assert_eq!(cli.logs_dir, PathBuf::from("logs"));
        assert_eq!(ExitCodeMode::from(cli.exit_code), ExitCodeMode::Status);
    }

    #[test]
    fn test_check_type_flag() {
        let cli = Cli::try_parse_from(["pipecheck", "all", "--check-type=cycles"]).unwrap();
        assert_eq!(cli.test_name.as_deref(), Some(ALL_TESTS));
        assert_eq!(CheckType::from(cli.check_type), CheckType::Cycles);

        assert!(Cli::try_parse_from(["pipecheck", "T.txt", "--check-type=memory"]).is_err());
    }
}
