//! Command implementations.
//!
//! The positional test name selects the mode: none lists tests, `all` sweeps
//! every test, anything else runs a single test.

mod compare;
mod list;

use pipecheck::{CompareConfig, ExpectedCycles, LogLayout};

use crate::cli::{ALL_TESTS, Cli, EXIT_FAILURE};
use crate::terminal;

/// Dispatch the CLI to the appropriate handler and return the exit code.
pub fn run_command(cli: &Cli) -> i32 {
    let config = match build_config(cli) {
        Ok(config) => config,
        Err(e) => {
            terminal::error(&e.to_string());
            return EXIT_FAILURE;
        }
    };

    let result = match cli.test_name.as_deref() {
        None => Ok(list::cmd_list(&config.layout)),
        Some(ALL_TESTS) => compare::cmd_all(&config, cli.exit_code.into()),
        Some(name) => compare::cmd_single(&config, name),
    };

    result.unwrap_or_else(|e| {
        terminal::error(&e.to_string());
        EXIT_FAILURE
    })
}

fn build_config(cli: &Cli) -> pipecheck::Result<CompareConfig> {
    let expected = match &cli.expected {
        Some(path) => ExpectedCycles::load(path)?,
        None => ExpectedCycles::builtin(),
    };

    Ok(CompareConfig::default()
        .with_layout(LogLayout::under(&cli.logs_dir))
        .with_expected(expected)
        .with_check_type(cli.check_type.into()))
}
