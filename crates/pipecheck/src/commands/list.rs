//! Listing available tests.

use pipecheck::{Discovery, LogLayout, discover_tests};

use crate::cli::{EXIT_FAILURE, EXIT_SUCCESS};
use crate::terminal;

/// Discover tests and print them, reporting why none were found.
pub fn print_available(layout: &LogLayout) -> Vec<String> {
    match discover_tests(layout) {
        Discovery::Found(tests) => {
            println!("Available tests:");
            for name in &tests {
                println!("  {name}");
            }
            tests
        }
        Discovery::MissingDirectory(dir) => {
            terminal::error(&format!("log directory not found: {}", dir.display()));
            Vec::new()
        }
        Discovery::Empty => {
            println!("No test files found");
            Vec::new()
        }
    }
}

/// List tests; succeeds only if at least one was found.
pub fn cmd_list(layout: &LogLayout) -> i32 {
    if print_available(layout).is_empty() {
        EXIT_FAILURE
    } else {
        EXIT_SUCCESS
    }
}
