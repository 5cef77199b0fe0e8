//! pipecheck CLI - pipelined vs. single-cycle simulator log comparison

mod cli;
mod commands;
mod terminal;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn main() {
    let cli = Cli::parse();

    // Initialize metrics recorder if enabled
    let metrics_handle = if cli.metrics {
        pipecheck::metrics::CliRecorder::new().install()
    } else {
        None
    };
    pipecheck::metrics::init();

    // RUST_LOG wins over the default; -v raises our crates to debug on top.
    let mut filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pipecheck=warn,pipecheck_log=warn"));
    if cli.verbose {
        for directive in ["pipecheck=debug", "pipecheck_log=debug"] {
            if let Ok(directive) = directive.parse() {
                filter = filter.add_directive(directive);
            }
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = commands::run_command(&cli);

    if let Some(handle) = metrics_handle {
        handle.print_summary();
    }

    std::process::exit(exit_code);
}
