//! rustible-molecule - Ansible artifacts for test scenarios
//!
//! This is the main entry point for the rustible-molecule CLI.

mod cli;

use cli::Cli;
use colored::Colorize;
use rustible_molecule::error::Error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    if cli.no_color {
        colored::control::set_override(false);
    }

    let exit_code = match cli::commands::execute(&cli) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{}", format!("{err:#}").red());
            err.downcast_ref::<Error>().map_or(1, Error::exit_code)
        }
    };

    std::process::exit(exit_code);
}

/// Initialize logging based on verbosity level
fn init_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(verbosity >= 3))
        .with(env_filter)
        .init();
}
