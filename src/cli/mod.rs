//! CLI module for rustible-molecule
//!
//! Argument parsing and subcommand dispatch. The library never exits the
//! process; this layer maps errors to exit codes.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// rustible-molecule - prepare Ansible artifacts for a test scenario
#[derive(Parser, Debug, Clone)]
#[command(name = "rustible-molecule")]
#[command(author = "Rustible Contributors")]
#[command(version)]
#[command(
    about = "Generate Ansible config, inventory and vars for a test scenario",
    long_about = None
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the scenario file
    #[arg(
        short = 'c',
        long = "scenario",
        global = true,
        env = "MOLECULE_FILE",
        default_value = "molecule/default/molecule.yml"
    )]
    pub scenario: PathBuf,

    /// Directory receiving the generated artifacts
    #[arg(long, global = true)]
    pub ephemeral_directory: Option<PathBuf>,

    /// Override an ansible.cfg value (section.key=value)
    #[arg(long = "config-option", global = true, action = clap::ArgAction::Append)]
    pub config_options: Vec<String>,

    /// Run playbooks with debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Verify the inventory and write every artifact
    Prepare,

    /// Fail if the scenario declares no instance
    Verify,

    /// Print the generated inventory
    Inventory,

    /// Print the generated ansible.cfg
    Config,

    /// Print the environment passed to ansible-playbook
    Env,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Get the effective verbosity level (0-3)
    pub fn verbosity(&self) -> u8 {
        self.verbose.min(3)
    }
}
