//! Subcommand implementations.

use super::{Cli, Commands};
use anyhow::{Context, Result};
use rustible_molecule::config::{parse_config_override, ScenarioConfig};
use rustible_molecule::provisioner::artifacts::render_config;
use rustible_molecule::provisioner::Ansible;

/// Load the scenario named on the command line, applying CLI overrides
pub fn load_config(cli: &Cli) -> Result<ScenarioConfig> {
    let mut config = ScenarioConfig::load(&cli.scenario)
        .with_context(|| format!("failed to load scenario '{}'", cli.scenario.display()))?;

    if let Some(dir) = &cli.ephemeral_directory {
        config = config.with_ephemeral_directory(dir);
    }
    if cli.debug {
        config = config.with_arg("debug", true);
    }
    for raw in &cli.config_options {
        let (section, key, value) = parse_config_override(raw)?;
        config = config.with_config_override(section, key, value);
    }

    Ok(config)
}

/// Execute the selected subcommand
pub fn execute(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    let ansible = Ansible::new(&config)?;

    match cli.command {
        Commands::Prepare => {
            ansible.prepare()?;
            println!(
                "Prepared scenario '{}' in {}",
                config.scenario_name(),
                config.ephemeral_directory.display()
            );
        }
        Commands::Verify => ansible.verify_inventory()?,
        Commands::Inventory => {
            print!("{}", serde_yaml::to_string(&ansible.inventory())?);
        }
        Commands::Config => {
            print!("{}", render_config(&ansible.config_options())?);
        }
        Commands::Env => {
            for (key, value) in ansible.env() {
                println!("{key}={value}");
            }
        }
    }

    Ok(())
}
