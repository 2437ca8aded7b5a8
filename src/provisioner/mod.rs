//! The Ansible provisioner.
//!
//! [`Ansible`] ties a [`ScenarioConfig`] and its [`Driver`] to the merge,
//! inventory and materialization steps, and exposes each derived value on
//! its own so callers can inspect them before anything touches the disk.
//!
//! [`Ansible::prepare`] runs the whole pipeline in order:
//! 1. Build the inventory
//! 2. Verify it has at least one host
//! 3. Write `ansible.cfg`
//! 4. Write the inventory
//! 5. Write `host_vars/` and `group_vars/`

pub mod artifacts;
pub mod env;
pub mod options;
pub mod playbook;
pub mod vars;

pub use env::EnvironmentMap;
pub use options::{ConfigOptions, Options, Section};
pub use playbook::AnsiblePlaybook;
pub use vars::{VarsKind, VarsOverlay};

use crate::config::ScenarioConfig;
use crate::driver::{self, Driver};
use crate::error::Result;
use crate::inventory::builder::instance_with_scenario_name;
use crate::inventory::{self, Inventory, InventoryBuilder, RunVars};
use std::path::{Path, PathBuf};

/// Host name never suffixed with the scenario name
const LOCALHOST: &str = "localhost";

/// Group every host implicitly belongs to
const ALL_GROUP: &str = "all";

/// Ansible provisioner for one scenario run
#[derive(Debug)]
pub struct Ansible<'a> {
    config: &'a ScenarioConfig,
    driver: Box<dyn Driver>,
}

impl<'a> Ansible<'a> {
    /// Create the provisioner, instantiating the scenario's driver
    pub fn new(config: &'a ScenarioConfig) -> Result<Self> {
        let driver = driver::from_config(config)?;
        Ok(Self::with_driver(config, driver))
    }

    /// Create the provisioner with an explicit driver
    pub fn with_driver(config: &'a ScenarioConfig, driver: Box<dyn Driver>) -> Self {
        Self { config, driver }
    }

    /// Provisioner name
    pub fn name(&self) -> &str {
        "ansible"
    }

    /// Scenario configuration
    pub fn config(&self) -> &ScenarioConfig {
        self.config
    }

    /// Instance driver
    pub fn driver(&self) -> &dyn Driver {
        self.driver.as_ref()
    }

    /// Path of the generated inventory
    pub fn inventory_file(&self) -> PathBuf {
        self.config.inventory_file()
    }

    /// Path of the generated `ansible.cfg`
    pub fn config_file(&self) -> PathBuf {
        self.config.config_file()
    }

    /// Built-in `ansible.cfg` sections
    pub fn default_config_options(&self) -> ConfigOptions {
        ConfigOptions::builtin(
            &self.config.libraries_directory(),
            &self.config.filter_plugin_directory(),
        )
    }

    /// Merged `ansible.cfg` sections
    pub fn config_options(&self) -> ConfigOptions {
        let declared =
            ConfigOptions::from_sections(self.config.provisioner().config_options.clone());
        let overrides = ConfigOptions::from_sections(self.config.config_overrides.clone());
        options::merge(&self.default_config_options(), &declared, &overrides)
    }

    /// Built-in playbook options
    pub fn default_options(&self) -> Options {
        Options::new()
    }

    /// Merged playbook options, command-line arguments winning
    pub fn options(&self) -> Options {
        options::merge_options(
            &self.default_options(),
            &self.config.provisioner().options,
            &self.config.args,
        )
    }

    /// Built-in environment
    pub fn default_env(&self) -> EnvironmentMap {
        env::default_env(&self.config_file())
    }

    /// Merged environment
    pub fn env(&self) -> EnvironmentMap {
        env::resolve(&self.default_env(), &self.config.provisioner().env)
    }

    /// Declared host variables, keyed by platform name
    pub fn host_vars(&self) -> &VarsOverlay {
        &self.config.provisioner().host_vars
    }

    /// Declared group variables
    pub fn group_vars(&self) -> &VarsOverlay {
        &self.config.provisioner().group_vars
    }

    /// Inventory host name of a platform
    pub fn instance_name(&self, platform: &str) -> String {
        instance_with_scenario_name(platform, self.config.scenario_name())
    }

    /// Path variables exposed to every play
    pub fn run_vars(&self) -> RunVars {
        RunVars {
            molecule_file: self.config.molecule_file.clone(),
            molecule_instance_config: self.driver.instance_config(),
            molecule_inventory_file: self.inventory_file(),
            molecule_scenario_directory: self.config.scenario_directory.clone(),
        }
    }

    /// Derive the inventory from the declared platforms
    pub fn inventory(&self) -> Inventory {
        InventoryBuilder::new(self.run_vars(), |host: &str| {
            self.driver.connection_options(host)
        })
        .scenario_suffix(self.config.scenario_name())
        .build(self.config.platforms())
    }

    /// Fail when the scenario declares no instance
    pub fn verify_inventory(&self) -> Result<()> {
        inventory::verify(&self.inventory())
    }

    /// Write the inventory file
    pub fn write_inventory(&self) -> Result<()> {
        artifacts::write_inventory(&self.inventory(), &self.inventory_file())
    }

    /// Write `ansible.cfg`
    pub fn write_config(&self) -> Result<()> {
        artifacts::write_config(&self.config_options(), &self.config_file())
    }

    /// Write `host_vars/` or `group_vars/` into the ephemeral directory
    pub fn add_or_update_vars(&self, kind: VarsKind) -> Result<()> {
        self.write_vars(kind, &self.inventory())
    }

    /// Verify the inventory, then write every artifact
    pub fn prepare(&self) -> Result<()> {
        let inventory = self.inventory();
        inventory::verify(&inventory)?;

        artifacts::write_config(&self.config_options(), &self.config_file())?;
        artifacts::write_inventory(&inventory, &self.inventory_file())?;
        self.write_vars(VarsKind::HostVars, &inventory)?;
        self.write_vars(VarsKind::GroupVars, &inventory)?;

        tracing::info!(
            ephemeral_directory = %self.config.ephemeral_directory.display(),
            "scenario artifacts ready"
        );
        Ok(())
    }

    /// `ansible-playbook` run applying `playbook`
    pub fn converge(&self, playbook: impl AsRef<Path>) -> AnsiblePlaybook {
        self.playbook(playbook)
    }

    /// `ansible-playbook --syntax-check` run
    pub fn syntax(&self, playbook: impl AsRef<Path>) -> AnsiblePlaybook {
        let mut run = self.playbook(playbook);
        run.add_cli_arg("syntax-check", true);
        run
    }

    /// `ansible-playbook --check` run
    pub fn check(&self, playbook: impl AsRef<Path>) -> AnsiblePlaybook {
        let mut run = self.playbook(playbook);
        run.add_cli_arg("check", true);
        run
    }

    fn playbook(&self, playbook: impl AsRef<Path>) -> AnsiblePlaybook {
        AnsiblePlaybook::new(
            self.inventory_file(),
            playbook.as_ref(),
            self.options(),
            self.env(),
        )
    }

    fn write_vars(&self, kind: VarsKind, inventory: &Inventory) -> Result<()> {
        let overlay: VarsOverlay = match kind {
            VarsKind::HostVars => self
                .host_vars()
                .iter()
                .map(|(name, maps)| {
                    let host = if name == LOCALHOST {
                        name.clone()
                    } else {
                        self.instance_name(name)
                    };
                    (host, maps.clone())
                })
                .collect(),
            VarsKind::GroupVars => self.group_vars().clone(),
        };

        let known = match kind {
            VarsKind::HostVars => inventory.host_names(),
            VarsKind::GroupVars => inventory.all_group_names(),
        };
        for target in overlay.keys() {
            let implicit = target == LOCALHOST || target == ALL_GROUP;
            if !implicit && !known.contains(target.as_str()) {
                tracing::warn!(kind = %kind, vars_target = %target, "vars target not in inventory");
            }
        }

        vars::materialize(kind, &overlay, &self.config.ephemeral_directory)
    }
}
