//! Derivation of the inventory tree from the platform list.

use super::host::ConnectionOptions;
use super::platform::Platform;
use super::{Inventory, UNGROUPED};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::path::PathBuf;

/// Run-scoped path variables attached to `ungrouped.vars`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunVars {
    /// Path of the scenario file
    pub molecule_file: PathBuf,
    /// Path of the driver's instance config
    pub molecule_instance_config: PathBuf,
    /// Path of the generated inventory file
    pub molecule_inventory_file: PathBuf,
    /// Scenario directory
    pub molecule_scenario_directory: PathBuf,
}

impl RunVars {
    /// Render as inventory variables, in a fixed order
    pub fn to_vars(&self) -> IndexMap<String, serde_yaml::Value> {
        [
            ("molecule_file", &self.molecule_file),
            ("molecule_instance_config", &self.molecule_instance_config),
            ("molecule_inventory_file", &self.molecule_inventory_file),
            ("molecule_scenario_directory", &self.molecule_scenario_directory),
        ]
        .into_iter()
        .map(|(key, path)| {
            (
                key.to_string(),
                serde_yaml::Value::String(path.display().to_string()),
            )
        })
        .collect()
    }
}

/// Name an instance after its platform and scenario (`instance-1-default`).
pub fn instance_with_scenario_name(platform: &str, scenario: &str) -> String {
    format!("{platform}-{scenario}")
}

/// Builds an [`Inventory`] from a flat list of platforms.
///
/// Hosts without groups land in `ungrouped`. A host in several groups is
/// listed under each of them, and under `<group>.children.<child>` for each
/// child it declares.
pub struct InventoryBuilder<F> {
    vars: RunVars,
    connection_options: F,
    scenario: Option<String>,
}

impl<F> InventoryBuilder<F>
where
    F: Fn(&str) -> ConnectionOptions,
{
    /// Create a builder; `connection_options` maps a host name to its
    /// connection variables.
    pub fn new(vars: RunVars, connection_options: F) -> Self {
        Self {
            vars,
            connection_options,
            scenario: None,
        }
    }

    /// Suffix every host name with the scenario name
    pub fn scenario_suffix(mut self, scenario: impl Into<String>) -> Self {
        self.scenario = Some(scenario.into());
        self
    }

    /// Inventory host name for a platform
    pub fn host_name(&self, platform: &str) -> String {
        match &self.scenario {
            Some(scenario) => instance_with_scenario_name(platform, scenario),
            None => platform.to_string(),
        }
    }

    /// Derive the inventory tree
    pub fn build(&self, platforms: &[Platform]) -> Inventory {
        let mut inventory = Inventory::new();
        inventory.group_mut(UNGROUPED).vars = self.vars.to_vars();

        let mut seen = HashSet::new();
        for platform in platforms {
            if !seen.insert(platform.name.as_str()) {
                tracing::warn!(platform = %platform.name, "duplicate platform name");
            }

            let host = self.host_name(&platform.name);
            let options = (self.connection_options)(&host);

            let declared = platform.declared_groups();
            let groups: Vec<&str> = if declared.is_empty() {
                vec![UNGROUPED]
            } else {
                declared.iter().map(String::as_str).collect()
            };

            for group in groups {
                inventory
                    .node_mut(group, &[])
                    .add_host(host.clone(), options.clone());

                for child in &platform.children {
                    inventory
                        .node_mut(group, &[child.as_str()])
                        .add_host(host.clone(), options.clone());
                }
            }
        }

        tracing::debug!(
            groups = inventory.group_names().count(),
            hosts = inventory.host_count(),
            "built inventory"
        );

        inventory
    }
}
