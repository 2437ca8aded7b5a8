//! Scenario configuration for rustible-molecule
//!
//! A scenario is described by a single file (`molecule.yml`) holding the
//! driver, the platform list and the provisioner section. Loading resolves
//! every derived path once:
//! - Scenario directory (parent of the scenario file)
//! - Ephemeral directory (`<scenario>/.molecule`, or
//!   `MOLECULE_EPHEMERAL_DIRECTORY`, or an explicit override)
//! - Plugin directory (libraries and filter plugins)
//!
//! The resulting [`ScenarioConfig`] is immutable and passed by reference to
//! every component of a run.

use crate::error::{Error, IoResultExt, Result};
use crate::inventory::Platform;
use crate::provisioner::options::Section;
use crate::provisioner::vars::VarsOverlay;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding the ephemeral directory
pub const EPHEMERAL_DIRECTORY_ENV: &str = "MOLECULE_EPHEMERAL_DIRECTORY";

/// Name of the generated inventory file
pub const INVENTORY_FILE_NAME: &str = "ansible_inventory.yml";

/// Name of the generated Ansible configuration file
pub const CONFIG_FILE_NAME: &str = "ansible.cfg";

/// Name of the driver's instance config file
pub const INSTANCE_CONFIG_FILE_NAME: &str = "instance_config.yml";

/// Contents of a scenario file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioFile {
    /// Driver settings
    pub driver: DriverSection,

    /// Declared instances
    pub platforms: Vec<Platform>,

    /// Provisioner settings
    pub provisioner: ProvisionerSection,

    /// Scenario settings
    pub scenario: ScenarioSection,
}

/// Driver section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverSection {
    /// Driver name (docker, delegated)
    pub name: String,

    /// Driver-specific options
    pub options: IndexMap<String, serde_yaml::Value>,
}

impl Default for DriverSection {
    fn default() -> Self {
        Self {
            name: "docker".to_string(),
            options: IndexMap::new(),
        }
    }
}

/// Provisioner section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionerSection {
    /// Provisioner name; only `ansible` is supported
    pub name: String,

    /// Sections merged into the generated `ansible.cfg`
    pub config_options: IndexMap<String, Section>,

    /// Options passed to `ansible-playbook`
    pub options: IndexMap<String, serde_yaml::Value>,

    /// Environment for `ansible-playbook`
    pub env: IndexMap<String, String>,

    /// Per-host variable overlays
    pub host_vars: VarsOverlay,

    /// Per-group variable overlays
    pub group_vars: VarsOverlay,
}

impl Default for ProvisionerSection {
    fn default() -> Self {
        Self {
            name: "ansible".to_string(),
            config_options: IndexMap::new(),
            options: IndexMap::new(),
            env: IndexMap::new(),
            host_vars: VarsOverlay::new(),
            group_vars: VarsOverlay::new(),
        }
    }
}

/// Scenario section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioSection {
    /// Scenario name
    pub name: String,
}

impl Default for ScenarioSection {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
        }
    }
}

/// Resolved, immutable configuration of one scenario run
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioConfig {
    /// Path of the scenario file
    pub molecule_file: PathBuf,

    /// Directory containing the scenario file
    pub scenario_directory: PathBuf,

    /// Scratch directory receiving every generated artifact
    pub ephemeral_directory: PathBuf,

    /// Directory holding the bundled Ansible plugins
    pub plugin_directory: PathBuf,

    /// Parsed scenario file
    pub file: ScenarioFile,

    /// Command-line arguments forwarded as playbook options
    pub args: IndexMap<String, serde_yaml::Value>,

    /// Run-level `ansible.cfg` overrides, above the scenario's own
    pub config_overrides: IndexMap<String, Section>,
}

impl ScenarioConfig {
    /// Load a scenario file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).with_path(path)?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match extension {
            "json" => Self::from_file(path, serde_json::from_str(&content)?),
            _ => Self::from_yaml(path, &content),
        }
    }

    /// Build a configuration from YAML content, as if read from `molecule_file`
    pub fn from_yaml(molecule_file: impl AsRef<Path>, content: &str) -> Result<Self> {
        let file: ScenarioFile = if content.trim().is_empty() {
            ScenarioFile::default()
        } else {
            serde_yaml::from_str(content)?
        };
        Self::from_file(molecule_file.as_ref(), file)
    }

    /// Resolve derived paths for a parsed scenario file
    pub fn from_file(molecule_file: &Path, file: ScenarioFile) -> Result<Self> {
        if file.provisioner.name != "ansible" {
            return Err(Error::invalid_config(
                "provisioner.name",
                format!("unsupported provisioner '{}'", file.provisioner.name),
            ));
        }

        let scenario_directory = molecule_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let ephemeral_directory = scenario_directory.join(".molecule");

        let mut config = Self {
            molecule_file: molecule_file.to_path_buf(),
            scenario_directory,
            ephemeral_directory,
            plugin_directory: PathBuf::new(),
            file,
            args: IndexMap::new(),
            config_overrides: IndexMap::new(),
        };
        config.apply_env_overrides();
        config.plugin_directory = default_plugin_directory(&config.ephemeral_directory);

        tracing::debug!(
            molecule_file = %config.molecule_file.display(),
            ephemeral_directory = %config.ephemeral_directory.display(),
            "loaded scenario configuration"
        );

        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // MOLECULE_EPHEMERAL_DIRECTORY
        if let Ok(dir) = std::env::var(EPHEMERAL_DIRECTORY_ENV) {
            if !dir.is_empty() {
                self.ephemeral_directory = PathBuf::from(dir);
            }
        }
    }

    /// Use an explicit ephemeral directory.
    ///
    /// A plugin directory still at its default follows the new location.
    pub fn with_ephemeral_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        let follows_default =
            self.plugin_directory == default_plugin_directory(&self.ephemeral_directory);
        self.ephemeral_directory = dir.into();
        if follows_default {
            self.plugin_directory = default_plugin_directory(&self.ephemeral_directory);
        }
        self
    }

    /// Use an explicit plugin directory
    pub fn with_plugin_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.plugin_directory = dir.into();
        self
    }

    /// Forward a command-line argument as a playbook option
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_yaml::Value>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    /// Add a run-level `ansible.cfg` override
    pub fn with_config_override(
        mut self,
        section: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<serde_yaml::Value>,
    ) -> Self {
        self.config_overrides
            .entry(section.into())
            .or_default()
            .insert(key.into(), value.into());
        self
    }

    /// Replace the platform list
    pub fn with_platforms(mut self, platforms: Vec<Platform>) -> Self {
        self.file.platforms = platforms;
        self
    }

    /// Scenario name
    pub fn scenario_name(&self) -> &str {
        &self.file.scenario.name
    }

    /// Declared platforms
    pub fn platforms(&self) -> &[Platform] {
        &self.file.platforms
    }

    /// Provisioner section
    pub fn provisioner(&self) -> &ProvisionerSection {
        &self.file.provisioner
    }

    /// Driver section
    pub fn driver(&self) -> &DriverSection {
        &self.file.driver
    }

    /// Path of the generated inventory
    pub fn inventory_file(&self) -> PathBuf {
        self.ephemeral_directory.join(INVENTORY_FILE_NAME)
    }

    /// Path of the generated `ansible.cfg`
    pub fn config_file(&self) -> PathBuf {
        self.ephemeral_directory.join(CONFIG_FILE_NAME)
    }

    /// Directory of bundled modules
    pub fn libraries_directory(&self) -> PathBuf {
        self.plugin_directory.join("libraries")
    }

    /// Directory of bundled filter plugins
    pub fn filter_plugin_directory(&self) -> PathBuf {
        self.plugin_directory.join("filters")
    }
}

/// Plugin directory under the user data dir, or inside the ephemeral
/// directory when there is none.
fn default_plugin_directory(ephemeral_directory: &Path) -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("molecule").join("provisioner").join("ansible"))
        .unwrap_or_else(|| ephemeral_directory.to_path_buf())
        .join("plugins")
}

/// Parse a `section.key=value` override.
///
/// The value is read as a YAML scalar, so `10` becomes a number and `false`
/// a boolean; anything else stays a string.
pub fn parse_config_override(raw: &str) -> Result<(String, String, serde_yaml::Value)> {
    let invalid = || Error::invalid_config(raw, "expected section.key=value");

    let (path, value) = raw.split_once('=').ok_or_else(invalid)?;
    let (section, key) = path.trim().split_once('.').ok_or_else(invalid)?;
    if section.is_empty() || key.is_empty() {
        return Err(invalid());
    }

    let value = value.trim();
    let value = match serde_yaml::from_str::<serde_yaml::Value>(value) {
        Ok(parsed @ (serde_yaml::Value::Bool(_) | serde_yaml::Value::Number(_))) => parsed,
        _ => serde_yaml::Value::String(value.to_string()),
    };

    Ok((section.to_string(), key.to_string(), value))
}
