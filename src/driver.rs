//! Drivers own the instances of a scenario.
//!
//! Creating and destroying instances is outside this crate; the provisioner
//! only asks a driver how Ansible should connect to each host and where the
//! driver keeps its instance config.

use crate::config::{ScenarioConfig, INSTANCE_CONFIG_FILE_NAME};
use crate::error::{Error, Result};
use crate::inventory::{connection_plugin, ConnectionOptions};
use std::path::PathBuf;

/// Connection plugin used for docker instances
pub const DOCKER_CONNECTION: &str = "docker";

/// Driver option holding connection variables for delegated instances
pub const CONNECTION_OPTIONS_KEY: &str = "ansible_connection_options";

/// Interface between the provisioner and an instance driver
pub trait Driver: std::fmt::Debug {
    /// Driver name as written in the scenario file
    fn name(&self) -> &str;

    /// Connection variables for an inventory host
    fn connection_options(&self, host: &str) -> ConnectionOptions;

    /// Path of the driver's instance config
    fn instance_config(&self) -> PathBuf;
}

/// Instances are Docker containers reached through the docker connection plugin.
#[derive(Debug, Clone)]
pub struct Docker {
    ephemeral_directory: PathBuf,
}

impl Docker {
    /// Create a docker driver for the given ephemeral directory
    pub fn new(ephemeral_directory: impl Into<PathBuf>) -> Self {
        Self {
            ephemeral_directory: ephemeral_directory.into(),
        }
    }
}

impl Driver for Docker {
    fn name(&self) -> &str {
        "docker"
    }

    fn connection_options(&self, _host: &str) -> ConnectionOptions {
        connection_plugin(DOCKER_CONNECTION)
    }

    fn instance_config(&self) -> PathBuf {
        self.ephemeral_directory.join(INSTANCE_CONFIG_FILE_NAME)
    }
}

/// Instances are managed by the user; connection variables come from the
/// scenario file.
#[derive(Debug, Clone)]
pub struct Delegated {
    ephemeral_directory: PathBuf,
    connection_options: ConnectionOptions,
}

impl Delegated {
    /// Create a delegated driver with fixed connection variables
    pub fn new(
        ephemeral_directory: impl Into<PathBuf>,
        connection_options: ConnectionOptions,
    ) -> Self {
        Self {
            ephemeral_directory: ephemeral_directory.into(),
            connection_options,
        }
    }
}

impl Driver for Delegated {
    fn name(&self) -> &str {
        "delegated"
    }

    fn connection_options(&self, _host: &str) -> ConnectionOptions {
        self.connection_options.clone()
    }

    fn instance_config(&self) -> PathBuf {
        self.ephemeral_directory.join(INSTANCE_CONFIG_FILE_NAME)
    }
}

/// Instantiate the driver named in the scenario
pub fn from_config(config: &ScenarioConfig) -> Result<Box<dyn Driver>> {
    let section = config.driver();
    match section.name.as_str() {
        "docker" => Ok(Box::new(Docker::new(&config.ephemeral_directory))),
        "delegated" => {
            let options = match section.options.get(CONNECTION_OPTIONS_KEY) {
                None | Some(serde_yaml::Value::Null) => ConnectionOptions::new(),
                Some(value) => serde_yaml::from_value(value.clone()).map_err(|e| {
                    Error::invalid_config(
                        format!("driver.options.{CONNECTION_OPTIONS_KEY}"),
                        e.to_string(),
                    )
                })?,
            };
            Ok(Box::new(Delegated::new(&config.ephemeral_directory, options)))
        }
        other => Err(Error::invalid_config(
            "driver.name",
            format!("unsupported driver '{other}'"),
        )),
    }
}
