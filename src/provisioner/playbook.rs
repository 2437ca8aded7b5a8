//! Description of an `ansible-playbook` invocation.
//!
//! Running the command is left to the caller; this module only decides the
//! arguments and environment.

use super::env::EnvironmentMap;
use super::options::Options;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Executable name of the playbook runner
pub const ANSIBLE_PLAYBOOK: &str = "ansible-playbook";

/// An `ansible-playbook` run against a generated inventory
#[derive(Debug, Clone, PartialEq)]
pub struct AnsiblePlaybook {
    playbook: PathBuf,
    inventory: PathBuf,
    options: Options,
    env: EnvironmentMap,
}

impl AnsiblePlaybook {
    /// Describe a run of `playbook` with the given options and environment
    pub fn new(
        inventory: impl Into<PathBuf>,
        playbook: impl Into<PathBuf>,
        options: Options,
        env: EnvironmentMap,
    ) -> Self {
        Self {
            playbook: playbook.into(),
            inventory: inventory.into(),
            options,
            env,
        }
    }

    /// Add a command-line flag or option (`true` renders as a bare flag)
    pub fn add_cli_arg(&mut self, name: impl Into<String>, value: impl Into<serde_yaml::Value>) {
        self.options.insert(name.into(), value.into());
    }

    /// Playbook path
    pub fn playbook(&self) -> &Path {
        &self.playbook
    }

    /// Environment for the process
    pub fn env(&self) -> &EnvironmentMap {
        &self.env
    }

    /// Command-line arguments, excluding the program name.
    ///
    /// Option keys become `--key` (or `-k` for single letters) with `_`
    /// replaced by `-`; `true` values are bare flags and `false` values are
    /// dropped. `debug: true` turns into `-vvv`.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![
            self.playbook.display().to_string(),
            "--inventory".to_string(),
            self.inventory.display().to_string(),
        ];

        let mut verbose = false;
        for (key, value) in &self.options {
            if key == "debug" {
                verbose = matches!(value, serde_yaml::Value::Bool(true));
                continue;
            }
            match value {
                serde_yaml::Value::Bool(false) | serde_yaml::Value::Null => {}
                serde_yaml::Value::Bool(true) => args.push(flag(key)),
                serde_yaml::Value::String(s) => {
                    args.push(flag(key));
                    args.push(s.clone());
                }
                other => {
                    args.push(flag(key));
                    args.push(
                        serde_yaml::to_string(other)
                            .map(|s| s.trim_end().to_string())
                            .unwrap_or_default(),
                    );
                }
            }
        }

        if verbose {
            args.push("-vvv".to_string());
        }
        args
    }

    /// Build the process command; nothing is spawned
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(ANSIBLE_PLAYBOOK);
        command.args(self.args()).envs(&self.env);
        command
    }

    /// Shell-like rendering for logs
    pub fn command_line(&self) -> String {
        std::iter::once(ANSIBLE_PLAYBOOK.to_string())
            .chain(self.args())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn flag(key: &str) -> String {
    let prefix = if key.chars().count() == 1 { "-" } else { "--" };
    format!("{prefix}{}", key.replace('_', "-"))
}
