//! Layered merge of `ansible.cfg` sections and playbook options.
//!
//! Precedence, lowest to highest:
//! 1. Built-in defaults
//! 2. Options declared in the scenario file
//! 3. Run-level overrides (command line)
//!
//! Merging is per section, then per key. A key keeps the position it had in
//! the lowest layer that defines it; new keys and sections are appended in
//! declaration order, so the merged result is deterministic.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One `ansible.cfg` section: key to scalar value.
pub type Section = IndexMap<String, serde_yaml::Value>;

/// Flat `ansible-playbook` options.
pub type Options = IndexMap<String, serde_yaml::Value>;

/// Name of the `[defaults]` section
pub const DEFAULTS: &str = "defaults";

/// Name of the `[ssh_connection]` section
pub const SSH_CONNECTION: &str = "ssh_connection";

/// Sections of the generated `ansible.cfg`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigOptions {
    /// `[defaults]`
    #[serde(default)]
    pub defaults: Section,

    /// `[ssh_connection]`
    #[serde(default)]
    pub ssh_connection: Section,

    /// Any other section, in declaration order
    #[serde(flatten)]
    pub sections: IndexMap<String, Section>,
}

impl ConfigOptions {
    /// Built-in defaults pointing Ansible at the bundled plugins
    pub fn builtin(libraries_directory: &Path, filter_plugin_directory: &Path) -> Self {
        let mut defaults = Section::new();
        defaults.insert(
            "ansible_managed".into(),
            "Ansible managed: Do NOT edit this file manually!".into(),
        );
        defaults.insert("retry_files_enabled".into(), false.into());
        defaults.insert("host_key_checking".into(), false.into());
        defaults.insert(
            "roles_path".into(),
            "../../../../:$ANSIBLE_ROLES_PATH".into(),
        );
        defaults.insert(
            "library".into(),
            format!("{}:$ANSIBLE_LIBRARY", libraries_directory.display()).into(),
        );
        defaults.insert(
            "filter_plugins".into(),
            format!(
                "{}:$ANSIBLE_FILTER_PLUGINS",
                filter_plugin_directory.display()
            )
            .into(),
        );

        let mut ssh_connection = Section::new();
        ssh_connection.insert(
            "ssh_args".into(),
            "-o UserKnownHostsFile=/dev/null".into(),
        );

        Self {
            defaults,
            ssh_connection,
            sections: IndexMap::new(),
        }
    }

    /// Split a raw section map (as read from the scenario file)
    pub fn from_sections(mut sections: IndexMap<String, Section>) -> Self {
        let defaults = sections.shift_remove(DEFAULTS).unwrap_or_default();
        let ssh_connection = sections.shift_remove(SSH_CONNECTION).unwrap_or_default();
        Self {
            defaults,
            ssh_connection,
            sections,
        }
    }

    /// Look up a section by name
    pub fn section(&self, name: &str) -> Option<&Section> {
        match name {
            DEFAULTS => Some(&self.defaults),
            SSH_CONNECTION => Some(&self.ssh_connection),
            _ => self.sections.get(name),
        }
    }

    /// Look up a single value
    pub fn get(&self, section: &str, key: &str) -> Option<&serde_yaml::Value> {
        self.section(section).and_then(|s| s.get(key))
    }

    /// Non-empty sections in output order: `defaults`, `ssh_connection`, then the rest
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Section)> {
        [(DEFAULTS, &self.defaults), (SSH_CONNECTION, &self.ssh_connection)]
            .into_iter()
            .chain(self.sections.iter().map(|(name, s)| (name.as_str(), s)))
            .filter(|(_, section)| !section.is_empty())
    }
}

/// Merge the three `ansible.cfg` layers.
pub fn merge(
    builtin: &ConfigOptions,
    declared: &ConfigOptions,
    overrides: &ConfigOptions,
) -> ConfigOptions {
    let defaults = merge_section(&builtin.defaults, &declared.defaults, &overrides.defaults);
    let ssh_connection = merge_section(
        &builtin.ssh_connection,
        &declared.ssh_connection,
        &overrides.ssh_connection,
    );

    let mut sections: IndexMap<String, Section> = IndexMap::new();
    for layer in [&builtin.sections, &declared.sections, &overrides.sections] {
        for (name, section) in layer {
            let merged = sections.entry(name.clone()).or_default();
            overlay(merged, section);
        }
    }

    tracing::debug!(
        defaults = defaults.len(),
        ssh_connection = ssh_connection.len(),
        extra_sections = sections.len(),
        "merged config options"
    );

    ConfigOptions {
        defaults,
        ssh_connection,
        sections,
    }
}

/// Merge the three playbook option layers.
pub fn merge_options(builtin: &Options, declared: &Options, cli_args: &Options) -> Options {
    merge_section(builtin, declared, cli_args)
}

/// Per-key merge of one section, `overrides` winning over `declared` over `builtin`.
fn merge_section(builtin: &Section, declared: &Section, overrides: &Section) -> Section {
    let mut merged = builtin.clone();
    overlay(&mut merged, declared);
    overlay(&mut merged, overrides);
    merged
}

/// Insert every key of `layer` into `base`; existing keys keep their position.
fn overlay(base: &mut Section, layer: &Section) {
    for (key, value) in layer {
        base.insert(key.clone(), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn builtin() -> ConfigOptions {
        ConfigOptions::builtin(Path::new("/plugins/libraries"), Path::new("/plugins/filters"))
    }

    fn section(pairs: &[(&str, &str)]) -> Section {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), serde_yaml::Value::from(*v)))
            .collect()
    }

    #[test]
    fn test_builtin_defaults() {
        let options = builtin();

        assert_eq!(
            options.get(DEFAULTS, "library"),
            Some(&serde_yaml::Value::from("/plugins/libraries:$ANSIBLE_LIBRARY"))
        );
        assert_eq!(
            options.get(DEFAULTS, "filter_plugins"),
            Some(&serde_yaml::Value::from("/plugins/filters:$ANSIBLE_FILTER_PLUGINS"))
        );
        assert_eq!(
            options.get(DEFAULTS, "retry_files_enabled"),
            Some(&serde_yaml::Value::Bool(false))
        );
        assert_eq!(
            options.get(SSH_CONNECTION, "ssh_args"),
            Some(&serde_yaml::Value::from("-o UserKnownHostsFile=/dev/null"))
        );
        assert_eq!(options.defaults.len(), 6);
    }

    #[test]
    fn test_declared_key_is_appended() {
        let declared = ConfigOptions {
            defaults: section(&[("foo", "bar")]),
            ..ConfigOptions::default()
        };

        let merged = merge(&builtin(), &declared, &ConfigOptions::default());

        assert_eq!(merged.defaults.len(), 7);
        assert_eq!(merged.defaults.keys().last().unwrap(), "foo");
        assert_eq!(merged.ssh_connection, builtin().ssh_connection);
    }

    #[test]
    fn test_overrides_win_over_declared() {
        let declared = ConfigOptions {
            defaults: section(&[("host_key_checking", "True"), ("forks", "5")]),
            ..ConfigOptions::default()
        };
        let overrides = ConfigOptions {
            defaults: section(&[("forks", "10")]),
            ..ConfigOptions::default()
        };

        let merged = merge(&builtin(), &declared, &overrides);

        assert_eq!(
            merged.get(DEFAULTS, "host_key_checking"),
            Some(&serde_yaml::Value::from("True"))
        );
        assert_eq!(merged.get(DEFAULTS, "forks"), Some(&serde_yaml::Value::from("10")));
        // position of an overridden built-in key is kept
        assert_eq!(merged.defaults.get_index_of("host_key_checking"), Some(2));
    }

    #[test]
    fn test_new_sections_are_added_verbatim() {
        let mut raw = IndexMap::new();
        raw.insert("privilege_escalation".to_string(), section(&[("become", "True")]));
        raw.insert(DEFAULTS.to_string(), section(&[("foo", "bar")]));
        let declared = ConfigOptions::from_sections(raw);

        let merged = merge(&builtin(), &declared, &ConfigOptions::default());

        assert_eq!(
            merged.section("privilege_escalation"),
            Some(&section(&[("become", "True")]))
        );
        let names: Vec<&str> = merged.iter().map(|(name, _)| name).collect();
        assert_eq!(names, [DEFAULTS, SSH_CONNECTION, "privilege_escalation"]);
    }

    #[test]
    fn test_empty_inputs_yield_builtin() {
        let empty = ConfigOptions::default();
        assert_eq!(merge(&builtin(), &empty, &empty), builtin());
    }

    #[test]
    fn test_merge_options_cli_args_win() {
        let declared = section(&[("foo", "bar"), ("debug", "no")]);
        let mut cli = Options::new();
        cli.insert("debug".into(), true.into());

        let merged = merge_options(&Options::new(), &declared, &cli);

        assert_eq!(merged["foo"], serde_yaml::Value::from("bar"));
        assert_eq!(merged["debug"], serde_yaml::Value::Bool(true));
    }
}
