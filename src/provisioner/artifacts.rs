//! Serialization of the generated inventory and `ansible.cfg`.
//!
//! Both writers replace the target file entirely and create its parent
//! directory if needed.

use super::options::{ConfigOptions, Section};
use crate::error::{Error, IoResultExt, Result};
use crate::inventory::Inventory;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Header written at the top of every generated file
pub const MANAGED_HEADER: &str = "# Molecule managed\n\n";

/// Write the inventory tree as YAML
pub fn write_inventory(inventory: &Inventory, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(inventory)?;
    write_file(path, &yaml)?;
    tracing::info!(path = %path.display(), hosts = inventory.host_count(), "wrote inventory");
    Ok(())
}

/// Write the merged options as an INI `ansible.cfg`
pub fn write_config(options: &ConfigOptions, path: &Path) -> Result<()> {
    let ini = render_config(options)?;
    write_file(path, &ini)?;
    tracing::info!(path = %path.display(), "wrote ansible config");
    Ok(())
}

/// Render the merged options as INI text, one `[section]` per non-empty section.
pub fn render_config(options: &ConfigOptions) -> Result<String> {
    let mut out = String::new();
    for (name, section) in options.iter() {
        render_section(&mut out, name, section)?;
    }
    Ok(out)
}

fn render_section(out: &mut String, name: &str, section: &Section) -> Result<()> {
    let _ = writeln!(out, "[{name}]");
    for (key, value) in section {
        let rendered = render_value(value).ok_or_else(|| {
            Error::invalid_config(
                format!("{name}.{key}"),
                "value must be a scalar or a list of scalars",
            )
        })?;
        // continuation lines must be indented
        let rendered = rendered.replace('\n', "\n    ");
        let _ = writeln!(out, "{key} = {rendered}");
    }
    out.push('\n');
    Ok(())
}

fn render_value(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Null => Some(String::new()),
        serde_yaml::Value::Bool(true) => Some("True".to_string()),
        serde_yaml::Value::Bool(false) => Some("False".to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Sequence(items) => items
            .iter()
            .map(|item| match item {
                serde_yaml::Value::Sequence(_) => None,
                other => render_value(other),
            })
            .collect::<Option<Vec<_>>>()
            .map(|items| items.join(",")),
        serde_yaml::Value::Mapping(_) | serde_yaml::Value::Tagged(_) => None,
    }
}

/// Write a generated file, replacing any previous content.
pub(crate) fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_path(parent)?;
        }
    }
    fs::write(path, format!("{MANAGED_HEADER}{content}")).with_path(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provisioner::options::DEFAULTS;
    use indexmap::IndexMap;
    use tempfile::TempDir;

    #[test]
    fn test_render_config_sections() {
        let options = ConfigOptions::builtin(Path::new("/lib"), Path::new("/filters"));
        let ini = render_config(&options).unwrap();

        assert!(ini.starts_with("[defaults]\n"));
        assert!(ini.contains("retry_files_enabled = False\n"));
        assert!(ini.contains("library = /lib:$ANSIBLE_LIBRARY\n"));
        assert!(ini.contains("\n[ssh_connection]\nssh_args = -o UserKnownHostsFile=/dev/null\n"));
    }

    #[test]
    fn test_render_lists_and_numbers() {
        let mut defaults = Section::new();
        defaults.insert("forks".into(), 10.into());
        defaults.insert(
            "callback_whitelist".into(),
            serde_yaml::Value::Sequence(vec!["timer".into(), "profile_tasks".into()]),
        );
        let options = ConfigOptions {
            defaults,
            ..ConfigOptions::default()
        };

        let ini = render_config(&options).unwrap();
        assert_eq!(ini, "[defaults]\nforks = 10\ncallback_whitelist = timer,profile_tasks\n\n");
    }

    #[test]
    fn test_render_rejects_mappings() {
        let mut nested = serde_yaml::Mapping::new();
        nested.insert("a".into(), "b".into());
        let mut sections = IndexMap::new();
        let mut section = Section::new();
        section.insert("nested".into(), serde_yaml::Value::Mapping(nested));
        sections.insert(DEFAULTS.to_string(), section);

        let err = render_config(&ConfigOptions::from_sections(sections)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { key, .. } if key == "defaults.nested"));
    }

    #[test]
    fn test_write_file_creates_parent_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("ansible.cfg");

        write_file(&path, "first\n").unwrap();
        write_file(&path, "second\n").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, format!("{MANAGED_HEADER}second\n"));
    }
}
