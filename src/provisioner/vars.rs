//! Materialization of `host_vars` and `group_vars` overlays.

use super::artifacts::write_file;
use crate::error::{Error, IoResultExt, Result};
use indexmap::IndexMap;
use std::fs;
use std::path::{Component, Path};

/// Target name (host or group) to the variable maps declared for it.
pub type VarsOverlay = IndexMap<String, Vec<IndexMap<String, serde_yaml::Value>>>;

/// Kind of variable overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarsKind {
    /// Per-host variables
    HostVars,
    /// Per-group variables
    GroupVars,
}

impl VarsKind {
    /// Directory name inside the ephemeral directory
    pub fn dir_name(self) -> &'static str {
        match self {
            VarsKind::HostVars => "host_vars",
            VarsKind::GroupVars => "group_vars",
        }
    }
}

impl std::fmt::Display for VarsKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Merge the variable maps of one target in declaration order; later keys win.
pub fn merge_vars(
    maps: &[IndexMap<String, serde_yaml::Value>],
) -> IndexMap<String, serde_yaml::Value> {
    let mut merged = IndexMap::new();
    for vars in maps {
        merged.extend(vars.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    merged
}

/// Check that `target` names a single file directly inside the vars directory.
fn check_target(kind: VarsKind, target: &str) -> Result<()> {
    let mut components = Path::new(target).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) if name == target => Ok(()),
        _ => Err(Error::invalid_config(
            format!("{kind}.{target}"),
            "target must be a plain host or group name",
        )),
    }
}

/// Write one YAML file per non-empty target under `<work_dir>/<kind>/`.
///
/// Nothing is created when no target has variables, and nothing is written
/// when any target name is not a plain file name.
pub fn materialize(kind: VarsKind, overlay: &VarsOverlay, work_dir: &Path) -> Result<()> {
    let targets: Vec<_> = overlay
        .iter()
        .filter(|(_, maps)| !maps.is_empty())
        .collect();
    for (target, _) in &targets {
        check_target(kind, target)?;
    }
    if targets.is_empty() {
        tracing::debug!(kind = %kind, "no vars to write");
        return Ok(());
    }

    let directory = work_dir.join(kind.dir_name());
    fs::create_dir_all(&directory).with_path(&directory)?;

    for (target, maps) in targets {
        let path = directory.join(target);
        let yaml = serde_yaml::to_string(&merge_vars(maps))?;
        write_file(&path, &yaml)?;
        tracing::info!(kind = %kind, vars_target = %target, path = %path.display(), "wrote vars");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn vars(pairs: &[(&str, &str)]) -> IndexMap<String, serde_yaml::Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), serde_yaml::Value::from(*v)))
            .collect()
    }

    #[test]
    fn test_merge_vars_later_wins() {
        let merged = merge_vars(&[
            vars(&[("a", "1"), ("b", "1")]),
            vars(&[("b", "2"), ("c", "2")]),
        ]);

        assert_eq!(merged, vars(&[("a", "1"), ("b", "2"), ("c", "2")]));
    }

    #[test]
    fn test_empty_lists_create_nothing() {
        let dir = TempDir::new().unwrap();
        let mut overlay = VarsOverlay::new();
        overlay.insert("instance-1".into(), Vec::new());

        materialize(VarsKind::HostVars, &overlay, dir.path()).unwrap();

        assert!(!dir.path().join("host_vars").exists());
    }

    #[test]
    fn test_writes_merged_yaml() {
        let dir = TempDir::new().unwrap();
        let mut overlay = VarsOverlay::new();
        overlay.insert(
            "example_group1".into(),
            vec![vars(&[("foo", "bar")]), vars(&[("foo", "baz")])],
        );

        materialize(VarsKind::GroupVars, &overlay, dir.path()).unwrap();

        let content =
            fs::read_to_string(dir.path().join("group_vars").join("example_group1")).unwrap();
        let parsed: IndexMap<String, serde_yaml::Value> = serde_yaml::from_str(&content).unwrap();
        assert_eq!(parsed, vars(&[("foo", "baz")]));
    }

    #[test]
    fn test_rejects_targets_leaving_vars_directory() {
        let work = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        let absolute = outside.path().join("escaped").display().to_string();

        for target in [absolute.as_str(), "../sibling", "a/b", "..", ".", ""] {
            let mut overlay = VarsOverlay::new();
            overlay.insert(target.to_string(), vec![vars(&[("foo", "bar")])]);

            let err = materialize(VarsKind::GroupVars, &overlay, work.path()).unwrap_err();
            let expected_key = format!("group_vars.{target}");
            assert!(
                matches!(&err, Error::InvalidConfig { key, .. } if *key == expected_key),
                "{target}: {err}"
            );
        }

        assert!(!outside.path().join("escaped").exists());
        assert!(!work.path().join("sibling").exists());
        assert!(!work.path().join("group_vars").exists());
    }

    #[test]
    fn test_invalid_target_blocks_every_write() {
        let dir = TempDir::new().unwrap();
        let mut overlay = VarsOverlay::new();
        overlay.insert("instance-1".into(), vec![vars(&[("foo", "bar")])]);
        overlay.insert("../instance-2".into(), vec![vars(&[("foo", "bar")])]);

        assert!(materialize(VarsKind::HostVars, &overlay, dir.path()).is_err());
        assert!(!dir.path().join("host_vars").exists());
    }
}
