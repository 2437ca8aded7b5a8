//! Environment handed to `ansible-playbook`.

use indexmap::IndexMap;
use std::path::Path;

/// Environment variable name to value.
pub type EnvironmentMap = IndexMap<String, String>;

/// Variable pointing Ansible at the generated configuration file
pub const ANSIBLE_CONFIG: &str = "ANSIBLE_CONFIG";

/// Built-in environment: only the `ANSIBLE_CONFIG` binding.
pub fn default_env(config_file: &Path) -> EnvironmentMap {
    let mut env = EnvironmentMap::new();
    env.insert(ANSIBLE_CONFIG.to_string(), config_file.display().to_string());
    env
}

/// Merge user-declared variables over the built-in environment.
///
/// User values win on every collision; built-in bindings the user does not
/// name are kept.
pub fn resolve(builtin: &EnvironmentMap, user: &EnvironmentMap) -> EnvironmentMap {
    let mut env = builtin.clone();
    env.extend(user.iter().map(|(k, v)| (k.clone(), v.clone())));
    env
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_config_binding_is_kept() {
        let builtin = default_env(Path::new("/eph/ansible.cfg"));
        let mut user = EnvironmentMap::new();
        user.insert("foo".into(), "bar".into());

        let env = resolve(&builtin, &user);

        assert_eq!(env[ANSIBLE_CONFIG], "/eph/ansible.cfg");
        assert_eq!(env["foo"], "bar");
    }

    #[test]
    fn test_user_wins_on_collision() {
        let builtin = default_env(Path::new("/eph/ansible.cfg"));
        let mut user = EnvironmentMap::new();
        user.insert(ANSIBLE_CONFIG.into(), "/custom/ansible.cfg".into());

        let env = resolve(&builtin, &user);

        assert_eq!(env.len(), 1);
        assert_eq!(env[ANSIBLE_CONFIG], "/custom/ansible.cfg");
    }

    #[test]
    fn test_empty_user_env() {
        let builtin = default_env(Path::new("/eph/ansible.cfg"));
        assert_eq!(resolve(&builtin, &EnvironmentMap::new()), builtin);
    }
}
