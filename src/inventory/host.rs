//! Host connection attributes.
//!
//! An inventory host entry is a flat map of `ansible_*` connection variables.
//! Drivers produce these maps; the inventory builder only copies them.

use indexmap::IndexMap;

/// Connection variables attached to a host entry (e.g. `ansible_connection`).
pub type ConnectionOptions = IndexMap<String, serde_yaml::Value>;

/// Key under which the connection plugin is named.
pub const ANSIBLE_CONNECTION: &str = "ansible_connection";

/// Connection options selecting only the named connection plugin.
pub fn connection_plugin(plugin: &str) -> ConnectionOptions {
    let mut options = ConnectionOptions::new();
    options.insert(ANSIBLE_CONNECTION.to_string(), plugin.into());
    options
}
