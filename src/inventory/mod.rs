//! Inventory generation for scenario runs.
//!
//! This module turns the flat platform list of a scenario into the
//! group/children/hosts tree Ansible expects in a YAML inventory:
//! - [`InventoryBuilder`] derives the tree from [`Platform`]s
//! - [`verify`] rejects a tree without any host
//! - [`Inventory`] and [`InventoryNode`] serialize to the exact YAML shape
//!
//! Empty maps are never serialized, so a scenario without groups produces a
//! single `ungrouped` group holding `hosts` and `vars` and no `children` key,
//! while grouped scenarios produce one entry per group.

pub mod builder;
pub mod host;
pub mod platform;
pub mod verify;

pub use builder::{InventoryBuilder, RunVars};
pub use host::{connection_plugin, ConnectionOptions, ANSIBLE_CONNECTION};
pub use platform::Platform;
pub use verify::verify;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Name of the implicit group holding hosts without groups.
pub const UNGROUPED: &str = "ungrouped";

/// One group in the inventory tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryNode {
    /// Hosts directly in this group, with their connection variables
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub hosts: IndexMap<String, ConnectionOptions>,

    /// Child groups, each owned by this node
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub children: IndexMap<String, InventoryNode>,

    /// Group variables
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub vars: IndexMap<String, serde_yaml::Value>,
}

impl InventoryNode {
    /// Get a child group, creating it when absent
    pub fn child_mut(&mut self, name: &str) -> &mut InventoryNode {
        self.children.entry(name.to_string()).or_default()
    }

    /// Walk `path` through the children, creating missing nodes on the way
    pub fn node_mut(&mut self, path: &[&str]) -> &mut InventoryNode {
        path.iter().fold(self, |node, name| node.child_mut(name))
    }

    /// Add or replace a host entry
    pub fn add_host(&mut self, name: impl Into<String>, options: ConnectionOptions) {
        self.hosts.insert(name.into(), options);
    }

    /// Check if a host is a direct member of this group
    pub fn has_host(&self, name: &str) -> bool {
        self.hosts.contains_key(name)
    }

    /// Get a child group
    pub fn child(&self, name: &str) -> Option<&InventoryNode> {
        self.children.get(name)
    }

    /// Collect host names of this group and all its descendants
    fn collect_hosts<'a>(&'a self, into: &mut BTreeSet<&'a str>) {
        into.extend(self.hosts.keys().map(String::as_str));
        for child in self.children.values() {
            child.collect_hosts(into);
        }
    }
}

/// The full inventory: top-level group name to group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inventory {
    groups: IndexMap<String, InventoryNode>,
}

impl Inventory {
    /// Create an empty inventory
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a top-level group, creating it when absent
    pub fn group_mut(&mut self, name: &str) -> &mut InventoryNode {
        self.groups.entry(name.to_string()).or_default()
    }

    /// Insert-or-get the node at `group` followed by the `children` path.
    ///
    /// Every missing node along the way is created empty.
    pub fn node_mut(&mut self, group: &str, children: &[&str]) -> &mut InventoryNode {
        self.group_mut(group).node_mut(children)
    }

    /// Get a top-level group
    pub fn get_group(&self, name: &str) -> Option<&InventoryNode> {
        self.groups.get(name)
    }

    /// Top-level group names in insertion order
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Iterate over top-level groups
    pub fn groups(&self) -> impl Iterator<Item = (&str, &InventoryNode)> {
        self.groups.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Every host name referenced anywhere in the tree
    pub fn host_names(&self) -> BTreeSet<&str> {
        let mut names = BTreeSet::new();
        for node in self.groups.values() {
            node.collect_hosts(&mut names);
        }
        names
    }

    /// Every group name in the tree, top-level and nested children
    pub fn all_group_names(&self) -> BTreeSet<&str> {
        fn walk<'a>(name: &'a str, node: &'a InventoryNode, into: &mut BTreeSet<&'a str>) {
            into.insert(name);
            for (child_name, child) in &node.children {
                walk(child_name, child, into);
            }
        }

        let mut names = BTreeSet::new();
        for (name, node) in &self.groups {
            walk(name, node, &mut names);
        }
        names
    }

    /// Number of distinct hosts in the tree
    pub fn host_count(&self) -> usize {
        self.host_names().len()
    }

    /// True when the only top-level group is `ungrouped`
    pub fn is_flat(&self) -> bool {
        self.groups.keys().all(|name| name == UNGROUPED)
    }
}
