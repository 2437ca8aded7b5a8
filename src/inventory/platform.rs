//! Platform declarations from the scenario file.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One declared target host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Platform name, unique within a scenario
    pub name: String,

    /// Groups the host belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,

    /// Child groups the host is registered under inside each of its groups
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,

    /// Driver-specific settings (image, command, ...), kept opaque
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl Platform {
    /// Create a platform with no group membership
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            groups: None,
            children: Vec::new(),
            extra: IndexMap::new(),
        }
    }

    /// Set the groups of this platform
    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = Some(groups.into_iter().map(Into::into).collect());
        self
    }

    /// Set the child groups of this platform
    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }

    /// Declared groups; an absent or empty list yields nothing.
    pub fn declared_groups(&self) -> &[String] {
        self.groups.as_deref().unwrap_or(&[])
    }
}
