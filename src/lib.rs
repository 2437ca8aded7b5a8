//! # rustible-molecule - Ansible artifacts for test scenarios
//!
//! rustible-molecule prepares everything `ansible-playbook` needs to run a
//! test scenario: a merged `ansible.cfg`, a YAML inventory derived from the
//! scenario's platforms, and `host_vars`/`group_vars` overlays, all written
//! to the scenario's ephemeral directory.
//!
//! ## Core Concepts
//!
//! - **Scenario**: a `molecule.yml` file describing driver, platforms and
//!   provisioner settings
//! - **Platform**: one declared instance, optionally member of groups
//! - **Driver**: owns the instances and tells Ansible how to connect
//! - **Provisioner**: merges configuration and writes the artifacts
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    ScenarioConfig (immutable)                 │
//! └──────────────────────────────────────────────────────────────┘
//!            │                                   │
//!            ▼                                   ▼
//! ┌─────────────────────┐            ┌─────────────────────────┐
//! │ options / env merge │            │   InventoryBuilder      │
//! └─────────────────────┘            └─────────────────────────┘
//!            │                                   │
//!            │                                   ▼
//!            │                       ┌─────────────────────────┐
//!            │                       │   inventory::verify     │
//!            │                       └─────────────────────────┘
//!            ▼                                   ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │   artifacts (ansible.cfg, inventory) + vars (host/group)      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use rustible_molecule::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = ScenarioConfig::load("molecule/default/molecule.yml")?;
//!     let ansible = Ansible::new(&config)?;
//!     ansible.prepare()?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod prelude {
    //! Convenient re-exports of commonly used types.

    pub use crate::config::ScenarioConfig;
    pub use crate::driver::Driver;
    pub use crate::error::{Error, Result};
    pub use crate::inventory::{Inventory, InventoryBuilder, InventoryNode, Platform, RunVars};
    pub use crate::provisioner::{Ansible, AnsiblePlaybook, ConfigOptions, VarsKind, VarsOverlay};
}

/// Error types and result aliases.
pub mod error;

/// Scenario file loading and derived paths.
pub mod config;

/// Instance drivers, as seen by the provisioner.
pub mod driver;

/// Inventory tree construction and verification.
pub mod inventory;

/// Configuration merge and artifact generation for Ansible.
pub mod provisioner;
