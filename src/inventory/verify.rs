//! Inventory verification.

use super::Inventory;
use crate::error::{Error, Result};

/// Fail with [`Error::MissingInstances`] when the inventory has no host.
///
/// Must pass before any artifact is written.
pub fn verify(inventory: &Inventory) -> Result<()> {
    if inventory.host_count() == 0 {
        return Err(Error::MissingInstances);
    }
    Ok(())
}
