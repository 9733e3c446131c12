//! Orchestration boundary: project conventions and host selection.
//!
//! [`Project`] resolves the conventional directory layout around a
//! provisioning script (`templates/`, `files/`, `inventory.yaml`).
//! [`Session`] is the one and only holder of the "current host": the
//! resolver and editor cores take explicit arguments and never consult
//! ambient state, so selection lives here at the outermost layer.

use std::path::{Path, PathBuf};

use crate::error::InventoryError;
use crate::inventory::ResolvedInventory;
use crate::scope::Scope;

/// Directory conventions for a provisioning project.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    /// Create a project rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The project root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding template files.
    #[must_use]
    pub fn templates_dir(&self) -> PathBuf {
        self.root.join("templates")
    }

    /// Directory holding files to copy to targets.
    #[must_use]
    pub fn files_dir(&self) -> PathBuf {
        self.root.join("files")
    }

    /// The conventional inventory file path.
    #[must_use]
    pub fn default_inventory(&self) -> PathBuf {
        self.root.join("inventory.yaml")
    }
}

/// A provisioning run over one inventory, tracking the selected host.
#[derive(Debug, Clone)]
pub struct Session {
    inventory: ResolvedInventory,
    current: Option<String>,
}

impl Session {
    /// Start a session over a resolved inventory with no host selected.
    #[must_use]
    pub fn new(inventory: ResolvedInventory) -> Self {
        Self {
            inventory,
            current: None,
        }
    }

    /// The underlying inventory.
    #[must_use]
    pub fn inventory(&self) -> &ResolvedInventory {
        &self.inventory
    }

    /// Select the host subsequent operations target.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::NoSuchHost`] when the inventory does
    /// not declare `host`.
    pub fn select(&mut self, host: &str) -> Result<(), InventoryError> {
        if !self.inventory.contains(host) {
            return Err(InventoryError::NoSuchHost {
                host: host.to_string(),
            });
        }
        self.current = Some(host.to_string());
        Ok(())
    }

    /// Clear the host selection, falling back to the local scope.
    pub fn clear_selection(&mut self) {
        self.current = None;
    }

    /// The currently selected host, if any.
    #[must_use]
    pub fn current_host(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// The variable scope operations should resolve against.
    ///
    /// The selected host's scope, or the local (non-host) scope when no
    /// host is selected.
    #[must_use]
    pub fn scope(&self) -> &Scope {
        self.current
            .as_deref()
            .and_then(|host| self.inventory.scope(host))
            .unwrap_or_else(|| self.inventory.local())
    }
}
