//! Subcommand orchestration.
//!
//! Each submodule owns one CLI subcommand: resolve the project layout,
//! load the inventory, and delegate to the library core. Typed errors
//! cross into [`anyhow`] here, at the boundary.

pub mod check;
pub mod completion;
pub mod hosts;
pub mod render;
pub mod vars;

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::inventory::ResolvedInventory;
use crate::session::Project;

/// Resolve the project root from the global options (default: cwd).
pub(crate) fn project(global: &GlobalOpts) -> Project {
    Project::new(global.root.clone().unwrap_or_else(|| PathBuf::from(".")))
}

/// Load the inventory named by the global options.
///
/// Falls back to the conventional `<root>/inventory.yaml`.
pub(crate) fn load_inventory(global: &GlobalOpts) -> Result<(Project, ResolvedInventory)> {
    let project = project(global);
    let path = global
        .inventory
        .clone()
        .unwrap_or_else(|| project.default_inventory());
    let inventory = ResolvedInventory::load(&path)?;
    Ok((project, inventory))
}
