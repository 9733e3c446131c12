//! `provkit check` — validate the inventory and print a summary.

use anyhow::Result;

use crate::cli::GlobalOpts;

/// Run the `check` subcommand.
///
/// # Errors
///
/// Returns the inventory's validation error verbatim, aborting with a
/// non-zero exit.
pub fn run(global: &GlobalOpts) -> Result<()> {
    let (_, inventory) = super::load_inventory(global)?;
    println!(
        "inventory OK: {} host(s), {} role(s)",
        inventory.hosts().len(),
        inventory.roles().len()
    );
    for role in inventory.roles() {
        println!("  role {}: {} host(s)", role.name, role.hosts.len());
    }
    Ok(())
}
