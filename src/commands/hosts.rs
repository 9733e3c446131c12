//! `provkit hosts` — list target hosts.

use anyhow::{Result, bail};

use crate::cli::{GlobalOpts, HostsOpts};

/// Run the `hosts` subcommand.
///
/// # Errors
///
/// Fails on inventory errors or an unknown `--role` filter.
pub fn run(global: &GlobalOpts, opts: &HostsOpts) -> Result<()> {
    let (_, inventory) = super::load_inventory(global)?;
    match &opts.role {
        Some(role) => {
            let Some(role) = inventory.roles().iter().find(|r| &r.name == role) else {
                bail!("role '{role}' not defined in inventory");
            };
            for host in &role.hosts {
                println!("{host}");
            }
        }
        None => {
            for host in inventory.hosts() {
                println!("{host}");
            }
        }
    }
    Ok(())
}
