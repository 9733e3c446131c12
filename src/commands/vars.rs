//! `provkit vars` — print a host's resolved variables.

use anyhow::{Context as _, Result, bail};

use crate::cli::{GlobalOpts, OutputFormat, VarsOpts};
use crate::scope::Scope;

fn format_scope(scope: &Scope, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => serde_yaml::to_string(scope).context("serializing scope as yaml"),
        OutputFormat::Json => {
            serde_json::to_string_pretty(scope).context("serializing scope as json")
        }
    }
}

/// Run the `vars` subcommand.
///
/// # Errors
///
/// Fails on inventory errors, a missing host argument, or an unknown
/// host.
pub fn run(global: &GlobalOpts, opts: &VarsOpts) -> Result<()> {
    let (_, inventory) = super::load_inventory(global)?;
    let scope = if opts.local {
        inventory.local()
    } else {
        let Some(host) = opts.host.as_deref() else {
            bail!("a host argument is required unless --local is given");
        };
        let Some(scope) = inventory.scope(host) else {
            bail!("host '{host}' not defined in inventory");
        };
        scope
    };
    print!("{}", format_scope(scope, opts.format)?);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::inventory::ResolvedInventory;

    fn scope() -> Scope {
        ResolvedInventory::parse("hosts: [h]\nhost_vars:\n- {host: h, vars: {a: 1, b: two}}\n")
            .expect("inventory should parse")
            .scope("h")
            .expect("scope for h")
            .clone()
    }

    #[test]
    fn yaml_output_preserves_declaration_order() {
        let out = format_scope(&scope(), OutputFormat::Yaml).unwrap();
        assert_eq!(out, "a: 1\nb: two\n");
    }

    #[test]
    fn json_output_is_pretty_printed() {
        let out = format_scope(&scope(), OutputFormat::Json).unwrap();
        assert!(out.contains("\"a\": 1"), "got: {out}");
        assert!(out.contains("\"b\": \"two\""), "got: {out}");
    }
}
