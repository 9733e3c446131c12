//! `provkit render` — render a template to stdout.

use anyhow::{Result, bail};
use serde_yaml::Value;

use crate::cli::{GlobalOpts, RenderOpts};
use crate::render::render_file;
use crate::scope::Scope;
use crate::session::Session;

/// Parse `--set KEY=VALUE` overrides into a scope.
///
/// Values are parsed as YAML scalars (`count=3` yields a number,
/// `flag=true` a boolean); anything unparsable stays a string.
fn parse_overrides(pairs: &[String]) -> Result<Scope> {
    let mut overrides = Scope::new();
    for pair in pairs {
        let Some((name, raw)) = pair.split_once('=') else {
            bail!("invalid --set '{pair}', expected KEY=VALUE");
        };
        let value =
            serde_yaml::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        overrides.set(name, value);
    }
    Ok(overrides)
}

/// Run the `render` subcommand.
///
/// # Errors
///
/// Fails on inventory errors, an unknown `--host`, malformed `--set`
/// overrides, or any render error.
pub fn run(global: &GlobalOpts, opts: &RenderOpts) -> Result<()> {
    let (project, inventory) = super::load_inventory(global)?;
    let mut session = Session::new(inventory);
    if let Some(host) = opts.host.as_deref() {
        session.select(host)?;
    }
    let overrides = parse_overrides(&opts.set)?;
    let output = render_file(&project, session.scope(), &opts.template, &overrides)?;
    print!("{output}");
    Ok(())
}
