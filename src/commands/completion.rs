//! `provkit completion` — generate shell completions.

use anyhow::Result;
use clap::CommandFactory as _;

use crate::cli::{Cli, CompletionOpts};

/// Run the `completion` subcommand.
///
/// # Errors
///
/// Currently infallible; the `Result` keeps the command signatures
/// uniform.
pub fn run(opts: &CompletionOpts) -> Result<()> {
    clap_complete::generate(
        opts.shell,
        &mut Cli::command(),
        "provkit",
        &mut std::io::stdout(),
    );
    Ok(())
}
