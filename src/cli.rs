//! Command-line argument parsing and subcommand definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Top-level CLI entry point for the provisioning toolkit.
#[derive(Parser, Debug)]
#[command(
    name = "provkit",
    about = "Server provisioning toolkit: idempotent file edits, host inventory, template rendering",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared across all subcommands.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Project root directory (holds templates/, files/, inventory.yaml)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Inventory file (default: <root>/inventory.yaml)
    #[arg(short, long, global = true)]
    pub inventory: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate the inventory and print a summary
    Check,
    /// List target hosts
    Hosts(HostsOpts),
    /// Print a host's resolved variables
    Vars(VarsOpts),
    /// Render a template to stdout
    Render(RenderOpts),
    /// Generate shell completions
    Completion(CompletionOpts),
}

/// Options for the `hosts` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct HostsOpts {
    /// Only list hosts belonging to this role
    #[arg(long)]
    pub role: Option<String>,
}

/// Options for the `vars` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct VarsOpts {
    /// Host whose resolved scope to print
    pub host: Option<String>,

    /// Print the local (non-host) variables instead
    #[arg(long, conflicts_with = "host")]
    pub local: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,
}

/// Output format for variable dumps.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// YAML document
    Yaml,
    /// Pretty-printed JSON
    Json,
}

/// Options for the `render` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct RenderOpts {
    /// Template name, resolved under <root>/templates/
    pub template: String,

    /// Host whose scope provides the variables (default: local vars)
    #[arg(long)]
    pub host: Option<String>,

    /// Override a variable (value parsed as YAML)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,
}

/// Options for the `completion` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CompletionOpts {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
