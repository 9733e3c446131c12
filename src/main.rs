//! Binary entry point.

use anyhow::Result;
use clap::Parser;

use provkit::cli::{Cli, Command};
use provkit::{commands, logging};

fn main() -> Result<()> {
    let args = Cli::parse();
    logging::init_subscriber(args.verbose);

    match &args.command {
        Command::Check => commands::check::run(&args.global),
        Command::Hosts(opts) => commands::hosts::run(&args.global, opts),
        Command::Vars(opts) => commands::vars::run(&args.global, opts),
        Command::Render(opts) => commands::render::run(&args.global, opts),
        Command::Completion(opts) => commands::completion::run(opts),
    }
}
