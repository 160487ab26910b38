//! Rebase - content-addressed asset rebasing for bundled scripts.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use rebase::{
    cli::{Cli, Commands, build::build_entries},
    config::RebaseConfig,
    logger,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = RebaseConfig::load(&cli)?;
    logger::set_verbose(config.verbose);

    match &cli.command {
        Commands::Build { args } => build_entries(&config, &args.entries, args.clean).map(|_| ()),
    }
}
