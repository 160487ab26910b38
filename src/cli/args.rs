//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Content-addressed asset rebasing for bundled scripts
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: rebase.toml, optional)
    #[arg(short = 'C', long, global = true, default_value = "rebase.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Rebase the assets of one or more entry scripts into the output directory
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        args: BuildArgs,
    },
}

/// Build arguments
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Entry scripts (or stylesheets) to process
    #[arg(required = true, value_name = "ENTRY", value_hint = clap::ValueHint::FilePath)]
    pub entries: Vec<PathBuf>,

    /// Output directory path (relative to current directory)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Source root for rooted specifiers like `/img/logo.png`
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Subfolder of the output directory that receives all assets
    #[arg(short, long)]
    pub folder: Option<String>,

    /// Keep the source file name in front of the content token
    #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub keep_name: Option<bool>,

    /// Remove the output directory before building
    #[arg(short, long)]
    pub clean: bool,

    /// Log every emitted asset
    #[arg(short = 'V', long)]
    pub verbose: bool,
}
