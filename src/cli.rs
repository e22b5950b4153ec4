//! Command-line interface definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Front matter collection and site tree aggregation
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Output directory path (relative to project root)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file name (relative to project root)
    #[arg(short = 'C', long, default_value = "sitematter.toml")]
    pub config: PathBuf,

    /// Print per-file progress
    #[arg(short, long)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Collect front matter, compile every file and write the output directory
    Build,

    /// Collect front matter and print the site tree as JSON
    Tree {
        /// Only print the subtree at this directory (e.g. `blog/2020`)
        path: Option<String>,

        /// Print the flattened record list instead of the tree
        #[arg(long)]
        flat: bool,
    },

    /// Build, then rebuild whenever a project file changes
    Watch,
}

#[allow(unused)]
impl Cli {
    pub const fn is_build(&self) -> bool {
        matches!(self.command, Commands::Build)
    }
    pub const fn is_tree(&self) -> bool {
        matches!(self.command, Commands::Tree { .. })
    }
    pub const fn is_watch(&self) -> bool {
        matches!(self.command, Commands::Watch)
    }
}
