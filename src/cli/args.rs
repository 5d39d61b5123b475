//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Zoomable circle-packing chart engine: pack a weighted hierarchy, augment
/// it with pie sectors, and simulate zoom transitions
#[derive(Parser, Debug)]
#[command(name = "zoompack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (repeat for more: -d, -dd, -ddd)
    #[arg(short = 'd', long = "debug", action = ArgAction::Count, global = true)]
    pub debug: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pack a hierarchy and print the flattened sector layout
    Layout {
        /// Hierarchy JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        /// Emit the sector list as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Render the packed hierarchy as a tree with weights and radii
    Tree {
        /// Hierarchy JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Simulate a zoom transition and print the sampled camera path
    Zoom {
        /// Hierarchy JSON file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        /// Name of the node to focus
        #[arg(short, long)]
        focus: String,

        /// Use the slow (inspection) transition duration
        #[arg(long)]
        slow: bool,

        /// Number of animation samples to print
        #[arg(long, default_value_t = 10)]
        steps: usize,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Show version and active settings
    Info,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the active configuration as TOML
    Show,
    /// Print the global config file path
    Path,
}
