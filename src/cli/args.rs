//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Rebuild, query and rewrite the record hierarchy of flat SPED files
#[derive(Parser, Debug)]
#[command(name = "spedtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Relation table (JSON), overrides the configured one
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub relations: Option<PathBuf>,

    /// Config file (default: ./.spedtree.toml if present)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a file and write its records back
    Render {
        /// Record file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the record hierarchy as a tree
    Tree {
        /// Record file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Only show subtrees rooted at this record type
        #[arg(short = 't', long = "type")]
        record_type: Option<String>,
    },

    /// Count records
    Count {
        /// Record file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Only count trees whose root type starts with this prefix (e.g. "C" for block C)
        #[arg(short, long)]
        prefix: Option<String>,
    },

    /// Print the subtrees rooted at a record type
    Find {
        /// Record file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Record type to look for
        #[arg(short = 't', long = "type")]
        record_type: String,
        /// Stop at the first match
        #[arg(long)]
        first: bool,
    },

    /// Drop record types (with their subtrees) and write the rest
    Filter {
        /// Record file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Record types to drop
        #[arg(long, num_args = 1.., required = true)]
        drop: Vec<String>,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify that a file survives parse and render unchanged
    Check {
        /// Record file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,
}
