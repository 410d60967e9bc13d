//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Structural editor for template trees: apply edit scripts and render markup
#[derive(Parser, Debug)]
#[command(name = "svisuelte")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding the local .svisuelte.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply an edit script to a fresh tree and print the result
    Run {
        /// Script file, `-` reads stdin
        #[arg(value_hint = ValueHint::FilePath)]
        script: PathBuf,

        /// Do not print the final markup
        #[arg(short, long)]
        quiet: bool,

        /// Verify tree invariants after every edit
        #[arg(long)]
        check: bool,

        /// Write the final markup to a file instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
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

    /// Print a config template
    Template,

    /// Show config paths
    Path,
}
