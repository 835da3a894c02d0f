//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Goal and project hierarchy: sorted goal trees and project timelines
#[derive(Parser, Debug)]
#[command(name = "goaltree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding a local .goaltree.toml (default: cwd)
    #[arg(short = 'C', long, global = true)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Sorting and filtering flags shared by tree views.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct SortArgs {
    /// Sort key: name, timeframe, lastCheckIn, champion, space, progress
    #[arg(short, long)]
    pub sort: Option<String>,

    /// Sort direction: asc or desc
    #[arg(long)]
    pub direction: Option<String>,

    /// Keep closed goals and projects
    #[arg(long)]
    pub show_completed: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the goal tree
    Tree {
        /// Data file (default: data_file from config)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        #[command(flatten)]
        sort: SortArgs,
    },

    /// List all rows in tree order with depth and child summary
    List {
        /// Data file (default: data_file from config)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        #[command(flatten)]
        sort: SortArgs,
    },

    /// Show the timeline of a project
    Timeline {
        /// Project id
        project: String,
        /// Data file (default: data_file from config)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Reference date (YYYY-MM-DD, default: today)
        #[arg(long)]
        today: Option<String>,
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
    /// Show effective configuration
    Show,
    /// Show config file locations
    Path,
    /// Print a config template
    Template,
}
