//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Calendar time summaries.
///
/// Classifies calendar events into categories by title and reports how much
/// time each category took, per year and in total.
#[derive(Debug, Parser)]
#[command(name = "calsum", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show per-year and total time for each category.
    Summary {
        #[command(flatten)]
        filter: FilterArgs,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List every counted event, grouped by category.
    Events {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Print the effective rules as a JSON rule list.
    Rules {
        /// Rule list files (JSON); the first one that parses is used.
        #[arg(short, long = "rules", value_name = "FILE")]
        rules: Vec<PathBuf>,
    },
}

/// Calendar input and admission options shared by the reporting commands.
#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Calendar file to read (.ics).
    #[arg(value_name = "CALENDAR")]
    pub calendar: PathBuf,

    /// First day to include (YYYY-MM-DD, "today", "yesterday" or "N days ago").
    #[arg(short, long)]
    pub from: Option<String>,

    /// Last day to include, inclusive. Defaults to today.
    #[arg(short, long)]
    pub to: Option<String>,

    /// Rule list files (JSON); the first one that parses is used.
    #[arg(short, long = "rules", value_name = "FILE")]
    pub rules: Vec<PathBuf>,

    /// Only count events attended by someone matching this pattern.
    #[arg(short, long, value_name = "REGEX")]
    pub attendee: Option<String>,
}
