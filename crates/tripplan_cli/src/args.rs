//! CLI argument definitions.

use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;

/// Manage travel itineraries from the terminal.
#[derive(Parser, Debug)]
#[command(name = "tripplan")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// TOML config file (storage backend and logging)
    #[arg(long, global = true, env = "TRIPPLAN_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Owner key used to scope records
    #[arg(long, global = true, env = "TRIPPLAN_OWNER", default_value = "local")]
    pub owner: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check core linkage
    Ping,

    /// List itineraries with day count and total
    List,

    /// Show one itinerary as a day-by-day timeline
    Show { id: String },

    /// Create an itinerary
    New {
        #[arg(long)]
        title: String,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: String,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end: String,
    },

    /// Append a line item
    AddItem {
        id: String,
        /// Item date (YYYY-MM-DD); defaults to the start date
        #[arg(long)]
        date: Option<String>,
        /// Clock time (HH:MM)
        #[arg(long, default_value = "")]
        time: String,
        #[arg(long, default_value = "")]
        content: String,
        #[arg(long, default_value_t = 0.0)]
        amount: f64,
        #[arg(long, default_value = "")]
        note: String,
    },

    /// Move the item at FROM to position TO (0-based)
    MoveItem { id: String, from: usize, to: usize },

    /// Remove a line item
    RemoveItem { id: String, item_id: String },

    /// Delete an itinerary
    Delete { id: String },

    /// Write the export document into a directory
    Export {
        id: String,
        /// Target directory (default: current directory)
        #[arg(long, value_hint = ValueHint::DirPath)]
        out: Option<PathBuf>,
    },

    /// Import an export document
    Import {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },
}
