//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// episeries: daily case-count series and reports from source snapshots
#[derive(Parser)]
#[command(name = "episeries")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest source files and write country, region and day reports
    Generate {
        /// Source files or folders (searched recursively for .csv files)
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,

        /// Output folder for reports
        #[arg(short, long)]
        output: PathBuf,

        /// Only report on these countries (repeatable)
        #[arg(short, long)]
        country: Vec<String>,

        /// Only write the day report for this date (YYYY-MM-DD)
        #[arg(short, long)]
        day: Option<String>,

        /// Number of files read in parallel
        #[arg(short, long)]
        workers: Option<usize>,

        /// Sum every source instead of keeping the preferred one per day
        #[arg(long)]
        all_sources: bool,
    },

    /// Show which schema a source file uses
    Detect {
        /// Path to the source file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the daily series of a country or region
    Series {
        /// Source files or folders (searched recursively for .csv files)
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,

        /// Country name
        #[arg(short, long)]
        country: String,

        /// Region name within the country
        #[arg(short, long)]
        region: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
