//! episeries CLI - daily case-count reports from source snapshots.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Generate {
            inputs,
            output,
            country,
            day,
            workers,
            all_sources,
        } => commands::generate::run(
            inputs,
            output,
            country,
            day,
            workers,
            all_sources,
            cli.verbose,
        ),

        Commands::Detect { file, json } => commands::detect::run(file, json, cli.verbose),

        Commands::Series {
            inputs,
            country,
            region,
            json,
        } => commands::series::run(inputs, country, region, json, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
