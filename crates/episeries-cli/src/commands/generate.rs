//! Generate command - ingest source files and write reports.

use std::path::PathBuf;

use chrono::NaiveDate;
use colored::Colorize;
use episeries::{EngineConfig, ReportConfig};

use super::{build_engine, discover_inputs};

pub fn run(
    inputs: Vec<PathBuf>,
    output: PathBuf,
    countries: Vec<String>,
    day: Option<String>,
    workers: Option<usize>,
    all_sources: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let day = day
        .map(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d"))
        .transpose()
        .map_err(|e| format!("Invalid --day (expected YYYY-MM-DD): {}", e))?;

    let files = discover_inputs(&inputs)?;

    println!(
        "{} {} source files",
        "Ingesting".cyan().bold(),
        files.len().to_string().white()
    );

    let mut config = EngineConfig::default();
    if let Some(workers) = workers {
        config.workers = workers;
    }
    config.source_priority = !all_sources;

    let engine = build_engine(config, verbose);
    let summary = engine.ingest(&files)?;

    println!(
        "Read {} rows into {} records ({} excluded)",
        summary.rows.to_string().white().bold(),
        summary.records.to_string().white().bold(),
        summary.excluded.to_string().yellow()
    );
    if verbose {
        for (schema, count) in &summary.schemas {
            println!("  {} {:14} {}", "•".dimmed(), schema.to_string(), count);
        }
    }

    let report_config = ReportConfig {
        output_dir: output.clone(),
        countries,
        day,
    };
    let written = engine.write_reports(report_config)?;

    println!();
    println!(
        "{} {} country, {} region and {} day reports to {}",
        "Wrote".green().bold(),
        written.countries.to_string().white().bold(),
        written.regions.to_string().white().bold(),
        written.days.to_string().white().bold(),
        output.display().to_string().white()
    );

    Ok(())
}
