//! Series command - print the daily series of one country or region.

use std::path::PathBuf;

use colored::Colorize;
use episeries::EngineConfig;

use super::{build_engine, discover_inputs};

pub fn run(
    inputs: Vec<PathBuf>,
    country: String,
    region: Option<String>,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let files = discover_inputs(&inputs)?;

    let engine = build_engine(EngineConfig::default(), verbose);
    engine.ingest(&files)?;

    let report = engine.series(&country, region.as_deref())?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Series:".cyan().bold(),
        match &report.region {
            Some(region) => format!("{} / {}", report.country, region),
            None => report.country.clone(),
        }
        .white()
    );
    println!(
        "{:>10} {:>10} {:>10} {:>10} {:>10} {:>8} {:>8} {:>5}",
        "Date", "Confirmed", "Active", "Recovered", "Deaths", "New", "Rt", "TTR"
    );

    for entry in &report.entries {
        let rt = entry
            .rt
            .map(|rt| format!("{:.2}", rt))
            .unwrap_or_else(|| "-".to_string());
        let ttr = entry
            .time_to_resolve
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:>10} {:>10} {:>10} {:>10} {:>10} {:>8} {:>8} {:>5}",
            entry.date.format("%d-%m-%Y").to_string(),
            entry.totals.confirmed,
            entry.totals.active,
            entry.totals.recovered,
            entry.totals.deaths,
            entry.change.confirmed,
            rt,
            ttr
        );
    }

    Ok(())
}
