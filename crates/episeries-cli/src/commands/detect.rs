//! Detect command - show which schema a source file uses.

use std::path::PathBuf;

use colored::Colorize;
use episeries::Engine;

pub fn run(file: PathBuf, json_output: bool, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let detection = Engine::new().detect(&file)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&detection)?);
        return Ok(());
    }

    let schema = if detection.schema.is_known() {
        detection.schema.to_string().green().bold()
    } else {
        detection.schema.to_string().red().bold()
    };

    println!("{} {}", "File:".bold(), detection.source.file);
    println!("{} {}", "Schema:".bold(), schema);
    println!(
        "{} {} rows, {} columns ({})",
        "Shape:".bold(),
        detection.source.row_count,
        detection.source.column_count,
        detection.source.format
    );
    if let Some(date) = detection.file_date {
        println!("{} {}", "File date:".bold(), date);
    }

    if verbose {
        println!();
        println!("{}", "Header:".yellow().bold());
        for (i, cell) in detection.header.iter().enumerate() {
            println!("  {:3} {}", i, cell);
        }
        println!("{} {}", "Hash:".dimmed(), detection.source.hash.dimmed());
    }

    Ok(())
}
