//! CLI command implementations.

pub mod detect;
pub mod generate;
pub mod series;

use std::path::PathBuf;
use std::sync::Arc;

use episeries::{ConsoleLogger, Engine, EngineConfig, Logger, NullLogger};
use tracing::warn;
use walkdir::WalkDir;

/// Expand files and folders into a sorted list of source files.
///
/// Folders are searched recursively for `.csv` files.
pub fn discover_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
            continue;
        }
        if !input.is_dir() {
            return Err(format!("Input not found: {}", input.display()).into());
        }

        for entry in WalkDir::new(input) {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && path.extension().is_some_and(|ext| ext == "csv") {
                        files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    warn!("Error walking directory {}: {}", input.display(), e);
                }
            }
        }
    }

    files.sort();
    files.dedup();

    if files.is_empty() {
        return Err("No source files found".into());
    }
    Ok(files)
}

/// Engine with console diagnostics when `verbose` is set.
pub fn build_engine(config: EngineConfig, verbose: bool) -> Engine {
    let logger: Arc<dyn Logger> = if verbose {
        Arc::new(ConsoleLogger::new())
    } else {
        Arc::new(NullLogger)
    };
    Engine::with_config(config).with_logger(logger)
}
