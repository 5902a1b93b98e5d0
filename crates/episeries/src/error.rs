//! Error types for the episeries library.

use std::path::PathBuf;
use thiserror::Error;

use crate::schema::{Field, SchemaId};

/// Main error type for episeries operations.
#[derive(Debug, Error)]
pub enum EpiError {
    /// Date text matched none of the known formats.
    #[error("Unsupported date format: '{value}'")]
    UnsupportedDateFormat { value: String },

    /// No row processor is registered for the schema.
    #[error("Unsupported schema: {schema}")]
    UnsupportedSchema { schema: SchemaId },

    /// A column the schema guarantees could not be parsed.
    #[error("Malformed field {field:?} in {schema} row: '{value}'")]
    MalformedField {
        schema: SchemaId,
        field: Field,
        value: String,
    },

    /// An operation that needs at least one element got none.
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// No country or region with the requested name.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A file header matched none of the registered providers.
    #[error("Unknown header in '{path}': {header}")]
    UnknownHeader { path: PathBuf, header: String },

    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl EpiError {
    /// Wrap an IO error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for episeries operations.
pub type Result<T> = std::result::Result<T, EpiError>;
