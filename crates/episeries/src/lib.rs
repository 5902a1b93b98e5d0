//! episeries: daily epidemiological case-count series from heterogeneous snapshots.
//!
//! Source files in several historical layouts (Johns Hopkins daily reports,
//! Yandex regional statistics for Russia) are recognized by their header,
//! normalized into one record shape, and aggregated into a country and
//! region tree. Each node yields a gap-free daily series with day-over-day
//! changes, a reproduction estimate and a time-to-resolve estimate.
//!
//! # Pipeline
//!
//! - [`schema::SchemaResolver`] maps a header row to a [`SchemaId`]
//! - [`RecordFactory`] turns each row into a canonical [`Record`]
//! - [`AggregationGraph`] accumulates records per region
//! - [`series::build_series`] expands a node into [`DailyEntry`] values
//! - [`ReportWriter`] renders CSV reports
//!
//! # Example
//!
//! ```no_run
//! use episeries::{Engine, ReportConfig};
//!
//! let engine = Engine::new();
//! let summary = engine.ingest(&["data/03-22-2020.csv"]).unwrap();
//! println!("Records: {}", summary.records);
//!
//! let italy = engine.series("Italy", None).unwrap();
//! println!("Days: {}", italy.entries.len());
//!
//! engine.write_reports(ReportConfig::new("reports")).unwrap();
//! ```

pub mod dates;
pub mod error;
pub mod graph;
pub mod input;
pub mod logging;
pub mod record;
pub mod report;
pub mod schema;
pub mod series;

mod engine;

pub use crate::engine::{Detection, Engine, EngineConfig, IngestSummary, file_date};
pub use error::{EpiError, Result};
pub use graph::{AggregationGraph, NodeId};
pub use input::{RawRow, SourceMetadata};
pub use logging::{ConsoleLogger, Logger, NullLogger};
pub use record::{Counts, MAIN_TERRITORY, Origin, Record, RecordFactory};
pub use report::{ReportConfig, ReportWriter, SeriesReport};
pub use schema::{Field, SchemaId};
pub use series::DailyEntry;
