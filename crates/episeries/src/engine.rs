//! Engine entry point: ingest source files, then report on them.

use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EpiError, Result};
use crate::graph::AggregationGraph;
use crate::input::{RawRow, ReaderConfig, SourceMetadata, TableReader};
use crate::logging::{IndentGuard, Logger, NullLogger};
use crate::record::{Record, RecordFactory};
use crate::report::{self, ReportConfig, ReportWriter, SeriesReport, WriteSummary};
use crate::schema::{Field, SchemaId, SchemaResolver};

/// Configuration for an [`Engine`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Reader configuration.
    pub reader: ReaderConfig,
    /// Files read in parallel.
    pub workers: usize,
    /// Use an `MM-dd-yyyy` file name as the date of every row in the file.
    pub file_date_override: bool,
    /// Countries whose records are dropped after normalization.
    pub excluded_countries: Vec<String>,
    /// Keep only the highest-priority origin per country and day.
    pub source_priority: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reader: ReaderConfig::default(),
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            file_date_override: true,
            excluded_countries: vec!["Others".to_string()],
            source_priority: true,
        }
    }
}

/// Schema resolution of one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    /// Metadata about the source file.
    pub source: SourceMetadata,
    pub header: Vec<String>,
    pub schema: SchemaId,
    /// Date taken from the file name, if any.
    pub file_date: Option<NaiveDate>,
}

/// Result of one [`Engine::ingest`] call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestSummary {
    pub files: usize,
    pub rows: usize,
    /// Records inserted into the graph.
    pub records: usize,
    /// Records dropped because their country is excluded.
    pub excluded: usize,
    /// Files per schema, ordered by schema.
    pub schemas: IndexMap<SchemaId, usize>,
}

impl IngestSummary {
    fn merge(&mut self, file: FileSummary) {
        self.files += 1;
        self.rows += file.rows;
        self.records += file.records;
        self.excluded += file.excluded;
        *self.schemas.entry(file.schema).or_default() += 1;
    }
}

struct FileSummary {
    schema: SchemaId,
    rows: usize,
    records: usize,
    excluded: usize,
}

/// Case-count ingestion and aggregation engine.
pub struct Engine {
    config: EngineConfig,
    reader: TableReader,
    resolver: SchemaResolver,
    factory: RecordFactory,
    graph: AggregationGraph,
    logger: Arc<dyn Logger>,
}

impl Engine {
    /// Create an engine with default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine with custom configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        let logger: Arc<dyn Logger> = Arc::new(NullLogger);

        Self {
            reader: TableReader::with_config(config.reader.clone()),
            resolver: SchemaResolver::with_defaults(),
            factory: RecordFactory::with_defaults(Arc::clone(&logger)),
            graph: AggregationGraph::with_source_priority(config.source_priority),
            config,
            logger,
        }
    }

    /// Send diagnostics to `logger`.
    ///
    /// Resets the record factory to the built-in processors.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.factory = RecordFactory::with_defaults(Arc::clone(&logger));
        self.logger = logger;
        self
    }

    /// Replace the schema resolver.
    pub fn with_resolver(mut self, resolver: SchemaResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replace the record factory.
    pub fn with_factory(mut self, factory: RecordFactory) -> Self {
        self.factory = factory;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn graph(&self) -> &AggregationGraph {
        &self.graph
    }

    /// Read the header of `path` and resolve its schema.
    pub fn detect(&self, path: impl AsRef<Path>) -> Result<Detection> {
        let path = path.as_ref();
        let (table, source) = self.reader.read_file(path)?;
        let schema = self.resolver.resolve(&table.header);

        Ok(Detection {
            file_date: file_date(&source.stem()),
            source,
            header: table.header,
            schema,
        })
    }

    /// Read every file in `paths` and aggregate its records.
    ///
    /// Files are spread over scoped worker threads. The first failure stops
    /// the remaining work and is returned; the graph then holds a partial
    /// ingest and should be discarded.
    pub fn ingest<P: AsRef<Path> + Sync>(&self, paths: &[P]) -> Result<IngestSummary> {
        let workers = self.config.workers.clamp(1, paths.len().max(1));
        let next = AtomicUsize::new(0);
        let failed = AtomicBool::new(false);
        let summary = Mutex::new(IngestSummary::default());
        let first_error: Mutex<Option<EpiError>> = Mutex::new(None);

        self.logger
            .info(&format!("Ingesting {} files on {} workers", paths.len(), workers));
        let _indent = IndentGuard::new(self.logger.as_ref());

        std::thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|| {
                    while !failed.load(Ordering::Relaxed) {
                        let i = next.fetch_add(1, Ordering::Relaxed);
                        let Some(path) = paths.get(i) else { break };

                        match self.ingest_file(path.as_ref()) {
                            Ok(file) => summary
                                .lock()
                                .unwrap_or_else(PoisonError::into_inner)
                                .merge(file),
                            Err(e) => {
                                failed.store(true, Ordering::Relaxed);
                                first_error
                                    .lock()
                                    .unwrap_or_else(PoisonError::into_inner)
                                    .get_or_insert(e);
                            }
                        }
                    }
                });
            }
        });

        if let Some(e) = first_error.into_inner().unwrap_or_else(PoisonError::into_inner) {
            self.logger.error(&e.to_string());
            return Err(e);
        }

        let mut summary = summary.into_inner().unwrap_or_else(PoisonError::into_inner);
        summary.schemas.sort_keys();
        debug!(files = summary.files, records = summary.records, "ingest complete");
        Ok(summary)
    }

    fn ingest_file(&self, path: &Path) -> Result<FileSummary> {
        let (table, source) = self.reader.read_file(path)?;
        let schema = self.resolver.resolve(&table.header);

        if !schema.is_known() {
            self.logger.error(&format!(
                "Unknown header in '{}': {}",
                path.display(),
                table.header.join(",")
            ));
            return Err(EpiError::UnknownHeader {
                path: path.to_path_buf(),
                header: table.header.join(","),
            });
        }

        if table.row_count() == 0 {
            self.logger
                .warning(&format!("'{}' has no data rows", source.file));
        }

        let fields = self.resolver.fields(schema);
        let date_override = if self.config.file_date_override {
            file_date(&source.stem()).map(|_| source.stem())
        } else {
            None
        };

        let mut file = FileSummary {
            schema,
            rows: table.row_count(),
            records: 0,
            excluded: 0,
        };

        for cells in &table.rows {
            let mut row = RawRow::new(schema, fields, cells.iter().cloned());
            if let Some(date) = &date_override {
                row = row.with_value(Field::LastUpdate, date.clone());
            }

            let record = self.factory.create(&row)?;
            if self.is_excluded(&record) {
                file.excluded += 1;
                continue;
            }

            self.graph.insert(&record);
            file.records += 1;
        }

        debug!(
            path = %path.display(),
            %schema,
            records = file.records,
            "ingested file"
        );
        Ok(file)
    }

    fn is_excluded(&self, record: &Record) -> bool {
        self.config
            .excluded_countries
            .iter()
            .any(|c| c == &record.country)
    }

    /// Series of a country, or of one of its regions.
    pub fn series(&self, country: &str, region: Option<&str>) -> Result<SeriesReport> {
        match region {
            Some(region) => report::region_report(&self.graph, country, region),
            None => report::country_report(&self.graph, country),
        }
    }

    /// Write country, region and day reports.
    pub fn write_reports(&self, config: ReportConfig) -> Result<WriteSummary> {
        self.logger.info(&format!(
            "Writing reports to '{}'",
            config.output_dir.display()
        ));
        ReportWriter::new(config).write_all(&self.graph)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Date encoded in a daily report file name such as `03-22-2020`.
pub fn file_date(stem: &str) -> Option<NaiveDate> {
    if stem.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(stem, "%m-%d-%Y").ok()
}
