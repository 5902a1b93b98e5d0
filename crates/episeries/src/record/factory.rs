//! Dispatches rows to the processor registered for their schema.

use std::collections::HashMap;
use std::sync::Arc;

use super::processor::RowProcessor;
use super::{JHopkinsRowProcessor, Record, YandexRowProcessor};
use crate::error::{EpiError, Result};
use crate::input::RawRow;
use crate::logging::{Logger, NullLogger};
use crate::schema::SchemaId;

/// Registry from schema to row processor.
pub struct RecordFactory {
    processors: HashMap<SchemaId, Arc<dyn RowProcessor>>,
    logger: Arc<dyn Logger>,
}

impl RecordFactory {
    /// An empty factory. Every row fails until processors are registered.
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self {
            processors: HashMap::new(),
            logger,
        }
    }

    /// A factory with processors for every built-in schema.
    pub fn with_defaults(logger: Arc<dyn Logger>) -> Self {
        let jhopkins: Arc<dyn RowProcessor> = Arc::new(JHopkinsRowProcessor::new());

        Self::new(logger)
            .with_processor(SchemaId::JHopkinsV1, Arc::clone(&jhopkins))
            .with_processor(SchemaId::JHopkinsV2, Arc::clone(&jhopkins))
            .with_processor(SchemaId::JHopkinsV3, Arc::clone(&jhopkins))
            .with_processor(SchemaId::JHopkinsV4, jhopkins)
            .with_processor(SchemaId::YandexRussia, Arc::new(YandexRowProcessor::new()))
    }

    /// Register `processor` for `schema`, replacing any earlier one.
    pub fn with_processor(mut self, schema: SchemaId, processor: Arc<dyn RowProcessor>) -> Self {
        self.processors.insert(schema, processor);
        self
    }

    pub fn supports(&self, schema: SchemaId) -> bool {
        self.processors.contains_key(&schema)
    }

    /// Build the canonical record for `row`.
    ///
    /// Fails with [`EpiError::UnsupportedSchema`] when no processor is
    /// registered for the row's schema, including [`SchemaId::Unknown`].
    pub fn create(&self, row: &RawRow) -> Result<Record> {
        let schema = row.schema();
        match self.processors.get(&schema) {
            Some(processor) => processor.extract(row, self.logger.as_ref()),
            None => {
                self.logger
                    .error(&format!("No row processor for schema '{schema}'"));
                Err(EpiError::UnsupportedSchema { schema })
            }
        }
    }
}

impl Default for RecordFactory {
    fn default() -> Self {
        Self::with_defaults(Arc::new(NullLogger))
    }
}
