//! Fuzz target for reading tables and turning rows into records.
//!
//! Tests that the reader, the schema resolver and the record factory:
//! 1. Never panic on malformed delimited input
//! 2. Report bad cells as errors

#![no_main]

use episeries::input::{RawRow, TableReader};
use episeries::schema::SchemaResolver;
use episeries::RecordFactory;
use libfuzzer_sys::fuzz_target;

const V1_HEADER: &str = "Province/State,Country/Region,Last Update,Confirmed,Deaths,Recovered\n";

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    let reader = TableReader::new();
    let resolver = SchemaResolver::with_defaults();
    let factory = RecordFactory::default();

    // Raw input, and the same bytes under a known header
    let mut with_header = V1_HEADER.as_bytes().to_vec();
    with_header.extend_from_slice(data);

    for bytes in [data, with_header.as_slice()] {
        let Ok(table) = reader.read_bytes(bytes) else {
            continue;
        };

        let schema = resolver.resolve(&table.header);
        let fields = resolver.fields(schema);
        for cells in &table.rows {
            let row = RawRow::new(schema, fields, cells.iter().cloned());
            let _ = factory.create(&row);
        }
    }
});
