//! A data row keyed by canonical field.

use std::collections::HashMap;

use crate::schema::{Field, SchemaId};

/// One data row with its resolved schema.
///
/// Cells are matched to the schema's fields by position. Cells past the
/// schema's last field are dropped; fields past the row's last cell read
/// as empty text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    schema: SchemaId,
    cells: HashMap<Field, String>,
}

impl RawRow {
    pub fn new<I, S>(schema: SchemaId, fields: &[Field], cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cells = fields
            .iter()
            .copied()
            .zip(cells.into_iter().map(Into::into))
            .collect();

        Self { schema, cells }
    }

    pub fn schema(&self) -> SchemaId {
        self.schema
    }

    /// Text of `field`, or empty text if the row has none.
    pub fn get(&self, field: Field) -> &str {
        self.cells.get(&field).map(|s| s.as_str()).unwrap_or("")
    }

    /// Returns true if the row has a cell for `field`.
    pub fn has(&self, field: Field) -> bool {
        self.cells.contains_key(&field)
    }

    /// Replace the value of `field`.
    pub fn with_value(mut self, field: Field, value: impl Into<String>) -> Self {
        self.cells.insert(field, value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cells_follow_field_order() {
        let row = RawRow::new(
            SchemaId::JHopkinsV1,
            &[Field::ProvinceState, Field::CountryRegion, Field::Confirmed],
            ["", "Italy", "12", "ignored"],
        );

        assert_eq!(row.get(Field::CountryRegion), "Italy");
        assert_eq!(row.get(Field::Confirmed), "12");
        assert_eq!(row.get(Field::Deaths), "");
        assert!(row.has(Field::ProvinceState));
        assert!(!row.has(Field::Deaths));
    }

    #[test]
    fn test_short_row_reads_empty() {
        let row = RawRow::new(
            SchemaId::JHopkinsV1,
            &[Field::ProvinceState, Field::CountryRegion, Field::Confirmed],
            ["Hubei"],
        );
        assert_eq!(row.get(Field::Confirmed), "");
        assert!(!row.has(Field::Confirmed));
    }

    #[test]
    fn test_with_value_overrides() {
        let row = RawRow::new(SchemaId::JHopkinsV1, &[Field::LastUpdate], ["1/22/20 17:00"])
            .with_value(Field::LastUpdate, "01-23-2020");
        assert_eq!(row.get(Field::LastUpdate), "01-23-2020");
    }
}
