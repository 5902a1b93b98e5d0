//! The row processor contract and the extraction shared by every schema.

use chrono::NaiveDate;

use super::{Counts, Origin, Record};
use crate::dates::{is_no_date, parse_date};
use crate::error::{EpiError, Result};
use crate::input::RawRow;
use crate::logging::Logger;
use crate::schema::{Field, SchemaId};

/// Where a schema's active count comes from.
///
/// Fixed per schema so a series never mixes the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivePolicy {
    /// `confirmed - recovered - deaths`.
    #[default]
    Derived,
    /// The schema's own `Active` column.
    Reported,
}

/// Extracts canonical values from rows of one family of schemas.
pub trait RowProcessor: Send + Sync {
    fn origin(&self) -> Origin;

    /// Normalized country name.
    fn country(&self, row: &RawRow) -> String;

    /// Normalized region name.
    fn region(&self, row: &RawRow) -> String;

    fn active_policy(&self, _schema: SchemaId) -> ActivePolicy {
        ActivePolicy::Derived
    }

    /// Snapshot date of the row. A missing date is a malformed row.
    fn date(&self, row: &RawRow) -> Result<NaiveDate> {
        let date = parse_date(row.get(Field::LastUpdate))?;
        if is_no_date(date) {
            return Err(malformed(row, Field::LastUpdate));
        }
        Ok(date)
    }

    /// Build the canonical record for `row`.
    fn extract(&self, row: &RawRow, logger: &dyn Logger) -> Result<Record> {
        let country = self.country(row);
        if country.is_empty() {
            logger.error("The row doesn't have a country name.");
            return Err(malformed(row, Field::CountryRegion));
        }

        let date = self.date(row)?;
        let confirmed = parse_count(row, Field::Confirmed, logger)?;
        let recovered = parse_count(row, Field::Recovered, logger)?;
        let deaths = parse_count(row, Field::Deaths, logger)?;

        let counts = match self.active_policy(row.schema()) {
            ActivePolicy::Derived => Counts::derived(confirmed, recovered, deaths),
            ActivePolicy::Reported => Counts::new(
                confirmed,
                parse_count(row, Field::Active, logger)?,
                recovered,
                deaths,
            ),
        };

        Ok(Record {
            date,
            country,
            region: self.region(row),
            counts,
            origin: self.origin(),
        })
    }
}

/// Parse a count cell.
///
/// A blank or missing cell is zero. A float with no fractional part is
/// accepted with a warning when it fits in an `i64`. Anything else is
/// [`EpiError::MalformedField`].
pub fn parse_count(row: &RawRow, field: Field, logger: &dyn Logger) -> Result<i64> {
    let text = row.get(field).trim();
    if text.is_empty() {
        return Ok(0);
    }

    if let Ok(value) = text.parse::<i64>() {
        return Ok(value);
    }

    match text.parse::<f64>() {
        Ok(value) if value.fract() == 0.0 && (I64_LOWER..I64_UPPER).contains(&value) => {
            logger.warning(&format!(
                "{field} value '{text}' is a float, converting to integer"
            ));
            Ok(value as i64)
        }
        _ => Err(malformed(row, field)),
    }
}

// i64::MAX is not representable; 2^63 is the first float out of range.
const I64_LOWER: f64 = i64::MIN as f64;
const I64_UPPER: f64 = -(i64::MIN as f64);

fn malformed(row: &RawRow, field: Field) -> EpiError {
    EpiError::MalformedField {
        schema: row.schema(),
        field,
        value: row.get(field).to_string(),
    }
}
