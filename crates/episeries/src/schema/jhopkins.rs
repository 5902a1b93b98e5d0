//! Johns Hopkins CSSE daily report layouts.

use super::field::Field;
use super::id::SchemaId;
use super::provider::{SchemaProvider, VersionTable};

const V1_FIELDS: &[Field] = &[
    Field::ProvinceState,
    Field::CountryRegion,
    Field::LastUpdate,
    Field::Confirmed,
    Field::Deaths,
    Field::Recovered,
];

const V2_FIELDS: &[Field] = &[
    Field::ProvinceState,
    Field::CountryRegion,
    Field::LastUpdate,
    Field::Confirmed,
    Field::Deaths,
    Field::Recovered,
    Field::Latitude,
    Field::Longitude,
];

const V3_FIELDS: &[Field] = &[
    Field::Fips,
    Field::Admin2,
    Field::ProvinceState,
    Field::CountryRegion,
    Field::LastUpdate,
    Field::Latitude,
    Field::Longitude,
    Field::Confirmed,
    Field::Deaths,
    Field::Recovered,
    Field::Active,
    Field::CombinedKey,
];

const V4_FIELDS: &[Field] = &[
    Field::Fips,
    Field::Admin2,
    Field::ProvinceState,
    Field::CountryRegion,
    Field::LastUpdate,
    Field::Latitude,
    Field::Longitude,
    Field::Confirmed,
    Field::Deaths,
    Field::Recovered,
    Field::Active,
    Field::CombinedKey,
    Field::IncidenceRate,
    Field::CaseFatalityRatio,
];

/// Provider for the four Johns Hopkins header versions.
pub struct JHopkinsProvider {
    table: VersionTable,
}

impl JHopkinsProvider {
    pub fn new() -> Self {
        let table = VersionTable::new(label)
            .with_version(SchemaId::JHopkinsV4, V4_FIELDS)
            .with_version(SchemaId::JHopkinsV3, V3_FIELDS)
            .with_version(SchemaId::JHopkinsV2, V2_FIELDS)
            .with_version(SchemaId::JHopkinsV1, V1_FIELDS);

        Self { table }
    }

    /// Header labels of `schema`, as they appear in the files.
    pub fn labels(&self, schema: SchemaId) -> Vec<&'static str> {
        self.table.labels(schema)
    }
}

impl Default for JHopkinsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaProvider for JHopkinsProvider {
    fn name(&self) -> &'static str {
        "jhopkins"
    }

    fn fields(&self, schema: SchemaId) -> &[Field] {
        self.table.fields(schema)
    }

    fn detect(&self, header: &[String]) -> SchemaId {
        self.table.detect(header)
    }
}

fn label(field: Field, schema: SchemaId) -> &'static str {
    let early = matches!(schema, SchemaId::JHopkinsV1 | SchemaId::JHopkinsV2);

    match field {
        Field::ProvinceState if early => "Province/State",
        Field::ProvinceState => "Province_State",
        Field::CountryRegion if early => "Country/Region",
        Field::CountryRegion => "Country_Region",
        Field::LastUpdate if early => "Last Update",
        Field::LastUpdate => "Last_Update",
        Field::Latitude if early => "Latitude",
        Field::Latitude => "Lat",
        Field::Longitude if early => "Longitude",
        Field::Longitude => "Long_",
        Field::CombinedKey => "Combined_Key",
        Field::IncidenceRate => "Incidence_Rate",
        Field::CaseFatalityRatio => "Case-Fatality_Ratio",
        other => other.name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_detects_every_version() {
        let provider = JHopkinsProvider::new();

        for schema in [
            SchemaId::JHopkinsV1,
            SchemaId::JHopkinsV2,
            SchemaId::JHopkinsV3,
            SchemaId::JHopkinsV4,
        ] {
            let h = header(&provider.labels(schema));
            assert_eq!(provider.detect(&h), schema, "header of {}", schema);
        }
    }

    #[test]
    fn test_v1_labels() {
        let provider = JHopkinsProvider::new();
        assert_eq!(
            provider.labels(SchemaId::JHopkinsV1),
            vec!["Province/State", "Country/Region", "Last Update", "Confirmed", "Deaths", "Recovered"]
        );
    }

    #[test]
    fn test_detection_is_case_sensitive() {
        let provider = JHopkinsProvider::new();
        let h = header(&["province/state", "Country/Region", "Last Update", "Confirmed", "Deaths", "Recovered"]);
        assert_eq!(provider.detect(&h), SchemaId::Unknown);
    }

    #[test]
    fn test_v4_with_extra_columns() {
        let provider = JHopkinsProvider::new();
        let mut h = header(&provider.labels(SchemaId::JHopkinsV4));
        h.push("Something_New".to_string());
        assert_eq!(provider.detect(&h), SchemaId::JHopkinsV4);
    }

    #[test]
    fn test_foreign_schema_has_no_fields() {
        let provider = JHopkinsProvider::new();
        assert!(provider.fields(SchemaId::YandexRussia).is_empty());
        assert_eq!(provider.fields(SchemaId::JHopkinsV3).len(), 12);
    }
}
