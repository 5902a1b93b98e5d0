//! Yandex regional statistics for Russia (Russian-language header).

use super::field::Field;
use super::id::SchemaId;
use super::provider::{SchemaProvider, VersionTable};

const FIELDS: &[Field] = &[
    Field::LastUpdate,
    Field::ProvinceState,
    Field::Confirmed,
    Field::Recovered,
    Field::Deaths,
    Field::DeathsByDay,
    Field::ConfirmedByDay,
    Field::RecoveredByDay,
];

/// Provider for the Yandex Russia layout.
pub struct YandexRussiaProvider {
    table: VersionTable,
}

impl YandexRussiaProvider {
    pub fn new() -> Self {
        Self {
            table: VersionTable::new(label).with_version(SchemaId::YandexRussia, FIELDS),
        }
    }

    /// Header labels, as they appear in the files.
    pub fn labels(&self) -> Vec<&'static str> {
        self.table.labels(SchemaId::YandexRussia)
    }
}

impl Default for YandexRussiaProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaProvider for YandexRussiaProvider {
    fn name(&self) -> &'static str {
        "yandex"
    }

    fn fields(&self, schema: SchemaId) -> &[Field] {
        self.table.fields(schema)
    }

    fn detect(&self, header: &[String]) -> SchemaId {
        self.table.detect(header)
    }
}

fn label(field: Field, _schema: SchemaId) -> &'static str {
    match field {
        Field::LastUpdate => "Дата",
        Field::ProvinceState => "Регион",
        Field::Confirmed => "Заражений",
        Field::Recovered => "Выздоровлений",
        Field::Deaths => "Смертей",
        Field::DeathsByDay => "Смертей за день",
        Field::ConfirmedByDay => "Заражений за день",
        Field::RecoveredByDay => "Выздоровлений за день",
        other => other.name(),
    }
}
