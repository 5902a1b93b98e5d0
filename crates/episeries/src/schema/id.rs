//! Identifiers of recognized source formats.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A recognized tabular source format, or `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SchemaId {
    /// Johns Hopkins daily report, 22-01-2020 to 29-02-2020.
    JHopkinsV1,
    /// Johns Hopkins daily report, 01-03-2020 to 21-03-2020.
    JHopkinsV2,
    /// Johns Hopkins daily report, 22-03-2020 to 28-05-2020.
    JHopkinsV3,
    /// Johns Hopkins daily report, 29-05-2020 onwards.
    JHopkinsV4,
    /// Yandex regional statistics for Russia.
    YandexRussia,
    /// Header matched no registered provider.
    Unknown,
}

impl SchemaId {
    /// Returns true for every identifier except `Unknown`.
    pub fn is_known(&self) -> bool {
        !matches!(self, SchemaId::Unknown)
    }
}

impl Default for SchemaId {
    fn default() -> Self {
        SchemaId::Unknown
    }
}

impl fmt::Display for SchemaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchemaId::JHopkinsV1 => "JHopkinsV1",
            SchemaId::JHopkinsV2 => "JHopkinsV2",
            SchemaId::JHopkinsV3 => "JHopkinsV3",
            SchemaId::JHopkinsV4 => "JHopkinsV4",
            SchemaId::YandexRussia => "YandexRussia",
            SchemaId::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}
