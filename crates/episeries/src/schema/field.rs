//! Canonical column vocabulary shared by every source schema.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic meaning of a source column.
///
/// Every provider maps its header labels onto these tags. A tag means the
/// same thing in every schema that uses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// US county FIPS code.
    Fips,
    /// Second-level administrative area (county).
    Admin2,
    /// Province, state or region.
    ProvinceState,
    /// Country or region name.
    CountryRegion,
    /// Date of the snapshot.
    LastUpdate,
    Latitude,
    Longitude,
    /// Cumulative confirmed cases.
    Confirmed,
    /// Cumulative deaths.
    Deaths,
    /// Cumulative recoveries.
    Recovered,
    /// Currently active cases.
    Active,
    CombinedKey,
    IncidenceRate,
    CaseFatalityRatio,
    /// New confirmed cases for the day.
    ConfirmedByDay,
    /// New recoveries for the day.
    RecoveredByDay,
    /// New deaths for the day.
    DeathsByDay,
}

impl Field {
    /// Canonical name, used as the default header label.
    pub fn name(&self) -> &'static str {
        match self {
            Field::Fips => "FIPS",
            Field::Admin2 => "Admin2",
            Field::ProvinceState => "ProvinceState",
            Field::CountryRegion => "CountryRegion",
            Field::LastUpdate => "LastUpdate",
            Field::Latitude => "Latitude",
            Field::Longitude => "Longitude",
            Field::Confirmed => "Confirmed",
            Field::Deaths => "Deaths",
            Field::Recovered => "Recovered",
            Field::Active => "Active",
            Field::CombinedKey => "CombinedKey",
            Field::IncidenceRate => "IncidenceRate",
            Field::CaseFatalityRatio => "CaseFatalityRatio",
            Field::ConfirmedByDay => "ConfirmedByDay",
            Field::RecoveredByDay => "RecoveredByDay",
            Field::DeathsByDay => "DeathsByDay",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
