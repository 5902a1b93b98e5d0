//! Canonical records and the processors that build them from raw rows.
//!
//! Each recognized [`SchemaId`](crate::schema::SchemaId) has one
//! [`RowProcessor`]. The [`RecordFactory`] dispatches a row to the processor
//! registered for its schema and fails when there is none.

mod factory;
mod jhopkins;
mod processor;
mod yandex;

pub use factory::RecordFactory;
pub use jhopkins::JHopkinsRowProcessor;
pub use processor::{ActivePolicy, RowProcessor, parse_count};
pub use yandex::YandexRowProcessor;

use std::ops::{Add, Sub};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Region name for rows that carry no region of their own.
pub const MAIN_TERRITORY: &str = "Main territory";

/// Region name for rows whose region is explicitly unknown or unassigned.
pub const OTHER_REGION: &str = "Other";

/// Data source a record came from.
///
/// When one country has records from several origins on the same day, the
/// origin with the highest priority wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    JHopkins,
    Yandex,
}

impl Origin {
    pub fn priority(&self) -> u8 {
        match self {
            Origin::JHopkins => 0,
            Origin::Yandex => 1,
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::JHopkins => write!(f, "JHopkins"),
            Origin::Yandex => write!(f, "Yandex"),
        }
    }
}

/// Cumulative counts for one place on one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub confirmed: i64,
    pub active: i64,
    pub recovered: i64,
    pub deaths: i64,
}

impl Counts {
    pub fn new(confirmed: i64, active: i64, recovered: i64, deaths: i64) -> Self {
        Self {
            confirmed,
            active,
            recovered,
            deaths,
        }
    }

    /// Counts with active derived as `confirmed - recovered - deaths`.
    pub fn derived(confirmed: i64, recovered: i64, deaths: i64) -> Self {
        let active = confirmed.saturating_sub(recovered).saturating_sub(deaths);
        Self::new(confirmed, active, recovered, deaths)
    }

    /// Recovered plus deaths.
    pub fn resolved(&self) -> i64 {
        self.recovered.saturating_add(self.deaths)
    }
}

// Counts saturate at the i64 bounds instead of overflowing.

impl Add for Counts {
    type Output = Counts;

    fn add(self, rhs: Counts) -> Counts {
        Counts {
            confirmed: self.confirmed.saturating_add(rhs.confirmed),
            active: self.active.saturating_add(rhs.active),
            recovered: self.recovered.saturating_add(rhs.recovered),
            deaths: self.deaths.saturating_add(rhs.deaths),
        }
    }
}

impl std::ops::AddAssign for Counts {
    fn add_assign(&mut self, rhs: Counts) {
        *self = *self + rhs;
    }
}

impl Sub for Counts {
    type Output = Counts;

    fn sub(self, rhs: Counts) -> Counts {
        Counts {
            confirmed: self.confirmed.saturating_sub(rhs.confirmed),
            active: self.active.saturating_sub(rhs.active),
            recovered: self.recovered.saturating_sub(rhs.recovered),
            deaths: self.deaths.saturating_sub(rhs.deaths),
        }
    }
}

impl std::iter::Sum for Counts {
    fn sum<I: Iterator<Item = Counts>>(iter: I) -> Counts {
        iter.fold(Counts::default(), Add::add)
    }
}

/// One normalized row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub date: NaiveDate,
    pub country: String,
    /// Region within the country; [`MAIN_TERRITORY`] for country-level rows.
    pub region: String,
    pub counts: Counts,
    pub origin: Origin,
}
