//! Date parsing for the formats seen in source files, and gap-free ranges.

use chrono::naive::NaiveDateDaysIterator;
use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{EpiError, Result};

/// Returned for empty date text. Not a real calendar date.
pub const NO_DATE: NaiveDate = NaiveDate::MIN;

/// Date-only patterns.
const DATE_FORMATS: &[&str] = &[
    // 03-22-2020, daily report file names
    "%m-%d-%Y",
    // 22.03.2020
    "%d.%m.%Y",
    // 2020-03-22
    "%Y-%m-%d",
];

/// Date-time patterns; the time of day is discarded.
///
/// `%Y` accepts fewer than four digits, so the two-digit year patterns must
/// come before their four-digit counterparts.
const DATETIME_FORMATS: &[&str] = &[
    // 3/22/20 23:45
    "%m/%d/%y %H:%M",
    // 3/22/2020 23:45
    "%m/%d/%Y %H:%M",
    // 2020-03-22T23:45:00
    "%Y-%m-%dT%H:%M:%S",
    // 2020-03-22 23:45:00
    "%Y-%m-%d %H:%M:%S",
];

/// Parse a date in any of the supported formats.
///
/// Empty text yields [`NO_DATE`]. Text matching no format is an
/// [`EpiError::UnsupportedDateFormat`].
pub fn parse_date(text: &str) -> Result<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(NO_DATE);
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(datetime.date());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Ok(date);
        }
    }

    Err(EpiError::UnsupportedDateFormat {
        value: text.to_string(),
    })
}

/// Like [`parse_date`], treating a missing value as empty text.
pub fn parse_optional_date(text: Option<&str>) -> Result<NaiveDate> {
    parse_date(text.unwrap_or(""))
}

/// Returns true if `date` is the "no date supplied" sentinel.
pub fn is_no_date(date: NaiveDate) -> bool {
    date == NO_DATE
}

/// Iterator over the days of a [`DateRange`].
pub type DateRangeIter = std::iter::Take<NaiveDateDaysIterator>;

/// Inclusive, one-day-step range between two dates.
///
/// Every call to [`DateRange::iter`] starts a fresh traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Range from `start` to `end`, both included. Empty if `end < start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the range.
    pub fn len(&self) -> usize {
        let days = (self.end - self.start).num_days() + 1;
        days.max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `date` falls inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Position of `date` in the range.
    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.contains(date)
            .then(|| (date - self.start).num_days() as usize)
    }

    /// Iterate the days of the range in order.
    pub fn iter(&self) -> DateRangeIter {
        self.start.iter_days().take(self.len())
    }
}

impl IntoIterator for DateRange {
    type Item = NaiveDate;
    type IntoIter = DateRangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.start.iter_days().take(self.len())
    }
}

/// Continuous range covering the earliest to the latest of `dates`.
///
/// Fails with [`EpiError::EmptyInput`] when `dates` is empty.
pub fn continuous_range<I>(dates: I) -> Result<DateRange>
where
    I: IntoIterator<Item = NaiveDate>,
{
    let mut bounds: Option<(NaiveDate, NaiveDate)> = None;

    for date in dates {
        bounds = Some(match bounds {
            Some((min, max)) => (min.min(date), max.max(date)),
            None => (date, date),
        });
    }

    bounds
        .map(|(min, max)| DateRange::new(min, max))
        .ok_or_else(|| EpiError::EmptyInput("continuous range over no dates".to_string()))
}
