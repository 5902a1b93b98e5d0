//! Reports built from the aggregation graph.
//!
//! Two layouts exist: a per-node series over time ([`SeriesReport`]) used
//! for countries and their regions, and a per-day snapshot across countries
//! ([`DayReport`]).

mod writer;

pub use writer::{
    DAY_HEADER, ReportConfig, ReportWriter, SERIES_HEADER, WriteSummary, write_day, write_series,
};

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{EpiError, Result};
use crate::graph::{AggregationGraph, NodeId};
use crate::record::{Counts, MAIN_TERRITORY};
use crate::series::{DailyEntry, build_series};

/// Series of one country or region.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesReport {
    pub country: String,
    /// `None` for a country-level report.
    pub region: Option<String>,
    pub entries: Vec<DailyEntry>,
}

impl SeriesReport {
    /// Name of the node the report covers.
    pub fn name(&self) -> &str {
        self.region.as_deref().unwrap_or(&self.country)
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        self.entries.first().map(|e| e.date)
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.entries.last().map(|e| e.date)
    }

    pub fn entry(&self, date: NaiveDate) -> Option<&DailyEntry> {
        let first = self.first_day()?;
        let offset = usize::try_from((date - first).num_days()).ok()?;
        self.entries.get(offset)
    }
}

/// One country on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayRow {
    pub country: String,
    pub totals: Counts,
    pub change: Counts,
}

/// Every country with data on one day.
#[derive(Debug, Clone, Serialize)]
pub struct DayReport {
    pub date: NaiveDate,
    pub rows: Vec<DayRow>,
}

/// Series report for `country`.
pub fn country_report(graph: &AggregationGraph, country: &str) -> Result<SeriesReport> {
    let id = graph
        .country(country)
        .ok_or_else(|| EpiError::NotFound(format!("country '{country}'")))?;

    Ok(SeriesReport {
        country: country.to_string(),
        region: None,
        entries: graph.build_series(id)?,
    })
}

/// Series report for one region of `country`.
pub fn region_report(graph: &AggregationGraph, country: &str, region: &str) -> Result<SeriesReport> {
    let id = graph
        .region(country, region)
        .ok_or_else(|| EpiError::NotFound(format!("region '{region}' of '{country}'")))?;

    Ok(SeriesReport {
        country: country.to_string(),
        region: Some(region.to_string()),
        entries: graph.build_series(id)?,
    })
}

/// Series reports for every region of `country`.
///
/// `Main territory` is left out when the country has other regions, and so
/// is any region left with no days after source priority.
pub fn region_reports(graph: &AggregationGraph, country: &str) -> Result<Vec<SeriesReport>> {
    let id = graph
        .country(country)
        .ok_or_else(|| EpiError::NotFound(format!("country '{country}'")))?;

    let regions = graph.region_totals(id);
    let has_regions = regions
        .iter()
        .any(|(region, _)| graph.name(*region) != MAIN_TERRITORY);

    let mut reports = Vec::new();
    for (region, daily) in regions {
        let name = graph.name(region);
        if (has_regions && name == MAIN_TERRITORY) || daily.is_empty() {
            continue;
        }
        reports.push(SeriesReport {
            country: country.to_string(),
            region: Some(name),
            entries: build_series(&daily)?,
        });
    }

    Ok(reports)
}

/// Series reports of the countries named in `filter`, or of every country
/// when `filter` is empty. Countries with no days are left out.
pub fn country_reports(graph: &AggregationGraph, filter: &[String]) -> Result<Vec<SeriesReport>> {
    let mut reports = Vec::new();
    for country in selected_countries(graph, filter) {
        let daily = graph.daily_totals(country);
        if daily.is_empty() {
            continue;
        }
        reports.push(SeriesReport {
            country: graph.name(country),
            region: None,
            entries: build_series(&daily)?,
        });
    }
    Ok(reports)
}

/// Totals and changes of every country whose series covers `date`.
pub fn day_report(graph: &AggregationGraph, date: NaiveDate) -> Result<DayReport> {
    Ok(day_report_from(&country_reports(graph, &[])?, date))
}

/// Day report for `date` read from already built country reports.
pub fn day_report_from(reports: &[SeriesReport], date: NaiveDate) -> DayReport {
    let rows = reports
        .iter()
        .filter_map(|report| {
            report.entry(date).map(|entry| DayRow {
                country: report.country.clone(),
                totals: entry.totals,
                change: entry.change,
            })
        })
        .collect();

    DayReport { date, rows }
}

/// Node ids of the countries to report on; every country when `filter` is empty.
fn selected_countries(graph: &AggregationGraph, filter: &[String]) -> Vec<NodeId> {
    graph
        .countries()
        .into_iter()
        .filter(|c| filter.is_empty() || filter.contains(&graph.name(*c)))
        .collect()
}
