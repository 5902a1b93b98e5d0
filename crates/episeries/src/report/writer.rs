//! CSV rendering of reports and the output folder layout.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{DayReport, SeriesReport, country_reports, day_report_from, region_reports};
use crate::dates::continuous_range;
use crate::error::{EpiError, Result};
use crate::graph::AggregationGraph;
use crate::record::Counts;

/// Header of a series report.
pub const SERIES_HEADER: [&str; 11] = [
    "Date",
    "Confirmed",
    "Active",
    "Recovered",
    "Deaths",
    "Confirmed_Change",
    "Active_Change",
    "Recovered_Change",
    "Deaths_Change",
    "Rt",
    "Time_To_Resolve",
];

/// Header of a day report.
pub const DAY_HEADER: [&str; 9] = [
    "CountryRegion",
    "Confirmed",
    "Active",
    "Recovered",
    "Deaths",
    "Confirmed_Change",
    "Active_Change",
    "Recovered_Change",
    "Deaths_Change",
];

/// Where and what to write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Root of the output folder.
    pub output_dir: PathBuf,
    /// Countries to report on; empty means every country.
    pub countries: Vec<String>,
    /// Single day to write a day report for; `None` writes every day.
    pub day: Option<NaiveDate>,
}

impl ReportConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            countries: Vec::new(),
            day: None,
        }
    }
}

/// Number of files written by [`ReportWriter::write_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WriteSummary {
    pub countries: usize,
    pub regions: usize,
    pub days: usize,
}

/// Renders reports as CSV files.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    config: ReportConfig,
}

impl ReportWriter {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Write country, region and day reports for `graph`.
    ///
    /// Files go to `countries/<Country>.csv`,
    /// `countries/<Country>/<Region>.csv` and `days/<yyyy-MM-dd>.csv` under
    /// the output folder. The country filter applies to every layout, and
    /// each country's series is built once for all of its day rows.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use episeries::{AggregationGraph, ReportConfig, ReportWriter};
    /// # fn example(graph: &AggregationGraph) -> episeries::Result<()> {
    /// let writer = ReportWriter::new(ReportConfig::new("reports"));
    /// let summary = writer.write_all(graph)?;
    /// println!("{} country reports", summary.countries);
    /// # Ok(())
    /// # }
    /// ```
    pub fn write_all(&self, graph: &AggregationGraph) -> Result<WriteSummary> {
        if self.config.output_dir.is_file() {
            return Err(EpiError::Config(format!(
                "output path '{}' is a file",
                self.config.output_dir.display()
            )));
        }

        let mut summary = WriteSummary::default();
        let countries_dir = self.config.output_dir.join("countries");
        let reports = country_reports(graph, &self.config.countries)?;

        for report in &reports {
            let name = &report.country;
            let path = countries_dir.join(format!("{}.csv", file_name(name)));
            write_file(&path, |out| write_series(report, out))?;
            summary.countries += 1;

            for region in region_reports(graph, name)? {
                let path = countries_dir
                    .join(file_name(name))
                    .join(format!("{}.csv", file_name(region.name())));
                write_file(&path, |out| write_series(&region, out))?;
                summary.regions += 1;
            }
        }

        let days = match self.config.day {
            Some(day) => vec![day],
            None => {
                let bounds = reports
                    .iter()
                    .flat_map(|r| r.first_day().into_iter().chain(r.last_day()));
                match continuous_range(bounds) {
                    Ok(range) => range.into_iter().collect(),
                    Err(_) => Vec::new(),
                }
            }
        };

        let days_dir = self.config.output_dir.join("days");
        for day in days {
            let report = day_report_from(&reports, day);
            let path = days_dir.join(format!("{}.csv", day.format("%Y-%m-%d")));
            write_file(&path, |out| write_day(&report, out))?;
            summary.days += 1;
        }

        debug!(?summary, dir = %self.config.output_dir.display(), "wrote reports");
        Ok(summary)
    }
}

/// Write a series report as CSV.
pub fn write_series<W: Write>(report: &SeriesReport, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(SERIES_HEADER)?;

    for entry in &report.entries {
        let mut row = vec![entry.date.format("%d-%m-%Y").to_string()];
        row.extend(count_cells(&entry.totals));
        row.extend(count_cells(&entry.change));
        row.push(entry.rt.map(|rt| format!("{rt:011.8}")).unwrap_or_default());
        row.push(
            entry
                .time_to_resolve
                .map(|days| days.to_string())
                .unwrap_or_default(),
        );
        writer.write_record(&row)?;
    }

    writer.flush().map_err(|e| EpiError::Csv(e.into()))?;
    Ok(())
}

/// Write a day report as CSV.
pub fn write_day<W: Write>(report: &DayReport, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(DAY_HEADER)?;

    for row in &report.rows {
        let mut cells = vec![row.country.clone()];
        cells.extend(count_cells(&row.totals));
        cells.extend(count_cells(&row.change));
        writer.write_record(&cells)?;
    }

    writer.flush().map_err(|e| EpiError::Csv(e.into()))?;
    Ok(())
}

fn count_cells(counts: &Counts) -> [String; 4] {
    [
        counts.confirmed.to_string(),
        counts.active.to_string(),
        counts.recovered.to_string(),
        counts.deaths.to_string(),
    ]
}

/// Node name usable as a file name.
fn file_name(name: &str) -> String {
    name.replace(['/', '\\'], "_")
}

fn write_file<F>(path: &Path, render: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<()>,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| EpiError::io(parent, e))?;
    }

    let file = File::create(path).map_err(|e| EpiError::io(path, e))?;
    let mut out = BufWriter::new(file);
    render(&mut out)?;
    out.flush().map_err(|e| EpiError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::DayRow;
    use crate::series::DailyEntry;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 3, d).unwrap()
    }

    #[test]
    fn test_series_csv_layout() {
        let report = SeriesReport {
            country: "Italy".to_string(),
            region: None,
            entries: vec![
                DailyEntry {
                    date: date(1),
                    totals: Counts::new(10, 7, 2, 1),
                    change: Counts::new(10, 7, 2, 1),
                    rt: None,
                    time_to_resolve: Some(3),
                },
                DailyEntry {
                    date: date(2),
                    totals: Counts::new(15, 12, 2, 1),
                    change: Counts::new(5, 5, 0, 0),
                    rt: Some(641.0 / 67692.0),
                    time_to_resolve: None,
                },
            ],
        };

        let mut out = Vec::new();
        write_series(&report, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], SERIES_HEADER.join(","));
        assert_eq!(lines[1], "01-03-2020,10,7,2,1,10,7,2,1,,3");
        assert_eq!(lines[2], "02-03-2020,15,12,2,1,5,5,0,0,00.00946936,");
    }

    #[test]
    fn test_day_csv_quotes_commas() {
        let report = DayReport {
            date: date(1),
            rows: vec![DayRow {
                country: "Bonaire, Sint Eustatius and Saba".to_string(),
                totals: Counts::new(1, 1, 0, 0),
                change: Counts::new(1, 1, 0, 0),
            }],
        };

        let mut out = Vec::new();
        write_day(&report, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], DAY_HEADER.join(","));
        assert_eq!(lines[1], "\"Bonaire, Sint Eustatius and Saba\",1,1,0,0,1,1,0,0");
    }

    #[test]
    fn test_output_dir_must_not_be_a_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let writer = ReportWriter::new(ReportConfig::new(file.path()));
        assert!(matches!(
            writer.write_all(&AggregationGraph::new()),
            Err(EpiError::Config(_))
        ));
    }

    #[test]
    fn test_file_name_strips_separators() {
        assert_eq!(file_name("A/B"), "A_B");
        assert_eq!(file_name("Korea, South"), "Korea, South");
    }
}
