//! Integration tests for episeries.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tempfile::TempDir;

use episeries::{
    Engine, EngineConfig, EpiError, MAIN_TERRITORY, ReportConfig, SchemaId,
};

const V1_HEADER: &str = "Province/State,Country/Region,Last Update,Confirmed,Deaths,Recovered";
const V4_HEADER: &str = "FIPS,Admin2,Province_State,Country_Region,Last_Update,Lat,Long_,Confirmed,Deaths,Recovered,Active,Combined_Key,Incidence_Rate,Case-Fatality_Ratio";
const YANDEX_HEADER: &str = "Дата,Регион,Заражений,Выздоровлений,Смертей,Смертей за день,Заражений за день,Выздоровлений за день";

/// Helper to write a source file into `dir`.
fn write_source(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write source file");
    path
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn single_worker() -> EngineConfig {
    EngineConfig {
        workers: 1,
        ..EngineConfig::default()
    }
}

// =============================================================================
// Detection
// =============================================================================

#[test]
fn test_detect_each_schema() {
    let dir = TempDir::new().unwrap();
    let v1 = write_source(dir.path(), "01-22-2020.csv", &format!("{V1_HEADER}\nHubei,Mainland China,1/22/2020 17:00,444,17,28\n"));
    let v4 = write_source(dir.path(), "06-01-2020.csv", &format!("{V4_HEADER}\n,,,Italy,2020-06-01 02:33:00,41.8,12.5,233197,33475,158355,41367,Italy,385.6,14.3\n"));
    let yandex = write_source(dir.path(), "russia.csv", &format!("{YANDEX_HEADER}\n22.03.2020,Москва,191,7,1,0,54,2\n"));

    let engine = Engine::new();

    let detection = engine.detect(&v1).unwrap();
    assert_eq!(detection.schema, SchemaId::JHopkinsV1);
    assert_eq!(detection.file_date, Some(date(2020, 1, 22)));
    assert_eq!(detection.source.row_count, 1);
    assert!(detection.source.hash.starts_with("sha256:"));

    assert_eq!(engine.detect(&v4).unwrap().schema, SchemaId::JHopkinsV4);

    let detection = engine.detect(&yandex).unwrap();
    assert_eq!(detection.schema, SchemaId::YandexRussia);
    assert_eq!(detection.file_date, None);
}

#[test]
fn test_unknown_header_aborts_ingest() {
    let dir = TempDir::new().unwrap();
    let path = write_source(dir.path(), "other.csv", "a,b,c\n1,2,3\n");

    let engine = Engine::with_config(single_worker());
    match engine.ingest(&[path]) {
        Err(EpiError::UnknownHeader { header, .. }) => assert_eq!(header, "a,b,c"),
        other => panic!("expected UnknownHeader, got {other:?}"),
    }
}

#[test]
fn test_malformed_count_aborts_ingest() {
    let dir = TempDir::new().unwrap();
    let path = write_source(
        dir.path(),
        "01-22-2020.csv",
        &format!("{V1_HEADER}\nHubei,Mainland China,1/22/2020 17:00,many,17,28\n"),
    );

    let engine = Engine::with_config(single_worker());
    assert!(matches!(
        engine.ingest(&[path]),
        Err(EpiError::MalformedField { .. })
    ));
}

// =============================================================================
// Ingest and series
// =============================================================================

#[test]
fn test_schema_counts_are_ordered_by_schema() {
    let dir = TempDir::new().unwrap();
    let mut files = Vec::new();
    for d in 1..=4 {
        files.push(write_source(
            dir.path(),
            &format!("06-0{d}-2020.csv"),
            &format!("{V4_HEADER}\n,,,Italy,2020-06-0{d} 02:33:00,41.8,12.5,{d}00,0,0,0,Italy,1.0,0.0\n"),
        ));
    }
    files.push(write_source(dir.path(), "03-01-2020.csv", &format!("{V1_HEADER}\n,Italy,3/1/2020 10:00,10,0,0\n")));

    let engine = Engine::with_config(EngineConfig {
        workers: 4,
        ..EngineConfig::default()
    });
    let summary = engine.ingest(&files).unwrap();

    let schemas: Vec<(SchemaId, usize)> = summary.schemas.into_iter().collect();
    assert_eq!(schemas, vec![(SchemaId::JHopkinsV1, 1), (SchemaId::JHopkinsV4, 4)]);
}

#[test]
fn test_daily_files_build_continuous_series() {
    let dir = TempDir::new().unwrap();
    let files = vec![
        write_source(dir.path(), "03-01-2020.csv", &format!("{V1_HEADER}\n,Italy,3/1/2020 10:00,10,0,0\n")),
        write_source(dir.path(), "03-02-2020.csv", &format!("{V1_HEADER}\n,Italy,3/2/2020 10:00,15,1,0\n")),
        // no file for 03-03
        write_source(dir.path(), "03-04-2020.csv", &format!("{V1_HEADER}\n,Italy,3/4/2020 10:00,30,2,4\n")),
    ];

    let engine = Engine::new();
    let summary = engine.ingest(&files).unwrap();
    assert_eq!(summary.files, 3);
    assert_eq!(summary.records, 3);
    assert_eq!(summary.schemas[&SchemaId::JHopkinsV1], 3);

    let report = engine.series("Italy", None).unwrap();
    let entries = &report.entries;
    assert_eq!(entries.len(), 4);

    assert_eq!(entries[0].change.confirmed, 10);
    assert_eq!(entries[1].change.confirmed, 5);
    assert_eq!(entries[1].totals.active, 14);

    assert_eq!(entries[2].date, date(2020, 3, 3));
    assert_eq!(entries[2].totals, entries[1].totals);
    assert_eq!(entries[2].change.confirmed, 0);
    assert_eq!(entries[2].change.deaths, 0);

    assert_eq!(entries[3].change.confirmed, 15);
    assert_eq!(entries[3].totals.active, 24);
}

#[test]
fn test_file_name_date_overrides_last_update() {
    let dir = TempDir::new().unwrap();
    // Last Update lags a day behind the file name
    let path = write_source(
        dir.path(),
        "03-02-2020.csv",
        &format!("{V1_HEADER}\n,Italy,3/1/2020 23:00,10,0,0\n"),
    );

    let engine = Engine::new();
    engine.ingest(&[&path]).unwrap();
    let report = engine.series("Italy", None).unwrap();
    assert_eq!(report.first_day(), Some(date(2020, 3, 2)));

    let engine = Engine::with_config(EngineConfig {
        file_date_override: false,
        ..EngineConfig::default()
    });
    engine.ingest(&[&path]).unwrap();
    let report = engine.series("Italy", None).unwrap();
    assert_eq!(report.first_day(), Some(date(2020, 3, 1)));
}

#[test]
fn test_names_are_normalized_and_others_excluded() {
    let dir = TempDir::new().unwrap();
    let path = write_source(
        dir.path(),
        "02-15-2020.csv",
        &format!(
            "{V1_HEADER}\n\
             Hubei,Mainland China,2/15/2020 10:00,100,1,2\n\
             Beijing,Mainland China,2/15/2020 10:00,10,0,1\n\
             Hong Kong,Hong Kong,2/15/2020 10:00,5,0,0\n\
             Diamond Princess cruise ship,Others,2/15/2020 10:00,285,0,0\n\
             \"King County, WA\",US,2/15/2020 10:00,1,0,0\n"
        ),
    );

    let engine = Engine::new();
    let summary = engine.ingest(&[path]).unwrap();
    assert_eq!(summary.records, 4);
    assert_eq!(summary.excluded, 1);

    let graph = engine.graph();
    assert!(graph.country("Others").is_none());
    assert!(graph.region("China", "Hong Kong").is_some());
    assert!(graph.region("US", "Washington").is_some());

    let china = engine.series("China", None).unwrap();
    assert_eq!(china.entries[0].totals.confirmed, 115);
}

#[test]
fn test_yandex_replaces_jhopkins_for_russia() {
    let dir = TempDir::new().unwrap();
    let files = vec![
        write_source(dir.path(), "03-21-2020.csv", &format!("{V1_HEADER}\n,Russia,3/21/2020 10:00,253,1,9\n")),
        write_source(dir.path(), "03-22-2020.csv", &format!("{V1_HEADER}\n,Russia,3/22/2020 10:00,306,1,9\n")),
        write_source(
            dir.path(),
            "russia.csv",
            &format!(
                "{YANDEX_HEADER}\n\
                 22.03.2020,Москва,191,7,1,0,54,2\n\
                 22.03.2020,Санкт-Петербург,40,3,0,0,5,0\n"
            ),
        ),
    ];

    let engine = Engine::new();
    engine.ingest(&files).unwrap();

    let russia = engine.series("Russia", None).unwrap();
    assert_eq!(russia.entries.len(), 2);
    assert_eq!(russia.entries[0].totals.confirmed, 253);
    // Yandex regions win the 22nd; the country-level row is dropped
    assert_eq!(russia.entries[1].totals.confirmed, 231);
    assert_eq!(russia.entries[1].totals.recovered, 10);

    let regions = episeries::report::region_reports(engine.graph(), "Russia").unwrap();
    let names: Vec<&str> = regions.iter().map(|r| r.name()).collect();
    assert!(!names.contains(&MAIN_TERRITORY));
    assert_eq!(names.len(), 2);
}

#[test]
fn test_parallel_ingest_matches_sequential() {
    let dir = TempDir::new().unwrap();
    let files: Vec<PathBuf> = (1..=20)
        .map(|d| {
            write_source(
                dir.path(),
                &format!("03-{d:02}-2020.csv"),
                &format!(
                    "{V1_HEADER}\n\
                     Lombardy,Italy,3/{d}/2020 10:00,{},0,0\n\
                     Veneto,Italy,3/{d}/2020 10:00,{},0,0\n",
                    d * 10,
                    d * 3
                ),
            )
        })
        .collect();

    let sequential = Engine::with_config(single_worker());
    sequential.ingest(&files).unwrap();

    let parallel = Engine::with_config(EngineConfig {
        workers: 8,
        ..EngineConfig::default()
    });
    parallel.ingest(&files).unwrap();

    let a = sequential.series("Italy", None).unwrap();
    let b = parallel.series("Italy", None).unwrap();
    assert_eq!(a.entries, b.entries);
    assert_eq!(b.entries.len(), 20);
    assert_eq!(b.entries[19].totals.confirmed, 260);
}

// =============================================================================
// Reports
// =============================================================================

#[test]
fn test_write_reports() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input");
    fs::create_dir(&input).unwrap();
    let files = vec![
        write_source(&input, "03-01-2020.csv", &format!("{V1_HEADER}\n,France,3/1/2020 10:00,100,2,10\nMartinique,France,3/1/2020 10:00,1,0,0\n")),
        write_source(&input, "03-02-2020.csv", &format!("{V1_HEADER}\n,France,3/2/2020 10:00,130,3,12\nMartinique,France,3/2/2020 10:00,2,0,0\n")),
    ];

    let engine = Engine::new();
    engine.ingest(&files).unwrap();

    let output = dir.path().join("reports");
    let written = engine.write_reports(ReportConfig::new(&output)).unwrap();
    assert_eq!(written.countries, 1);
    assert_eq!(written.regions, 1);
    assert_eq!(written.days, 2);

    let country = fs::read_to_string(output.join("countries").join("France.csv")).unwrap();
    let lines: Vec<&str> = country.lines().collect();
    assert_eq!(
        lines[0],
        "Date,Confirmed,Active,Recovered,Deaths,Confirmed_Change,Active_Change,Recovered_Change,Deaths_Change,Rt,Time_To_Resolve"
    );
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("01-03-2020,101,89,10,2,101,89,10,2,"));
    assert!(lines[2].starts_with("02-03-2020,132,117,12,3,31,28,2,1,"));

    assert!(output.join("countries").join("France").join("Martinique.csv").exists());
    assert!(!output.join("countries").join("France").join(format!("{MAIN_TERRITORY}.csv")).exists());

    let day = fs::read_to_string(output.join("days").join("2020-03-02.csv")).unwrap();
    let lines: Vec<&str> = day.lines().collect();
    assert_eq!(
        lines[0],
        "CountryRegion,Confirmed,Active,Recovered,Deaths,Confirmed_Change,Active_Change,Recovered_Change,Deaths_Change"
    );
    assert_eq!(lines[1], "France,132,117,12,3,31,28,2,1");
}

#[test]
fn test_report_filters() {
    let dir = TempDir::new().unwrap();
    let path = write_source(
        dir.path(),
        "03-01-2020.csv",
        &format!("{V1_HEADER}\n,Italy,3/1/2020 10:00,1,0,0\n,Spain,3/1/2020 10:00,1,0,0\n"),
    );

    let engine = Engine::new();
    engine.ingest(&[path]).unwrap();

    let output = dir.path().join("reports");
    let written = engine
        .write_reports(ReportConfig {
            output_dir: output.clone(),
            countries: vec!["Spain".to_string()],
            day: Some(date(2020, 3, 1)),
        })
        .unwrap();

    assert_eq!(written.countries, 1);
    assert_eq!(written.days, 1);
    assert!(output.join("countries").join("Spain.csv").exists());
    assert!(!output.join("countries").join("Italy.csv").exists());

    let day = fs::read_to_string(output.join("days").join("2020-03-01.csv")).unwrap();
    let rows: Vec<&str> = day.lines().skip(1).collect();
    assert_eq!(rows, vec!["Spain,1,1,0,0,1,1,0,0"]);
}

#[test]
fn test_day_reports_span_country_ranges() {
    let dir = TempDir::new().unwrap();
    let files = vec![
        write_source(dir.path(), "03-01-2020.csv", &format!("{V1_HEADER}\n,Italy,3/1/2020 10:00,5,0,0\n")),
        write_source(dir.path(), "03-03-2020.csv", &format!("{V1_HEADER}\n,Italy,3/3/2020 10:00,9,0,0\n,Spain,3/3/2020 10:00,2,0,0\n")),
    ];

    let engine = Engine::new();
    engine.ingest(&files).unwrap();

    let output = dir.path().join("reports");
    let written = engine.write_reports(ReportConfig::new(&output)).unwrap();
    assert_eq!(written.days, 3);

    let read_rows = |name: &str| -> Vec<String> {
        fs::read_to_string(output.join("days").join(name))
            .unwrap()
            .lines()
            .skip(1)
            .map(str::to_string)
            .collect()
    };
    assert_eq!(read_rows("2020-03-02.csv"), vec!["Italy,5,5,0,0,0,0,0,0"]);
    assert_eq!(
        read_rows("2020-03-03.csv"),
        vec!["Italy,9,9,0,0,4,4,0,0", "Spain,2,2,0,0,2,2,0,0"]
    );
}
