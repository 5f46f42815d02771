//! End-to-end tests: CSV on disk through the cache, the dashboard and the export.

use hotel_insight::config::DashboardConfig;
use hotel_insight::dashboard::{AnalysisTab, Dashboard, ViewModel, ViewRequest};
use hotel_insight::data::schema::{CategoricalFeature, NumericFeature, UNKNOWN_COUNTRY};
use hotel_insight::data::{DataLoader, DatasetCache, LoaderError};
use hotel_insight::export;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const HEADER: &str = "hotel,is_canceled,country,days_in_waiting_list,total_of_special_requests,\
booking_changes,previous_cancellations,market_segment,deposit_type,customer_type,\
required_car_parking_spaces";

const ROWS: &[&str] = &[
    "Resort Hotel,1,PRT,0,0,0,1,Online TA,Non Refund,Transient,0",
    "Resort Hotel,0,,3,1,1,0,Direct,No Deposit,Transient,1",
    "City Hotel,1,PRT,0,2,0,0,Online TA,Non Refund,Contract,0",
    "City Hotel,1,,10,0,0,2,Groups,No Deposit,Transient-Party,0",
    "City Hotel,0,GBR,0,3,2,0,Direct,No Deposit,Transient,1",
];

fn write_csv(dir: &Path, name: &str, header: &str, rows: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut body = String::from(header);
    for row in rows {
        body.push('\n');
        body.push_str(row);
    }
    body.push('\n');
    fs::write(&path, body).unwrap();
    path
}

fn dashboard_for(path: &Path, top_countries: usize) -> Dashboard {
    let mut cache = DatasetCache::new();
    let dataset = cache.get_or_load(path).unwrap();
    let config = DashboardConfig {
        dataset_path: path.to_path_buf(),
        top_countries,
        ..DashboardConfig::default()
    };
    Dashboard::new(dataset, config)
}

#[test]
fn loads_full_schema_and_fills_unknown_countries() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(dir.path(), "bookings.csv", HEADER, ROWS);

    let mut cache = DatasetCache::new();
    let dataset = cache.get_or_load(&path).unwrap();

    assert_eq!(dataset.raw.height(), 5);
    assert_eq!(dataset.cleaned.height(), 5);
    assert_eq!(dataset.raw.column("country").unwrap().null_count(), 2);

    let country = dataset.cleaned.column("country").unwrap();
    assert_eq!(country.null_count(), 0);
    let unknown = country
        .as_materialized_series()
        .str()
        .unwrap()
        .into_iter()
        .filter(|v| *v == Some(UNKNOWN_COUNTRY))
        .count();
    assert_eq!(unknown, 2);
}

#[test]
fn booking_example_end_to_end() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(dir.path(), "bookings.csv", HEADER, ROWS);
    let dashboard = dashboard_for(&path, 2);

    match dashboard.respond(&ViewRequest::Analysis(AnalysisTab::Target)) {
        ViewModel::Target(summary) => {
            assert_eq!(summary.total, 5);
            assert_eq!(summary.canceled, 3);
            assert!((summary.cancel_rate - 60.0).abs() < 1e-9);
            assert!((summary.check_in_rate - 40.0).abs() < 1e-9);
        }
        other => panic!("unexpected view: {other:?}"),
    }

    match dashboard.respond(&ViewRequest::Analysis(AnalysisTab::Country)) {
        ViewModel::Country(countries) => {
            let got: Vec<(&str, f64)> = countries
                .iter()
                .map(|c| (c.country.as_str(), c.cancel_pct))
                .collect();
            assert_eq!(got, vec![("PRT", 100.0), (UNKNOWN_COUNTRY, 50.0)]);
        }
        other => panic!("unexpected view: {other:?}"),
    }
}

#[test]
fn every_selector_produces_a_chart() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(dir.path(), "bookings.csv", HEADER, ROWS);
    let dashboard = dashboard_for(&path, 10);

    for feature in NumericFeature::ALL {
        let view = dashboard.respond(&ViewRequest::Analysis(AnalysisTab::Numeric(feature)));
        assert!(matches!(view, ViewModel::Numeric(_)), "{feature}: {view:?}");
    }

    for feature in CategoricalFeature::ALL {
        match dashboard.respond(&ViewRequest::Analysis(AnalysisTab::Categorical(feature))) {
            ViewModel::Categorical(breakdown) => {
                for share in &breakdown.categories {
                    let sum = share.canceled_pct + share.not_canceled_pct;
                    assert!((sum - 100.0).abs() < 1e-9, "{feature}: {sum}");
                }
            }
            other => panic!("{feature}: unexpected view {other:?}"),
        }
    }

    match dashboard.respond(&ViewRequest::Analysis(AnalysisTab::Correlation)) {
        ViewModel::Correlation(matrix) => {
            assert!(matrix.len() >= 2);
            for column in &matrix.columns {
                assert_eq!(matrix.get(column, column), Some(1.0));
            }
            assert_eq!(
                matrix.get("booking_changes", "is_canceled"),
                matrix.get("is_canceled", "booking_changes")
            );
        }
        other => panic!("unexpected view: {other:?}"),
    }
}

#[test]
fn cache_reuses_until_invalidated_or_changed() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(dir.path(), "bookings.csv", HEADER, ROWS);
    let mut cache = DatasetCache::new();

    let first = cache.get_or_load(&path).unwrap();
    let second = cache.get_or_load(&path).unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(cache.stats().hits, 1);
    assert_eq!(cache.stats().misses, 1);

    assert!(cache.invalidate(&path));
    assert!(!cache.invalidate(&path));
    let third = cache.get_or_load(&path).unwrap();
    assert!(!std::sync::Arc::ptr_eq(&first, &third));
    assert_eq!(cache.stats().misses, 2);

    // A longer file always changes the fingerprint.
    write_csv(dir.path(), "bookings.csv", HEADER, &[ROWS, &ROWS[..1]].concat());
    let reloaded = cache.get_or_load(&path).unwrap();
    assert_eq!(reloaded.raw.height(), 6);
    assert_eq!(cache.len(), 1);

    cache.clear();
    assert!(cache.is_empty());
}

#[test]
fn missing_file_is_unreadable() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.csv");

    let err = DatasetCache::new().get_or_load(&missing).unwrap_err();
    assert!(matches!(err, LoaderError::Unreadable { .. }), "{err}");

    let err = DataLoader::load_csv(&missing).unwrap_err();
    assert!(matches!(err, LoaderError::Unreadable { .. }), "{err}");
}

#[test]
fn missing_column_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(
        dir.path(),
        "partial.csv",
        "is_canceled,country",
        &["1,PRT", "0,GBR"],
    );

    match DataLoader::load_csv(&path) {
        Err(LoaderError::MissingColumn(column)) => assert_eq!(column, "days_in_waiting_list"),
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn summary_json_lists_every_view() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(dir.path(), "bookings.csv", HEADER, ROWS);
    let dashboard = dashboard_for(&path, 10);
    let out = dir.path().join("out");

    let summary_path = export::write_summary(&dashboard, &out).unwrap();
    assert_eq!(summary_path, out.join(export::SUMMARY_FILE));

    let text = fs::read_to_string(&summary_path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(json["overview"]["view"], "data_overview");
    assert_eq!(json["overview"]["data"]["raw_rows"], 5);

    let views = json["views"].as_array().unwrap();
    assert_eq!(views.len(), AnalysisTab::all().len());
    assert_eq!(views[0]["name"], "target");
    assert_eq!(views[0]["view"]["view"], "target");
    assert_eq!(views[0]["view"]["data"]["cancel_rate"], 60.0);

    let names: Vec<&str> = views.iter().filter_map(|v| v["name"].as_str()).collect();
    assert!(names.contains(&"numeric_booking_changes"));
    assert!(names.contains(&"categorical_deposit_type"));
    assert!(names.contains(&"country"));
    assert!(names.contains(&"correlation"));
}
