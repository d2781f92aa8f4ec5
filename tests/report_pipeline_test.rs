// End-to-end tests of the load -> merge -> filter -> aggregate/export pipeline
// against real files on disk

mod common;

use chrono::NaiveDate;
use common::{Fixture, AUSTIN_CSV, LATIN1_HEADER_CSV};
use rust_decimal::Decimal;
use waste_dashboard_service::cache::DatasetCache;
use waste_dashboard_service::export::parse_canonical_csv;
use waste_dashboard_service::models::{SourceStatus, WasteRecord};
use waste_dashboard_service::table::{distinct_cities, filter_by_city, merge};
use waste_dashboard_service::{aggregate, ingest};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn kg(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn test_austin_scenario() {
    let fixture = Fixture::two_cities();
    let service = fixture.service();

    let summary = service.summary("Austin").unwrap();
    assert_eq!(summary.total_kg, kg("30"));
    assert_eq!(summary.mean_daily_kg, Some(kg("15")));
    assert_eq!(summary.distinct_days, 2);

    let monthly = service.monthly("Austin").unwrap();
    assert_eq!(monthly.len(), 2);
    assert_eq!(monthly[0].period_start, ymd(2021, 1, 1));
    assert_eq!(monthly[0].total_kg, kg("10"));
    assert_eq!(monthly[1].period_start, ymd(2021, 2, 1));
    assert_eq!(monthly[1].total_kg, kg("20"));
}

#[test]
fn test_negative_quantities_survive_loading() {
    let fixture = Fixture::two_cities();
    let records = fixture.service().select("Ballarat").unwrap();

    assert_eq!(
        records,
        vec![
            WasteRecord::new(ymd(2014, 12, 31), kg("5.5"), "Ballarat"),
            WasteRecord::new(ymd(2015, 1, 1), kg("-2"), "Ballarat"),
            WasteRecord::new(ymd(2015, 1, 1), kg("4"), "Ballarat"),
        ]
    );
}

#[test]
fn test_yearly_buckets_conserve_total() {
    let fixture = Fixture::two_cities();
    let service = fixture.service();

    for city in service.cities() {
        let summary = service.summary(&city).unwrap();
        let yearly: Decimal = service
            .yearly(&city)
            .unwrap()
            .iter()
            .map(|b| b.total_kg)
            .sum();
        assert_eq!(yearly, summary.total_kg, "mass not conserved for {city}");
    }
}

#[test]
fn test_fractional_quantities_conserve_total() {
    let fixture = Fixture::new(&[(
        "Ballarat",
        "date,waste_kg\n\
         2020-03-01,25.51\n\
         2021-06-01,76.1\n\
         2021-06-02,65.16\n\
         2020-03-02,9.39\n",
    )]);
    let service = fixture.service();

    let summary = service.summary("Ballarat").unwrap();
    let yearly: Decimal = service
        .yearly("Ballarat")
        .unwrap()
        .iter()
        .map(|b| b.total_kg)
        .sum();
    let monthly: Decimal = service
        .monthly("Ballarat")
        .unwrap()
        .iter()
        .map(|b| b.total_kg)
        .sum();

    assert_eq!(summary.total_kg, kg("176.16"));
    assert_eq!(yearly, summary.total_kg);
    assert_eq!(monthly, summary.total_kg);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["total_kg"], 176.16);
}

#[test]
fn test_distinct_days_dedupes_within_city() {
    let fixture = Fixture::two_cities();
    let summary = fixture.service().summary("Ballarat").unwrap();

    assert_eq!(summary.record_count, 3);
    assert_eq!(summary.distinct_days, 2);
}

#[test]
fn test_missing_date_column_warns_once_and_others_still_load() {
    let fixture = Fixture::new(&[
        ("Austin", AUSTIN_CSV),
        ("Nowhere", "day,waste_kg\n2021-01-01,10\n"),
    ]);
    let service = fixture.service();

    let warnings = service.warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains(&fixture.sources[1].path.display().to_string()));

    assert_eq!(service.summary("Austin").unwrap().record_count, 2);
    let nowhere = service.summary("Nowhere").unwrap();
    assert_eq!(nowhere.record_count, 0);
    assert_eq!(nowhere.mean_daily_kg, None);
}

#[test]
fn test_unreadable_source_is_skipped() {
    let mut fixture = Fixture::two_cities();
    fixture.sources.push(waste_dashboard_service::cache::SourceSpec::new(
        "Ghost",
        "/definitely/not/here.csv",
    ));
    let service = fixture.service();

    let reports = service.source_reports();
    assert_eq!(reports.len(), 3);
    assert_eq!(reports[2].status, SourceStatus::Unreadable);
    assert_eq!(service.cities(), vec!["Austin", "Ballarat", "Ghost"]);

    let export = service.export_csv("Ghost").unwrap();
    assert_eq!(export.bytes, b"Date,Waste_kg,City\n");
    assert!(service.yearly("Ghost").unwrap().is_empty());
}

#[test]
fn test_undecodable_header_is_skipped_with_warning() {
    let fixture = Fixture::from_bytes(&[
        ("Austin", AUSTIN_CSV.as_bytes()),
        ("Latin", LATIN1_HEADER_CSV),
    ]);
    let service = fixture.service();

    let reports = service.source_reports();
    assert_eq!(reports[1].status, SourceStatus::Unreadable);

    let warnings = service.warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains(&fixture.sources[1].path.display().to_string()));

    assert_eq!(service.summary("Austin").unwrap().record_count, 2);
    assert_eq!(service.summary("Latin").unwrap().record_count, 0);
}

#[test]
fn test_filter_partition_reproduces_unified_table() {
    let fixture = Fixture::two_cities();
    let cache = DatasetCache::new(fixture.sources.clone());
    let unified = cache.unified();

    let rebuilt = merge(
        distinct_cities(unified)
            .iter()
            .map(|city| filter_by_city(unified, city)),
    );

    assert_eq!(rebuilt.len(), unified.len());
    for record in unified {
        assert!(rebuilt.contains(record));
    }
}

#[test]
fn test_unified_is_concatenation_of_sources() {
    let fixture = Fixture::two_cities();
    let cache = DatasetCache::new(fixture.sources.clone());

    let per_source: Vec<Vec<WasteRecord>> = fixture
        .sources
        .iter()
        .map(|spec| ingest::load_from_path(&spec.path, &spec.city).unwrap().records)
        .collect();

    assert_eq!(cache.unified(), merge(per_source).as_slice());
}

#[test]
fn test_export_round_trip() {
    let fixture = Fixture::two_cities();
    let service = fixture.service();

    for city in service.cities() {
        let export = service.export_csv(&city).unwrap();
        assert_eq!(export.file_name, format!("data_sampah_{city}.csv"));

        let parsed = parse_canonical_csv(&export.bytes).unwrap();
        assert_eq!(parsed, service.select(&city).unwrap());
    }
}

#[test]
fn test_records_sorted_by_date() {
    let fixture = Fixture::new(&[(
        "Austin",
        "Date,Waste_kg\n2021-03-01,3\n2021-01-01,1\n2021-02-01,2\n",
    )]);
    let records = fixture.service().records("Austin").unwrap();

    let dates: Vec<_> = records.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![ymd(2021, 1, 1), ymd(2021, 2, 1), ymd(2021, 3, 1)]);
}

#[test]
fn test_metadata_reports_date_ranges() {
    let fixture = Fixture::two_cities();
    let metadata = fixture.service().metadata();

    assert_eq!(metadata.sources.len(), 2);
    assert_eq!(metadata.sources[0].first_date, Some(ymd(2021, 1, 1)));
    assert_eq!(metadata.sources[0].last_date, Some(ymd(2021, 2, 1)));
    assert_eq!(metadata.sources[0].rows_read, 3);
    assert_eq!(metadata.sources[0].rows_kept, 2);
    assert!(metadata.columns.iter().any(|c| c.name == "Waste_kg"));
}

#[test]
fn test_empty_source_file_has_no_warning() {
    let fixture = Fixture::new(&[("Austin", "")]);
    let service = fixture.service();

    assert!(service.warnings().is_empty());
    let summary = service.summary("Austin").unwrap();
    assert!(summary.total_kg.is_zero());
    assert_eq!(summary.distinct_days, 0);
    assert!(aggregate::bucket_by_month(&service.select("Austin").unwrap()).is_empty());
}
