//! End-to-end tests: CSV on disk through every view and both report formats.

use launchdash::analysis::{
    filter_records, geo_points, monthly_trend, payload_bins, site_success, summarize,
    PAYLOAD_BIN_COUNT,
};
use launchdash::models::{LaunchClass, SiteBreakdown};
use launchdash::report::{
    build_dashboard, generate_json_report, generate_markdown_report, DashboardOptions,
};
use launchdash::{DataLoadError, Dataset, FilterSelection, PayloadRange, SiteSelector};
use std::io::Write;
use tempfile::NamedTempFile;

const HEADER: &str = "FlightNumber,Date,BoosterVersion,PayloadMass,Orbit,LaunchSite,Outcome,Flights,GridFins,Reused,Legs,LandingPad,Block,ReusedCount,Serial,Longitude,Latitude,Class";

const ROWS: &[&str] = &[
    "1,2010-06-04,Falcon 9,6104.959412,LEO,CCAFS SLC 40,None None,1,False,False,False,,1.0,0,B0003,-80.577366,28.561857,0",
    "2,2012-05-22,Falcon 9,525.0,LEO,CCAFS SLC 40,None None,1,False,False,False,,1.0,0,B0005,-80.577366,28.561857,0",
    "3,2013-03-01,Falcon 9,677.0,ISS,CCAFS SLC 40,None None,1,False,False,False,,1.0,0,B0007,-80.577366,28.561857,0",
    "4,2013-09-29,Falcon 9,500.0,PO,VAFB SLC 4E,False Ocean,1,False,False,False,,1.0,0,B1003,-120.610829,34.632093,0",
    "5,2013-12-03,Falcon 9,3170.0,GTO,CCAFS SLC 40,None None,1,False,False,False,,1.0,0,B1004,-80.577366,28.561857,0",
    "6,2014-01-06,Falcon 9,3325.0,GTO,CCAFS SLC 40,None None,1,False,False,False,,1.0,0,B1005,-80.577366,28.561857,0",
    "7,2014-04-18,Falcon 9,2296.0,ISS,CCAFS SLC 40,True Ocean,1,False,False,True,,1.0,0,B1006,-80.577366,28.561857,1",
    "8,2014-07-14,Falcon 9,1316.0,LEO,CCAFS SLC 40,True Ocean,1,False,False,True,,1.0,0,B1007,-80.577366,28.561857,1",
    "9,2017-02-19,Falcon 9,2490.0,ISS,KSC LC 39A,True RTLS,1,True,False,True,LZ-1,3.0,0,B1031,-80.603956,28.608058,1",
    "10,2017-03-16,Falcon 9,5600.0,GTO,KSC LC 39A,None None,1,False,False,False,,3.0,0,B1030,-80.603956,28.608058,0",
    "11,2017-03-30,Falcon 9,5300.0,GTO,KSC LC 39A,True ASDS,2,True,True,True,5e9e3032383ecb6bb234e7ca,3.0,1,B1021,,,1",
    "12,,Falcon 9,3696.65,GTO,KSC LC 39A,True ASDS,1,True,False,True,5e9e3032383ecb6bb234e7ca,3.0,0,B1032,-80.603956,28.608058,1",
    // dropped: no payload, no site, bad class
    "13,2018-01-08,Falcon 9,,LEO,KSC LC 39A,True RTLS,1,True,False,True,LZ-1,4.0,0,B1043,-80.603956,28.608058,1",
    "14,2018-01-31,Falcon 9,4230.0,GTO,,True Ocean,2,True,True,True,,4.0,1,B1032,-80.577366,28.561857,1",
    "15,2018-02-22,Falcon 9,2150.0,SSO,VAFB SLC 4E,None None,2,True,True,False,,3.0,1,B1038,-120.610829,34.632093,n/a",
];

fn write_csv(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file.flush().unwrap();
    file
}

fn load_fixture() -> (NamedTempFile, Dataset) {
    let file = write_csv(ROWS);
    let dataset = Dataset::load(file.path()).unwrap();
    (file, dataset)
}

fn full_range(dataset: &Dataset) -> PayloadRange {
    dataset.payload_bounds().unwrap()
}

#[test]
fn test_load_applies_drop_rule() {
    let (_file, dataset) = load_fixture();

    assert_eq!(dataset.len(), 12);
    assert_eq!(dataset.dropped_rows(), 3);
    assert_eq!(
        dataset.launch_sites(),
        vec!["CCAFS SLC 40", "KSC LC 39A", "VAFB SLC 4E"]
    );
    assert_eq!(full_range(&dataset).low(), 500.0);
    assert_eq!(full_range(&dataset).high(), 6104.959412);
}

#[test]
fn test_missing_columns_fail_load() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "FlightNumber,Date,LaunchSite,PayloadMass").unwrap();
    writeln!(file, "1,2010-06-04,CCAFS SLC 40,500").unwrap();
    file.flush().unwrap();

    let err = Dataset::load(file.path()).unwrap_err();
    assert!(matches!(err, DataLoadError::MissingColumns { .. }));
    assert!(err.to_string().contains("Class"));
    assert!(err.to_string().contains("Latitude"));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = Dataset::load(std::path::Path::new("/nonexistent/launches.csv")).unwrap_err();
    assert!(matches!(err, DataLoadError::Io { .. }));
}

#[test]
fn test_all_sites_success_sum_matches_dataset() {
    let (_file, dataset) = load_fixture();
    let selection = FilterSelection::all_sites(full_range(&dataset));

    let global = dataset
        .records()
        .iter()
        .filter(|r| r.class == LaunchClass::Success)
        .count();

    let view = site_success(&dataset, &selection);
    assert!(matches!(view, SiteBreakdown::BySite(_)));
    assert_eq!(view.total(), global);
}

#[test]
fn test_every_site_outcomes_sum_to_filtered_count() {
    let (_file, dataset) = load_fixture();

    for site in dataset.launch_sites() {
        let selection = FilterSelection::new(SiteSelector::Site(site), full_range(&dataset));
        let view = site_success(&dataset, &selection);
        assert!(matches!(view, SiteBreakdown::Outcomes(_)));
        assert_eq!(view.total(), filter_records(&dataset, &selection).len());
    }
}

#[test]
fn test_summary_and_views_for_empty_range() {
    let (_file, dataset) = load_fixture();
    let selection = FilterSelection::all_sites(PayloadRange::new(9000.0, 9500.0).unwrap());

    let stats = summarize(&dataset, &selection);
    assert_eq!(stats.count, 0);
    assert_eq!(stats.success_rate, 0.0);
    assert_eq!(stats.median_payload, 0.0);

    assert!(site_success(&dataset, &selection).is_empty());
    assert!(monthly_trend(&dataset, &selection).is_empty());
    assert!(payload_bins(&dataset, &selection).is_empty());
    assert!(geo_points(&dataset, &selection).is_empty());
}

#[test]
fn test_monthly_trend_is_chronological_and_unique() {
    let (_file, dataset) = load_fixture();
    let trend = monthly_trend(&dataset, &FilterSelection::all_sites(full_range(&dataset)));

    // Row 12 has no date
    assert_eq!(trend.iter().map(|r| r.launches).sum::<usize>(), 11);
    assert!(trend.windows(2).all(|w| w[0].month < w[1].month));

    let march_2017 = trend
        .iter()
        .find(|r| r.month.format("%Y-%m").to_string() == "2017-03")
        .unwrap();
    assert_eq!(march_2017.launches, 2);
    assert_eq!(march_2017.successes, 1);
}

#[test]
fn test_payload_bins_bounded_and_populated() {
    let (_file, dataset) = load_fixture();
    let bins = payload_bins(&dataset, &FilterSelection::all_sites(full_range(&dataset)));

    assert!(!bins.is_empty());
    assert!(bins.len() <= PAYLOAD_BIN_COUNT);
    assert!(bins.iter().all(|b| b.n > 0));
    assert_eq!(bins.iter().map(|b| b.n).sum::<usize>(), 12);
    assert!(bins.windows(2).all(|w| w[0].lower < w[1].lower));
}

#[test]
fn test_geo_points_exclude_missing_coordinates() {
    let (_file, dataset) = load_fixture();
    let points = geo_points(&dataset, &FilterSelection::all_sites(full_range(&dataset)));

    assert_eq!(points.len(), 11);
    assert!(points.iter().all(|p| p.booster_version == "Falcon 9"));
}

#[test]
fn test_dashboard_reports_render() {
    let (_file, dataset) = load_fixture();
    let selection = FilterSelection::new(
        SiteSelector::parse("KSC LC 39A"),
        PayloadRange::new(0.0, 6000.0).unwrap(),
    );
    let dashboard = build_dashboard(&dataset, &selection, &DashboardOptions::default());

    assert_eq!(dashboard.summary.count, 4);
    assert_eq!(dashboard.kpis.success_rate, "75.0%");
    assert_eq!(dashboard.metadata.records_dropped, 3);

    let markdown = generate_markdown_report(&dashboard);
    assert!(markdown.contains("Success vs Failure: KSC LC 39A"));
    assert!(markdown.contains("| Success | 3 | 75.0% |"));

    let json = generate_json_report(&dashboard).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["site_breakdown"]["kind"], "outcomes");
    assert_eq!(value["summary"]["count"], 4);
}
