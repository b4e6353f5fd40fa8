//! Dashboard assembly.
//!
//! Runs every view of the pipeline for one selection and formats the KPI
//! tiles shown above the charts.

use super::jitter::apply_jitter;
use crate::analysis;
use crate::config::Config;
use crate::dataset::Dataset;
use crate::models::{DashboardReport, FilterSelection, KpiTiles, ReportMetadata, SummaryStats};
use chrono::Utc;
use tracing::debug;

/// Which views to compute and how.
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    pub trend_window: usize,
    pub payload_bins: usize,
    pub include_trend: bool,
    pub include_bins: bool,
    pub include_map: bool,
    pub include_scatter: bool,
    pub jitter_amplitude: f64,
    pub jitter_seed: u64,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for DashboardOptions {
    fn from(config: &Config) -> Self {
        Self {
            trend_window: config.analysis.trend_window,
            payload_bins: config.analysis.payload_bins,
            include_trend: config.report.include_trend,
            include_bins: config.report.include_bins,
            include_map: config.report.include_map,
            include_scatter: config.report.include_scatter,
            jitter_amplitude: config.report.jitter_amplitude,
            jitter_seed: config.report.jitter_seed,
        }
    }
}

/// Compute every enabled view for `selection`.
pub fn build_dashboard(
    dataset: &Dataset,
    selection: &FilterSelection,
    options: &DashboardOptions,
) -> DashboardReport {
    let summary = analysis::summarize(dataset, selection);
    let site_breakdown = analysis::site_success(dataset, selection);

    let monthly_trend = options.include_trend.then(|| {
        analysis::monthly_trend_with_window(dataset, selection, options.trend_window)
    });
    let payload_bins = options
        .include_bins
        .then(|| analysis::payload_bins_with_count(dataset, selection, options.payload_bins));
    let geo_points = options
        .include_map
        .then(|| analysis::geo_points(dataset, selection));
    let scatter = options.include_scatter.then(|| {
        apply_jitter(
            analysis::scatter_points(dataset, selection),
            options.jitter_amplitude,
            options.jitter_seed,
        )
    });

    debug!(
        "Dashboard for site {} {}: {} records",
        selection.site, selection.payload, summary.count
    );

    DashboardReport {
        metadata: ReportMetadata {
            source: dataset.source().to_path_buf(),
            generated_at: Utc::now(),
            records_loaded: dataset.len(),
            records_dropped: dataset.dropped_rows(),
            selection: selection.clone(),
            trend_window: options.trend_window,
            target_bins: options.payload_bins,
        },
        kpis: format_kpis(&summary, selection),
        summary,
        site_breakdown,
        monthly_trend,
        payload_bins,
        geo_points,
        scatter,
    }
}

/// Format the KPI tiles: `1,234` / `66.7%` / `4,700` / site.
pub fn format_kpis(summary: &SummaryStats, selection: &FilterSelection) -> KpiTiles {
    KpiTiles {
        records: group_thousands(summary.count as i64),
        success_rate: format!("{:.1}%", summary.success_rate),
        median_payload: group_thousands(summary.median_payload.round() as i64),
        selected_site: selection.site.to_string(),
    }
}

/// Render an integer with comma thousands separators.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LaunchClass, LaunchRecord, PayloadRange, SiteSelector};

    fn dataset() -> Dataset {
        Dataset::from_records(vec![
            LaunchRecord::new("A", 500.0, LaunchClass::Success),
            LaunchRecord::new("A", 1500.0, LaunchClass::Failure),
            LaunchRecord::new("B", 1000.0, LaunchClass::Success),
        ])
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1234567), "1,234,567");
        assert_eq!(group_thousands(-4700), "-4,700");
    }

    #[test]
    fn test_format_kpis() {
        let summary = SummaryStats {
            count: 3,
            success_rate: 66.666_666,
            median_payload: 1000.0,
        };
        let selection = FilterSelection::all_sites(PayloadRange::new(0.0, 2000.0).unwrap());
        let kpis = format_kpis(&summary, &selection);

        assert_eq!(kpis.records, "3");
        assert_eq!(kpis.success_rate, "66.7%");
        assert_eq!(kpis.median_payload, "1,000");
        assert_eq!(kpis.selected_site, "ALL");
    }

    #[test]
    fn test_build_dashboard_respects_toggles() {
        let dataset = dataset();
        let selection = FilterSelection::new(
            SiteSelector::Site("A".to_string()),
            PayloadRange::new(0.0, 2000.0).unwrap(),
        );
        let options = DashboardOptions {
            include_trend: false,
            include_map: false,
            ..DashboardOptions::default()
        };
        let report = build_dashboard(&dataset, &selection, &options);

        assert_eq!(report.summary.count, 2);
        assert_eq!(report.kpis.selected_site, "A");
        assert!(report.monthly_trend.is_none());
        assert!(report.geo_points.is_none());
        assert_eq!(report.payload_bins.as_ref().map(Vec::len), Some(2));
        assert_eq!(report.scatter.as_ref().map(Vec::len), Some(2));
        assert_eq!(report.metadata.records_loaded, 3);
    }

    #[test]
    fn test_build_dashboard_empty_selection() {
        let dataset = dataset();
        let selection = FilterSelection::all_sites(PayloadRange::new(7000.0, 8000.0).unwrap());
        let report = build_dashboard(&dataset, &selection, &DashboardOptions::default());

        assert_eq!(report.summary, SummaryStats::default());
        assert_eq!(report.kpis.success_rate, "0.0%");
        assert!(report.site_breakdown.is_empty());
        assert_eq!(report.payload_bins, Some(vec![]));
        assert_eq!(report.scatter, Some(vec![]));
    }
}
