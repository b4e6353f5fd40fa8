//! Launch aggregation and statistics.
//!
//! Each function here takes the immutable dataset and a filter selection
//! and returns one derived view. An empty filtered subset always yields an
//! empty or zero-valued view.

use super::filter::filter_records;
use crate::dataset::Dataset;
use crate::models::{
    FilterSelection, GeoPoint, LaunchClass, LaunchRecord, MonthlyTrendRow, OutcomeCountRow,
    ScatterPoint, SiteBreakdown, SiteSelector, SiteSuccessRow, SummaryStats,
};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

/// Rolling window used by the monthly trend, in month rows.
pub const TREND_WINDOW_MONTHS: usize = 6;

/// Success counts per site, or success/failure counts for a single site.
pub fn site_success(dataset: &Dataset, selection: &FilterSelection) -> SiteBreakdown {
    let records = filter_records(dataset, selection);

    match selection.site {
        SiteSelector::All => SiteBreakdown::BySite(group_successes_by_site(&records)),
        SiteSelector::Site(_) => SiteBreakdown::Outcomes(count_outcomes(&records)),
    }
}

/// Group records by launch site and sum the class column.
fn group_successes_by_site(records: &[&LaunchRecord]) -> Vec<SiteSuccessRow> {
    let mut grouped: BTreeMap<&str, u32> = BTreeMap::new();

    for record in records {
        *grouped.entry(record.launch_site.as_str()).or_default() += record.class.value();
    }

    grouped
        .into_iter()
        .map(|(site, successes)| SiteSuccessRow {
            site: site.to_string(),
            successes,
        })
        .collect()
}

/// Count each outcome class. Classes with no records are left out.
fn count_outcomes(records: &[&LaunchRecord]) -> Vec<OutcomeCountRow> {
    let successes = records.iter().filter(|r| r.class.is_success()).count();
    let failures = records.len() - successes;

    let mut rows: Vec<OutcomeCountRow> = [
        (LaunchClass::Success, successes),
        (LaunchClass::Failure, failures),
    ]
    .into_iter()
    .filter(|(_, count)| *count > 0)
    .map(|(outcome, count)| OutcomeCountRow { outcome, count })
    .collect();

    // Stable sort: equal counts keep Success first
    rows.sort_by_key(|row| std::cmp::Reverse(row.count));
    rows
}

/// Record count, success rate and median payload of the filtered subset.
pub fn summarize(dataset: &Dataset, selection: &FilterSelection) -> SummaryStats {
    let records = filter_records(dataset, selection);
    let count = records.len();

    if count == 0 {
        return SummaryStats::default();
    }

    let successes: u32 = records.iter().map(|r| r.class.value()).sum();
    let payloads: Vec<f64> = records.iter().map(|r| r.payload_mass).collect();

    SummaryStats {
        count,
        success_rate: successes as f64 / count as f64 * 100.0,
        median_payload: median(&payloads),
    }
}

/// Median of a set of values, 0 for an empty slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Monthly launches and successes with a 6-month rolling success rate.
pub fn monthly_trend(dataset: &Dataset, selection: &FilterSelection) -> Vec<MonthlyTrendRow> {
    monthly_trend_with_window(dataset, selection, TREND_WINDOW_MONTHS)
}

/// Monthly trend with an explicit rolling window (minimum period 1).
///
/// The window slides over the month rows present in the subset, so a
/// gap with no launches does not count towards it. A window of 0 is
/// treated as 1.
pub fn monthly_trend_with_window(
    dataset: &Dataset,
    selection: &FilterSelection,
    window: usize,
) -> Vec<MonthlyTrendRow> {
    let window = window.max(1);

    let mut by_month: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();
    for record in filter_records(dataset, selection) {
        let Some(month) = record.date.and_then(|d| month_start(&d)) else {
            continue;
        };
        let entry = by_month.entry(month).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += record.class.value() as usize;
    }

    let months: Vec<(NaiveDate, usize, usize)> = by_month
        .into_iter()
        .map(|(month, (launches, successes))| (month, launches, successes))
        .collect();

    months
        .iter()
        .enumerate()
        .map(|(idx, &(month, launches, successes))| {
            let start = (idx + 1).saturating_sub(window);
            let trailing = &months[start..=idx];
            let rolling_launches: usize = trailing.iter().map(|m| m.1).sum();
            let rolling_successes: usize = trailing.iter().map(|m| m.2).sum();

            MonthlyTrendRow {
                month,
                launches,
                successes,
                success_rate: successes as f64 / launches as f64 * 100.0,
                rolling_launches,
                rolling_successes,
                smoothed_success_rate: (rolling_launches > 0)
                    .then(|| rolling_successes as f64 / rolling_launches as f64 * 100.0),
            }
        })
        .collect()
}

fn month_start(date: &NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
}

/// Launches with known coordinates, for the map.
pub fn geo_points(dataset: &Dataset, selection: &FilterSelection) -> Vec<GeoPoint> {
    filter_records(dataset, selection)
        .into_iter()
        .filter_map(|r| {
            let (latitude, longitude) = (r.latitude?, r.longitude?);
            Some(GeoPoint {
                site: r.launch_site.clone(),
                latitude,
                longitude,
                date: r.date,
                booster_version: r.booster_version.clone(),
                outcome: r.outcome.clone(),
                payload_mass: r.payload_mass,
            })
        })
        .collect()
}

/// Payload against exact outcome class, one point per filtered record.
pub fn scatter_points(dataset: &Dataset, selection: &FilterSelection) -> Vec<ScatterPoint> {
    filter_records(dataset, selection)
        .into_iter()
        .map(|r| ScatterPoint {
            payload_mass: r.payload_mass,
            class: r.class,
            booster_version: r.booster_version.clone(),
            site: r.launch_site.clone(),
            orbit: r.orbit.clone(),
            outcome: r.outcome.clone(),
        })
        .collect()
}
