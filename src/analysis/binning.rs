//! Quantile binning of payload mass.
//!
//! Edges are linearly interpolated quantiles of the filtered payloads.
//! Repeated edges collapse, so a sample with heavy ties yields fewer bins
//! than requested instead of an error.

use super::filter::filter_records;
use crate::dataset::Dataset;
use crate::models::{FilterSelection, LaunchRecord, PayloadBinRow};

/// Target number of payload bins.
pub const PAYLOAD_BIN_COUNT: usize = 8;

/// Starting label precision, raised until adjacent edges render distinctly.
const BASE_LABEL_PRECISION: i32 = 3;

/// Highest label precision tried before falling back to the base.
const MAX_LABEL_PRECISION: i32 = 20;

/// Success rate per payload quantile bin, using the default bin count.
pub fn payload_bins(dataset: &Dataset, selection: &FilterSelection) -> Vec<PayloadBinRow> {
    payload_bins_with_count(dataset, selection, PAYLOAD_BIN_COUNT)
}

/// Success rate per payload quantile bin with an explicit target bin count.
pub fn payload_bins_with_count(
    dataset: &Dataset,
    selection: &FilterSelection,
    target_bins: usize,
) -> Vec<PayloadBinRow> {
    let records = filter_records(dataset, selection);
    bin_records(&records, target_bins)
}

fn bin_records(records: &[&LaunchRecord], target_bins: usize) -> Vec<PayloadBinRow> {
    if records.is_empty() || target_bins == 0 {
        return vec![];
    }

    let mut sorted: Vec<f64> = records.iter().map(|r| r.payload_mass).collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let edges = unique_quantile_edges(&sorted, target_bins);
    let precision = label_precision(&edges);

    // All payloads identical: a single bin holds everything
    let bin_count = (edges.len() - 1).max(1);
    let mut tallies: Vec<(usize, usize)> = vec![(0, 0); bin_count];

    for record in records {
        let idx = bin_index(&edges, record.payload_mass).min(bin_count - 1);
        tallies[idx].0 += 1;
        tallies[idx].1 += record.class.value() as usize;
    }

    tallies
        .into_iter()
        .enumerate()
        .filter(|(_, (n, _))| *n > 0)
        .map(|(idx, (n, successes))| {
            let lower = edges[idx];
            let upper = edges.get(idx + 1).copied().unwrap_or(lower);
            PayloadBinRow {
                label: bin_label(lower, upper, idx == 0, precision),
                lower,
                upper,
                success_rate: successes as f64 / n as f64 * 100.0,
                n,
            }
        })
        .collect()
}

/// Quantiles at `k / bins` for `k = 0..=bins`, duplicates removed.
fn unique_quantile_edges(sorted: &[f64], bins: usize) -> Vec<f64> {
    let mut edges: Vec<f64> = (0..=bins)
        .map(|k| quantile(sorted, k as f64 / bins as f64))
        .collect();
    edges.dedup();
    edges
}

/// Linear-interpolation quantile of pre-sorted, non-empty data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = (sorted.len() - 1) as f64 * q;
    let lo = position.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = position - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Bin `i` covers `(edges[i], edges[i + 1]]`; the lowest edge belongs to bin 0.
fn bin_index(edges: &[f64], value: f64) -> usize {
    edges.partition_point(|e| *e < value).saturating_sub(1)
}

/// Smallest precision at or above the base at which every edge rounds to a
/// distinct value, so no two labels collide.
fn label_precision(edges: &[f64]) -> i32 {
    (BASE_LABEL_PRECISION..MAX_LABEL_PRECISION)
        .find(|&precision| {
            let rounded: Vec<f64> = edges.iter().map(|&e| round_frac(e, precision)).collect();
            rounded.windows(2).all(|w| w[0] != w[1])
        })
        .unwrap_or(BASE_LABEL_PRECISION)
}

/// `(lo, hi]` label. The first bin's lower bound is lowered by one unit in the
/// last place so the minimum reads as included.
fn bin_label(lower: f64, upper: f64, first: bool, precision: i32) -> String {
    let lower_digits = frac_digits(lower, precision);
    let mut lower = round_frac(lower, precision);
    if first {
        lower -= 10f64.powi(-precision);
    }
    format!(
        "({}, {}]",
        format_edge(lower, lower_digits.max(precision)),
        format_edge(round_frac(upper, precision), frac_digits(upper, precision))
    )
}

/// Decimal digits kept for `value`: `precision` for magnitudes of at least 1,
/// `precision` significant digits below that.
fn frac_digits(value: f64, precision: i32) -> i32 {
    let magnitude = value.abs();
    if magnitude == 0.0 || !magnitude.is_finite() || magnitude >= 1.0 {
        precision
    } else {
        -(magnitude.log10().floor() as i32) - 1 + precision
    }
}

fn round_frac(value: f64, precision: i32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(frac_digits(value, precision));
    (value * scale).round() / scale
}

/// Render an edge with at most `digits` decimals and no trailing zeros,
/// keeping one decimal for whole numbers.
fn format_edge(value: f64, digits: i32) -> String {
    let text = format!("{:.*}", digits.max(0) as usize, value);
    let trimmed = text.trim_end_matches('0');
    if trimmed.ends_with('.') {
        format!("{}0", trimmed)
    } else {
        trimmed.to_string()
    }
}
