//! Markdown and JSON report generation.
//!
//! This module renders a [`DashboardReport`] as a Markdown document with
//! one table per chart, or as pretty-printed JSON.

use super::dashboard::group_thousands;
use crate::models::{
    DashboardReport, GeoPoint, JitteredPoint, KpiTiles, MonthlyTrendRow, PayloadBinRow,
    ReportMetadata, SiteBreakdown,
};
use anyhow::Result;

/// Rows shown per table for the per-record views.
const MAX_RECORD_ROWS: usize = 50;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &DashboardReport) -> String {
    let mut output = String::new();

    output.push_str("# SpaceX Launch Dashboard\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_table_of_contents(report));
    output.push_str(&generate_kpi_section(&report.kpis));
    output.push_str(&generate_site_section(&report.site_breakdown, &report.kpis));

    if let Some(ref trend) = report.monthly_trend {
        output.push_str(&generate_trend_section(trend, report.metadata.trend_window));
    }
    if let Some(ref bins) = report.payload_bins {
        output.push_str(&generate_bins_section(bins));
    }
    if let Some(ref points) = report.geo_points {
        output.push_str(&generate_map_section(points));
    }
    if let Some(ref scatter) = report.scatter {
        output.push_str(&generate_scatter_section(scatter));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Data Source:** `{}`\n", metadata.source.display()));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Records Loaded:** {}\n", metadata.records_loaded));
    if metadata.records_dropped > 0 {
        section.push_str(&format!(
            "- **Rows Dropped:** {}\n",
            metadata.records_dropped
        ));
    }
    section.push_str(&format!("- **Launch Site:** {}\n", metadata.selection.site));
    section.push_str(&format!("- **Payload Range:** {}\n", metadata.selection.payload));
    section.push('\n');

    section
}

/// Generate the table of contents.
fn generate_table_of_contents(report: &DashboardReport) -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");
    toc.push_str("- [Key Figures](#key-figures)\n");
    toc.push_str("- [Launch Outcomes](#launch-outcomes)\n");

    if report.monthly_trend.is_some() {
        toc.push_str("- [Monthly Trend](#monthly-trend)\n");
    }
    if report.payload_bins.is_some() {
        toc.push_str("- [Success Rate by Payload](#success-rate-by-payload)\n");
    }
    if report.geo_points.is_some() {
        toc.push_str("- [Launch Locations](#launch-locations)\n");
    }
    if report.scatter.is_some() {
        toc.push_str("- [Payload vs Outcome](#payload-vs-outcome)\n");
    }

    toc.push('\n');

    toc
}

fn generate_kpi_section(kpis: &KpiTiles) -> String {
    let mut section = String::new();

    section.push_str("## Key Figures\n\n");
    section.push_str("| Records | Success Rate | Median Payload (kg) | Selected Site |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        kpis.records, kpis.success_rate, kpis.median_payload, kpis.selected_site
    ));

    section
}

/// Pie data: successes per site, or success vs failure for one site.
fn generate_site_section(breakdown: &SiteBreakdown, kpis: &KpiTiles) -> String {
    let mut section = String::new();

    section.push_str("## Launch Outcomes\n\n");

    if breakdown.is_empty() {
        section.push_str("No launches match the current filter.\n\n");
        return section;
    }

    let total = breakdown.total();

    match breakdown {
        SiteBreakdown::BySite(rows) => {
            section.push_str("### Total Successful Launches by Site\n\n");
            section.push_str("| Launch Site | Successes | Share |\n");
            section.push_str("|:---|:---:|:---:|\n");
            for row in rows {
                section.push_str(&format!(
                    "| {} | {} | {} |\n",
                    row.site,
                    row.successes,
                    share(row.successes as usize, total)
                ));
            }
        }
        SiteBreakdown::Outcomes(rows) => {
            section.push_str(&format!(
                "### Success vs Failure: {}\n\n",
                kpis.selected_site
            ));
            section.push_str("| Outcome | Count | Share |\n");
            section.push_str("|:---|:---:|:---:|\n");
            for row in rows {
                section.push_str(&format!(
                    "| {} | {} | {} |\n",
                    row.outcome,
                    row.count,
                    share(row.count, total)
                ));
            }
        }
    }
    section.push('\n');

    section
}

fn share(part: usize, total: usize) -> String {
    if total == 0 {
        return "-".to_string();
    }
    format!("{:.1}%", part as f64 / total as f64 * 100.0)
}

fn generate_trend_section(trend: &[MonthlyTrendRow], window: usize) -> String {
    let mut section = String::new();

    section.push_str("## Monthly Trend\n\n");

    if trend.is_empty() {
        section.push_str("No dated launches match the current filter.\n\n");
        return section;
    }

    section.push_str(&format!(
        "| Month | Launches | Successes | Success Rate | Rolling {}M Success Rate |\n",
        window
    ));
    section.push_str("|:---|:---:|:---:|:---:|:---:|\n");

    for row in trend {
        let smoothed = row
            .smoothed_success_rate
            .map(|rate| format!("{:.1}%", rate))
            .unwrap_or_else(|| "-".to_string());
        section.push_str(&format!(
            "| {} | {} | {} | {:.1}% | {} |\n",
            row.month.format("%Y-%m"),
            row.launches,
            row.successes,
            row.success_rate,
            smoothed
        ));
    }
    section.push('\n');

    section
}

fn generate_bins_section(bins: &[PayloadBinRow]) -> String {
    let mut section = String::new();

    section.push_str("## Success Rate by Payload\n\n");

    if bins.is_empty() {
        section.push_str("No launches match the current filter.\n\n");
        return section;
    }

    section.push_str("| Payload Range (kg) | Success Rate | n |\n");
    section.push_str("|:---|:---:|:---:|\n");
    for bin in bins {
        section.push_str(&format!(
            "| {} | {:.1}% | {} |\n",
            bin.label, bin.success_rate, bin.n
        ));
    }
    section.push('\n');

    section
}

fn generate_map_section(points: &[GeoPoint]) -> String {
    let mut section = String::new();

    section.push_str("## Launch Locations\n\n");

    if points.is_empty() {
        section.push_str("No launches with coordinates match the current filter.\n\n");
        return section;
    }

    section.push_str("| Launch Site | Latitude | Longitude | Date | Booster | Outcome | Payload (kg) |\n");
    section.push_str("|:---|:---:|:---:|:---:|:---|:---|:---:|\n");
    for point in points.iter().take(MAX_RECORD_ROWS) {
        let date = point
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        section.push_str(&format!(
            "| {} | {:.5} | {:.5} | {} | {} | {} | {} |\n",
            point.site,
            point.latitude,
            point.longitude,
            date,
            point.booster_version,
            point.outcome,
            group_thousands(point.payload_mass.round() as i64)
        ));
    }
    section.push_str(&truncation_note(points.len()));
    section.push('\n');

    section
}

fn generate_scatter_section(points: &[JitteredPoint]) -> String {
    let mut section = String::new();

    section.push_str("## Payload vs Outcome\n\n");

    if points.is_empty() {
        section.push_str("No launches match the current filter.\n\n");
        return section;
    }

    section.push_str("| Payload (kg) | Outcome | Plotted At | Booster | Launch Site | Orbit |\n");
    section.push_str("|:---:|:---|:---:|:---|:---|:---|\n");
    for p in points.iter().take(MAX_RECORD_ROWS) {
        section.push_str(&format!(
            "| {} | {} | {:.3} | {} | {} | {} |\n",
            group_thousands(p.point.payload_mass.round() as i64),
            p.point.class,
            p.class_jittered,
            p.point.booster_version,
            p.point.site,
            p.point.orbit
        ));
    }
    section.push_str(&truncation_note(points.len()));
    section.push('\n');

    section
}

fn truncation_note(total: usize) -> String {
    if total > MAX_RECORD_ROWS {
        format!(
            "\n*Showing {} of {} launches. Use `--format json` for the full list.*\n",
            MAX_RECORD_ROWS, total
        )
    } else {
        String::new()
    }
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by LaunchDash v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &DashboardReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
