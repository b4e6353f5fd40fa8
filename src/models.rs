//! Data models for the launch dashboard.
//!
//! This module contains the core data structures used throughout the
//! crate: launch records, filter selections, the rows of every derived
//! view, and the assembled dashboard report.

use crate::error::SelectionError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Binary launch outcome label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchClass {
    /// Class = 0
    Failure,
    /// Class = 1
    Success,
}

impl fmt::Display for LaunchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchClass::Failure => write!(f, "Failure"),
            LaunchClass::Success => write!(f, "Success"),
        }
    }
}

impl LaunchClass {
    /// Numeric value of the label (0 or 1).
    pub fn value(self) -> u32 {
        match self {
            LaunchClass::Failure => 0,
            LaunchClass::Success => 1,
        }
    }

    /// Parse a coerced numeric cell. Only exactly 0 or 1 are accepted.
    pub fn from_numeric(value: f64) -> Option<Self> {
        if value == 0.0 {
            Some(LaunchClass::Failure)
        } else if value == 1.0 {
            Some(LaunchClass::Success)
        } else {
            None
        }
    }

    pub fn is_success(self) -> bool {
        self == LaunchClass::Success
    }
}

/// Columns carried through from the source table but never aggregated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuxiliaryFields {
    pub flights: String,
    pub grid_fins: String,
    pub reused: String,
    pub legs: String,
    pub landing_pad: String,
    pub block: String,
    pub reused_count: String,
    pub serial: String,
}

/// One row of the working dataset.
///
/// Every record that reaches the pipeline has a payload, a site and a
/// valid class; rows missing any of them are dropped at load time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchRecord {
    pub flight_number: Option<u32>,
    pub date: Option<NaiveDate>,
    pub booster_version: String,
    /// Payload mass in kilograms.
    pub payload_mass: f64,
    pub orbit: String,
    pub launch_site: String,
    /// Free-form landing outcome description.
    pub outcome: String,
    pub class: LaunchClass,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub auxiliary: AuxiliaryFields,
}

impl LaunchRecord {
    /// Minimal record with only the required fields set.
    pub fn new(launch_site: impl Into<String>, payload_mass: f64, class: LaunchClass) -> Self {
        Self {
            flight_number: None,
            date: None,
            booster_version: String::new(),
            payload_mass,
            orbit: String::new(),
            launch_site: launch_site.into(),
            outcome: String::new(),
            class,
            latitude: None,
            longitude: None,
            auxiliary: AuxiliaryFields::default(),
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }
}

/// Sentinel value used on the command line and in config for "all sites".
pub const ALL_SITES: &str = "ALL";

/// Which launch sites a selection covers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteSelector {
    #[default]
    All,
    Site(String),
}

impl SiteSelector {
    /// Build a selector from user input. `ALL` (any case) or an empty
    /// string selects every site.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_SITES) {
            SiteSelector::All
        } else {
            SiteSelector::Site(trimmed.to_string())
        }
    }

    pub fn matches(&self, site: &str) -> bool {
        match self {
            SiteSelector::All => true,
            SiteSelector::Site(selected) => selected == site,
        }
    }
}

impl fmt::Display for SiteSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteSelector::All => write!(f, "{}", ALL_SITES),
            SiteSelector::Site(site) => write!(f, "{}", site),
        }
    }
}

/// Closed payload-mass interval `[low, high]` in kilograms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PayloadBounds")]
pub struct PayloadRange {
    low: f64,
    high: f64,
}

/// Unchecked wire form of [`PayloadRange`]; deserialization goes through
/// [`PayloadRange::new`].
#[derive(Deserialize)]
struct PayloadBounds {
    low: f64,
    high: f64,
}

impl TryFrom<PayloadBounds> for PayloadRange {
    type Error = SelectionError;

    fn try_from(bounds: PayloadBounds) -> Result<Self, Self::Error> {
        PayloadRange::new(bounds.low, bounds.high)
    }
}

impl PayloadRange {
    /// Create a range. Bounds are never reordered: `low > high` is rejected.
    pub fn new(low: f64, high: f64) -> Result<Self, SelectionError> {
        if !low.is_finite() || !high.is_finite() {
            return Err(SelectionError::NonFiniteBound);
        }
        if low > high {
            return Err(SelectionError::InvalidRange { low, high });
        }
        Ok(Self { low, high })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn contains(&self, payload: f64) -> bool {
        payload >= self.low && payload <= self.high
    }
}

impl fmt::Display for PayloadRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}] kg", self.low, self.high)
    }
}

/// Filter parameters for one request. Built fresh per interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub site: SiteSelector,
    pub payload: PayloadRange,
}

impl FilterSelection {
    pub fn new(site: SiteSelector, payload: PayloadRange) -> Self {
        Self { site, payload }
    }

    pub fn all_sites(payload: PayloadRange) -> Self {
        Self::new(SiteSelector::All, payload)
    }
}

/// Success count for one launch site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSuccessRow {
    pub site: String,
    pub successes: u32,
}

/// Count of records for one outcome class at a single site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeCountRow {
    pub outcome: LaunchClass,
    pub count: usize,
}

/// Pie-chart data: per-site successes, or success/failure for one site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rows", rename_all = "snake_case")]
pub enum SiteBreakdown {
    BySite(Vec<SiteSuccessRow>),
    Outcomes(Vec<OutcomeCountRow>),
}

impl SiteBreakdown {
    pub fn is_empty(&self) -> bool {
        match self {
            SiteBreakdown::BySite(rows) => rows.is_empty(),
            SiteBreakdown::Outcomes(rows) => rows.is_empty(),
        }
    }

    /// Sum of the measure column across all rows.
    pub fn total(&self) -> usize {
        match self {
            SiteBreakdown::BySite(rows) => rows.iter().map(|r| r.successes as usize).sum(),
            SiteBreakdown::Outcomes(rows) => rows.iter().map(|r| r.count).sum(),
        }
    }
}

/// Scalar KPIs over a filtered subset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub count: usize,
    /// Percentage in `[0, 100]`.
    pub success_rate: f64,
    pub median_payload: f64,
}

/// One calendar month of the launch trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTrendRow {
    /// First day of the month.
    pub month: NaiveDate,
    pub launches: usize,
    pub successes: usize,
    pub success_rate: f64,
    pub rolling_launches: usize,
    pub rolling_successes: usize,
    /// `None` when the rolling window holds no launches.
    pub smoothed_success_rate: Option<f64>,
}

/// Success rate for one payload quantile bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadBinRow {
    pub label: String,
    pub lower: f64,
    pub upper: f64,
    pub success_rate: f64,
    pub n: usize,
}

/// A launch placed on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub site: String,
    pub latitude: f64,
    pub longitude: f64,
    pub date: Option<NaiveDate>,
    pub booster_version: String,
    pub outcome: String,
    pub payload_mass: f64,
}

/// Payload-vs-outcome point, before any presentation jitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterPoint {
    pub payload_mass: f64,
    pub class: LaunchClass,
    pub booster_version: String,
    pub site: String,
    pub orbit: String,
    pub outcome: String,
}

/// Scatter point with its display offset applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JitteredPoint {
    #[serde(flatten)]
    pub point: ScatterPoint,
    pub class_jittered: f64,
}

/// Formatted KPI tile values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiTiles {
    pub records: String,
    pub success_rate: String,
    pub median_payload: String,
    pub selected_site: String,
}

/// Metadata about a generated dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub source: PathBuf,
    pub generated_at: DateTime<Utc>,
    pub records_loaded: usize,
    pub records_dropped: usize,
    pub selection: FilterSelection,
    pub trend_window: usize,
    pub target_bins: usize,
}

/// Every derived view for one selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    pub metadata: ReportMetadata,
    pub kpis: KpiTiles,
    pub summary: SummaryStats,
    pub site_breakdown: SiteBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_trend: Option<Vec<MonthlyTrendRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload_bins: Option<Vec<PayloadBinRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo_points: Option<Vec<GeoPoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scatter: Option<Vec<JitteredPoint>>,
}
