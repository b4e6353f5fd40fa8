//! Launch dataset loading.
//!
//! Reads the launch CSV, checks that every required column is present,
//! coerces numeric and date cells (unparseable values become null), and
//! drops rows that lack a payload, a site, or a valid class. The resulting
//! [`Dataset`] is immutable for the rest of the process.

use crate::error::DataLoadError;
use crate::models::{AuxiliaryFields, LaunchClass, LaunchRecord, PayloadRange};
use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Columns the input file must carry, in source order.
pub const REQUIRED_COLUMNS: [&str; 18] = [
    "FlightNumber",
    "Date",
    "BoosterVersion",
    "PayloadMass",
    "Orbit",
    "LaunchSite",
    "Outcome",
    "Flights",
    "GridFins",
    "Reused",
    "Legs",
    "LandingPad",
    "Block",
    "ReusedCount",
    "Serial",
    "Longitude",
    "Latitude",
    "Class",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// The immutable working dataset.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<LaunchRecord>,
    dropped: usize,
    source: PathBuf,
}

impl Dataset {
    /// Load and validate a launch CSV from disk.
    pub fn load(path: &Path) -> Result<Self, DataLoadError> {
        info!("Loading launch records from: {}", path.display());

        let file = File::open(path).map_err(|source| DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_reader(file, path)
    }

    /// Parse launch records from any reader. `source` is only recorded for reporting.
    pub fn from_reader<R: Read>(reader: R, source: &Path) -> Result<Self, DataLoadError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        if headers.is_empty() || headers.iter().all(str::is_empty) {
            return Err(DataLoadError::EmptyHeader);
        }

        let columns = ColumnIndex::resolve(&headers)?;

        let mut records = Vec::new();
        let mut dropped = 0usize;

        for row in rdr.records() {
            let row = row?;
            match columns.parse_row(&row) {
                Some(record) => records.push(record),
                None => dropped += 1,
            }
        }

        debug!(
            "Parsed {} launch records ({} rows dropped for missing payload, site or class)",
            records.len(),
            dropped
        );

        Ok(Self {
            records,
            dropped,
            source: source.to_path_buf(),
        })
    }

    /// Build a dataset from already-validated records.
    pub fn from_records(records: Vec<LaunchRecord>) -> Self {
        Self {
            records,
            dropped: 0,
            source: PathBuf::new(),
        }
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of source rows excluded by the required-field rule.
    pub fn dropped_rows(&self) -> usize {
        self.dropped
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Sorted distinct launch sites (the site selector options).
    pub fn launch_sites(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.launch_site.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Smallest and largest payload in the dataset, or `None` when empty.
    pub fn payload_bounds(&self) -> Option<PayloadRange> {
        let min = self
            .records
            .iter()
            .map(|r| r.payload_mass)
            .fold(f64::INFINITY, f64::min);
        let max = self
            .records
            .iter()
            .map(|r| r.payload_mass)
            .fold(f64::NEG_INFINITY, f64::max);

        PayloadRange::new(min, max).ok()
    }
}

/// Position of each required column in the header row.
struct ColumnIndex {
    positions: HashMap<&'static str, usize>,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord) -> Result<Self, DataLoadError> {
        let mut positions = HashMap::new();
        let mut missing = Vec::new();

        for name in REQUIRED_COLUMNS {
            match headers.iter().position(|h| h == name) {
                Some(idx) => {
                    positions.insert(name, idx);
                }
                None => missing.push(name.to_string()),
            }
        }

        if !missing.is_empty() {
            missing.sort();
            return Err(DataLoadError::MissingColumns { columns: missing });
        }

        Ok(Self { positions })
    }

    fn text(&self, row: &StringRecord, column: &str) -> String {
        self.positions
            .get(column)
            .and_then(|&idx| row.get(idx))
            .unwrap_or("")
            .to_string()
    }

    fn number(&self, row: &StringRecord, column: &str) -> Option<f64> {
        self.positions
            .get(column)
            .and_then(|&idx| row.get(idx))
            .and_then(parse_number)
    }

    /// Coerce one row. Returns `None` when a required field is missing.
    fn parse_row(&self, row: &StringRecord) -> Option<LaunchRecord> {
        let payload_mass = self
            .number(row, "PayloadMass")
            .filter(|p| *p >= 0.0)?;
        let class = self
            .number(row, "Class")
            .and_then(LaunchClass::from_numeric)?;
        let launch_site = self.text(row, "LaunchSite");
        if launch_site.is_empty() {
            return None;
        }

        let flight_number = self
            .number(row, "FlightNumber")
            .filter(|n| *n >= 0.0 && n.fract() == 0.0 && *n <= u32::MAX as f64)
            .map(|n| n as u32);

        Some(LaunchRecord {
            flight_number,
            date: parse_date(&self.text(row, "Date")),
            booster_version: self.text(row, "BoosterVersion"),
            payload_mass,
            orbit: self.text(row, "Orbit"),
            launch_site,
            outcome: self.text(row, "Outcome"),
            class,
            latitude: self.number(row, "Latitude"),
            longitude: self.number(row, "Longitude"),
            auxiliary: AuxiliaryFields {
                flights: self.text(row, "Flights"),
                grid_fins: self.text(row, "GridFins"),
                reused: self.text(row, "Reused"),
                legs: self.text(row, "Legs"),
                landing_pad: self.text(row, "LandingPad"),
                block: self.text(row, "Block"),
                reused_count: self.text(row, "ReusedCount"),
                serial: self.text(row, "Serial"),
            },
        })
    }
}

/// Parse a numeric cell; empty, non-numeric, and non-finite values become null.
fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a date cell in one of the accepted layouts.
fn parse_date(cell: &str) -> Option<NaiveDate> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(cell, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(cell, fmt).ok())
                .map(|dt| dt.date())
        })
}
