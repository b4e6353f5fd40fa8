//! LaunchDash - filter-and-aggregate dashboards over SpaceX launch records.
//!
//! The crate loads a launch CSV into an immutable [`dataset::Dataset`] and
//! exposes one pure function per derived view in [`analysis`]. Every view
//! takes the dataset and a [`models::FilterSelection`] and returns rows
//! ready for charting. [`report`] assembles the views into a Markdown or
//! JSON dashboard.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod models;
pub mod report;

pub use dataset::Dataset;
pub use error::{DataLoadError, SelectionError};
pub use models::{FilterSelection, PayloadRange, SiteSelector};
