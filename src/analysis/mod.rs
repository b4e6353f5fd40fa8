//! Aggregation pipeline.
//!
//! Pure functions from `(dataset, selection)` to chart-ready views. Nothing
//! here mutates the dataset or keeps state between calls.

pub mod aggregator;
pub mod binning;
pub mod filter;

pub use aggregator::*;
pub use binning::*;
pub use filter::*;
