//! Report generation modules.

pub mod dashboard;
pub mod generator;
pub mod jitter;

pub use dashboard::*;
pub use generator::*;
pub use jitter::*;
