//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the core series shape (`TimeSeries`, `DateRange`, `SeriesIdentity`)
//! - change-metric inputs/outputs (`LookbackWindow`, `ChangeResult`)
//! - the joint comparison table (`ComparisonTable`)
//! - the built-in indicator catalog (`catalog`)

pub mod catalog;
pub mod types;

pub use types::*;
