//! Source adapters and the series cache.
//!
//! Everything here speaks the same contract: given an instrument identity and
//! an inclusive date range, produce a fresh [`TimeSeries`]: empty on failure,
//! never a raised error past the adapter boundary.
//!
//! [`TimeSeries`]: crate::domain::TimeSeries

pub mod cache;
pub mod jgb;
pub mod quote;
pub mod wareki;

pub use cache::SeriesCache;
pub use jgb::{JgbClient, JgbDownload, JgbResource};
pub use quote::{QuoteClient, QuoteSource};
pub use wareki::parse_wareki;
