//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - produced by the source adapters
//! - consumed by the metrics and normalization code
//! - exported to JSON/CSV by front-ends
//!
//! All of them are derived, read-only, request-scoped values: created fresh per
//! query, never persisted beyond the cache layer's TTL.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Which upstream family a series comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Daily close prices from the market-data provider.
    MarketQuote,
    /// Yield-by-maturity from the MOF JGB CSV feeds.
    JgbYield,
}

/// Identity of a logical instrument, independent of the requested date range.
///
/// `key` is a ticker symbol for `MarketQuote` and a maturity-term label
/// (e.g. `10年`) for `JgbYield`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeriesIdentity {
    pub kind: SourceKind,
    pub key: String,
}

impl SeriesIdentity {
    pub fn market_quote(ticker: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::MarketQuote,
            key: ticker.into(),
        }
    }

    pub fn jgb_yield(term: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::JgbYield,
            key: term.into(),
        }
    }
}

/// An inclusive `[start, end]` date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, AppError> {
        if start > end {
            return Err(AppError::new(
                2,
                format!("Invalid date range: start {start} is after end {end}."),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// An ordered daily series with one numeric column.
///
/// Invariants, enforced at construction:
///
/// - dates strictly increasing (unique)
/// - values finite (a missing observation is *absent*, never NaN-as-zero)
///
/// Adapters always return a fresh series; an empty series is a valid, expected
/// outcome (it is how fetch failures surface to callers).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    points: Vec<(NaiveDate, f64)>,
}

impl TimeSeries {
    pub fn empty() -> Self {
        Self { points: Vec::new() }
    }

    /// Build a series from raw points.
    ///
    /// Sorts ascending, drops non-finite values, and de-duplicates dates
    /// keeping the *last* occurrence in input order (callers that care about
    /// duplicate resolution, like the JGB merge, order their input
    /// accordingly).
    pub fn from_points(raw: Vec<(NaiveDate, f64)>) -> Self {
        let mut map: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for (date, value) in raw {
            if value.is_finite() {
                map.insert(date, value);
            }
        }
        Self {
            points: map.into_iter().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn points(&self) -> &[(NaiveDate, f64)] {
        &self.points
    }

    pub fn first(&self) -> Option<(NaiveDate, f64)> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<(NaiveDate, f64)> {
        self.points.last().copied()
    }

    /// Restrict to `range`, inclusive on both ends.
    pub fn clamp(&self, range: &DateRange) -> Self {
        Self {
            points: self
                .points
                .iter()
                .copied()
                .filter(|(d, _)| range.contains(*d))
                .collect(),
        }
    }

    /// Latest observation at or before `date`, if any.
    pub fn last_at_or_before(&self, date: NaiveDate) -> Option<(NaiveDate, f64)> {
        self.points.iter().rev().find(|(d, _)| *d <= date).copied()
    }

    /// Index of the latest observation at or before `date`, if any.
    pub(crate) fn index_at_or_before(&self, date: NaiveDate) -> Option<usize> {
        self.points.iter().rposition(|(d, _)| *d <= date)
    }
}

/// Category distinction governing change-metric semantics.
///
/// Yields are quoted in points, so a move from 1.00 to 1.25 is reported as
/// `+0.25` (absolute); everything else is reported as a percentage change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentCategory {
    PriceLike,
    YieldLike,
}

/// How a look-back window slices a series ending at the reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    /// The last `n + 1` observations at or before the reference date.
    ///
    /// Observation rows stand in for trading days: quote feeds only publish
    /// rows on trading days, so counting rows back is the row-level analogue
    /// of "n trading days ago" and stays meaningful for sparse series.
    TradingDays(usize),
    /// Observations in `[reference - n months, reference]`.
    CalendarMonths(u32),
    /// The user-selected display range's own boundaries.
    ///
    /// This is the only window whose comparison base is "period start" rather
    /// than a duration counted back from the reference date; with a 1-day
    /// preset it degenerates to the day-before comparison.
    FullRange,
}

/// A named look-back window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookbackWindow {
    pub name: String,
    pub kind: WindowKind,
}

impl LookbackWindow {
    pub fn trading_days(name: impl Into<String>, days: usize) -> Self {
        Self {
            name: name.into(),
            kind: WindowKind::TradingDays(days),
        }
    }

    pub fn calendar_months(name: impl Into<String>, months: u32) -> Self {
        Self {
            name: name.into(),
            kind: WindowKind::CalendarMonths(months),
        }
    }

    pub fn full_range(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: WindowKind::FullRange,
        }
    }

    /// The dashboard's window set: `5d`, `1mo`, `3mo`, `range`.
    pub fn default_set() -> Vec<Self> {
        vec![
            Self::trading_days("5d", 5),
            Self::calendar_months("1mo", 1),
            Self::calendar_months("3mo", 3),
            Self::full_range("range"),
        ]
    }
}

/// Per-window signed deltas for one instrument.
///
/// Semantics (percentage vs absolute) are fixed by `category` for the whole
/// result, never mixed. A window with insufficient data is *absent* from the
/// map; absence signals "could not compute", which callers must keep
/// distinguishable from a genuine `0.00` change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeResult {
    pub category: InstrumentCategory,
    pub changes: BTreeMap<String, f64>,
}

impl ChangeResult {
    pub fn new(category: InstrumentCategory) -> Self {
        Self {
            category,
            changes: BTreeMap::new(),
        }
    }

    pub fn get(&self, window: &str) -> Option<f64> {
        self.changes.get(window).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// One re-based column of a [`ComparisonTable`].
///
/// `values` is aligned with the table's date axis; `None` marks positions
/// outside the column's own observed span (no extrapolation ever fills them).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonColumn {
    pub label: String,
    pub values: Vec<Option<f64>>,
}

/// Multiple series re-based to 100 at each column's first valid observation
/// and joined on the union of all dates.
///
/// Only suitable for relative-shape comparison; never treat the values as
/// prices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonTable {
    pub dates: Vec<NaiveDate>,
    pub columns: Vec<ComparisonColumn>,
}

impl ComparisonTable {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
