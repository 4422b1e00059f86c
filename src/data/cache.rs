//! TTL memoization for series lookups.
//!
//! The cache is the only shared resource in the system, so it is explicit and
//! injectable rather than ambient decorator magic:
//!
//! - derived series (quote and JGB) are keyed by `(key, start, end)` with a
//!   short TTL
//! - raw JGB CSV bodies are keyed by resource, independent of any date range,
//!   with a much longer TTL (the adapter filters a common raw table)
//!
//! Entries expire purely by age; there is no manual invalidation. Reads are
//! safe under concurrency, and a concurrent-populate race is harmless
//! last-write-wins: results are idempotent given identical inputs.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use log::debug;

use crate::data::jgb::{self, JgbDownload, JgbResource};
use crate::data::quote::QuoteSource;
use crate::domain::{DateRange, SeriesIdentity, SourceKind, TimeSeries};
use crate::error::AppError;

/// Derived query results (both source kinds).
pub const SERIES_TTL: Duration = Duration::from_secs(60 * 60);
/// Raw MOF CSV bodies.
pub const RAW_CSV_TTL: Duration = Duration::from_secs(24 * 60 * 60);

struct Entry<V> {
    value: V,
    inserted: Instant,
}

/// A minimal age-expiring map. Expired entries are dropped lazily on lookup.
struct TtlMap<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, Entry<V>>>,
}

impl<K: Eq + Hash, V: Clone> TtlMap<K, V> {
    fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some(entry) if entry.inserted.elapsed() < self.ttl => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            key,
            Entry {
                value,
                inserted: Instant::now(),
            },
        );
    }
}

type RangeKey = (String, NaiveDate, NaiveDate);

/// Memoizing front door for both source adapters.
///
/// Within a TTL window, identical lookups observe the identical cached result
/// and cause no second upstream call.
pub struct SeriesCache<Q, D> {
    quotes: Q,
    jgb: D,
    quote_series: TtlMap<RangeKey, TimeSeries>,
    jgb_series: TtlMap<RangeKey, TimeSeries>,
    raw_csv: TtlMap<JgbResource, String>,
}

impl<Q: QuoteSource, D: JgbDownload> SeriesCache<Q, D> {
    pub fn new(quotes: Q, jgb: D) -> Self {
        Self::with_ttls(quotes, jgb, SERIES_TTL, RAW_CSV_TTL)
    }

    pub fn with_ttls(quotes: Q, jgb: D, series_ttl: Duration, raw_ttl: Duration) -> Self {
        Self {
            quotes,
            jgb,
            quote_series: TtlMap::new(series_ttl),
            jgb_series: TtlMap::new(series_ttl),
            raw_csv: TtlMap::new(raw_ttl),
        }
    }

    /// Fetch (or recall) the series for `id` over `range`.
    pub fn series(&self, id: &SeriesIdentity, range: &DateRange) -> TimeSeries {
        let key = (id.key.clone(), range.start, range.end);
        match id.kind {
            SourceKind::MarketQuote => {
                if let Some(hit) = self.quote_series.get(&key) {
                    debug!("cache hit: quote {} {}..{}", id.key, range.start, range.end);
                    return hit;
                }
                let series = self.quotes.close_series(&id.key, range);
                self.quote_series.insert(key, series.clone());
                series
            }
            SourceKind::JgbYield => {
                if let Some(hit) = self.jgb_series.get(&key) {
                    debug!("cache hit: jgb {} {}..{}", id.key, range.start, range.end);
                    return hit;
                }
                let download = CachedDownload {
                    inner: &self.jgb,
                    raw: &self.raw_csv,
                };
                let series = jgb::yield_series(&download, &id.key, range);
                self.jgb_series.insert(key, series.clone());
                series
            }
        }
    }
}

/// Interposes the raw-body cache between the JGB adapter and the network.
struct CachedDownload<'a, D> {
    inner: &'a D,
    raw: &'a TtlMap<JgbResource, String>,
}

impl<D: JgbDownload> JgbDownload for CachedDownload<'_, D> {
    fn download(&self, resource: JgbResource) -> Result<String, AppError> {
        if let Some(hit) = self.raw.get(&resource) {
            debug!("cache hit: raw JGB {}", resource.label());
            return Ok(hit);
        }
        let body = self.inner.download(resource)?;
        self.raw.insert(resource, body.clone());
        Ok(body)
    }
}
