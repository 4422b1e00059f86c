//! Market-quote adapter (Yahoo-style chart endpoint).
//!
//! Given a ticker and an inclusive date range, fetch the daily chart payload
//! and keep only the close column. Transient upstream failures are retried a
//! fixed number of times; after exhausting the budget the adapter returns an
//! empty series and warns the operator instead of propagating the error.

use std::thread;
use std::time::Duration;

use chrono::{DateTime, Days, NaiveTime};
use log::{debug, warn};
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::domain::{DateRange, TimeSeries};
use crate::error::AppError;

const CHART_BASE: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

pub const DEFAULT_RETRY_ATTEMPTS: usize = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Blocking source of close-price series.
///
/// The cache layer and the pipeline depend on this trait, not on the HTTP
/// client, so tests can substitute doubles.
pub trait QuoteSource {
    fn close_series(&self, ticker: &str, range: &DateRange) -> TimeSeries;
}

/// HTTP implementation with a bounded retry budget.
pub struct QuoteClient {
    client: Client,
    attempts: usize,
    retry_delay: Duration,
}

impl QuoteClient {
    pub fn new() -> Self {
        Self::with_retry(DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY)
    }

    pub fn with_retry(attempts: usize, retry_delay: Duration) -> Self {
        Self {
            client: Client::new(),
            attempts,
            retry_delay,
        }
    }

    fn fetch_once(&self, ticker: &str, range: &DateRange) -> Result<TimeSeries, AppError> {
        let url = format!("{CHART_BASE}/{ticker}");
        // period2 is exclusive upstream; push it one day past the inclusive end.
        let period1 = epoch_seconds(range.start);
        let period2 = epoch_seconds(range.end.checked_add_days(Days::new(1)).unwrap_or(range.end));

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
                ("events", "history".to_string()),
            ])
            .send()
            .map_err(|e| AppError::new(4, format!("Quote request for {ticker} failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Quote request for {ticker} failed with status {}.", resp.status()),
            ));
        }

        let body: ChartEnvelope = resp.json().map_err(|e| {
            AppError::new(4, format!("Failed to parse quote response for {ticker}: {e}"))
        })?;

        flatten_chart(ticker, &body, range)
    }
}

impl Default for QuoteClient {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteSource for QuoteClient {
    fn close_series(&self, ticker: &str, range: &DateRange) -> TimeSeries {
        fetch_with_retry(ticker, self.attempts, self.retry_delay, || {
            self.fetch_once(ticker, range)
        })
    }
}

/// Run `fetch` up to `attempts` times with a fixed inter-attempt delay.
///
/// Exhausting the budget degrades to an empty series with a warning; it never
/// raises to the caller.
pub fn fetch_with_retry(
    label: &str,
    attempts: usize,
    delay: Duration,
    mut fetch: impl FnMut() -> Result<TimeSeries, AppError>,
) -> TimeSeries {
    for attempt in 1..=attempts {
        match fetch() {
            Ok(series) => return series,
            Err(err) if attempt < attempts => {
                debug!("{label}: attempt {attempt}/{attempts} failed ({err}), retrying");
                thread::sleep(delay);
            }
            Err(err) => {
                warn!("{label}: giving up after {attempts} attempt(s): {err}");
            }
        }
    }
    TimeSeries::empty()
}

fn epoch_seconds(date: chrono::NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Reduce a chart payload to the requested ticker's close series.
///
/// Providers may return several result entries; we select the one whose meta
/// symbol matches (falling back to a sole entry). A missing close column is a
/// fetch failure, not a crash. Null cells are skipped row-wise.
fn flatten_chart(
    ticker: &str,
    body: &ChartEnvelope,
    range: &DateRange,
) -> Result<TimeSeries, AppError> {
    let results = body
        .chart
        .result
        .as_deref()
        .filter(|r| !r.is_empty())
        .ok_or_else(|| AppError::new(4, format!("Empty chart result for {ticker}.")))?;

    let entry = results
        .iter()
        .find(|r| r.meta.symbol.eq_ignore_ascii_case(ticker))
        .or(if results.len() == 1 { results.first() } else { None })
        .ok_or_else(|| {
            AppError::new(4, format!("No chart entry matches ticker {ticker}."))
        })?;

    let closes = entry
        .indicators
        .quote
        .first()
        .filter(|q| !q.close.is_empty())
        .map(|q| &q.close)
        .ok_or_else(|| AppError::new(4, format!("No close column for {ticker}.")))?;

    let mut points = Vec::new();
    for (ts, close) in entry.timestamp.iter().zip(closes.iter()) {
        let Some(value) = close else { continue };
        let Some(date) = DateTime::from_timestamp(*ts, 0).map(|dt| dt.date_naive()) else {
            continue;
        };
        if range.contains(date) {
            points.push((date, *value));
        }
    }
    Ok(TimeSeries::from_points(points))
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartNode,
}

#[derive(Debug, Deserialize)]
struct ChartNode {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    symbol: String,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    close: Vec<Option<f64>>,
}
