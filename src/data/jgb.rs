//! Sovereign-yield adapter for the MOF JGB CSV feeds.
//!
//! The Ministry of Finance publishes yield-by-maturity as two Shift-JIS CSV
//! resources: a historical archive and a "current" supplement covering the
//! most recent sessions. Both have a title line above the header row and an
//! era-formatted `基準日` (reference date) column, and their maturity columns
//! drift over time.
//!
//! Design goals, in the spirit of the CSV ingest rules used elsewhere:
//!
//! - **Row-level tolerance**: a malformed date or numeric cell drops that row,
//!   never the whole request
//! - **Deterministic merging**: duplicate dates across the two feeds resolve
//!   to the current supplement's value (the corrected source)
//! - **Degraded, not raised**: any network/parse/schema failure yields an
//!   empty series plus a logged diagnostic

use std::collections::BTreeMap;

use chrono::NaiveDate;
use log::{debug, warn};
use reqwest::blocking::Client;

use crate::data::wareki::parse_wareki;
use crate::domain::{DateRange, TimeSeries};
use crate::error::AppError;

pub const HISTORICAL_URL: &str =
    "https://www.mof.go.jp/jgbs/reference/interest_rate/data/jgbcm_all.csv";
pub const CURRENT_URL: &str = "https://www.mof.go.jp/jgbs/reference/interest_rate/jgbcm.csv";

const DATE_COLUMN: &str = "基準日";
const NO_DATA_MARKER: &str = "-";

/// One of the two fixed CSV endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JgbResource {
    /// Full archive (`jgbcm_all.csv`).
    Historical,
    /// Recent-session supplement (`jgbcm.csv`).
    Current,
}

impl JgbResource {
    pub const ALL: [JgbResource; 2] = [JgbResource::Historical, JgbResource::Current];

    pub fn url(self) -> &'static str {
        match self {
            JgbResource::Historical => HISTORICAL_URL,
            JgbResource::Current => CURRENT_URL,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            JgbResource::Historical => "historical archive",
            JgbResource::Current => "current supplement",
        }
    }
}

/// Blocking download of one raw CSV resource, decoded to UTF-8 text.
///
/// The cache layer interposes on this trait so raw bodies can be memoized
/// independently of the query's date range.
pub trait JgbDownload {
    fn download(&self, resource: JgbResource) -> Result<String, AppError>;
}

/// HTTP implementation against the MOF endpoints.
pub struct JgbClient {
    client: Client,
}

impl JgbClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for JgbClient {
    fn default() -> Self {
        Self::new()
    }
}

impl JgbDownload for JgbClient {
    fn download(&self, resource: JgbResource) -> Result<String, AppError> {
        let resp = self.client.get(resource.url()).send().map_err(|e| {
            AppError::new(4, format!("JGB {} request failed: {e}", resource.label()))
        })?;
        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!(
                    "JGB {} request failed with status {}.",
                    resource.label(),
                    resp.status()
                ),
            ));
        }
        let bytes = resp.bytes().map_err(|e| {
            AppError::new(4, format!("JGB {} body read failed: {e}", resource.label()))
        })?;
        let (text, _, _) = encoding_rs::SHIFT_JIS.decode(&bytes);
        Ok(text.into_owned())
    }
}

/// Produce the yield series for one maturity term over `range`.
///
/// Never errors: failures degrade to an empty series with a warning, and an
/// empty series is a valid outcome the caller must expect.
pub fn yield_series<D: JgbDownload + ?Sized>(
    source: &D,
    term: &str,
    range: &DateRange,
) -> TimeSeries {
    match try_yield_series(source, term, range) {
        Ok(series) => series,
        Err(err) => {
            warn!("JGB yield fetch for term '{term}' degraded to empty: {err}");
            TimeSeries::empty()
        }
    }
}

fn try_yield_series<D: JgbDownload + ?Sized>(
    source: &D,
    term: &str,
    range: &DateRange,
) -> Result<TimeSeries, AppError> {
    let historical = parse_yield_table(&source.download(JgbResource::Historical)?)?;
    let current = parse_yield_table(&source.download(JgbResource::Current)?)?;
    let merged = merge_tables(historical, current);

    let term_idx = merged
        .terms
        .iter()
        .position(|t| t == term)
        .ok_or_else(|| {
            AppError::new(
                4,
                format!("Maturity term '{term}' is not present in both JGB feeds."),
            )
        })?;

    let mut points = Vec::new();
    for (date, cells) in &merged.rows {
        if !range.contains(*date) {
            continue;
        }
        // `None` covers both the explicit "-" marker and malformed numerics;
        // either way the row is skipped for this term.
        if let Some(value) = cells[term_idx] {
            points.push((*date, value));
        }
    }
    Ok(TimeSeries::from_points(points))
}

/// One parsed feed: maturity column labels plus rows of per-term cells.
pub(crate) struct YieldTable {
    pub terms: Vec<String>,
    pub rows: Vec<(NaiveDate, Vec<Option<f64>>)>,
}

/// Both feeds merged: columns common to both, rows keyed by date ascending.
struct MergedTable {
    terms: Vec<String>,
    rows: BTreeMap<NaiveDate, Vec<Option<f64>>>,
}

/// Parse one decoded CSV body.
///
/// The first line is a title and is skipped; the second line is the header.
/// Rows whose date cell does not parse as an era date are dropped.
pub(crate) fn parse_yield_table(text: &str) -> Result<YieldTable, AppError> {
    let body = text
        .split_once('\n')
        .map(|(_, rest)| rest)
        .ok_or_else(|| AppError::new(4, "JGB CSV is missing its header line."))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(4, format!("Failed to read JGB CSV headers: {e}")))?
        .clone();

    let mut date_idx = None;
    let mut terms = Vec::new();
    let mut term_cols = Vec::new();
    for (idx, name) in headers.iter().enumerate() {
        // Strip a possible BOM so schema detection doesn't misfire.
        let name = name.trim().trim_start_matches('\u{feff}');
        if name == DATE_COLUMN {
            date_idx = Some(idx);
        } else if !name.is_empty() {
            terms.push(name.to_string());
            term_cols.push(idx);
        }
    }
    let date_idx = date_idx.ok_or_else(|| {
        AppError::new(4, format!("JGB CSV has no '{DATE_COLUMN}' column."))
    })?;

    let mut rows = Vec::new();
    let mut rows_dropped = 0usize;
    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(_) => {
                rows_dropped += 1;
                continue;
            }
        };
        let date = match record.get(date_idx).and_then(parse_wareki) {
            Some(d) => d,
            None => {
                rows_dropped += 1;
                continue;
            }
        };
        let cells = term_cols
            .iter()
            .map(|&col| record.get(col).and_then(parse_numeric_cell))
            .collect();
        rows.push((date, cells));
    }

    if rows_dropped > 0 {
        debug!("JGB CSV parse dropped {rows_dropped} unusable row(s).");
    }

    Ok(YieldTable { terms, rows })
}

fn parse_numeric_cell(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == NO_DATA_MARKER {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}

/// Merge the two feeds on the columns they share.
///
/// Historical rows are inserted first, then current rows, so a date present in
/// both resolves to the current supplement's values.
fn merge_tables(historical: YieldTable, current: YieldTable) -> MergedTable {
    let terms: Vec<String> = historical
        .terms
        .iter()
        .filter(|t| current.terms.contains(t))
        .cloned()
        .collect();

    let hist_cols: Vec<usize> = terms
        .iter()
        .map(|t| historical.terms.iter().position(|h| h == t).unwrap_or(0))
        .collect();
    let curr_cols: Vec<usize> = terms
        .iter()
        .map(|t| current.terms.iter().position(|c| c == t).unwrap_or(0))
        .collect();

    let mut rows = BTreeMap::new();
    for (date, cells) in &historical.rows {
        rows.insert(*date, project(cells, &hist_cols));
    }
    for (date, cells) in &current.rows {
        rows.insert(*date, project(cells, &curr_cols));
    }

    MergedTable { terms, rows }
}

fn project(cells: &[Option<f64>], cols: &[usize]) -> Vec<Option<f64>> {
    cols.iter()
        .map(|&c| cells.get(c).copied().flatten())
        .collect()
}
