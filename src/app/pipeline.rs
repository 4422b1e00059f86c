//! Shared dashboard pipeline used by all front-end commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! resolve selection -> fetch (through the cache) -> change metrics / re-basing
//!
//! Fetches run sequentially per label, so warnings reach the operator in a
//! deterministic order. Empty series flow through as valid results: a label
//! whose fetch degraded still gets a card, just one with no metrics.

use chrono::NaiveDate;
use log::warn;

use crate::data::cache::SeriesCache;
use crate::data::jgb::JgbDownload;
use crate::data::quote::QuoteSource;
use crate::domain::catalog::Indicator;
use crate::domain::{
    ChangeResult, ComparisonTable, DateRange, InstrumentCategory, LookbackWindow,
    SeriesIdentity, TimeSeries,
};
use crate::metrics;

/// One resolved instrument to display.
#[derive(Debug, Clone)]
pub struct SelectionItem {
    pub label: String,
    pub identity: SeriesIdentity,
    pub category: InstrumentCategory,
}

/// What the user asked to see: catalog entries plus ad-hoc tickers,
/// in display order.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub items: Vec<SelectionItem>,
}

impl Selection {
    pub fn from_indicators<'a>(indicators: impl IntoIterator<Item = &'a Indicator>) -> Self {
        let mut selection = Self::default();
        for indicator in indicators {
            selection.push_indicator(indicator);
        }
        selection
    }

    pub fn push_indicator(&mut self, indicator: &Indicator) {
        self.items.push(SelectionItem {
            label: indicator.label.to_string(),
            identity: indicator.identity(),
            category: indicator.change_category(),
        });
    }

    /// Ad-hoc tickers are always price-like quote lookups.
    pub fn push_custom_ticker(&mut self, ticker: &str) {
        let ticker = ticker.trim().to_ascii_uppercase();
        self.items.push(SelectionItem {
            label: format!("Custom: {ticker}"),
            identity: SeriesIdentity::market_quote(ticker),
            category: InstrumentCategory::PriceLike,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Per-label dashboard output: the latest observation plus change metrics.
#[derive(Debug, Clone)]
pub struct DashboardCard {
    pub label: String,
    pub latest: Option<(NaiveDate, f64)>,
    pub changes: ChangeResult,
}

/// All computed outputs of one dashboard pass.
#[derive(Debug, Clone)]
pub struct DashboardRun {
    pub range: DateRange,
    pub cards: Vec<DashboardCard>,
}

/// Fetch every selected series and compute its change metrics.
pub fn run_dashboard<Q: QuoteSource, D: JgbDownload>(
    cache: &SeriesCache<Q, D>,
    selection: &Selection,
    range: &DateRange,
    windows: &[LookbackWindow],
) -> DashboardRun {
    let mut cards = Vec::with_capacity(selection.items.len());
    for item in &selection.items {
        let series = cache.series(&item.identity, range);
        if series.is_empty() {
            warn!("{}: no data available for the requested range", item.label);
        }
        cards.push(DashboardCard {
            label: item.label.clone(),
            latest: series.last_at_or_before(range.end),
            changes: metrics::compute_changes(&series, range, windows, item.category),
        });
    }
    DashboardRun {
        range: *range,
        cards,
    }
}

/// Fetch every selected series and join them into the re-based comparison
/// table.
pub fn run_comparison<Q: QuoteSource, D: JgbDownload>(
    cache: &SeriesCache<Q, D>,
    selection: &Selection,
    range: &DateRange,
) -> ComparisonTable {
    let labeled: Vec<(String, TimeSeries)> = selection
        .items
        .iter()
        .map(|item| (item.label.clone(), cache.series(&item.identity, range)))
        .collect();
    metrics::build_comparison(&labeled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::jgb::JgbResource;
    use crate::error::AppError;

    struct RampQuotes;

    impl QuoteSource for RampQuotes {
        fn close_series(&self, ticker: &str, range: &DateRange) -> TimeSeries {
            if ticker == "DEAD" {
                return TimeSeries::empty();
            }
            let mut points = Vec::new();
            let mut date = range.start;
            let mut value = 100.0;
            while date <= range.end {
                points.push((date, value));
                value += 1.0;
                date = date.succ_opt().unwrap();
            }
            TimeSeries::from_points(points)
        }
    }

    struct NoJgb;

    impl JgbDownload for NoJgb {
        fn download(&self, _resource: JgbResource) -> Result<String, AppError> {
            Err(AppError::new(4, "unavailable in tests"))
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn cache() -> SeriesCache<RampQuotes, NoJgb> {
        SeriesCache::new(RampQuotes, NoJgb)
    }

    #[test]
    fn dashboard_produces_one_card_per_selected_label() {
        let mut selection = Selection::default();
        selection.push_custom_ticker("aapl");
        selection.push_custom_ticker("MSFT");
        let range = DateRange::new(d(2025, 1, 1), d(2025, 1, 10)).unwrap();

        let run = run_dashboard(&cache(), &selection, &range, &LookbackWindow::default_set());
        assert_eq!(run.cards.len(), 2);
        assert_eq!(run.cards[0].label, "Custom: AAPL");
        assert!(run.cards[0].changes.get("range").is_some());
        assert_eq!(run.cards[0].latest.unwrap().0, d(2025, 1, 10));
    }

    #[test]
    fn degraded_fetch_still_yields_a_card_with_no_metrics() {
        let mut selection = Selection::default();
        selection.push_custom_ticker("DEAD");
        let range = DateRange::new(d(2025, 1, 1), d(2025, 1, 10)).unwrap();

        let run = run_dashboard(&cache(), &selection, &range, &LookbackWindow::default_set());
        assert_eq!(run.cards.len(), 1);
        assert!(run.cards[0].changes.is_empty());
        assert_eq!(run.cards[0].latest, None);
    }

    #[test]
    fn comparison_excludes_degraded_labels_but_keeps_order() {
        let mut selection = Selection::default();
        selection.push_custom_ticker("SPY");
        selection.push_custom_ticker("DEAD");
        selection.push_custom_ticker("QQQ");
        let range = DateRange::new(d(2025, 1, 1), d(2025, 1, 5)).unwrap();

        let table = run_comparison(&cache(), &selection, &range);
        let labels: Vec<&str> = table.columns.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Custom: SPY", "Custom: QQQ"]);
    }
}
