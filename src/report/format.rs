//! Plain-text rendering of dashboard output.
//!
//! Two audiences share these formatters: the terminal (cards, catalog
//! listing, comparison CSV) and downstream narrative tooling, which takes the
//! change lines as compact one-line-per-indicator input.

use crate::app::pipeline::DashboardRun;
use crate::domain::catalog::{self, MarketCategory};
use crate::domain::{ComparisonTable, InstrumentCategory, LookbackWindow};

/// Render per-indicator cards for the terminal.
pub fn format_cards(run: &DashboardRun, windows: &[LookbackWindow]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== mdash - {} .. {} ===\n",
        run.range.start, run.range.end
    ));
    for card in &run.cards {
        out.push('\n');
        out.push_str(&card.label);
        out.push('\n');
        match card.latest {
            Some((date, value)) => {
                out.push_str(&format!("  last   {value:>12.4}  ({date})\n"));
            }
            None => out.push_str("  last   n/a\n"),
        }
        for window in windows {
            let delta = format_delta(card.changes.category, card.changes.get(&window.name));
            out.push_str(&format!("  {:<6} {delta:>12}\n", window.name));
        }
    }
    out
}

/// One compact line per indicator, for narrative-summary input.
///
/// Example: `Nikkei 225: last 38750.0000 | 5d +1.20% | 1mo -0.85% | ...`
pub fn format_change_lines(run: &DashboardRun, windows: &[LookbackWindow]) -> Vec<String> {
    run.cards
        .iter()
        .map(|card| {
            let mut line = String::new();
            line.push_str(&card.label);
            line.push_str(": last ");
            match card.latest {
                Some((_, value)) => line.push_str(&format!("{value:.4}")),
                None => line.push_str("n/a"),
            }
            for window in windows {
                let delta = format_delta(card.changes.category, card.changes.get(&window.name));
                line.push_str(&format!(" | {} {delta}", window.name));
            }
            line
        })
        .collect()
}

/// Render the comparison table as CSV (header row `date,<labels...>`).
///
/// Missing cells stay empty. Labels containing commas or quotes are quoted so
/// the output loads cleanly in spreadsheet tools.
pub fn comparison_to_csv(table: &ComparisonTable) -> String {
    let mut out = String::from("date");
    for column in &table.columns {
        out.push(',');
        out.push_str(&csv_field(&column.label));
    }
    out.push('\n');
    for (i, date) in table.dates.iter().enumerate() {
        out.push_str(&date.to_string());
        for column in &table.columns {
            out.push(',');
            if let Some(value) = column.values[i] {
                out.push_str(&format!("{value:.4}"));
            }
        }
        out.push('\n');
    }
    out
}

fn csv_field(label: &str) -> String {
    if label.contains(',') || label.contains('"') {
        format!("\"{}\"", label.replace('"', "\"\""))
    } else {
        label.to_string()
    }
}

/// List the built-in catalog, grouped by market category. Entries in the
/// default selection are marked with `*`.
pub fn format_catalog() -> String {
    let mut out = String::new();
    for category in MarketCategory::ALL {
        out.push_str(&format!("{}\n", category.display_name()));
        for indicator in catalog::by_category(category) {
            let marker = if indicator.default_selected { '*' } else { ' ' };
            out.push_str(&format!("  {marker} {}\n", indicator.label));
        }
        out.push('\n');
    }
    out.push_str("* = in the default selection\n");
    out
}

/// Yield-like deltas are absolute (percentage points); price-like deltas are
/// relative percentages. Omitted windows render as `n/a`.
fn format_delta(category: InstrumentCategory, value: Option<f64>) -> String {
    match (category, value) {
        (InstrumentCategory::PriceLike, Some(v)) => format!("{v:+.2}%"),
        (InstrumentCategory::YieldLike, Some(v)) => format!("{v:+.2}pt"),
        (_, None) => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::DashboardCard;
    use crate::domain::{ChangeResult, ComparisonColumn, DateRange};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn run_with(cards: Vec<DashboardCard>) -> DashboardRun {
        DashboardRun {
            range: DateRange::new(d(2025, 1, 1), d(2025, 3, 31)).unwrap(),
            cards,
        }
    }

    fn changes(category: InstrumentCategory, pairs: &[(&str, f64)]) -> ChangeResult {
        let mut map = BTreeMap::new();
        for (name, value) in pairs {
            map.insert(name.to_string(), *value);
        }
        ChangeResult {
            category,
            changes: map,
        }
    }

    #[test]
    fn price_like_deltas_render_as_signed_percentages() {
        let run = run_with(vec![DashboardCard {
            label: "S&P 500 ETF".to_string(),
            latest: Some((d(2025, 3, 31), 512.5)),
            changes: changes(InstrumentCategory::PriceLike, &[("5d", 1.234), ("1mo", -0.5)]),
        }]);
        let windows = [
            LookbackWindow::trading_days("5d", 5),
            LookbackWindow::calendar_months("1mo", 1),
        ];
        let lines = format_change_lines(&run, &windows);
        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0],
            "S&P 500 ETF: last 512.5000 | 5d +1.23% | 1mo -0.50%"
        );
    }

    #[test]
    fn yield_like_deltas_render_in_points() {
        let run = run_with(vec![DashboardCard {
            label: "JGB 10Y".to_string(),
            latest: Some((d(2025, 3, 31), 1.08)),
            changes: changes(InstrumentCategory::YieldLike, &[("5d", 0.05)]),
        }]);
        let windows = [LookbackWindow::trading_days("5d", 5)];
        let lines = format_change_lines(&run, &windows);
        assert_eq!(lines[0], "JGB 10Y: last 1.0800 | 5d +0.05pt");
    }

    #[test]
    fn omitted_windows_render_as_n_a() {
        let run = run_with(vec![DashboardCard {
            label: "Thin".to_string(),
            latest: None,
            changes: changes(InstrumentCategory::PriceLike, &[]),
        }]);
        let windows = [LookbackWindow::trading_days("5d", 5)];
        let lines = format_change_lines(&run, &windows);
        assert_eq!(lines[0], "Thin: last n/a | 5d n/a");

        let cards = format_cards(&run, &windows);
        assert!(cards.contains("last   n/a"));
    }

    #[test]
    fn comparison_csv_has_a_header_and_empty_cells_for_gaps() {
        let table = ComparisonTable {
            dates: vec![d(2025, 1, 1), d(2025, 1, 2)],
            columns: vec![
                ComparisonColumn {
                    label: "Gold".to_string(),
                    values: vec![Some(100.0), Some(101.25)],
                },
                ComparisonColumn {
                    label: "BTC, spot".to_string(),
                    values: vec![None, Some(100.0)],
                },
            ],
        };
        let csv = comparison_to_csv(&table);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("date,Gold,\"BTC, spot\""));
        assert_eq!(lines.next(), Some("2025-01-01,100.0000,"));
        assert_eq!(lines.next(), Some("2025-01-02,101.2500,100.0000"));
    }

    #[test]
    fn catalog_listing_covers_every_category() {
        let listing = format_catalog();
        for category in MarketCategory::ALL {
            assert!(listing.contains(category.display_name()));
        }
        assert!(listing.contains("* "));
    }
}
