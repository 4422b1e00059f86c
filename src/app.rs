//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the indicator selection and display range
//! - runs the fetch/metrics pipeline through the shared cache
//! - prints cards, change lines, or the comparison CSV

use clap::Parser;

use crate::cli::{Cli, Command, DashboardArgs, RunArgs};
use crate::data::cache::SeriesCache;
use crate::data::jgb::JgbClient;
use crate::data::quote::QuoteClient;
use crate::domain::catalog;
use crate::domain::LookbackWindow;
use crate::error::AppError;

pub mod pipeline;

use pipeline::Selection;

/// Entry point for the `mdash` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Dashboard(args) => handle_dashboard(args),
        Command::Compare(args) => handle_compare(args),
        Command::List => {
            print!("{}", crate::report::format_catalog());
            Ok(())
        }
    }
}

fn handle_dashboard(args: DashboardArgs) -> Result<(), AppError> {
    let range = args.run.resolve_range(today())?;
    let selection = resolve_selection(&args.run)?;
    let windows = LookbackWindow::default_set();
    let cache = SeriesCache::new(QuoteClient::new(), JgbClient::new());

    let run = pipeline::run_dashboard(&cache, &selection, &range, &windows);
    if args.lines {
        for line in crate::report::format_change_lines(&run, &windows) {
            println!("{line}");
        }
    } else {
        print!("{}", crate::report::format_cards(&run, &windows));
    }

    Ok(())
}

fn handle_compare(args: RunArgs) -> Result<(), AppError> {
    let range = args.resolve_range(today())?;
    let selection = resolve_selection(&args)?;
    let cache = SeriesCache::new(QuoteClient::new(), JgbClient::new());

    let table = pipeline::run_comparison(&cache, &selection, &range);
    if table.columns.is_empty() {
        return Err(AppError::new(3, "No usable series for the requested range."));
    }
    print!("{}", crate::report::comparison_to_csv(&table));

    Ok(())
}

/// Resolve `--select`/`--ticker` flags into a concrete selection.
///
/// With neither flag the catalog's default selection is used. Unknown labels
/// are a usage error rather than a silent skip.
fn resolve_selection(args: &RunArgs) -> Result<Selection, AppError> {
    if args.select.is_empty() && args.tickers.is_empty() {
        return Ok(Selection::from_indicators(catalog::default_selection()));
    }

    let mut selection = Selection::default();
    for label in &args.select {
        let indicator = catalog::find(label).ok_or_else(|| {
            AppError::new(
                2,
                format!("Unknown catalog label \"{label}\". Run `mdash list` to see valid labels."),
            )
        })?;
        selection.push_indicator(indicator);
    }
    for ticker in &args.tickers {
        selection.push_custom_ticker(ticker);
    }

    if selection.is_empty() {
        return Err(AppError::new(2, "Nothing selected."));
    }
    Ok(selection)
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::RangePreset;

    fn args() -> RunArgs {
        RunArgs {
            preset: RangePreset::ThreeMonths,
            start: None,
            end: None,
            select: Vec::new(),
            tickers: Vec::new(),
        }
    }

    #[test]
    fn no_flags_falls_back_to_the_default_selection() {
        let selection = resolve_selection(&args()).unwrap();
        assert!(!selection.is_empty());
        assert_eq!(selection.items.len(), catalog::default_selection().len());
    }

    #[test]
    fn unknown_label_is_a_usage_error() {
        let mut a = args();
        a.select = vec!["No Such Indicator".to_string()];
        let err = resolve_selection(&a).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn labels_and_tickers_combine_in_order() {
        let mut a = args();
        a.select = vec!["Gold".to_string()];
        a.tickers = vec!["tsla".to_string()];
        let selection = resolve_selection(&a).unwrap();
        assert_eq!(selection.items.len(), 2);
        assert_eq!(selection.items[0].label, "Gold");
        assert_eq!(selection.items[1].label, "Custom: TSLA");
    }
}
