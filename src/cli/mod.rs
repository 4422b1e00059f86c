//! Command-line parsing for the economic dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the data/metrics code. Date-range presets mirror
//! the ones the dashboard UI offered (day-over-day through five years), with
//! explicit `--start`/`--end` taking precedence.

use chrono::{Days, Months, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::DateRange;
use crate::error::AppError;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "mdash", version, about = "Global economic dashboard (terminal front-end)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print per-indicator cards: latest value plus change metrics.
    Dashboard(DashboardArgs),
    /// Print the re-based comparison table as CSV on stdout.
    Compare(RunArgs),
    /// List the built-in indicator catalog.
    List,
}

/// Dashboard-specific options on top of the shared fetch options.
#[derive(Debug, Parser, Clone)]
pub struct DashboardArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Emit one compact line per indicator instead of cards, suitable as
    /// input for downstream summary tooling.
    #[arg(long)]
    pub lines: bool,
}

/// Common options for commands that fetch series.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Display-range preset; ignored when --start is given.
    #[arg(short = 'p', long, value_enum, default_value_t = RangePreset::ThreeMonths)]
    pub preset: RangePreset,

    /// Explicit range start (YYYY-MM-DD).
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Explicit range end (YYYY-MM-DD); defaults to today when --start is given.
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Catalog labels to include (repeatable). Defaults to the catalog's
    /// default selection when neither --select nor --ticker is given.
    #[arg(short = 's', long = "select", value_name = "LABEL")]
    pub select: Vec<String>,

    /// Ad-hoc ticker symbols to include alongside catalog entries (repeatable).
    #[arg(short = 't', long = "ticker", value_name = "SYMBOL")]
    pub tickers: Vec<String>,
}

/// Display-range presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RangePreset {
    /// Previous session versus the day before (a two-day window).
    #[value(name = "day")]
    Day,
    #[value(name = "1w")]
    Week,
    #[value(name = "1mo")]
    OneMonth,
    #[value(name = "3mo")]
    ThreeMonths,
    #[value(name = "1y")]
    OneYear,
    #[value(name = "5y")]
    FiveYears,
}

impl RunArgs {
    /// Resolve the display range from flags, relative to `today`.
    pub fn resolve_range(&self, today: NaiveDate) -> Result<DateRange, AppError> {
        match (self.start, self.end) {
            (Some(start), end) => DateRange::new(start, end.unwrap_or(today)),
            (None, Some(_)) => Err(AppError::new(2, "--end requires --start.")),
            (None, None) => self.preset.resolve(today),
        }
    }
}

impl RangePreset {
    pub fn resolve(self, today: NaiveDate) -> Result<DateRange, AppError> {
        let start = match self {
            RangePreset::Day => today.checked_sub_days(Days::new(2)),
            RangePreset::Week => today.checked_sub_days(Days::new(7)),
            RangePreset::OneMonth => today.checked_sub_months(Months::new(1)),
            RangePreset::ThreeMonths => today.checked_sub_months(Months::new(3)),
            RangePreset::OneYear => today.checked_sub_months(Months::new(12)),
            RangePreset::FiveYears => today.checked_sub_months(Months::new(60)),
        }
        .ok_or_else(|| AppError::new(2, "Preset start date is out of calendar range."))?;
        DateRange::new(start, today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

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
    fn preset_resolves_relative_to_today() {
        let range = RangePreset::OneMonth.resolve(d(2025, 3, 31)).unwrap();
        assert_eq!(range.start, d(2025, 2, 28));
        assert_eq!(range.end, d(2025, 3, 31));

        let day = RangePreset::Day.resolve(d(2025, 3, 31)).unwrap();
        assert_eq!(day.start, d(2025, 3, 29));
    }

    #[test]
    fn explicit_start_overrides_the_preset() {
        let mut a = args();
        a.start = Some(d(2025, 1, 1));
        let range = a.resolve_range(d(2025, 3, 31)).unwrap();
        assert_eq!(range.start, d(2025, 1, 1));
        assert_eq!(range.end, d(2025, 3, 31));
    }

    #[test]
    fn end_without_start_is_a_usage_error() {
        let mut a = args();
        a.end = Some(d(2025, 1, 1));
        assert!(a.resolve_range(d(2025, 3, 31)).is_err());
    }
}
