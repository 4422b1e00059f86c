//! Look-back change metrics.
//!
//! For each named window the calculator slices the series ending at the last
//! observation at or before the display range's end, then reports a signed
//! delta: percentage for price-like instruments, absolute points for
//! yield-like ones. A window with fewer than two observations in its slice is
//! omitted from the result; omission signals insufficient data and must stay
//! distinguishable from a true zero change.

use chrono::Months;
use log::debug;

use crate::domain::{
    ChangeResult, DateRange, InstrumentCategory, LookbackWindow, TimeSeries, WindowKind,
};

/// Compute per-window changes for one instrument.
pub fn compute_changes(
    series: &TimeSeries,
    display_range: &DateRange,
    windows: &[LookbackWindow],
    category: InstrumentCategory,
) -> ChangeResult {
    let mut result = ChangeResult::new(category);

    let Some(ref_idx) = series.index_at_or_before(display_range.end) else {
        return result;
    };
    let points = series.points();
    let (ref_date, latest) = points[ref_idx];

    for window in windows {
        let earliest = match window.kind {
            WindowKind::TradingDays(n) => {
                let start_idx = ref_idx.saturating_sub(n);
                if ref_idx - start_idx < 1 {
                    None
                } else {
                    Some(points[start_idx].1)
                }
            }
            WindowKind::CalendarMonths(n) => ref_date
                .checked_sub_months(Months::new(n))
                .and_then(|window_start| {
                    let slice: Vec<f64> = points[..=ref_idx]
                        .iter()
                        .filter(|(d, _)| *d >= window_start)
                        .map(|(_, v)| *v)
                        .collect();
                    if slice.len() >= 2 { slice.first().copied() } else { None }
                }),
            WindowKind::FullRange => {
                let slice: Vec<f64> = points[..=ref_idx]
                    .iter()
                    .filter(|(d, _)| display_range.contains(*d))
                    .map(|(_, v)| *v)
                    .collect();
                if slice.len() >= 2 { slice.first().copied() } else { None }
            }
        };

        let Some(earliest) = earliest else {
            debug!("window '{}' omitted: fewer than two observations", window.name);
            continue;
        };

        let delta = match category {
            InstrumentCategory::YieldLike => latest - earliest,
            InstrumentCategory::PriceLike => {
                if earliest == 0.0 {
                    // A zero base would report infinity; omit instead.
                    debug!("window '{}' omitted: zero-valued base", window.name);
                    continue;
                }
                (latest - earliest) / earliest * 100.0
            }
        };
        result.changes.insert(window.name.clone(), delta);
    }

    result
}

/// Trailing simple moving average over `window` observations.
///
/// The result is aligned with the input; positions with insufficient history
/// are `None`, never zero.
pub fn moving_average(series: &TimeSeries, window: usize) -> Vec<(chrono::NaiveDate, Option<f64>)> {
    let points = series.points();
    if window == 0 {
        return points.iter().map(|(d, _)| (*d, None)).collect();
    }

    let mut out = Vec::with_capacity(points.len());
    let mut running = 0.0;
    for (i, (date, value)) in points.iter().enumerate() {
        running += value;
        if i >= window {
            running -= points[i - window].1;
        }
        if i + 1 >= window {
            out.push((*date, Some(running / window as f64)));
        } else {
            out.push((*date, None));
        }
    }
    out
}
