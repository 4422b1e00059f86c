//! Comparison normalization: re-base heterogeneous series for joint plotting.
//!
//! Each series is divided by its own first valid observation and multiplied by
//! 100, so every column starts at exactly 100 and only relative shape remains.
//! Columns are joined on the union of all dates; interior gaps are linearly
//! interpolated (weighted by calendar distance) but values are never
//! extrapolated past a column's own first/last observation.
//!
//! The output is suitable only for relative comparison, never for
//! absolute-value display.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use log::warn;

use crate::domain::{ComparisonColumn, ComparisonTable, TimeSeries};

/// Build the joint comparison table.
///
/// Input order is preserved in the output columns, and series that cannot be
/// re-based (empty, or anchored at zero) are excluded with a warning in input
/// order, so warnings shown to the user stay deterministic per label.
pub fn build_comparison(series_by_label: &[(String, TimeSeries)]) -> ComparisonTable {
    let mut rebased: Vec<(String, BTreeMap<NaiveDate, f64>)> = Vec::new();
    let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();

    for (label, series) in series_by_label {
        let Some((_, anchor)) = series.first() else {
            warn!("{label}: no valid observations, excluded from comparison");
            continue;
        };
        if anchor == 0.0 {
            warn!("{label}: first observation is zero, cannot re-base, excluded");
            continue;
        }
        let column: BTreeMap<NaiveDate, f64> = series
            .points()
            .iter()
            .map(|(d, v)| (*d, v / anchor * 100.0))
            .collect();
        dates.extend(column.keys().copied());
        rebased.push((label.clone(), column));
    }

    let dates: Vec<NaiveDate> = dates.into_iter().collect();
    let columns = rebased
        .into_iter()
        .map(|(label, column)| {
            let mut values: Vec<Option<f64>> =
                dates.iter().map(|d| column.get(d).copied()).collect();
            interpolate_gaps(&dates, &mut values);
            ComparisonColumn { label, values }
        })
        .collect();

    ComparisonTable { dates, columns }
}

/// Fill interior `None` runs by linear interpolation between the surrounding
/// known values, weighted by calendar-day distance.
///
/// Leading and trailing gaps are left untouched.
fn interpolate_gaps(dates: &[NaiveDate], values: &mut [Option<f64>]) {
    let mut prev_known: Option<usize> = None;
    let mut i = 0;
    while i < values.len() {
        if values[i].is_some() {
            prev_known = Some(i);
            i += 1;
            continue;
        }
        // Start of a gap: find the next known value.
        let Some(lo) = prev_known else {
            i += 1;
            continue;
        };
        let Some(hi) = (i..values.len()).find(|&j| values[j].is_some()) else {
            break;
        };
        let (v_lo, v_hi) = (values[lo].unwrap_or(0.0), values[hi].unwrap_or(0.0));
        let span = (dates[hi] - dates[lo]).num_days() as f64;
        for j in i..hi {
            let offset = (dates[j] - dates[lo]).num_days() as f64;
            values[j] = Some(v_lo + (v_hi - v_lo) * offset / span);
        }
        prev_known = Some(hi);
        i = hi + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn labeled(label: &str, points: Vec<(NaiveDate, f64)>) -> (String, TimeSeries) {
        (label.to_string(), TimeSeries::from_points(points))
    }

    #[test]
    fn every_column_starts_at_exactly_100() {
        let table = build_comparison(&[
            labeled("a", vec![(d(2025, 1, 1), 250.0), (d(2025, 1, 2), 275.0)]),
            labeled("b", vec![(d(2025, 1, 2), 0.04), (d(2025, 1, 3), 0.05)]),
        ]);
        for column in &table.columns {
            let first = column.values.iter().flatten().next().copied().unwrap();
            assert_eq!(first, 100.0);
        }
    }

    #[test]
    fn rebasing_round_trips_against_the_raw_series() {
        let raw = vec![(d(2025, 1, 1), 38_000.0), (d(2025, 1, 2), 39_500.0), (d(2025, 1, 3), 37_100.0)];
        let table = build_comparison(&[labeled("nikkei", raw.clone())]);
        let column = &table.columns[0];
        for (i, (_, value)) in raw.iter().enumerate() {
            let expected = value / raw[0].1 * 100.0;
            assert_eq!(column.values[i], Some(expected));
        }
    }

    #[test]
    fn join_is_the_sorted_union_of_dates() {
        let table = build_comparison(&[
            labeled("a", vec![(d(2025, 1, 1), 1.0), (d(2025, 1, 3), 2.0)]),
            labeled("b", vec![(d(2025, 1, 2), 1.0), (d(2025, 1, 4), 2.0)]),
        ]);
        assert_eq!(
            table.dates,
            vec![d(2025, 1, 1), d(2025, 1, 2), d(2025, 1, 3), d(2025, 1, 4)]
        );
    }

    #[test]
    fn interior_gaps_interpolate_by_calendar_distance() {
        let table = build_comparison(&[
            // Known at Jan 1 (=100) and Jan 5 (=200), with Jan 2 present on
            // the axis via the other column.
            labeled("sparse", vec![(d(2025, 1, 1), 10.0), (d(2025, 1, 5), 20.0)]),
            labeled("daily", vec![(d(2025, 1, 2), 1.0), (d(2025, 1, 3), 1.0)]),
        ]);
        let sparse = table.columns.iter().find(|c| c.label == "sparse").unwrap();
        // Axis: Jan 1, 2, 3, 5. One day into a four-day span of +100.
        assert_eq!(sparse.values[0], Some(100.0));
        assert_eq!(sparse.values[1], Some(125.0));
        assert_eq!(sparse.values[2], Some(150.0));
        assert_eq!(sparse.values[3], Some(200.0));
    }

    #[test]
    fn no_extrapolation_outside_a_columns_own_span() {
        let table = build_comparison(&[
            labeled("late", vec![(d(2025, 1, 3), 5.0), (d(2025, 1, 4), 6.0)]),
            labeled("early", vec![(d(2025, 1, 1), 2.0), (d(2025, 1, 2), 3.0)]),
        ]);
        let late = table.columns.iter().find(|c| c.label == "late").unwrap();
        assert_eq!(late.values[0], None);
        assert_eq!(late.values[1], None);
        let early = table.columns.iter().find(|c| c.label == "early").unwrap();
        assert_eq!(early.values[2], None);
        assert_eq!(early.values[3], None);
    }

    #[test]
    fn unusable_series_are_excluded_not_constant_columns() {
        let table = build_comparison(&[
            labeled("empty", vec![]),
            labeled("zero-anchor", vec![(d(2025, 1, 1), 0.0), (d(2025, 1, 2), 1.0)]),
            labeled("ok", vec![(d(2025, 1, 1), 1.0), (d(2025, 1, 2), 2.0)]),
        ]);
        assert_eq!(table.columns.len(), 1);
        assert_eq!(table.columns[0].label, "ok");
    }

    #[test]
    fn input_order_is_preserved_in_columns() {
        let table = build_comparison(&[
            labeled("z", vec![(d(2025, 1, 1), 1.0)]),
            labeled("a", vec![(d(2025, 1, 1), 1.0)]),
        ]);
        let labels: Vec<&str> = table.columns.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["z", "a"]);
    }
}
