//! Japanese-era ("wareki") date parsing.
//!
//! The MOF yield CSVs carry their reference-date column as era strings such as
//! `R6.4.1` (Reiwa year 6, April 1st). This is domain data, not logic to
//! special-case per call site, so it lives here as a single pure function.

use chrono::NaiveDate;

/// Parse an era date of the form `<EraLetter><Year>.<Month>.<Day>`.
///
/// Recognized era letters and their Gregorian base years:
///
/// | letter | era    | base |
/// |--------|--------|------|
/// | `M`    | Meiji  | 1867 |
/// | `T`    | Taisho | 1911 |
/// | `S`    | Showa  | 1925 |
/// | `H`    | Heisei | 1988 |
/// | `R`    | Reiwa  | 2018 |
/// | `E`    | Excel misconversion of `R`, treated identically | 2018 |
///
/// The Gregorian year is `base + year`. Returns `None` on a pattern mismatch,
/// an unknown era letter, or calendar-invalid components; upstream CSV rows
/// are frequently blank, and blank cells must not error.
pub fn parse_wareki(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    let mut chars = trimmed.chars();
    let era = chars.next()?;

    let base_year = match era {
        'M' => 1867,
        'T' => 1911,
        'S' => 1925,
        'H' => 1988,
        'R' | 'E' => 2018,
        _ => return None,
    };

    let rest = chars.as_str();
    let mut parts = rest.split('.');
    let year: i32 = parse_component(parts.next()?)?;
    let month: u32 = parse_component(parts.next()?)?;
    let day: u32 = parse_component(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    if year < 1 {
        return None;
    }

    NaiveDate::from_ymd_opt(base_year + year, month, day)
}

fn parse_component<T: std::str::FromStr>(raw: &str) -> Option<T> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn era_base_years() {
        assert_eq!(parse_wareki("M45.7.30"), Some(d(1912, 7, 30)));
        assert_eq!(parse_wareki("T15.12.25"), Some(d(1926, 12, 25)));
        assert_eq!(parse_wareki("S64.1.7"), Some(d(1989, 1, 7)));
        assert_eq!(parse_wareki("H1.4.1"), Some(d(1989, 4, 1)));
        assert_eq!(parse_wareki("R1.5.1"), Some(d(2019, 5, 1)));
    }

    #[test]
    fn excel_misconversion_is_an_alias_of_reiwa() {
        assert_eq!(parse_wareki("E1.5.1"), parse_wareki("R1.5.1"));
    }

    #[test]
    fn rejects_unknown_era_and_malformed_input() {
        assert_eq!(parse_wareki("X5.1.1"), None);
        assert_eq!(parse_wareki("1.1.1"), None);
        assert_eq!(parse_wareki(""), None);
        assert_eq!(parse_wareki("-"), None);
        assert_eq!(parse_wareki("R1.5"), None);
        assert_eq!(parse_wareki("R1.5.1.2"), None);
        assert_eq!(parse_wareki("R1.5.1x"), None);
    }

    #[test]
    fn rejects_calendar_invalid_components() {
        assert_eq!(parse_wareki("R1.13.1"), None);
        assert_eq!(parse_wareki("R1.2.30"), None);
        assert_eq!(parse_wareki("R0.1.1"), None);
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        assert_eq!(parse_wareki(" R6.4.1 "), Some(d(2024, 4, 1)));
    }
}
