//! Lenient cell coercion.
//!
//! Every function takes the raw cell text and returns a typed value or the
//! given fallback. None of them fail: a bad cell degrades to its default and
//! the record is still parsed.

use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d", "%d.%m.%Y"];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y %H:%M:%S"];

// Spreadsheet serial dates count days from 1899-12-30 (1900 date system).
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);
const MAX_SERIAL_DAY: i64 = 2_958_465;

/// Trimmed text, empty when the cell is blank.
pub fn text(cell: Option<&str>) -> String {
    cell.map(str::trim).unwrap_or_default().to_string()
}

/// Trimmed text, `None` when the cell is blank.
pub fn optional_text(cell: Option<&str>) -> Option<String> {
    cell.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub fn decimal_or(cell: Option<&str>, default: Decimal) -> Decimal {
    cell.and_then(parse_decimal).unwrap_or(default)
}

/// Integer value; integral decimals such as `2.0` are accepted.
pub fn integer_or(cell: Option<&str>, default: i64) -> i64 {
    cell.and_then(|raw| {
        let trimmed = raw.trim();
        trimmed.parse::<i64>().ok().or_else(|| {
            parse_decimal(trimmed)
                .filter(|d| d.fract().is_zero())
                .and_then(|d| d.to_i64())
        })
    })
    .unwrap_or(default)
}

pub fn date_or(cell: Option<&str>, fallback: NaiveDate) -> NaiveDate {
    optional_date(cell).unwrap_or(fallback)
}

pub fn optional_date(cell: Option<&str>) -> Option<NaiveDate> {
    cell.and_then(parse_date)
}

/// Parse an amount as found in invoice sheets.
///
/// Accepts plain decimals, an `Rp` prefix, scientific notation and grouped
/// thousands in either convention (`3,000,000.50` or `3.000.000,50`). A lone
/// comma followed by exactly three digits is read as grouping. A lone dot is a
/// decimal point, except after an `Rp` prefix where it follows the comma rule
/// (`Rp 500.000` is five hundred thousand).
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let mut s: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let rupiah = s.get(..2).is_some_and(|prefix| prefix.eq_ignore_ascii_case("rp"));
    if rupiah {
        s.drain(..2);
    }
    let s = s.as_str();
    if s.is_empty() {
        return None;
    }

    if rupiah && is_dot_grouped_thousands(s) {
        return Decimal::from_str(&s.replace('.', "")).ok();
    }
    if let Ok(d) = Decimal::from_str(s) {
        return Some(d);
    }
    if s.contains(['e', 'E']) {
        return Decimal::from_scientific(s).ok();
    }

    let normalized = normalize_separators(s)?;
    Decimal::from_str(&normalized).ok()
}

/// A single dot followed by exactly three digits and no comma.
fn is_dot_grouped_thousands(s: &str) -> bool {
    !s.contains(',')
        && s.matches('.').count() == 1
        && s.rfind('.').is_some_and(|dot| {
            let fraction = &s[dot + 1..];
            fraction.len() == 3 && fraction.bytes().all(|b| b.is_ascii_digit())
        })
}

fn normalize_separators(s: &str) -> Option<String> {
    let last_comma = s.rfind(',');
    let last_dot = s.rfind('.');

    let normalized = match (last_comma, last_dot) {
        (Some(c), Some(d)) if c > d => s.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => s.replace(',', ""),
        (Some(c), None) => {
            if s.matches(',').count() > 1 || s.len() - c - 1 == 3 {
                s.replace(',', "")
            } else {
                s.replace(',', ".")
            }
        }
        (None, Some(_)) if s.matches('.').count() > 1 => s.replace('.', ""),
        _ => return None,
    };

    Some(normalized)
}

/// Parse a date in the formats commonly produced by spreadsheets, including
/// serial day numbers.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    serial_date(s)
}

fn serial_date(s: &str) -> Option<NaiveDate> {
    let days = Decimal::from_str(s).ok()?.trunc().to_i64()?;
    if !(1..=MAX_SERIAL_DAY).contains(&days) {
        return None;
    }
    let (y, m, d) = SERIAL_EPOCH;
    NaiveDate::from_ymd_opt(y, m, d)?.checked_add_signed(Duration::days(days))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn text_trims_and_defaults() {
        assert_eq!(text(Some("  INV-1 ")), "INV-1");
        assert_eq!(text(None), "");
        assert_eq!(optional_text(Some("   ")), None);
        assert_eq!(optional_text(Some(" note ")), Some("note".to_string()));
    }

    #[test]
    fn decimal_accepts_common_spellings() {
        assert_eq!(parse_decimal("1500.50"), Some(dec!(1500.50)));
        assert_eq!(parse_decimal("3,000,000"), Some(dec!(3000000)));
        assert_eq!(parse_decimal("3.000.000"), Some(dec!(3000000)));
        assert_eq!(parse_decimal("3.000.000,50"), Some(dec!(3000000.50)));
        assert_eq!(parse_decimal("3,000,000.50"), Some(dec!(3000000.50)));
        assert_eq!(parse_decimal("Rp 2.000.000"), Some(dec!(2000000)));
        assert_eq!(parse_decimal("Rp 500.000"), Some(dec!(500000)));
        assert_eq!(parse_decimal("rp1.500"), Some(dec!(1500)));
        assert_eq!(parse_decimal("Rp 500.000,25"), Some(dec!(500000.25)));
        assert_eq!(parse_decimal("Rp 1.5"), Some(dec!(1.5)));
        assert_eq!(parse_decimal("500.000"), Some(dec!(500.000)));
        assert_eq!(parse_decimal("11,5"), Some(dec!(11.5)));
        assert_eq!(parse_decimal("1.5E3"), Some(dec!(1500)));
        assert_eq!(parse_decimal("-250"), Some(dec!(-250)));
    }

    #[test]
    fn decimal_falls_back_on_garbage() {
        assert_eq!(decimal_or(Some("n/a"), dec!(11.00)), dec!(11.00));
        assert_eq!(decimal_or(Some(""), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(decimal_or(None, dec!(11.00)), dec!(11.00));
    }

    #[test]
    fn integer_accepts_integral_decimals_only() {
        assert_eq!(integer_or(Some("3"), 1), 3);
        assert_eq!(integer_or(Some("2.0"), 1), 2);
        assert_eq!(integer_or(Some("2.5"), 1), 1);
        assert_eq!(integer_or(Some("abc"), 1), 1);
        assert_eq!(integer_or(None, 1), 1);
    }

    #[test]
    fn date_accepts_textual_formats() {
        assert_eq!(parse_date("2024-05-01"), Some(date(2024, 5, 1)));
        assert_eq!(parse_date("01/05/2024"), Some(date(2024, 5, 1)));
        assert_eq!(parse_date("01-05-2024"), Some(date(2024, 5, 1)));
        assert_eq!(parse_date("2024-05-01 13:45:00"), Some(date(2024, 5, 1)));
        assert_eq!(parse_date("2024-05-01T08:00:00+07:00"), Some(date(2024, 5, 1)));
    }

    #[test]
    fn date_accepts_spreadsheet_serials() {
        assert_eq!(parse_date("45413"), Some(date(2024, 5, 1)));
        assert_eq!(parse_date("45413.75"), Some(date(2024, 5, 1)));
        assert_eq!(parse_date("0"), None);
    }

    #[test]
    fn date_fallbacks() {
        let today = date(2024, 6, 15);
        assert_eq!(date_or(Some("not a date"), today), today);
        assert_eq!(date_or(None, today), today);
        assert_eq!(optional_date(Some("garbage")), None);
    }

    fn group_thousands(value: u64, separator: char) -> String {
        let digits = value.to_string();
        let mut out = String::new();
        for (idx, ch) in digits.chars().enumerate() {
            if idx > 0 && (digits.len() - idx) % 3 == 0 {
                out.push(separator);
            }
            out.push(ch);
        }
        out
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 256, ..ProptestConfig::default() })]

        #[test]
        fn comma_grouped_integers_parse(value in 1_000u64..1_000_000_000_000u64) {
            prop_assert_eq!(parse_decimal(&group_thousands(value, ',')), Some(Decimal::from(value)));
        }

        #[test]
        fn dot_grouped_integers_parse(value in 1_000_000u64..1_000_000_000_000u64) {
            prop_assert_eq!(parse_decimal(&group_thousands(value, '.')), Some(Decimal::from(value)));
        }

        #[test]
        fn rupiah_dot_grouped_integers_parse(value in 1_000u64..1_000_000_000_000u64) {
            let raw = format!("Rp {}", group_thousands(value, '.'));
            prop_assert_eq!(parse_decimal(&raw), Some(Decimal::from(value)));
        }
    }
}
