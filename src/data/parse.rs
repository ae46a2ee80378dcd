use chrono::{Datelike, NaiveDate, NaiveDateTime};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Field-level parse errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
    #[error("missing value")]
    Missing,
    #[error("'{0}' is not a recognised date")]
    BadDate(String),
    #[error("'{0}' is not a number")]
    BadNumber(String),
}

/// Date-only layouts tried in order. Month-first wins for ambiguous
/// `01-02-2017` style values; day-first only catches `25-04-2017`.
/// Two-digit years come last so `%Y` never swallows them.
const DATE_FORMATS: &[&str] = &[
    "%m-%d-%Y",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%d/%m/%Y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%m-%d-%y",
    "%m/%d/%y",
    "%d-%m-%y",
    "%d/%m/%y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// chrono's `%Y` reads `17` as the year 17; anything earlier than this is
/// a misread short year.
const MIN_YEAR: i32 = 1000;

/// Parse an order date written in any of the layouts found in the wild
/// (the source file mixes `11-08-2017` and `6/12/2015`). Time parts are dropped.
pub fn parse_order_date(raw: &str) -> Result<NaiveDate, FieldError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(FieldError::Missing);
    }
    DATE_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .chain(
            DATETIME_FORMATS
                .iter()
                .filter_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date()),
        )
        .find(|date| date.year() >= MIN_YEAR)
        .ok_or_else(|| FieldError::BadDate(s.to_string()))
}

/// Parse a sales / profit amount. Commas are accepted only as thousands
/// separators (`1,254.5`); a decimal comma like `12,5` is rejected.
pub fn parse_amount(raw: &str) -> Result<f64, FieldError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(FieldError::Missing);
    }
    let bad = || FieldError::BadNumber(s.to_string());
    let cleaned = strip_thousands(s).ok_or_else(bad)?;
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(bad()),
    }
}

/// Remove `,` group separators, or `None` if the commas are not grouping
/// the integer part in threes.
fn strip_thousands(s: &str) -> Option<String> {
    if !s.contains(',') {
        return Some(s.to_string());
    }
    let unsigned = s.strip_prefix(['-', '+']).unwrap_or(s);
    let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if fraction.contains(',') {
        return None;
    }
    let mut groups = integer.split(',');
    let head = groups.next().unwrap_or_default();
    let digits = |g: &str| g.bytes().all(|b| b.is_ascii_digit());
    if head.is_empty() || head.len() > 3 || !digits(head) {
        return None;
    }
    if !groups.all(|g| g.len() == 3 && digits(g)) {
        return None;
    }
    Some(s.replace(',', ""))
}

/// Parse a categorical field; blank values are rejected.
pub fn parse_label(raw: &str) -> Result<String, FieldError> {
    let s = raw.trim();
    if s.is_empty() {
        Err(FieldError::Missing)
    } else {
        Ok(s.to_string())
    }
}
