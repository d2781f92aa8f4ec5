//! Cell coercion for date and quantity columns
//!
//! Both functions return `None` for cells that cannot be coerced. The loader
//! drops the whole row in that case.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

const DATETIME_FORMATS: [&str; 7] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M",
];

// Month-first wins for ambiguous slashed dates; day-first only catches
// dates that are impossible month-first (e.g. 31/01/2015).
const SLASHED_DATE_FORMATS: [&str; 4] = ["%m/%d/%Y", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y"];

/// Parse a date cell, keeping only the calendar date
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use waste_dashboard_service::ingest::parse_date;
///
/// let jan_2 = NaiveDate::from_ymd_opt(2003, 1, 2).unwrap();
/// assert_eq!(parse_date("2003-01-02"), Some(jan_2));
/// assert_eq!(parse_date("01/02/2003 12:00:00 AM"), Some(jan_2));
/// assert_eq!(parse_date("not a date"), None);
/// ```
pub fn parse_date(cell: &str) -> Option<NaiveDate> {
    let s = cell.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    for fmt in SLASHED_DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    None
}

/// Parse a quantity cell as an exact decimal number
///
/// Zero and negative values are valid; no domain validation happens here.
/// Scientific notation is accepted. Digit separators (`1,200`, `1_200`),
/// `NaN` and infinities are not.
pub fn parse_quantity(cell: &str) -> Option<Decimal> {
    let s = cell.trim();
    if s.is_empty() || s.contains('_') {
        return None;
    }

    if s.contains(['e', 'E']) {
        return Decimal::from_scientific(s).ok();
    }
    Decimal::from_str(s).ok()
}
