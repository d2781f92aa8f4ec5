//! Summary metrics and calendar-period bucketing over a single-city table.
//!
//! Quantities are summed as exact decimals, so a total always equals the sum
//! of its monthly or yearly buckets.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};

use crate::models::{CitySummary, DailyPoint, Distribution, PeriodAggregate, WasteRecord};
use crate::table::date_range;

/// Sum of `waste_kg`; 0 for an empty table
pub fn total(table: &[WasteRecord]) -> Decimal {
    normalize_zero(table.iter().map(|r| r.waste_kg).sum())
}

/// Arithmetic mean of `waste_kg`; `None` for an empty table
pub fn mean(table: &[WasteRecord]) -> Option<Decimal> {
    if table.is_empty() {
        return None;
    }
    total(table).checked_div(Decimal::from(table.len()))
}

/// Number of distinct dates in the table
pub fn distinct_day_count(table: &[WasteRecord]) -> usize {
    table.iter().map(|r| r.date).collect::<HashSet<_>>().len()
}

/// Totals per calendar month, oldest first; empty months are omitted
pub fn bucket_by_month(table: &[WasteRecord]) -> Vec<PeriodAggregate> {
    bucket_by(
        table,
        |date| (date.year(), date.month()),
        |(year, month): (i32, u32)| NaiveDate::from_ymd_opt(year, month, 1),
    )
}

/// Totals per calendar year, oldest first; empty years are omitted
pub fn bucket_by_year(table: &[WasteRecord]) -> Vec<PeriodAggregate> {
    bucket_by(
        table,
        |date| date.year(),
        |year: i32| NaiveDate::from_ymd_opt(year, 1, 1),
    )
}

/// Group by a derived period key, sum per group, order by key
fn bucket_by<K, F, S>(table: &[WasteRecord], key: F, period_start: S) -> Vec<PeriodAggregate>
where
    K: Ord + Copy,
    F: Fn(NaiveDate) -> K,
    S: Fn(K) -> Option<NaiveDate>,
{
    let mut buckets: BTreeMap<K, (Decimal, usize)> = BTreeMap::new();
    for record in table {
        let entry = buckets
            .entry(key(record.date))
            .or_insert((Decimal::ZERO, 0));
        entry.0 += record.waste_kg;
        entry.1 += 1;
    }

    // Keys come from valid dates, so the first day of the period always exists
    buckets
        .into_iter()
        .filter_map(|(k, (total_kg, record_count))| {
            period_start(k).map(|period_start| PeriodAggregate {
                period_start,
                total_kg: normalize_zero(total_kg),
                record_count,
            })
        })
        .collect()
}

/// Daily values sorted by date, for the line chart
pub fn daily_series(table: &[WasteRecord]) -> Vec<DailyPoint> {
    let mut points: Vec<DailyPoint> = table
        .iter()
        .map(|r| DailyPoint {
            date: r.date,
            waste_kg: r.waste_kg,
        })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

/// Five-number summary of the daily values; `None` for an empty table
pub fn distribution(table: &[WasteRecord]) -> Option<Distribution> {
    let mut values: Vec<Decimal> = table.iter().map(|r| r.waste_kg).collect();
    if values.is_empty() {
        return None;
    }
    values.sort();

    Some(Distribution {
        count: values.len(),
        min: values[0],
        q1: quartile(&values, 1),
        median: quartile(&values, 2),
        q3: quartile(&values, 3),
        max: values[values.len() - 1],
    })
}

/// Linear interpolation between closest ranks over sorted, non-empty values
///
/// `quarter` is 1, 2 or 3. The rank position is `(n - 1) * quarter / 4`,
/// kept as an integer part plus a remainder so the result stays exact.
fn quartile(sorted: &[Decimal], quarter: usize) -> Decimal {
    let scaled = (sorted.len() - 1) * quarter;
    let lower = scaled / 4;
    let remainder = scaled % 4;
    if remainder == 0 {
        return sorted[lower];
    }
    let frac = Decimal::from(remainder) / Decimal::from(4);
    sorted[lower] + (sorted[lower + 1] - sorted[lower]) * frac
}

/// Scalar metrics shown at the top of a city's report
pub fn summarize(city: &str, table: &[WasteRecord]) -> CitySummary {
    let range = date_range(table);
    CitySummary {
        city: city.to_string(),
        total_kg: total(table),
        mean_daily_kg: mean(table),
        distinct_days: distinct_day_count(table),
        record_count: table.len(),
        first_date: range.map(|(first, _)| first),
        last_date: range.map(|(_, last)| last),
    }
}

/// Normalize -0 to 0 for cleaner API responses
fn normalize_zero(value: Decimal) -> Decimal {
    if value.is_zero() {
        Decimal::ZERO
    } else {
        value
    }
}
