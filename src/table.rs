//! Operations over the unified table: merge, per-city selection and ordering.

use chrono::NaiveDate;

use crate::models::WasteRecord;

/// Concatenate per-city tables, preserving every input's order
pub fn merge<I>(tables: I) -> Vec<WasteRecord>
where
    I: IntoIterator<Item = Vec<WasteRecord>>,
{
    tables.into_iter().flatten().collect()
}

/// Records whose city equals `city`, in table order
///
/// An unknown city yields an empty table rather than an error.
pub fn filter_by_city(table: &[WasteRecord], city: &str) -> Vec<WasteRecord> {
    table.iter().filter(|r| r.city == city).cloned().collect()
}

/// Distinct city labels in order of first appearance
pub fn distinct_cities(table: &[WasteRecord]) -> Vec<String> {
    let mut cities: Vec<String> = Vec::new();
    for record in table {
        if !cities.iter().any(|c| c == &record.city) {
            cities.push(record.city.clone());
        }
    }
    cities
}

/// Stable chronological copy of the table (raw data view)
pub fn sorted_by_date(table: &[WasteRecord]) -> Vec<WasteRecord> {
    let mut sorted = table.to_vec();
    sorted.sort_by_key(|r| r.date);
    sorted
}

/// Earliest and latest date in the table
pub fn date_range(table: &[WasteRecord]) -> Option<(NaiveDate, NaiveDate)> {
    let first = table.iter().map(|r| r.date).min()?;
    let last = table.iter().map(|r| r.date).max()?;
    Some((first, last))
}
