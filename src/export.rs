//! CSV export of a filtered table, and the canonical-header reader for it.

use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::WasteRecord;

pub const CSV_CONTENT_TYPE: &str = "text/csv";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to flush CSV buffer: {0}")]
    Flush(String),
}

/// Row layout of the download file: `Date,Waste_kg,City`
#[derive(Debug, Serialize, Deserialize)]
struct CanonicalRow {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Waste_kg", with = "rust_decimal::serde::str")]
    waste_kg: Decimal,
    #[serde(rename = "City")]
    city: String,
}

/// Serialize a table to UTF-8 CSV bytes
///
/// The header row is always written, so an empty table produces
/// header-only output.
pub fn to_csv_bytes(table: &[WasteRecord]) -> Result<Vec<u8>, ExportError> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    // Written by hand so the header survives an empty table
    writer.write_record(["Date", "Waste_kg", "City"])?;
    for record in table {
        writer.serialize(CanonicalRow {
            date: record.date,
            waste_kg: record.waste_kg,
            city: record.city.clone(),
        })?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))?;
    debug!("Exported {} records ({} bytes)", table.len(), bytes.len());
    Ok(bytes)
}

/// Read back a file produced by [`to_csv_bytes`]
///
/// The header is already canonical, so no column sniffing happens and any
/// malformed row is an error.
pub fn parse_canonical_csv(bytes: &[u8]) -> Result<Vec<WasteRecord>, ExportError> {
    let mut reader = ReaderBuilder::new().from_reader(bytes);
    reader
        .deserialize::<CanonicalRow>()
        .map(|row| -> Result<WasteRecord, ExportError> {
            let row = row?;
            Ok(WasteRecord::new(row.date, row.waste_kg, row.city))
        })
        .collect()
}

/// Download file name for a city, e.g. `data_sampah_Austin.csv`
pub fn download_file_name(city: &str) -> String {
    format!("data_sampah_{city}.csv")
}

/// `Content-Disposition` value offering `file_name` as an attachment
///
/// The name is written as a quoted string: `"` and `\` are backslash-escaped
/// and control characters are dropped.
pub fn content_disposition(file_name: &str) -> String {
    let mut quoted = String::with_capacity(file_name.len());
    for c in file_name.chars().filter(|c| !c.is_control()) {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    format!("attachment; filename=\"{quoted}\"")
}
