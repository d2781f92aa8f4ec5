//! Per-city CSV loader
//!
//! Reads one raw source file, sniffs the date and quantity columns, coerces
//! each row and stamps the survivors with the city label of the file.
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::ingest::coerce::{parse_date, parse_quantity};
use crate::ingest::columns::{detect_columns, MissingColumn};
use crate::models::WasteRecord;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to open source {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read header row of {source_name}: {error}")]
    UnreadableHeader {
        source_name: String,
        #[source]
        error: csv::Error,
    },
}

/// Non-fatal condition reported alongside an (empty) load result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    MissingColumns {
        source: String,
        missing: MissingColumn,
    },
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadWarning::MissingColumns { source, missing } => {
                write!(f, "No {} found in {}", missing.describe(), source)
            }
        }
    }
}

/// Records loaded from one source plus what was dropped along the way
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub records: Vec<WasteRecord>,
    /// Data rows seen in the file, including the ones dropped by coercion
    pub rows_read: usize,
    pub warning: Option<LoadWarning>,
}

impl LoadOutcome {
    pub fn rows_dropped(&self) -> usize {
        self.rows_read - self.records.len()
    }
}

/// Load a source file from disk
///
/// Failing to open the file or to read its header row is an error. Missing
/// columns and bad rows are reported through the returned [`LoadOutcome`].
pub fn load_from_path(path: &Path, city: &str) -> Result<LoadOutcome, LoadError> {
    info!("Loading waste source {} for {}", path.display(), city);

    let file = File::open(path).map_err(|e| LoadError::SourceUnreadable {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_from_reader(BufReader::new(file), &path.display().to_string(), city)
}

/// Load records from any CSV reader
///
/// `source_name` is only used to identify the source in warnings and logs.
/// A header row that cannot be decoded (I/O failure or invalid UTF-8) makes
/// the whole source unreadable.
pub fn load_from_reader<R: Read>(
    reader: R,
    source_name: &str,
    city: &str,
) -> Result<LoadOutcome, LoadError> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| LoadError::UnreadableHeader {
            source_name: source_name.to_string(),
            error: e,
        })?
        .clone();

    // Empty file: nothing to load and nothing to warn about
    if headers.is_empty() {
        debug!("Source {} is empty", source_name);
        return Ok(LoadOutcome::default());
    }

    let header_names: Vec<&str> = headers.iter().collect();
    let columns = match detect_columns(&header_names) {
        Ok(columns) => columns,
        Err(missing) => {
            let warning = LoadWarning::MissingColumns {
                source: source_name.to_string(),
                missing,
            };
            warn!("{}", warning);
            return Ok(LoadOutcome {
                warning: Some(warning),
                ..LoadOutcome::default()
            });
        }
    };

    debug!(
        "Using column '{}' as date and '{}' as waste quantity for {}",
        header_names[columns.date], header_names[columns.quantity], source_name
    );

    let mut records = Vec::new();
    let mut rows_read = 0;

    for (row_idx, result) in rdr.records().enumerate() {
        rows_read += 1;

        let row = match result {
            Ok(row) => row,
            Err(e) => {
                debug!("Malformed row {} in {}: {}, skipping", row_idx, source_name, e);
                continue;
            }
        };

        let date = row.get(columns.date).and_then(parse_date);
        let waste_kg = row.get(columns.quantity).and_then(parse_quantity);

        match (date, waste_kg) {
            (Some(date), Some(waste_kg)) => records.push(WasteRecord::new(date, waste_kg, city)),
            _ => debug!("Row {} in {} failed coercion, skipping", row_idx, source_name),
        }
    }

    let outcome = LoadOutcome {
        records,
        rows_read,
        warning: None,
    };

    info!(
        "Loaded {} records for {} from {} ({} rows dropped)",
        outcome.records.len(),
        city,
        source_name,
        outcome.rows_dropped()
    );

    Ok(outcome)
}
