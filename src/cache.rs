use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::OnceLock;

use tracing::{debug, error, info, instrument, warn};

use crate::ingest::load_from_path;
use crate::models::{SourceReport, SourceStatus, WasteRecord};
use crate::table::{date_range, merge};

/// One configured input file and the city label stamped on its rows
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceSpec {
    pub city: String,
    pub path: PathBuf,
}

impl SourceSpec {
    pub fn new(city: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            city: city.into(),
            path: path.into(),
        }
    }
}

/// Records and load report for one source
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub report: SourceReport,
    pub records: Vec<WasteRecord>,
}

/// Read-only cache of loaded sources and the unified table
///
/// Each source is loaded at most once, on first access. Nothing is ever
/// invalidated: sources are static files for the lifetime of the process.
/// After a slot is filled it is only read, so the cache can be shared
/// across request handlers without locking.
#[derive(Debug)]
pub struct DatasetCache {
    sources: Vec<SourceSpec>,
    slots: HashMap<SourceSpec, OnceLock<LoadedSource>>,
    unified: OnceLock<Vec<WasteRecord>>,
}

impl DatasetCache {
    pub fn new(configured: Vec<SourceSpec>) -> Self {
        let mut sources: Vec<SourceSpec> = Vec::new();
        for spec in configured {
            if sources.contains(&spec) {
                warn!("Source {:?} configured twice, ignoring duplicate", spec);
                continue;
            }
            sources.push(spec);
        }

        let slots = sources
            .iter()
            .map(|spec| (spec.clone(), OnceLock::new()))
            .collect();
        Self {
            sources,
            slots,
            unified: OnceLock::new(),
        }
    }

    /// Configured sources, in configuration order
    pub fn sources(&self) -> &[SourceSpec] {
        &self.sources
    }

    /// Get a source, loading it on first access
    ///
    /// Returns `None` only for a spec that was never configured.
    pub fn source(&self, spec: &SourceSpec) -> Option<&LoadedSource> {
        let slot = self.slots.get(spec)?;
        Some(slot.get_or_init(|| load_source(spec)))
    }

    /// The merged table of every source, in configuration order
    pub fn unified(&self) -> &[WasteRecord] {
        self.unified.get_or_init(|| {
            let tables = self
                .sources
                .iter()
                .filter_map(|spec| self.source(spec))
                .map(|loaded| loaded.records.clone());
            let merged = merge(tables);
            info!("Unified table holds {} records", merged.len());
            merged
        })
    }

    /// Load reports for every source, in configuration order
    pub fn reports(&self) -> Vec<SourceReport> {
        self.sources
            .iter()
            .filter_map(|spec| self.source(spec))
            .map(|loaded| loaded.report.clone())
            .collect()
    }

    /// Load every source and build the unified table
    ///
    /// This is blocking file I/O; async callers should use `spawn_blocking`.
    #[instrument(skip(self), fields(sources = self.sources.len()))]
    pub fn warm(&self) {
        let records = self.unified().len();
        debug!("Dataset cache warmed with {} records", records);
    }
}

/// Load one source, isolating failures to that source
///
/// An unreadable file is logged and reported, and contributes no rows.
fn load_source(spec: &SourceSpec) -> LoadedSource {
    let path = spec.path.display().to_string();

    match load_from_path(&spec.path, &spec.city) {
        Ok(outcome) => {
            let range = date_range(&outcome.records);
            let status = if outcome.warning.is_some() {
                SourceStatus::MissingColumns
            } else {
                SourceStatus::Loaded
            };
            LoadedSource {
                report: SourceReport {
                    city: spec.city.clone(),
                    path,
                    status,
                    rows_read: outcome.rows_read,
                    rows_kept: outcome.records.len(),
                    first_date: range.map(|(first, _)| first),
                    last_date: range.map(|(_, last)| last),
                    warning: outcome.warning.map(|w| w.to_string()),
                },
                records: outcome.records,
            }
        }
        Err(e) => {
            error!("Skipping source for {}: {}", spec.city, e);
            LoadedSource {
                report: SourceReport {
                    city: spec.city.clone(),
                    path,
                    status: SourceStatus::Unreadable,
                    rows_read: 0,
                    rows_kept: 0,
                    first_date: None,
                    last_date: None,
                    warning: Some(e.to_string()),
                },
                records: Vec::new(),
            }
        }
    }
}
