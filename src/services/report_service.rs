use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, instrument};

use crate::aggregate;
use crate::cache::DatasetCache;
use crate::export::{self, ExportError};
use crate::models::{
    CitySummary, ColumnDescription, DailyPoint, DatasetMetadata, Distribution, PeriodAggregate,
    SourceReport, WasteRecord,
};
use crate::table::{filter_by_city, sorted_by_date};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Unknown city: {0}")]
    UnknownCity(String),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}

/// CSV download for one city
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Per-city reports over the cached unified table
#[derive(Clone)]
pub struct ReportService {
    cache: Arc<DatasetCache>,
}

impl ReportService {
    pub fn new(cache: Arc<DatasetCache>) -> Self {
        Self { cache }
    }

    /// Selectable cities: every configured label, in configuration order
    ///
    /// A city whose source produced no rows is still listed; selecting it
    /// yields empty reports.
    pub fn cities(&self) -> Vec<String> {
        let mut cities: Vec<String> = Vec::new();
        for spec in self.cache.sources() {
            if !cities.contains(&spec.city) {
                cities.push(spec.city.clone());
            }
        }
        cities
    }

    pub fn is_known_city(&self, city: &str) -> bool {
        self.cache.sources().iter().any(|spec| spec.city == city)
    }

    /// Warnings for sources that were skipped or had no usable columns
    pub fn warnings(&self) -> Vec<String> {
        self.cache
            .reports()
            .into_iter()
            .filter_map(|report| report.warning)
            .collect()
    }

    pub fn source_reports(&self) -> Vec<SourceReport> {
        self.cache.reports()
    }

    /// Records of one city, in load order
    #[instrument(skip(self))]
    pub fn select(&self, city: &str) -> Result<Vec<WasteRecord>, ReportError> {
        if !self.is_known_city(city) {
            return Err(ReportError::UnknownCity(city.to_string()));
        }
        let records = filter_by_city(self.cache.unified(), city);
        debug!("Selected {} records for {}", records.len(), city);
        Ok(records)
    }

    pub fn summary(&self, city: &str) -> Result<CitySummary, ReportError> {
        let records = self.select(city)?;
        Ok(aggregate::summarize(city, &records))
    }

    pub fn monthly(&self, city: &str) -> Result<Vec<PeriodAggregate>, ReportError> {
        let records = self.select(city)?;
        Ok(aggregate::bucket_by_month(&records))
    }

    pub fn yearly(&self, city: &str) -> Result<Vec<PeriodAggregate>, ReportError> {
        let records = self.select(city)?;
        Ok(aggregate::bucket_by_year(&records))
    }

    pub fn daily(&self, city: &str) -> Result<Vec<DailyPoint>, ReportError> {
        let records = self.select(city)?;
        Ok(aggregate::daily_series(&records))
    }

    pub fn distribution(&self, city: &str) -> Result<Option<Distribution>, ReportError> {
        let records = self.select(city)?;
        Ok(aggregate::distribution(&records))
    }

    /// Raw data view: the city's records sorted by date
    pub fn records(&self, city: &str) -> Result<Vec<WasteRecord>, ReportError> {
        let records = self.select(city)?;
        Ok(sorted_by_date(&records))
    }

    /// CSV download of the city's records, in load order
    #[instrument(skip(self))]
    pub fn export_csv(&self, city: &str) -> Result<CsvExport, ReportError> {
        let records = self.select(city)?;
        Ok(CsvExport {
            file_name: export::download_file_name(city),
            bytes: export::to_csv_bytes(&records)?,
        })
    }

    /// Static metadata block: sources, their date ranges and the column glossary
    pub fn metadata(&self) -> DatasetMetadata {
        DatasetMetadata {
            sources: self.cache.reports(),
            columns: vec![
                ColumnDescription {
                    name: "Date".to_string(),
                    description: "Collection date".to_string(),
                },
                ColumnDescription {
                    name: "Waste_kg".to_string(),
                    description: "Daily waste volume in kilograms".to_string(),
                },
                ColumnDescription {
                    name: "City".to_string(),
                    description: "City the source file belongs to".to_string(),
                },
            ],
        }
    }
}
