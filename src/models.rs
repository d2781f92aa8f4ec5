use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One normalized waste-collection record.
///
/// Every record that leaves the loader has a valid date, an exact decimal
/// quantity and the city label of the source file it came from. Quantities
/// are rendered as JSON numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct WasteRecord {
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub waste_kg: Decimal,
    pub city: String,
}

impl WasteRecord {
    pub fn new(date: NaiveDate, waste_kg: Decimal, city: impl Into<String>) -> Self {
        Self {
            date,
            waste_kg,
            city: city.into(),
        }
    }
}

/// Total waste for one calendar month or year
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PeriodAggregate {
    pub period_start: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total_kg: Decimal,
    pub record_count: usize,
}

/// One point of the daily line chart
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DailyPoint {
    pub date: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub waste_kg: Decimal,
}

/// Five-number summary behind the distribution (box) plot
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Distribution {
    pub count: usize,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub min: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub q1: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub median: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub q3: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub max: Decimal,
}

// API response DTOs
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CitySummary {
    pub city: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub total_kg: Decimal,
    /// `None` when the city has no records
    #[serde(with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub mean_daily_kg: Option<Decimal>,
    pub distinct_days: usize,
    pub record_count: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SourceStatus {
    Loaded,
    MissingColumns,
    Unreadable,
}

/// Outcome of loading a single source file
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SourceReport {
    pub city: String,
    pub path: String,
    pub status: SourceStatus,
    pub rows_read: usize,
    pub rows_kept: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    /// Human-readable warning shown next to the city selector
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ColumnDescription {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DatasetMetadata {
    pub sources: Vec<SourceReport>,
    pub columns: Vec<ColumnDescription>,
}
