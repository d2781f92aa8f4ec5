pub mod report_service;

pub use report_service::{CsvExport, ReportError, ReportService};
