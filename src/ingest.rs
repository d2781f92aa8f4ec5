// ! CSV ingestion: column sniffing, cell coercion and per-city loading

pub mod coerce;
pub mod columns;
pub mod loader;

// Re-export commonly used items
pub use coerce::{parse_date, parse_quantity};
pub use columns::{detect_columns, find_column, DetectedColumns, MissingColumn};
pub use loader::{load_from_path, load_from_reader, LoadError, LoadOutcome, LoadWarning};
