//! Column sniffing for raw waste datasets
//!
//! Source files do not share a header contract. The loader only needs one
//! column that looks like a date and one that looks like a waste quantity,
//! so both are found by case-insensitive substring search over the header.

pub const DATE_NEEDLES: &[&str] = &["date"];
pub const QUANTITY_NEEDLES: &[&str] = &["waste", "kg"];

/// Positions of the columns the loader reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectedColumns {
    pub date: usize,
    pub quantity: usize,
}

/// Which required columns could not be found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingColumn {
    Date,
    Quantity,
    Both,
}

impl MissingColumn {
    pub fn describe(&self) -> &'static str {
        match self {
            MissingColumn::Date => "date column",
            MissingColumn::Quantity => "waste/kg column",
            MissingColumn::Both => "date and waste/kg columns",
        }
    }
}

/// Find the first column whose name contains any of `needles`
///
/// Matching is case-insensitive. Columns are scanned in declaration order,
/// so the earliest matching column wins regardless of which needle hit.
///
/// # Examples
///
/// ```
/// use waste_dashboard_service::ingest::find_column;
///
/// let columns = ["Ticket", "Collection Date", "Net Weight (KG)"];
/// assert_eq!(find_column(&columns, &["date"]), Some(1));
/// assert_eq!(find_column(&columns, &["waste", "kg"]), Some(2));
/// assert_eq!(find_column(&columns, &["volume"]), None);
/// ```
pub fn find_column<S: AsRef<str>>(columns: &[S], needles: &[&str]) -> Option<usize> {
    columns.iter().position(|column| {
        let name = column.as_ref().to_lowercase();
        needles.iter().any(|needle| name.contains(needle))
    })
}

/// Locate the date and quantity columns in a header row
pub fn detect_columns<S: AsRef<str>>(headers: &[S]) -> Result<DetectedColumns, MissingColumn> {
    let date = find_column(headers, DATE_NEEDLES);
    let quantity = find_column(headers, QUANTITY_NEEDLES);

    match (date, quantity) {
        (Some(date), Some(quantity)) => Ok(DetectedColumns { date, quantity }),
        (None, Some(_)) => Err(MissingColumn::Date),
        (Some(_), None) => Err(MissingColumn::Quantity),
        (None, None) => Err(MissingColumn::Both),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_column_case_insensitive() {
        assert_eq!(find_column(&["ID", "REPORT_DATE"], DATE_NEEDLES), Some(1));
    }

    #[test]
    fn test_find_column_first_occurrence_wins() {
        let headers = ["load_date", "ticket_date", "waste"];
        assert_eq!(find_column(&headers, DATE_NEEDLES), Some(0));
    }

    #[test]
    fn test_find_column_any_needle_in_column_order() {
        // "kg" appears before "waste" in the header, so it wins
        let headers = ["date", "weight_kg", "waste_type"];
        assert_eq!(find_column(&headers, QUANTITY_NEEDLES), Some(1));
    }

    #[test]
    fn test_find_column_empty_header() {
        let headers: [&str; 0] = [];
        assert_eq!(find_column(&headers, DATE_NEEDLES), None);
    }

    #[test]
    fn test_detect_columns_ok() {
        let headers = vec!["Date".to_string(), "Waste_kg".to_string()];
        assert_eq!(
            detect_columns(&headers),
            Ok(DetectedColumns {
                date: 0,
                quantity: 1
            })
        );
    }

    #[test]
    fn test_detect_columns_missing() {
        assert_eq!(detect_columns(&["day", "tonnes"]), Err(MissingColumn::Both));
        assert_eq!(detect_columns(&["day", "waste"]), Err(MissingColumn::Date));
        assert_eq!(
            detect_columns(&["date", "tonnes"]),
            Err(MissingColumn::Quantity)
        );
    }
}
