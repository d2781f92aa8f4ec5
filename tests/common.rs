#![allow(dead_code)]

use std::io::Write;
use std::sync::Arc;

use tempfile::NamedTempFile;
use waste_dashboard_service::cache::{DatasetCache, SourceSpec};
use waste_dashboard_service::services::ReportService;

pub const AUSTIN_CSV: &str = "Load ID,Report Date,Load Type,Load Weight (kg)\n\
1,01/01/2021 12:00:00 AM,GARBAGE,10\n\
2,02/01/2021 12:00:00 AM,GARBAGE,20\n\
3,not a date,GARBAGE,99\n";

pub const BALLARAT_CSV: &str = "date,waste_kg\n\
2014-12-31,5.5\n\
2015-01-01,-2\n\
2015-01-01,4\n\
2015-03-31,oops\n";

/// Header row with a Latin-1 byte, which is not valid UTF-8
pub const LATIN1_HEADER_CSV: &[u8] = b"Fecha date,Peso kg \xe9\n2021-01-01,1\n2021-01-02,2\n";

/// Source files for a test; the files live as long as the fixture
pub struct Fixture {
    pub files: Vec<NamedTempFile>,
    pub sources: Vec<SourceSpec>,
}

impl Fixture {
    pub fn new(entries: &[(&str, &str)]) -> Self {
        let entries: Vec<(&str, &[u8])> = entries
            .iter()
            .map(|(city, contents)| (*city, contents.as_bytes()))
            .collect();
        Self::from_bytes(&entries)
    }

    /// Like [`Fixture::new`], for contents that are not valid UTF-8
    pub fn from_bytes(entries: &[(&str, &[u8])]) -> Self {
        let mut files = Vec::new();
        let mut sources = Vec::new();

        for (city, contents) in entries {
            let mut file = NamedTempFile::new().expect("Failed to create temp file");
            file.write_all(contents)
                .expect("Failed to write fixture");
            sources.push(SourceSpec::new(*city, file.path()));
            files.push(file);
        }

        Self { files, sources }
    }

    /// Austin and Ballarat fixtures
    pub fn two_cities() -> Self {
        Self::new(&[("Austin", AUSTIN_CSV), ("Ballarat", BALLARAT_CSV)])
    }

    pub fn service(&self) -> ReportService {
        ReportService::new(Arc::new(DatasetCache::new(self.sources.clone())))
    }
}
