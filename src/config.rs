use std::env;
use std::path::Path;

use thiserror::Error;

use crate::cache::SourceSpec;

pub const DEFAULT_SOURCES: [(&str, &str); 2] = [
    ("Austin", "open_source_austin_daily_waste_2003_jan_2021_jul.csv"),
    ("Ballarat", "open_source_ballarat_daily_waste_2000_jul_2015_mar.csv"),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid source entry '{0}', expected CITY=PATH")]
    InvalidSource(String),

    #[error("No waste sources configured")]
    NoSources,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub sources: Vec<SourceSpec>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let sources = match env::var("WASTE_SOURCES") {
            Ok(value) => parse_sources(&value)?,
            Err(_) => {
                let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());
                default_sources(Path::new(&data_dir))
            }
        };

        Ok(Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            sources,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// The two bundled city datasets under `data_dir`
pub fn default_sources(data_dir: &Path) -> Vec<SourceSpec> {
    DEFAULT_SOURCES
        .iter()
        .map(|(city, file)| SourceSpec::new(*city, data_dir.join(file)))
        .collect()
}

/// Parse a comma-separated `CITY=PATH` list
///
/// # Examples
///
/// ```
/// use waste_dashboard_service::config::parse_sources;
///
/// let sources = parse_sources("Austin=data/austin.csv, Ballarat=data/ballarat.csv").unwrap();
/// assert_eq!(sources.len(), 2);
/// assert_eq!(sources[1].city, "Ballarat");
/// ```
pub fn parse_sources(value: &str) -> Result<Vec<SourceSpec>, ConfigError> {
    let sources = value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(parse_source)
        .collect::<Result<Vec<_>, _>>()?;

    if sources.is_empty() {
        return Err(ConfigError::NoSources);
    }
    Ok(sources)
}

/// Parse a single `CITY=PATH` entry
///
/// The city label ends up in URLs and download file names, so quotes and
/// control characters are rejected.
pub fn parse_source(entry: &str) -> Result<SourceSpec, ConfigError> {
    let (city, path) = entry
        .split_once('=')
        .ok_or_else(|| ConfigError::InvalidSource(entry.to_string()))?;
    let (city, path) = (city.trim(), path.trim());

    if city.is_empty() || path.is_empty() {
        return Err(ConfigError::InvalidSource(entry.to_string()));
    }
    if city.chars().any(|c| c == '"' || c.is_control()) {
        return Err(ConfigError::InvalidSource(entry.to_string()));
    }
    Ok(SourceSpec::new(city, path))
}
