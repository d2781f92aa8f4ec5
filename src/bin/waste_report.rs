use clap::Parser;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use waste_dashboard_service::cache::{DatasetCache, SourceSpec};
use waste_dashboard_service::config::{default_sources, parse_source};
use waste_dashboard_service::models::{CitySummary, Distribution, PeriodAggregate};
use waste_dashboard_service::services::ReportService;

#[derive(Parser)]
#[command(name = "waste-report")]
#[command(about = "Print waste collection statistics for one city", long_about = None)]
struct Cli {
    /// Source file as CITY=PATH (repeatable); defaults to the bundled datasets
    #[arg(long = "source", value_parser = parse_source)]
    sources: Vec<SourceSpec>,

    /// Directory holding the bundled datasets when no --source is given
    #[arg(long, env = "DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// City to report on (default: first configured city)
    #[arg(long)]
    city: Option<String>,

    /// Also write the city's records as CSV to this path
    #[arg(long)]
    export: Option<PathBuf>,
}

#[derive(Serialize)]
struct Report {
    summary: CitySummary,
    monthly: Vec<PeriodAggregate>,
    yearly: Vec<PeriodAggregate>,
    distribution: Option<Distribution>,
    warnings: Vec<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let sources = if cli.sources.is_empty() {
        default_sources(&cli.data_dir)
    } else {
        cli.sources
    };

    let service = ReportService::new(Arc::new(DatasetCache::new(sources)));
    let city = match cli.city {
        Some(city) => city,
        None => service
            .cities()
            .into_iter()
            .next()
            .ok_or("No cities configured")?,
    };

    let report = Report {
        summary: service.summary(&city)?,
        monthly: service.monthly(&city)?,
        yearly: service.yearly(&city)?,
        distribution: service.distribution(&city)?,
        warnings: service.warnings(),
    };
    for warning in &report.warnings {
        warn!("{}", warning);
    }

    println!("{}", serde_json::to_string_pretty(&report)?);

    if let Some(path) = cli.export {
        let export = service.export_csv(&city)?;
        fs::write(&path, &export.bytes)?;
        info!(
            "Wrote {} bytes for {} to {}",
            export.bytes.len(),
            city,
            path.display()
        );
    }

    Ok(())
}
