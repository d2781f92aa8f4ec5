use std::sync::Arc;

use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::{create_router, AppState};
use crate::cache::DatasetCache;
use crate::config::Config;
use crate::services::ReportService;

/// Application with the spawned HTTP server
pub struct Application {
    pub server_handle: JoinHandle<Result<(), std::io::Error>>,
}

impl Application {
    /// Build and initialize the application
    ///
    /// Loads every configured source once (on a blocking thread) before the
    /// server starts, so requests only ever read the cached tables.
    pub async fn build(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        info!(
            "Initializing application with {} waste sources",
            config.sources.len()
        );

        let cache = Arc::new(DatasetCache::new(config.sources.clone()));
        {
            let cache = cache.clone();
            tokio::task::spawn_blocking(move || cache.warm()).await?;
        }

        let report_service = ReportService::new(cache);
        for warning in report_service.warnings() {
            info!("Source warning: {}", warning);
        }
        info!("Serving cities: {:?}", report_service.cities());

        let app_state = AppState { report_service };
        let app = create_router(app_state).layer(TraceLayer::new_for_http());

        let addr = config.server_addr();
        info!("Starting HTTP server on {}", addr);

        let server_handle = tokio::spawn(async move {
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            axum::serve(listener, app).await
        });

        info!("Application initialized successfully");

        Ok(Self { server_handle })
    }

    /// Run until the server stops
    pub async fn run_until_stopped(self) -> Result<(), Box<dyn std::error::Error>> {
        self.server_handle.await??;
        Ok(())
    }
}
