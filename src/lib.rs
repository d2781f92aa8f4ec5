pub mod aggregate;
pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod export;
pub mod ingest;
pub mod models;
pub mod services;
pub mod table;
