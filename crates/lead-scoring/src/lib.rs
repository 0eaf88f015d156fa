pub mod config;
pub mod domain;
pub mod error;
pub mod ingest;
pub mod scoring;
pub mod store;
pub mod telemetry;
