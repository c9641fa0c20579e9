pub mod config;
pub mod constants;
pub mod error;
pub mod exporter;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod parser;
pub mod sanitize;
pub mod types;

// Application use cases and the ports they depend on
pub mod app;
pub mod infra;
