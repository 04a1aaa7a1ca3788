pub mod analyzers;
pub mod config;
pub mod error;
pub mod holidays;
pub mod ingest;
pub mod output;
pub mod stats;
