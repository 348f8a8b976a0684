pub mod cli;
pub mod clock;
pub mod context;
pub mod ids;
pub mod ingest;
pub mod models;
pub mod schedule;
pub mod types;
