pub mod cache;
pub mod ingest;
pub mod jobs;
pub mod observability;
pub mod strategies;
