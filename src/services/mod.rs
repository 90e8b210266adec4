pub mod fetch;
pub mod ingest;
