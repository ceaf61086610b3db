//! Upstream record fetch for the ticket ETL pipeline.

pub mod fetch;

pub use fetch::*;
