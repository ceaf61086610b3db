//! Tracing setup for the ticket ETL pipeline.

pub mod tracing_setup;

pub use tracing_setup::*;
