//! PostgreSQL warehouse client for the ticket ETL pipeline.

pub mod analytics;
pub mod client;
pub mod config;
pub mod load;
pub mod schema;

pub use analytics::*;
pub use client::*;
pub use config::*;
pub use load::*;
