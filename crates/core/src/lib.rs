//! Core types, enrichment, and aggregation for the ticket ETL pipeline.

pub mod dimensions;
pub mod enrich;
pub mod error;
pub mod record;
pub mod summary;

pub use dimensions::*;
pub use enrich::*;
pub use error::{Error, Result};
pub use record::*;
pub use summary::*;
