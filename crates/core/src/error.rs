//! Unified error types for the ticket ETL pipeline.
//!
//! Every variant is fatal: this is a batch job with no retry policy, so
//! errors propagate to the binary, get logged once, and abort the run after
//! the store connection is released.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the ticket ETL pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Input collaborator unreachable or returned a malformed payload.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// A raw record is missing a field required for enrichment.
    #[error("validation error: {0}")]
    Validation(String),

    /// DDL execution failed while (re)creating the warehouse schema.
    #[error("schema error: {0}")]
    Schema(String),

    /// A DML insert violated a constraint.
    #[error("load error on {table}: {detail}")]
    Load { table: &'static str, detail: String },

    /// Could not acquire or maintain the store connection.
    #[error("store connection error: {0}")]
    Connection(String),

    /// An analytics read query failed.
    #[error("query error: {0}")]
    Query(String),
}

impl Error {
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    pub fn load(table: &'static str, detail: impl Into<String>) -> Self {
        Self::Load {
            table,
            detail: detail.into(),
        }
    }

    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }
}
