//! Raw and enriched record types.
//!
//! Raw records arrive from the upstream tracker as a flat JSON array
//! (camelCase, no ordering or uniqueness guarantees). Enrichment turns each
//! of them into a [`TicketRecord`] carrying the derived dimension keys and
//! resolution metrics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Raw record as received from the upstream source (camelCase).
///
/// `id` and `userId` are modeled as optional so a missing field surfaces as
/// a validation error during enrichment instead of a deserialization error
/// for the whole payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub user_id: Option<i32>,
    #[serde(default)]
    pub title: String,
    /// Absent upstream means the ticket state is unknown, not open.
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Ticket workflow status derived from the raw `completed` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketStatus {
    Open,
    Closed,
    Unknown,
}

impl TicketStatus {
    /// Returns the string representation stored in the warehouse.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Closed => "Closed",
            Self::Unknown => "Unknown",
        }
    }

    /// Derives the status from the raw `completed` flag.
    pub fn from_completed(completed: Option<bool>) -> Self {
        match completed {
            Some(true) => Self::Closed,
            Some(false) => Self::Open,
            None => Self::Unknown,
        }
    }
}

/// Enriched record, one per distinct `ticket_id`.
///
/// Invariants upheld by the enricher:
/// - `project_id` is always 1 or 2, `priority_id` always 1, 2, or 3
/// - `resolution_date` and `resolution_days` are both set iff the status
///   is [`TicketStatus::Closed`], otherwise both are `None`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketRecord {
    pub ticket_id: i32,
    pub user_id: i32,
    pub user_name: String,
    pub project_id: i32,
    pub project_name: String,
    pub priority_id: i32,
    pub priority_name: String,
    pub ticket_title: String,
    pub status: TicketStatus,
    pub created_date: NaiveDate,
    pub resolution_date: Option<NaiveDate>,
    pub resolution_days: Option<i32>,
}
