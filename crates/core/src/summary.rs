//! Pre-aggregated summary over the enriched record set.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::record::{TicketRecord, TicketStatus};

/// One row of the `ticket_summary` table: a `(project, status, priority)`
/// group with its ticket count and mean resolution time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    pub project_id: i32,
    pub status: TicketStatus,
    pub priority_id: i32,
    pub ticket_count: i64,
    /// Mean of the non-null resolution days in the group; 0.0 when the
    /// group has no resolved tickets.
    pub avg_resolution_days: f64,
}

#[derive(Default)]
struct GroupAccumulator {
    count: i64,
    resolved_days_sum: i64,
    resolved_count: i64,
}

/// Groups the enriched set by `(project_id, status, priority_id)`.
///
/// Output is sorted by the group key (status compared as its stored string)
/// so runs are comparable in tests.
pub fn summarize(records: &[TicketRecord]) -> Vec<SummaryRow> {
    let mut groups: HashMap<(i32, TicketStatus, i32), GroupAccumulator> = HashMap::new();
    for record in records {
        let acc = groups
            .entry((record.project_id, record.status, record.priority_id))
            .or_default();
        acc.count += 1;
        if let Some(days) = record.resolution_days {
            acc.resolved_days_sum += days as i64;
            acc.resolved_count += 1;
        }
    }

    let mut rows: Vec<SummaryRow> = groups
        .into_iter()
        .map(|((project_id, status, priority_id), acc)| SummaryRow {
            project_id,
            status,
            priority_id,
            ticket_count: acc.count,
            avg_resolution_days: if acc.resolved_count > 0 {
                acc.resolved_days_sum as f64 / acc.resolved_count as f64
            } else {
                0.0
            },
        })
        .collect();

    rows.sort_by(|a, b| {
        (a.project_id, a.status.as_str(), a.priority_id)
            .cmp(&(b.project_id, b.status.as_str(), b.priority_id))
    });
    rows
}
