//! Raw and enriched record fixtures.

use etl_core::{Enricher, RawRecord, TicketRecord};

/// Builds a raw record with all fields present.
pub fn raw(id: i32, user_id: i32, title: &str, completed: Option<bool>) -> RawRecord {
    RawRecord {
        id: Some(id),
        user_id: Some(user_id),
        title: title.into(),
        completed,
    }
}

/// A small raw batch covering closed, open, and unknown statuses plus one
/// duplicate id (21 appears twice; the "dup" title must be dropped).
pub fn raw_batch() -> Vec<RawRecord> {
    let mut batch: Vec<RawRecord> = (1..=20)
        .map(|i| {
            raw(
                i,
                (i % 4) + 1,
                &format!("ticket {}", i),
                match i % 3 {
                    0 => None,
                    1 => Some(true),
                    _ => Some(false),
                },
            )
        })
        .collect();
    batch.push(raw(21, 1, "late", Some(true)));
    batch.push(raw(21, 2, "dup", Some(false)));
    batch
}

/// Enriches [`raw_batch`] with a pinned seed.
pub fn enriched_batch(seed: u64) -> Vec<TicketRecord> {
    Enricher::with_seed(seed)
        .enrich_all(&raw_batch())
        .expect("fixture batch is well-formed")
}
