//! Record enrichment.
//!
//! This module handles:
//! - Deriving dimension keys and names from `ticket_id`
//! - Deriving status, created/resolution dates, and resolution days
//! - Batch-level deduplication on `ticket_id` (first occurrence wins)
//!
//! The only non-deterministic derivation is the resolution-date offset for
//! closed tickets, drawn from an injected seedable RNG so tests can pin it.

use chrono::{Duration, NaiveDate};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::record::{RawRecord, TicketRecord, TicketStatus};

/// Creation dates cycle over this many days past the base date.
const CREATED_DATE_CYCLE_DAYS: i32 = 120;

/// Resolution offset range for closed tickets, in days (inclusive).
const MIN_RESOLUTION_OFFSET_DAYS: i32 = 1;
const MAX_RESOLUTION_OFFSET_DAYS: i32 = 60;

/// Derives the project dimension key from a ticket id.
pub fn project_id_for(ticket_id: i32) -> i32 {
    ticket_id.rem_euclid(2) + 1
}

/// Derives the priority dimension key from a ticket id.
pub fn priority_id_for(ticket_id: i32) -> i32 {
    ticket_id.rem_euclid(3) + 1
}

/// Project name lookup. Total because `project_id_for` only yields 1 or 2.
pub fn project_name(project_id: i32) -> &'static str {
    match project_id {
        1 => "Jira",
        _ => "Confluence",
    }
}

/// Priority name lookup. Total because `priority_id_for` only yields 1..=3.
pub fn priority_name(priority_id: i32) -> &'static str {
    match priority_id {
        1 => "High",
        2 => "Medium",
        _ => "Low",
    }
}

/// Turns raw records into enriched [`TicketRecord`]s.
///
/// Owns the base date and the RNG used for resolution offsets. The RNG is
/// the single piece of run-wide mutable state; seed it once at run start.
pub struct Enricher {
    base_date: NaiveDate,
    rng: StdRng,
}

impl Enricher {
    /// Creates an enricher with a fixed RNG seed (reproducible runs).
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Creates an enricher seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    fn with_rng(rng: StdRng) -> Self {
        let base_date =
            NaiveDate::from_ymd_opt(2025, 1, 1).expect("base date constant is valid");
        Self { base_date, rng }
    }

    /// Enriches a full batch, then keeps only the first record per distinct
    /// `ticket_id`, preserving input order.
    ///
    /// Dedup is a property of the whole batch, so it runs as a post-filter
    /// over the enriched set rather than per record.
    pub fn enrich_all(&mut self, raw: &[RawRecord]) -> Result<Vec<TicketRecord>> {
        let mut enriched = Vec::with_capacity(raw.len());
        for (i, record) in raw.iter().enumerate() {
            enriched.push(self.enrich(record).map_err(|e| match e {
                Error::Validation(msg) => {
                    Error::validation(format!("record[{}]: {}", i, msg))
                }
                other => other,
            })?);
        }

        let mut seen = HashSet::new();
        enriched.retain(|r| seen.insert(r.ticket_id));
        Ok(enriched)
    }

    /// Enriches a single raw record.
    ///
    /// Fails with a validation error when `id` or `userId` is absent; the
    /// pipeline aborts rather than silently skipping the record.
    pub fn enrich(&mut self, raw: &RawRecord) -> Result<TicketRecord> {
        let ticket_id = raw
            .id
            .ok_or_else(|| Error::validation("missing required field `id`"))?;
        let user_id = raw
            .user_id
            .ok_or_else(|| Error::validation("missing required field `userId`"))?;

        let project_id = project_id_for(ticket_id);
        let priority_id = priority_id_for(ticket_id);
        let status = TicketStatus::from_completed(raw.completed);

        let created_date = self.base_date
            + Duration::days(ticket_id.rem_euclid(CREATED_DATE_CYCLE_DAYS) as i64);

        let (resolution_date, resolution_days) = if status == TicketStatus::Closed {
            let offset = self
                .rng
                .gen_range(MIN_RESOLUTION_OFFSET_DAYS..=MAX_RESOLUTION_OFFSET_DAYS);
            (Some(created_date + Duration::days(offset as i64)), Some(offset))
        } else {
            (None, None)
        };

        Ok(TicketRecord {
            ticket_id,
            user_id,
            user_name: format!("User_{}", user_id),
            project_id,
            project_name: project_name(project_id).to_string(),
            priority_id,
            priority_name: priority_name(priority_id).to_string(),
            ticket_title: raw.title.clone(),
            status,
            created_date,
            resolution_date,
            resolution_days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: i32, user_id: i32, title: &str, completed: Option<bool>) -> RawRecord {
        RawRecord {
            id: Some(id),
            user_id: Some(user_id),
            title: title.into(),
            completed,
        }
    }

    #[test]
    fn test_closed_record_scenario() {
        let mut enricher = Enricher::with_seed(42);
        let record = enricher.enrich(&raw(1, 1, "t", Some(true))).unwrap();

        assert_eq!(record.project_id, 2);
        assert_eq!(record.project_name, "Confluence");
        assert_eq!(record.priority_id, 2);
        assert_eq!(record.priority_name, "Medium");
        assert_eq!(record.status, TicketStatus::Closed);
        assert_eq!(
            record.created_date,
            NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()
        );

        let days = record.resolution_days.unwrap();
        assert!((1..=60).contains(&days));
        assert_eq!(
            record.resolution_date.unwrap(),
            record.created_date + Duration::days(days as i64)
        );
    }

    #[test]
    fn test_open_record_scenario() {
        let mut enricher = Enricher::with_seed(42);
        let record = enricher.enrich(&raw(2, 2, "u", Some(false))).unwrap();

        assert_eq!(record.project_id, 1);
        assert_eq!(record.project_name, "Jira");
        assert_eq!(record.priority_id, 3);
        assert_eq!(record.priority_name, "Low");
        assert_eq!(record.status, TicketStatus::Open);
        assert_eq!(record.resolution_date, None);
        assert_eq!(record.resolution_days, None);
    }

    #[test]
    fn test_missing_completed_is_unknown() {
        let mut enricher = Enricher::with_seed(42);
        let record = enricher.enrich(&raw(5, 1, "x", None)).unwrap();
        assert_eq!(record.status, TicketStatus::Unknown);
        assert_eq!(record.resolution_date, None);
        assert_eq!(record.resolution_days, None);
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let mut enricher = Enricher::with_seed(42);
        let record = RawRecord {
            id: None,
            user_id: Some(1),
            title: "t".into(),
            completed: Some(false),
        };
        assert!(enricher.enrich(&record).is_err());
    }

    #[test]
    fn test_missing_user_id_aborts_batch() {
        let mut enricher = Enricher::with_seed(42);
        let batch = vec![
            raw(1, 1, "ok", Some(false)),
            RawRecord {
                id: Some(2),
                user_id: None,
                title: "bad".into(),
                completed: None,
            },
        ];
        let err = enricher.enrich_all(&batch).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("record[1]: missing required field `userId`"));
        assert_eq!(msg.matches("validation error").count(), 1);
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let mut enricher = Enricher::with_seed(42);
        let batch = vec![
            raw(3, 1, "first", Some(false)),
            raw(4, 2, "other", Some(false)),
            raw(3, 9, "second", Some(true)),
        ];
        let records = enricher.enrich_all(&batch).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].ticket_id, 3);
        assert_eq!(records[0].ticket_title, "first");
        assert_eq!(records[1].ticket_id, 4);
    }

    #[test]
    fn test_derivations_are_total_and_deterministic() {
        for ticket_id in 0..500 {
            assert!((1..=2).contains(&project_id_for(ticket_id)));
            assert!((1..=3).contains(&priority_id_for(ticket_id)));
        }

        let mut a = Enricher::with_seed(7);
        let mut b = Enricher::with_seed(7);
        let input = raw(17, 3, "t", Some(true));
        let left = a.enrich(&input).unwrap();
        let right = b.enrich(&input).unwrap();
        assert_eq!(left.project_id, right.project_id);
        assert_eq!(left.priority_id, right.priority_id);
        assert_eq!(left.created_date, right.created_date);
        assert_eq!(left.resolution_date, right.resolution_date);
    }

    #[test]
    fn test_created_date_cycles_at_120_days() {
        let mut enricher = Enricher::with_seed(0);
        let wrapped = enricher.enrich(&raw(120, 1, "t", None)).unwrap();
        let base = enricher.enrich(&raw(240, 1, "t", None)).unwrap();
        assert_eq!(
            wrapped.created_date,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
        assert_eq!(wrapped.created_date, base.created_date);
    }

    #[test]
    fn test_closed_iff_resolution_fields_set() {
        let mut enricher = Enricher::with_seed(99);
        let batch: Vec<RawRecord> = (1..=30)
            .map(|i| raw(i, i % 5, "t", [Some(true), Some(false), None][(i % 3) as usize]))
            .collect();
        for record in enricher.enrich_all(&batch).unwrap() {
            let closed = record.status == TicketStatus::Closed;
            assert_eq!(record.resolution_date.is_some(), closed);
            assert_eq!(record.resolution_days.is_some(), closed);
        }
    }
}
