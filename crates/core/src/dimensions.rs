//! Dimension derivation from the enriched record set.
//!
//! Each dimension is the set of distinct `(key, name)` pairs observed across
//! all enriched records, kept in first-seen order. Because dimensions come
//! from the same set that produces fact rows, every key a fact references is
//! guaranteed to exist in its dimension.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::record::TicketRecord;

/// A single `(key, name)` dimension row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionRow {
    pub key: i32,
    pub name: String,
}

/// The three dimension sets of the star schema.
#[derive(Debug, Clone, Default)]
pub struct Dimensions {
    pub users: Vec<DimensionRow>,
    pub projects: Vec<DimensionRow>,
    pub priorities: Vec<DimensionRow>,
}

/// Builds all three dimension sets from the enriched records.
pub fn build_dimensions(records: &[TicketRecord]) -> Dimensions {
    Dimensions {
        users: distinct_pairs(records.iter().map(|r| (r.user_id, r.user_name.as_str()))),
        projects: distinct_pairs(records.iter().map(|r| (r.project_id, r.project_name.as_str()))),
        priorities: distinct_pairs(
            records.iter().map(|r| (r.priority_id, r.priority_name.as_str())),
        ),
    }
}

fn distinct_pairs<'a>(pairs: impl Iterator<Item = (i32, &'a str)>) -> Vec<DimensionRow> {
    let mut seen = HashSet::new();
    let mut rows = Vec::new();
    for (key, name) in pairs {
        if seen.insert((key, name.to_string())) {
            rows.push(DimensionRow {
                key,
                name: name.to_string(),
            });
        }
    }
    rows
}
