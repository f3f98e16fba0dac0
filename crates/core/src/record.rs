//! Durable output records and content-addressed identity.
//!
//! A record's id is derived solely from its semantic field values, so the
//! same logical row always collapses to the same id no matter which page or
//! run produced it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};

/// One structured closure entry, the only entity that survives past a single
/// page of processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// SHA-1 hex digest (40 chars) over the three content fields.
    pub id: String,
    pub primary_name: String,
    /// ISO-8601 date, `YYYY-MM-DD`.
    pub start_date: String,
    /// ISO-8601 date, `YYYY-MM-DD`.
    pub end_date: String,
}

impl Record {
    pub fn new(
        primary_name: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        let primary_name = primary_name.into();
        let start_date = start_date.into();
        let end_date = end_date.into();
        let id = record_id(&primary_name, &start_date, &end_date);
        Self {
            id,
            primary_name,
            start_date,
            end_date,
        }
    }
}

/// Compute the content-addressed id for a record.
///
/// The three fields are concatenated in fixed order with no separator before
/// hashing. A boundary-shifted collision (`("ab","c")` vs `("a","bc")`) is
/// therefore theoretically possible; this is a known limitation kept so that
/// ids stay stable against previously persisted datasets.
pub fn record_id(primary_name: &str, start_date: &str, end_date: &str) -> String {
    let digest = Sha1::digest(format!("{primary_name}{start_date}{end_date}"));
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

/// Keep only the first occurrence of each distinct id, preserving order.
///
/// Applied once per page and once more across the whole document. This
/// absorbs the renderer failure mode where a two-digit index number is split
/// into two fragments, manufacturing two adjacent rows with identical
/// content.
pub fn dedup_records(records: Vec<Record>) -> Vec<Record> {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|r| seen.insert(r.id.clone()))
        .collect()
}
