//! Core data models for the Chromium release calendar
//!
//! This module contains the canonical record types produced by the
//! per-source normalizers, the date-indexed structures served to callers,
//! and the shared helpers for parsing upstream values.

pub mod milestones;
pub mod releases;

pub use milestones::MilestoneClient;
pub use releases::ReleaseClient;

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Release track for a scheduled milestone date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Stable,
    Beta,
}

/// A scheduled milestone date on one channel
///
/// One upstream milestone entry yields up to two of these: a stable record
/// at `stable_date` and a beta record at `earliest_beta`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneRecord {
    /// Milestone number (e.g., 100 for M100)
    pub mstone: u64,
    /// Which channel this date belongs to
    pub channel: Channel,
    /// Synthesized version string (`{mstone}.0.0.0` or `{mstone}.0.0.0-beta`)
    pub version: String,
    /// Calendar date in YYYY-MM-DD form
    pub date: String,
}

/// A shipped release that passed the completeness filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseRecord {
    /// Release track (stable, beta, dev, canary, ...)
    pub channel: String,
    /// Full version string as reported upstream
    pub version: String,
    /// Milestone number the release belongs to
    pub milestone: u64,
    /// Calendar date in YYYY-MM-DD form, derived from `time`
    pub date: String,
    /// Raw upstream timestamp (epoch milliseconds or ISO string)
    pub time: Value,
}

/// Mapping from calendar date to the milestone records scheduled on that date
pub type MilestoneIndex = BTreeMap<String, Vec<MilestoneRecord>>;

/// Mapping from calendar date to the releases shipped on that date
pub type ReleaseIndex = BTreeMap<String, Vec<ReleaseRecord>>;

/// Groups flat release records by calendar date
///
/// Within each date, `(channel, version)` pairs are deduplicated; the first
/// occurrence in input order wins. The upstream feed is known to repeat
/// entries across pagination boundaries.
pub fn group_by_date(records: Vec<ReleaseRecord>) -> ReleaseIndex {
    let mut index = ReleaseIndex::new();

    for record in records {
        let bucket = index.entry(record.date.clone()).or_default();
        let duplicate = bucket
            .iter()
            .any(|existing| existing.channel == record.channel && existing.version == record.version);
        if !duplicate {
            bucket.push(record);
        }
    }

    index
}

/// Parses a milestone number that upstream serves as either a JSON number
/// or a numeric string
pub(crate) fn milestone_number(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Truncates an upstream timestamp to its calendar date
///
/// Numbers are interpreted as epoch milliseconds (what the dashboard
/// serves); strings are expected to lead with an ISO `YYYY-MM-DD` date.
pub(crate) fn calendar_date(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => date_prefix(s),
        Value::Number(n) => {
            let millis = n.as_i64()?;
            DateTime::from_timestamp_millis(millis).map(|dt| dt.date_naive().to_string())
        }
        _ => None,
    }
}

/// Extracts and validates the leading `YYYY-MM-DD` of a date or datetime string
pub(crate) fn date_prefix(s: &str) -> Option<String> {
    let prefix = s.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()?;
    Some(prefix.to_string())
}
