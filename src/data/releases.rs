//! Release list client for the Chromium dashboard
//!
//! Fetches the flat release feed and filters it down to entries that carry
//! everything a calendar needs: version, channel, milestone, and a
//! timestamp. Unlike the milestone schedule this is a single request per
//! refresh.

use serde::Deserialize;
use serde_json::Value;

use super::{calendar_date, milestone_number, ReleaseRecord};
use crate::upstream::{UpstreamClient, UpstreamError};

/// A raw release entry as served by the dashboard
///
/// Every field is optional on the wire; the completeness filter in
/// `normalize_releases` decides what survives.
#[derive(Debug, Deserialize)]
pub(crate) struct RawRelease {
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    milestone: Option<Value>,
    #[serde(default)]
    time: Option<Value>,
}

/// Client for fetching and normalizing the Chromium release list
#[derive(Debug, Clone)]
pub struct ReleaseClient {
    upstream: UpstreamClient,
}

impl ReleaseClient {
    pub fn new(upstream: UpstreamClient) -> Self {
        Self { upstream }
    }

    /// Fetches the release list and normalizes it into a flat record sequence
    ///
    /// The flat sequence is the canonical cached representation; grouping by
    /// date happens at the facade on the way out.
    pub async fn fetch_releases(&self) -> Result<Vec<ReleaseRecord>, UpstreamError> {
        let raw: Vec<RawRelease> = self.upstream.get_json("/fetch_releases").await?;
        Ok(normalize_releases(raw))
    }
}

/// Filters out incomplete entries and maps the rest to `ReleaseRecord`
///
/// Entries missing any of version, channel, milestone, or time are dropped,
/// as are entries whose timestamp does not yield a calendar date. Upstream
/// order is preserved so that downstream dedup keeps the first occurrence.
pub(crate) fn normalize_releases(raw: Vec<RawRelease>) -> Vec<ReleaseRecord> {
    raw.into_iter()
        .filter_map(|entry| {
            let version = entry.version?;
            let channel = entry.channel?;
            let milestone = milestone_number(entry.milestone.as_ref()?)?;
            let time = entry.time?;
            let date = calendar_date(&time)?;

            Some(ReleaseRecord {
                channel,
                version,
                milestone,
                date,
                time,
            })
        })
        .collect()
}
