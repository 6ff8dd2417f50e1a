//! Milestone schedule client for the Chromium dashboard
//!
//! Fetches the milestone schedule one milestone at a time (the dashboard
//! only serves a handful of entries per unparameterized call) and
//! normalizes the raw entries into a date-indexed structure of stable and
//! beta records.

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{date_prefix, milestone_number, Channel, MilestoneIndex, MilestoneRecord};
use crate::upstream::{UpstreamClient, UpstreamError};

/// Lowest milestone included in a range refresh
const MILESTONE_FLOOR: u64 = 80;

/// How far past the latest published milestone the range extends
const RANGE_HEADROOM: u64 = 5;

/// Pause between per-milestone requests to stay under the dashboard's rate limit
const RANGE_DELAY: Duration = Duration::from_millis(100);

/// Response envelope for `/fetch_milestone_schedule`
#[derive(Debug, Deserialize)]
struct MilestoneSchedule {
    #[serde(default)]
    mstones: Vec<RawMilestone>,
}

/// A raw milestone entry as served by the dashboard
#[derive(Debug, Deserialize)]
pub(crate) struct RawMilestone {
    /// Milestone number; the dashboard serves both numbers and strings here
    mstone: Value,
    /// Scheduled stable promotion date
    #[serde(default)]
    stable_date: Option<String>,
    /// Earliest beta date
    #[serde(default)]
    earliest_beta: Option<String>,
}

/// Client for fetching and normalizing the Chromium milestone schedule
#[derive(Debug, Clone)]
pub struct MilestoneClient {
    upstream: UpstreamClient,
}

impl MilestoneClient {
    pub fn new(upstream: UpstreamClient) -> Self {
        Self { upstream }
    }

    /// Fetches the full milestone schedule and normalizes it
    ///
    /// Determines the latest milestone from an unparameterized call, then
    /// pulls one page per milestone from the floor through latest+5.
    /// Individual page failures are logged and skipped; only the initial
    /// call is allowed to fail the refresh.
    pub async fn fetch_schedule(&self) -> Result<MilestoneIndex, UpstreamError> {
        let latest = self.latest_milestone().await?;
        debug!(latest, "fetching milestone range");

        let mut all = Vec::new();
        for mstone in MILESTONE_FLOOR..=latest + RANGE_HEADROOM {
            let path = format!("/fetch_milestone_schedule?mstone={mstone}");
            match self.upstream.get_json_once::<MilestoneSchedule>(&path).await {
                Ok(schedule) => all.extend(schedule.mstones),
                Err(err) => warn!(mstone, error = %err, "skipping milestone page"),
            }
            tokio::time::sleep(RANGE_DELAY).await;
        }

        Ok(normalize_milestones(&all))
    }

    /// Determines the highest milestone number the dashboard currently publishes
    async fn latest_milestone(&self) -> Result<u64, UpstreamError> {
        let schedule: MilestoneSchedule =
            self.upstream.get_json("/fetch_milestone_schedule").await?;

        schedule
            .mstones
            .iter()
            .filter_map(|m| milestone_number(&m.mstone))
            .max()
            .ok_or_else(|| UpstreamError::MissingField("mstones".to_string()))
    }
}

/// Normalizes raw milestone entries into a date-indexed structure
///
/// Each entry contributes a stable record at `stable_date` and a beta record
/// at `earliest_beta`; entries with neither date contribute nothing. Within
/// a date bucket, `(mstone, channel)` pairs are unique, since range pages
/// can overlap.
pub(crate) fn normalize_milestones(raw: &[RawMilestone]) -> MilestoneIndex {
    let mut index = MilestoneIndex::new();

    for milestone in raw {
        let mstone = match milestone_number(&milestone.mstone) {
            Some(n) => n,
            None => continue,
        };

        let stable = milestone
            .stable_date
            .as_deref()
            .and_then(date_prefix)
            .map(|date| (date, Channel::Stable, format!("{mstone}.0.0.0")));
        let beta = milestone
            .earliest_beta
            .as_deref()
            .and_then(date_prefix)
            .map(|date| (date, Channel::Beta, format!("{mstone}.0.0.0-beta")));

        for (date, channel, version) in stable.into_iter().chain(beta) {
            let bucket = index.entry(date.clone()).or_default();
            let duplicate = bucket
                .iter()
                .any(|existing: &MilestoneRecord| existing.mstone == mstone && existing.channel == channel);
            if !duplicate {
                bucket.push(MilestoneRecord {
                    mstone,
                    channel,
                    version,
                    date,
                });
            }
        }
    }

    index
}
