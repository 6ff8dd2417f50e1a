//! Query facade for the release calendars
//!
//! `ReleaseCalendar` is the narrow surface the presentation layer calls:
//! one operation per data source, each resolving through the refresh
//! orchestrator. The operations never fail; a source with no reachable
//! upstream and no cache yields an empty index.

use std::time::Duration;

use crate::cache::CacheStore;
use crate::data::{group_by_date, MilestoneClient, MilestoneIndex, ReleaseClient, ReleaseIndex};
use crate::refresh::{refresh, SourceConfig};
use crate::upstream::UpstreamClient;

/// Milestone schedules move slowly; one refresh a day is plenty
const MILESTONE_SOURCE: SourceConfig = SourceConfig {
    cache_key: "chromium_milestones",
    ttl: Duration::from_secs(24 * 60 * 60),
};

/// Release lists churn often and are a single cheap request
const RELEASE_SOURCE: SourceConfig = SourceConfig {
    cache_key: "chromium_releases",
    ttl: Duration::from_secs(60 * 60),
};

/// Facade over the milestone and release pipelines
///
/// Both operations are idempotent and safe to call concurrently. Two
/// concurrent callers observing a stale cache may both fetch and both write
/// the artifact; writes are atomic and idempotent with respect to the same
/// upstream state, so last-writer-wins is acceptable.
#[derive(Debug, Clone)]
pub struct ReleaseCalendar {
    milestones: MilestoneClient,
    releases: ReleaseClient,
    store: CacheStore,
}

impl ReleaseCalendar {
    /// Creates a calendar against the public dashboard with the platform's
    /// XDG cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined.
    pub fn new() -> Option<Self> {
        Some(Self::with_parts(UpstreamClient::new(), CacheStore::new()?))
    }

    /// Creates a calendar from explicit parts; used for CLI overrides and tests
    pub fn with_parts(upstream: UpstreamClient, store: CacheStore) -> Self {
        Self {
            milestones: MilestoneClient::new(upstream.clone()),
            releases: ReleaseClient::new(upstream),
            store,
        }
    }

    /// Current milestone schedule, indexed by calendar date
    pub async fn milestone_schedule(&self) -> MilestoneIndex {
        refresh(&self.store, &MILESTONE_SOURCE, || self.milestones.fetch_schedule())
            .await
            .data
    }

    /// Current release calendar, indexed by calendar date with
    /// `(channel, version)` unique per date
    ///
    /// The cache artifact holds the flat record sequence; grouping and
    /// per-date dedup happen here on the way out.
    pub async fn release_calendar(&self) -> ReleaseIndex {
        let records = refresh(&self.store, &RELEASE_SOURCE, || self.releases.fetch_releases())
            .await
            .data;
        group_by_date(records)
    }
}
