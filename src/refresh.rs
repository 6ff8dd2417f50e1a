//! Refresh orchestration: cache-first reads with stale fallback
//!
//! Implements the per-request refresh policy shared by both data sources:
//! serve a fresh cache hit, otherwise fetch upstream and rewrite the cache,
//! and fall back to a stale artifact (or the empty value) when upstream is
//! down. Each request resolves to exactly one terminal outcome.

use std::future::Future;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::cache::CacheStore;
use crate::upstream::UpstreamError;

/// Per-source refresh parameters
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Cache artifact name, without extension
    pub cache_key: &'static str,
    /// Maximum artifact age before a refresh is attempted
    pub ttl: Duration,
}

/// Terminal state of a refresh request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Fetched from upstream and (best-effort) written to the cache
    Fresh,
    /// Served from a cache artifact younger than the TTL
    Cached,
    /// Upstream failed; served from a stale cache artifact
    Stale,
    /// Upstream failed and no artifact exists; served the empty value
    Empty,
}

/// A resolved refresh request
#[derive(Debug)]
pub struct Refreshed<T> {
    pub data: T,
    pub outcome: RefreshOutcome,
}

/// Resolves one request for a source
///
/// State machine:
/// 1. A cache artifact with `age < ttl` is served as-is (boundary equality
///    counts as stale).
/// 2. Otherwise `fetch` runs; on success the cache is rewritten and the
///    fresh data served. A cache-write failure is logged but does not fail
///    the request.
/// 3. On fetch failure the cache is re-read ignoring age; a stale artifact
///    is served unmodified, and with no artifact at all the source's empty
///    value (`T::default()`) is returned. Errors never propagate past here.
pub async fn refresh<T, F, Fut>(store: &CacheStore, source: &SourceConfig, fetch: F) -> Refreshed<T>
where
    T: Serialize + DeserializeOwned + Default,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, UpstreamError>>,
{
    if let Some(cached) = store.read::<T>(source.cache_key).await {
        if cached.age < source.ttl {
            debug!(key = source.cache_key, age_secs = cached.age.as_secs(), "serving fresh cache");
            return Refreshed {
                data: cached.data,
                outcome: RefreshOutcome::Cached,
            };
        }
    }

    match fetch().await {
        Ok(data) => {
            if let Err(err) = store.write(source.cache_key, &data).await {
                warn!(key = source.cache_key, error = %err, "failed to write cache artifact");
            }
            Refreshed {
                data,
                outcome: RefreshOutcome::Fresh,
            }
        }
        Err(err) => {
            warn!(key = source.cache_key, error = %err, "upstream refresh failed, falling back to cache");
            match store.read::<T>(source.cache_key).await {
                Some(cached) => Refreshed {
                    data: cached.data,
                    outcome: RefreshOutcome::Stale,
                },
                None => Refreshed {
                    data: T::default(),
                    outcome: RefreshOutcome::Empty,
                },
            }
        }
    }
}
