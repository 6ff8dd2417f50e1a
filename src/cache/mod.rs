//! Cache module for storing normalized release data on disk
//!
//! This module provides a cache store that persists one JSON artifact per
//! data source. Reads report the artifact's age rather than a verdict, so
//! the refresh layer can apply per-source freshness thresholds and fall back
//! to stale data when the upstream API is unavailable.

mod store;

pub use store::{CacheStore, CachedData};
