//! Cache store for persisting normalized release data to disk
//!
//! Provides a `CacheStore` that keeps one pretty-printed JSON artifact per
//! data source, reporting artifact age from the file's modification time so
//! callers can apply their own freshness thresholds.

use std::io;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;

/// Result of reading from the cache, including how old the artifact is
#[derive(Debug)]
pub struct CachedData<T> {
    /// The cached data
    pub data: T,
    /// Time elapsed since the artifact was last written
    pub age: Duration,
}

/// Manages reading and writing cache artifacts on disk
///
/// Artifacts live as JSON files in an XDG-compliant cache directory
/// (`~/.cache/chromecal/` on Linux). The store is staleness-agnostic: reads
/// always succeed if an artifact exists, and the reported age lets the
/// refresh layer decide whether to serve or refetch.
#[derive(Debug, Clone)]
pub struct CacheStore {
    /// Directory where cache artifacts are stored
    cache_dir: PathBuf,
}

impl CacheStore {
    /// Creates a new CacheStore using the XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no
    /// home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "chromecal")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a new CacheStore with a custom cache directory
    ///
    /// Useful for testing or when a specific cache location is needed.
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Returns the path to the artifact for the given source key
    fn cache_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }

    /// Ensures the cache directory exists; an already-existing directory is success
    async fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.cache_dir).await
    }

    /// Writes data to the cache, replacing any previous artifact
    ///
    /// The payload is written to a temporary file and renamed into place, so
    /// a concurrent reader never observes a partially written artifact.
    pub async fn write<T: Serialize>(&self, key: &str, data: &T) -> io::Result<()> {
        self.ensure_dir().await?;

        let json = serde_json::to_string_pretty(data)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let path = self.cache_path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &path).await
    }

    /// Reads an artifact from the cache, regardless of its age
    ///
    /// Returns `None` if the artifact doesn't exist or cannot be parsed;
    /// both count as a cache miss. The caller compares `age` against its
    /// own freshness threshold.
    pub async fn read<T: DeserializeOwned>(&self, key: &str) -> Option<CachedData<T>> {
        let path = self.cache_path(key);
        let modified = fs::metadata(&path).await.ok()?.modified().ok()?;
        let content = fs::read_to_string(&path).await.ok()?;
        let data = serde_json::from_str(&content).ok()?;

        let age = SystemTime::now()
            .duration_since(modified)
            .unwrap_or_default();

        Some(CachedData { data, age })
    }
}
