//! Command-line interface parsing for the release calendar
//!
//! This module handles parsing of CLI arguments using clap: which data
//! source to print and the optional cache-directory and dashboard-URL
//! overrides, wired into the calendar facade.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::cache::CacheStore;
use crate::calendar::ReleaseCalendar;
use crate::upstream::UpstreamClient;

/// Data source to fetch and print
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Source {
    /// Chromium milestone schedule (stable and beta dates)
    Milestones,
    /// Shipped Chromium releases
    Releases,
}

/// Chromium release calendars on the command line
#[derive(Parser, Debug)]
#[command(name = "chromecal")]
#[command(about = "Fetch and print Chromium release calendars as date-indexed JSON")]
#[command(version)]
pub struct Cli {
    /// Which calendar to print
    #[arg(value_enum)]
    pub source: Source,

    /// Cache directory override (defaults to the platform cache dir)
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Dashboard base URL override
    #[arg(long, value_name = "URL")]
    pub dashboard_url: Option<String>,
}

impl Cli {
    /// Builds the calendar facade from the parsed arguments
    ///
    /// Returns `None` when no cache directory was given and the platform
    /// default cannot be determined.
    pub fn build_calendar(&self) -> Option<ReleaseCalendar> {
        let store = match &self.cache_dir {
            Some(dir) => CacheStore::with_dir(dir.clone()),
            None => CacheStore::new()?,
        };
        let upstream = match &self.dashboard_url {
            Some(url) => UpstreamClient::with_base_url(url.clone()),
            None => UpstreamClient::new(),
        };
        Some(ReleaseCalendar::with_parts(upstream, store))
    }
}
