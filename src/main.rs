//! chromecal - Chromium release calendars on the command line
//!
//! Fetches milestone schedules and release lists from the Chromium
//! dashboard, caches them on disk, and prints the date-indexed result as
//! JSON on stdout. Logs go to stderr so the output stays pipeable.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use chromecal::cli::{Cli, Source};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let calendar = cli
        .build_calendar()
        .ok_or("could not determine a cache directory; pass --cache-dir")?;

    let json = match cli.source {
        Source::Milestones => serde_json::to_string_pretty(&calendar.milestone_schedule().await)?,
        Source::Releases => serde_json::to_string_pretty(&calendar.release_calendar().await)?,
    };
    println!("{json}");

    Ok(())
}
