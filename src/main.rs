//! # Playdate SDK Feed
//!
//! Builds Atom, RSS and JSON feeds from the human-written Playdate SDK
//! changelog at <https://sdk.play.date/changelog/>, plus a small landing page.
//!
//! ## Usage
//!
//! ```sh
//! playdate_sdk_feed -o ./public
//! ```
//!
//! ## Architecture
//!
//! Each run rebuilds everything from the live page:
//! 1. **Fetching**: download the changelog HTML
//! 2. **Extraction**: find one section per release and normalize its fields
//! 3. **Items**: validate records, derive ids and links, keep the newest 10
//! 4. **Synthesis**: serialize the feeds (and the legacy copies) in memory
//! 5. **Output**: write feeds, page and icon concurrently
//!
//! A failed fetch or an unrecognisable page exits non-zero without writing
//! anything.

use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod items;
mod models;
mod outputs;
mod pipeline;
mod scrapers;

use cli::Cli;
use config::Config;
use error::FeedError;

#[tokio::main]
async fn main() -> ExitCode {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("playdate_sdk_feed starting up");

    let args = Cli::parse();
    debug!(?args.output_dir, ?args.config, no_legacy = args.no_legacy, "Parsed CLI arguments");

    match run(&args).await {
        Ok(()) => {
            let elapsed = start_time.elapsed();
            info!(?elapsed, "Execution complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Feed build failed");
            ExitCode::from(e.exit_status())
        }
    }
}

async fn run(args: &Cli) -> Result<(), FeedError> {
    let mut config = match &args.config {
        Some(path) => Config::load(path).await?,
        None => Config::default(),
    };
    if args.no_legacy {
        config.legacy.enabled = false;
    }

    let outputs = pipeline::run(&config, Path::new(&args.output_dir)).await?;
    info!(
        items = outputs.items.len(),
        excluded = outputs.stats.total(),
        legacy = outputs.legacy.is_some(),
        "Feeds published"
    );
    Ok(())
}
