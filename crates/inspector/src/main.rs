//! Offline inspector: builds a map from content files, replays a pointer
//! script against it and writes the resulting tile records.
mod config;
mod garden;
mod logging;
mod replay;

use anyhow::Result;
use config::InspectorConfig;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = InspectorConfig::from_env();

    // Keep the file writer alive until the replay has finished
    let _guard = logging::setup_logging(config.log_dir.as_deref())?;

    let summary = replay::run(&config)?;
    tracing::info!(
        events = summary.events,
        hovers = summary.hovers,
        unhovers = summary.unhovers,
        clicks = summary.clicks,
        empty_clicks = summary.empty_clicks,
        watered = summary.watered.len(),
        "replay finished"
    );
    Ok(())
}
