//! Flight Fare Watch — Binary Entrypoint
//! Loads operator config, wires the HTTP listing source and SMTP sender,
//! and drives the scheduled monitor loop.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fare_watch::config::WatchConfig;
use fare_watch::fetch::HttpListingSource;
use fare_watch::monitor::{run_monitor, Monitor};
use fare_watch::notify::email::EmailSender;
use fare_watch::snapshot::{MarkerStore, SnapshotStore};

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fare_watch=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent. Brings in the SMTP
    // credentials and WATCH_CONFIG_PATH before anything reads them.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = WatchConfig::load_default().context("loading watch config")?;
    tracing::info!(
        airport = %cfg.route.airport,
        destination = %cfg.route.destination,
        tracked = cfg.tracked_dates.len(),
        threshold = cfg.price_threshold,
        interval_secs = cfg.check_interval_secs,
        "fare-watch starting"
    );

    let source = HttpListingSource::new(&cfg.route)?;
    let sink = EmailSender::from_env(&cfg.recipients).context("configuring SMTP sender")?;

    let monitor = Monitor {
        source: &source,
        sink: &sink,
        snapshots: SnapshotStore::new(cfg.snapshot_path()),
        markers: MarkerStore::new(cfg.marker_path()),
    };

    run_monitor(monitor, &cfg).await
}
