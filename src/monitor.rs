//! Per-tick orchestration and the scheduler loop.
//!
//! One tick: fetch → parse → normalize → load snapshot → decide → deliver →
//! persist. A fetch failure takes the throttle path instead and leaves the
//! snapshot untouched. Delivery is best-effort: a failed send is logged and
//! state still advances, so the same condition is never re-alerted forever.
//! Persistence failures are the only fatal outcome of a tick.

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::time;

use crate::config::WatchConfig;
use crate::engine::decide;
use crate::fetch::ListingSource;
use crate::listing::parse_listing;
use crate::notify::{compose_alert_message, compose_error_message, AlertSink};
use crate::offer::normalize_rows;
use crate::snapshot::{MarkerStore, SnapshotStore};
use crate::throttle::throttle;

/// What one tick did, for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickReport {
    /// Successful fetch: offers diffed, snapshot replaced.
    Checked {
        offers: usize,
        malformed: usize,
        alerts: usize,
        delivered: bool,
    },
    /// Fetch failed: throttle consulted instead.
    FetchFailed { notified: bool },
}

pub struct Monitor<'a> {
    pub source: &'a dyn ListingSource,
    pub sink: &'a dyn AlertSink,
    pub snapshots: SnapshotStore,
    pub markers: MarkerStore,
}

impl Monitor<'_> {
    pub async fn run_tick(&self, cfg: &WatchConfig) -> Result<TickReport> {
        let html = match self.source.fetch_listing().await {
            Ok(html) => html,
            Err(e) => return self.handle_fetch_failure(e).await,
        };

        let rows = parse_listing(&html);
        let batch = normalize_rows(rows);
        for failure in &batch.failures {
            tracing::warn!(%failure, "offer skipped");
        }

        let previous = self.snapshots.load().context("loading snapshot")?;
        let (alerts, next) = decide(&batch.offers, &previous, &cfg.tracked_filter());

        let mut delivered = false;
        if !alerts.is_empty() {
            let message = compose_alert_message(&alerts);
            match self.sink.deliver(&message).await {
                Ok(()) => {
                    delivered = true;
                    tracing::info!(alerts = alerts.len(), subject = %message.subject, "alerts sent");
                }
                // At-most-once policy: state advances even when the send
                // fails, a lost alert beats an alert storm.
                Err(e) => tracing::warn!("alert delivery failed: {e:#}"),
            }
        }

        self.snapshots.persist(&next).context("persisting snapshot")?;

        Ok(TickReport::Checked {
            offers: batch.offers.len(),
            malformed: batch.failures.len(),
            alerts: alerts.len(),
            delivered,
        })
    }

    async fn handle_fetch_failure(&self, err: anyhow::Error) -> Result<TickReport> {
        tracing::warn!(source = self.source.name(), "listing fetch failed: {err:#}");

        let today = Utc::now().date_naive();
        let marker = self.markers.load().context("loading error marker")?;
        let decision = throttle(&marker, today);

        if decision.notify {
            let message = compose_error_message(&format!("{err:#}"), today);
            if let Err(e) = self.sink.deliver(&message).await {
                tracing::warn!("error notification delivery failed: {e:#}");
            }
            self.markers
                .persist(&decision.next)
                .context("persisting error marker")?;
        } else {
            tracing::debug!("error notification suppressed, already sent today");
        }

        Ok(TickReport::FetchFailed {
            notified: decision.notify,
        })
    }
}

/// Drive ticks forever on the configured interval. Ticks never overlap; a
/// failed tick is logged and the loop continues.
pub async fn run_monitor(monitor: Monitor<'_>, cfg: &WatchConfig) -> Result<()> {
    let mut ticker = time::interval(time::Duration::from_secs(cfg.check_interval_secs));
    loop {
        ticker.tick().await;
        match monitor.run_tick(cfg).await {
            Ok(report) => tracing::info!(?report, "tick finished"),
            Err(e) => tracing::warn!("tick failed: {e:#}"),
        }
    }
}
