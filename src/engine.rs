//! # Alert Decision Engine
//! Pure, testable logic that maps `(current offers, previous snapshot,
//! filter)` → `(alerts, next snapshot)`. No I/O, suitable for unit tests
//! and offline replay.
//!
//! Policy: an urgency marker alerts once per key lifetime; a price drop
//! alerts only for tracked labels at or under the threshold, against the
//! remembered baseline. Every observed price is recorded regardless, and
//! keys missing from the current fetch fall out of the next snapshot.

use std::collections::BTreeSet;

use crate::offer::FlightOffer;
use crate::snapshot::{FlightState, Snapshot};

/// Which condition fired for an offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    PriceDrop,
    UrgencyWarning,
}

/// Transient decision output, handed to the notification composer and then
/// discarded. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub offer: FlightOffer,
}

/// Per-run, immutable gating configuration for the price-drop rule.
#[derive(Debug, Clone, Default)]
pub struct TrackedDateFilter {
    /// Raw combined date/time labels the operator cares about.
    pub tracked_labels: BTreeSet<String>,
    /// Whole euros; offers strictly above this never price-alert.
    pub threshold: u32,
}

impl TrackedDateFilter {
    pub fn new(labels: impl IntoIterator<Item = String>, threshold: u32) -> Self {
        Self {
            tracked_labels: labels.into_iter().collect(),
            threshold,
        }
    }

    fn tracks(&self, label: &str) -> bool {
        self.tracked_labels.contains(label)
    }
}

/// Decide which alerts to send and compute the snapshot to persist.
///
/// Alerts come back in the input offers' order; for a single offer the
/// urgency warning precedes the price drop. The previous snapshot is read
/// only — keys it holds that are absent from `current` are dropped, not
/// carried forward.
pub fn decide(
    current: &[FlightOffer],
    previous: &Snapshot,
    filter: &TrackedDateFilter,
) -> (Vec<Alert>, Snapshot) {
    let mut alerts = Vec::new();
    let mut next = Snapshot::default();

    for offer in current {
        let prev = previous.get(&offer.key);

        // Urgency: fire on first sighting of the marker, then stay quiet for
        // as long as the key keeps appearing (marker text changes included).
        let already_sent = prev.is_some_and(|p| p.urgency_alert_sent);
        let urgency_alert_sent = if offer.urgency.is_some() && !already_sent {
            alerts.push(Alert {
                kind: AlertKind::UrgencyWarning,
                offer: offer.clone(),
            });
            true
        } else {
            already_sent
        };

        // Price drop: gated on tracking + threshold; first sighting of a
        // tracked in-budget offer counts as a drop from "unknown".
        if filter.tracks(&offer.key.date_label) && offer.price <= filter.threshold {
            let dropped = match prev {
                None => true,
                Some(p) => p.last_known_price > offer.price,
            };
            if dropped {
                alerts.push(Alert {
                    kind: AlertKind::PriceDrop,
                    offer: offer.clone(),
                });
            }
        }

        // The latest observed price is always recorded, tracked or not, so
        // comparisons stay accurate once an offer re-enters tracking.
        next.insert(
            offer.key.clone(),
            FlightState {
                last_known_price: offer.price,
                urgency_alert_sent,
            },
        );
    }

    (alerts, next)
}
