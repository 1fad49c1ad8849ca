//! Once-per-calendar-day gate for upstream-fetch failure notifications.
//!
//! Modeled as an explicit state transition over the persisted
//! [`ErrorMarker`]: however many fetches fail on one day, at most one
//! notification goes out. The day boundary is the UTC calendar date,
//! applied consistently everywhere dates are compared.

use chrono::NaiveDate;

use crate::snapshot::ErrorMarker;

/// Outcome of one throttle evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleDecision {
    /// Whether to notify the operator about today's failure.
    pub notify: bool,
    /// Marker to persist. Equal to the input when `notify` is false, so
    /// callers can skip the write.
    pub next: ErrorMarker,
}

/// Evaluate the daily error throttle. Pure — does not consult the clock.
pub fn throttle(marker: &ErrorMarker, today: NaiveDate) -> ThrottleDecision {
    let notify = match marker.last_error_notification_date {
        None => true,
        Some(last) => last < today,
    };
    let next = if notify {
        ErrorMarker {
            last_error_notification_date: Some(today),
        }
    } else {
        *marker
    };
    ThrottleDecision { notify, next }
}
