//! Notification composition and the delivery seam.
//!
//! The engine hands over an ordered alert list; composition renders it into
//! one plain-text message. Delivery goes through the object-safe
//! [`AlertSink`] so the monitor can be exercised in tests without SMTP.
//! Callers never compose or deliver an empty alert list.

pub mod email;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::engine::{Alert, AlertKind};
use crate::offer::split_label;

/// Rendered outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Deliver one message. Failure is reported, not retried here.
    async fn deliver(&self, message: &OutboundMessage) -> Result<()>;
}

/// Render an alert batch into one message. `alerts` must be non-empty.
pub fn compose_alert_message(alerts: &[Alert]) -> OutboundMessage {
    debug_assert!(!alerts.is_empty());

    let subject = match alerts {
        [single] => subject_for(single),
        _ => format!("Flight alerts: {} offers need attention", alerts.len()),
    };

    let mut body = String::new();
    for alert in alerts {
        let offer = &alert.offer;
        let (date, time) = split_label(&offer.key.date_label);
        match alert.kind {
            AlertKind::PriceDrop => {
                body.push_str(&format!(
                    "The price for the flight on {date}{} has dropped to {} euros.\n",
                    time.map(|t| format!(" at {t}")).unwrap_or_default(),
                    offer.price
                ));
            }
            AlertKind::UrgencyWarning => {
                body.push_str(&format!(
                    "Limited availability for the flight on {}: \"{}\"\n",
                    offer.key.date_label,
                    offer.urgency.as_deref().unwrap_or("")
                ));
            }
        }
        body.push_str(&format!("Destination: {}\n", offer.key.destination));
        body.push_str(&format!("Price: {} euros\n", offer.price));
        body.push_str(&format!("Booking Link: {}\n\n", offer.booking_link));
    }

    OutboundMessage { subject, body }
}

fn subject_for(alert: &Alert) -> String {
    match alert.kind {
        AlertKind::PriceDrop => format!(
            "Price Drop Alert: Flight on {}",
            alert.offer.key.date_label
        ),
        AlertKind::UrgencyWarning => format!(
            "Limited Availability: Flight on {}",
            alert.offer.key.date_label
        ),
    }
}

/// Render the daily fetch-failure notification.
pub fn compose_error_message(failure: &str, date: NaiveDate) -> OutboundMessage {
    OutboundMessage {
        subject: format!("Flight watch fetch failed ({date})"),
        body: format!(
            "Fetching the flight listing failed on {date}.\n\nError: {failure}\n\n\
             At most one of these is sent per day; check logs for repeats.\n"
        ),
    }
}
