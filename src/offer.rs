//! Canonical flight-offer records and the row normalizer.
//!
//! A raw listing row arrives as free text; normalization turns it into a
//! [`FlightOffer`] with a stable [`FlightKey`] or reports a per-row failure.
//! One bad row never aborts the batch — the caller gets both the offers and
//! the failures and decides what to log.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::listing::RawListingRow;

/// Separator used when a key is flattened to a single string for storage.
const KEY_SEPARATOR: &str = " | ";

/// Identity of a trackable offer: the raw combined date/time label plus the
/// destination label. The date label is kept verbatim so the key stays
/// stable across runs even if label-splitting logic evolves.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct FlightKey {
    pub date_label: String,
    pub destination: String,
}

impl FlightKey {
    pub fn new(date_label: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            date_label: date_label.into(),
            destination: destination.into(),
        }
    }

    /// Flat string form used as the JSON map key in persisted snapshots.
    pub fn storage_key(&self) -> String {
        format!("{}{}{}", self.date_label, KEY_SEPARATOR, self.destination)
    }
}

impl From<FlightKey> for String {
    fn from(k: FlightKey) -> String {
        k.storage_key()
    }
}

impl TryFrom<String> for FlightKey {
    type Error = std::convert::Infallible;

    /// Keys written by older deployments carried only the date label; a
    /// string without the separator loads as date-label-only.
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Ok(match s.split_once(KEY_SEPARATOR) {
            Some((date, dest)) => FlightKey::new(date, dest),
            None => FlightKey::new(s, ""),
        })
    }
}

impl std::fmt::Display for FlightKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.date_label, self.destination)
    }
}

/// One observed offer from the current fetch. `urgency` holds the
/// limited-availability marker text verbatim; `None` means the row carried
/// no such element, which is distinct from an empty message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlightOffer {
    pub key: FlightKey,
    /// Whole euros.
    pub price: u32,
    pub booking_link: String,
    pub urgency: Option<String>,
}

/// Per-row normalization failure. Reported, never escalated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("malformed price {raw:?} for row {label:?}")]
    MalformedPrice { label: String, raw: String },
}

/// Result of normalizing one fetch worth of rows.
#[derive(Debug, Default)]
pub struct NormalizedBatch {
    pub offers: Vec<FlightOffer>,
    pub failures: Vec<NormalizeError>,
}

// Leading integer followed by an optional currency unit, nothing else.
static RE_PRICE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(\d{1,7})\s*(?:€|eur|euroa?|euros?)?\s*$").unwrap());

/// Parse a price field like `"499 €"` into whole euros.
pub fn parse_price(raw: &str) -> Option<u32> {
    let caps = RE_PRICE.captures(raw)?;
    caps[1].parse().ok()
}

/// Split a combined `"10-05-2025 · 07:00"` label into date and time parts.
/// Logging convenience only — keys always keep the combined label.
pub fn split_label(label: &str) -> (&str, Option<&str>) {
    match label.split_once('·') {
        Some((date, time)) => (date.trim_end(), Some(time.trim_start())),
        None => (label, None),
    }
}

/// Map raw rows to offers, best-effort. Pure: no logging, no I/O — failures
/// come back on the side channel for the caller to surface.
pub fn normalize_rows(rows: Vec<RawListingRow>) -> NormalizedBatch {
    let mut batch = NormalizedBatch::default();
    for row in rows {
        match parse_price(&row.price_text) {
            Some(price) => batch.offers.push(FlightOffer {
                key: FlightKey::new(row.date_label, row.destination),
                price,
                booking_link: row.link,
                urgency: row.urgency_text,
            }),
            None => batch.failures.push(NormalizeError::MalformedPrice {
                label: row.date_label,
                raw: row.price_text,
            }),
        }
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(label: &str, price: &str) -> RawListingRow {
        RawListingRow {
            date_label: label.to_string(),
            destination: "Kreeta, Chania".to_string(),
            price_text: price.to_string(),
            link: "/lms/offer/1".to_string(),
            urgency_text: None,
        }
    }

    #[test]
    fn price_accepts_leading_integer_then_unit() {
        assert_eq!(parse_price("499 €"), Some(499));
        assert_eq!(parse_price("499€"), Some(499));
        assert_eq!(parse_price(" 1050 "), Some(1050));
        assert_eq!(parse_price("250 eur"), Some(250));
    }

    #[test]
    fn price_rejects_garbage() {
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("from 499 €"), None);
        assert_eq!(parse_price("€499"), None);
        assert_eq!(parse_price("499.50 €"), None);
    }

    #[test]
    fn split_label_keeps_both_halves() {
        let (d, t) = split_label("10-05-2025 · 07:00");
        assert_eq!(d, "10-05-2025");
        assert_eq!(t, Some("07:00"));
        assert_eq!(split_label("10-05-2025"), ("10-05-2025", None));
    }

    #[test]
    fn bad_row_does_not_abort_batch() {
        let rows = vec![
            row("10-05-2025 · 07:00", "199 €"),
            row("12-05-2025 · 12:30", "call us"),
            row("14-05-2025 · 18:45", "320 €"),
        ];
        let batch = normalize_rows(rows);
        assert_eq!(batch.offers.len(), 2);
        assert_eq!(batch.failures.len(), 1);
        assert!(matches!(
            &batch.failures[0],
            NormalizeError::MalformedPrice { label, .. } if label == "12-05-2025 · 12:30"
        ));
    }

    #[test]
    fn absent_urgency_stays_absent() {
        let mut r = row("10-05-2025 · 07:00", "199 €");
        r.urgency_text = None;
        let batch = normalize_rows(vec![r]);
        assert_eq!(batch.offers[0].urgency, None);
    }

    #[test]
    fn key_round_trips_through_storage_form() {
        let k = FlightKey::new("10-05-2025 · 07:00", "Kreeta, Chania");
        let s = k.storage_key();
        let back = FlightKey::try_from(s).unwrap();
        assert_eq!(back, k);
    }

    #[test]
    fn legacy_date_only_key_loads() {
        let back = FlightKey::try_from("10-05-2025 · 07:00".to_string()).unwrap();
        assert_eq!(back.date_label, "10-05-2025 · 07:00");
        assert_eq!(back.destination, "");
    }
}
