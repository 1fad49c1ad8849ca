// tests/listing_normalize.rs
// Fixture listing page through the parser and normalizer.

use fare_watch::listing::parse_listing;
use fare_watch::offer::{normalize_rows, NormalizeError};

const LISTING: &str = include_str!("fixtures/listing.html");

#[test]
fn fixture_rows_survive_entity_decoding() {
    let rows = parse_listing(LISTING);
    assert_eq!(rows.len(), 3);

    assert_eq!(rows[0].date_label, "10-05-2025 · 07:00");
    assert_eq!(rows[0].destination, "Kreeta, Chania");
    assert_eq!(rows[0].price_text, "199 €");
    assert_eq!(
        rows[0].link,
        "https://www.tui.fi/lms/offer/10052025-chania"
    );
    assert_eq!(rows[0].urgency_text, None);

    assert_eq!(
        rows[1].urgency_text.as_deref(),
        Some("Vain 3 paikkaa jäljellä")
    );
}

#[test]
fn malformed_price_is_reported_not_fatal() {
    let batch = normalize_rows(parse_listing(LISTING));

    assert_eq!(batch.offers.len(), 2);
    assert_eq!(batch.offers[0].price, 199);
    assert_eq!(batch.offers[1].price, 320);

    assert_eq!(batch.failures.len(), 1);
    let NormalizeError::MalformedPrice { label, raw } = &batch.failures[0];
    assert_eq!(label, "14-05-2025 · 18:45");
    assert_eq!(raw, "soita meille");
}

#[test]
fn keys_keep_the_combined_label_verbatim() {
    let batch = normalize_rows(parse_listing(LISTING));
    let key = &batch.offers[0].key;
    assert_eq!(key.date_label, "10-05-2025 · 07:00");
    assert_eq!(key.storage_key(), "10-05-2025 · 07:00 | Kreeta, Chania");
}
