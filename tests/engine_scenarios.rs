// tests/engine_scenarios.rs
// Decision-engine scenarios exercised through the public API.

use fare_watch::{decide, FlightKey, FlightOffer, AlertKind, Snapshot, TrackedDateFilter};

const LABEL: &str = "10-05-2025 · 07:00";
const DEST: &str = "Kreeta, Chania";

fn offer(price: u32, urgency: Option<&str>) -> FlightOffer {
    FlightOffer {
        key: FlightKey::new(LABEL, DEST),
        price,
        booking_link: "https://www.tui.fi/lms/offer/10052025-chania".into(),
        urgency: urgency.map(str::to_string),
    }
}

fn filter() -> TrackedDateFilter {
    TrackedDateFilter::new([LABEL.to_string()], 250)
}

#[test]
fn first_run_price_drop_then_quiet_then_urgency_once() {
    let f = filter();

    // Run 1: no history, tracked, under threshold -> price drop.
    let (alerts1, snap1) = decide(&[offer(199, None)], &Snapshot::default(), &f);
    assert_eq!(alerts1.len(), 1);
    assert_eq!(alerts1[0].kind, AlertKind::PriceDrop);
    let st = snap1.get(&FlightKey::new(LABEL, DEST)).unwrap();
    assert_eq!(st.last_known_price, 199);
    assert!(!st.urgency_alert_sent);

    // Run 2: unchanged price -> silence.
    let (alerts2, snap2) = decide(&[offer(199, None)], &snap1, &f);
    assert!(alerts2.is_empty());

    // Run 3: urgency marker appears -> one urgency warning.
    let (alerts3, snap3) = decide(&[offer(199, Some("Vain 3 paikkaa"))], &snap2, &f);
    assert_eq!(alerts3.len(), 1);
    assert_eq!(alerts3[0].kind, AlertKind::UrgencyWarning);

    // Run 4: marker still present -> no second warning.
    let (alerts4, _) = decide(&[offer(199, Some("Vain 3 paikkaa"))], &snap3, &f);
    assert!(alerts4.is_empty());
}

#[test]
fn no_prior_state_alert_gated_on_tracking_and_threshold() {
    let f = filter();
    let empty = Snapshot::default();

    // In tracked set, at threshold boundary: alerts.
    let (a, _) = decide(&[offer(250, None)], &empty, &f);
    assert_eq!(a.len(), 1);

    // Above threshold: never.
    let (a, _) = decide(&[offer(251, None)], &empty, &f);
    assert!(a.is_empty());

    // Outside tracked set: never, even when cheap.
    let other = TrackedDateFilter::new(["some-other-label".to_string()], 250);
    let (a, _) = decide(&[offer(100, None)], &empty, &other);
    assert!(a.is_empty());
}

#[test]
fn equal_or_higher_price_never_alerts_with_history() {
    let f = filter();
    let (_, snap) = decide(&[offer(200, None)], &Snapshot::default(), &f);

    let (equal, _) = decide(&[offer(200, None)], &snap, &f);
    assert!(equal.is_empty());

    let (higher, _) = decide(&[offer(240, None)], &snap, &f);
    assert!(higher.is_empty());

    let (lower, _) = decide(&[offer(180, None)], &snap, &f);
    assert_eq!(lower.len(), 1);
}

#[test]
fn delisted_offers_leave_the_snapshot() {
    let f = filter();
    let other = FlightOffer {
        key: FlightKey::new("12-05-2025 · 12:30", "Rodos"),
        price: 300,
        booking_link: "/lms/offer/rodos".into(),
        urgency: None,
    };
    let (_, snap1) = decide(
        &[offer(199, None), other.clone()],
        &Snapshot::default(),
        &f,
    );
    assert_eq!(snap1.len(), 2);

    let (_, snap2) = decide(&[other], &snap1, &f);
    assert_eq!(snap2.len(), 1);
    assert!(snap2.get(&FlightKey::new(LABEL, DEST)).is_none());
}

#[test]
fn decide_has_no_hidden_state() {
    let f = filter();
    let current = vec![offer(199, Some("last seats"))];
    let previous = Snapshot::default();

    let first = decide(&current, &previous, &f);
    let second = decide(&current, &previous, &f);
    assert_eq!(first.0, second.0);
    assert_eq!(first.1, second.1);
}
