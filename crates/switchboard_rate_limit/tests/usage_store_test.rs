//! Tests for the usage store.

use std::collections::HashMap;
use switchboard_core::Vendor;
use switchboard_rate_limit::{DefaultLimits, RateLimitSnapshot, UsageStore, UsageWindow};

fn store() -> UsageStore {
    let mut defaults = HashMap::new();
    defaults.insert(
        Vendor::Groq,
        DefaultLimits {
            requests_per_minute: 2,
            tokens_per_minute: 100,
            requests_per_day: 1000,
        },
    );
    UsageStore::new(defaults)
}

#[test]
fn test_optimistic_usage_needs_seed() {
    let store = store();
    assert!(!store.record_optimistic_usage(Vendor::Groq, Some(10)));
    assert!(store.snapshot(Vendor::Groq).is_none());
}

#[test]
fn test_optimistic_usage_counts_request_and_tokens() {
    let store = store();
    assert!(store.seed_defaults(Vendor::Groq));
    assert!(store.record_optimistic_usage(Vendor::Groq, Some(40)));

    let snapshot = store.snapshot(Vendor::Groq).expect("seeded");
    assert_eq!(snapshot.requests_per_minute().used(), 1);
    assert_eq!(snapshot.requests_per_day().used(), 1);
    assert_eq!(snapshot.tokens_per_minute().used(), 40);
}

#[test]
fn test_optimistic_usage_never_exceeds_limit() {
    let store = store();
    store.seed_defaults(Vendor::Groq);
    for _ in 0..5 {
        store.record_optimistic_usage(Vendor::Groq, Some(60));
    }
    let snapshot = store.snapshot(Vendor::Groq).expect("seeded");
    assert_eq!(snapshot.requests_per_minute().used(), 2);
    assert_eq!(snapshot.tokens_per_minute().used(), 100);
    assert_eq!(snapshot.tokens_per_minute().remaining(), 0);
    assert_eq!(snapshot.tokens_per_minute().percent_used(), 100.0);
}

#[test]
fn test_observed_limits_overwrite_optimistic_state() {
    let store = store();
    store.seed_defaults(Vendor::Groq);
    store.record_optimistic_usage(Vendor::Groq, Some(90));

    let observed = RateLimitSnapshot::new(
        UsageWindow::new(0, 30),
        UsageWindow::new(5, 6000),
        UsageWindow::new(10, 14_400),
    );
    store.record_observed_limits(Vendor::Groq, observed.clone());
    assert_eq!(store.snapshot(Vendor::Groq), Some(observed));
}

#[test]
fn test_seed_defaults_only_when_empty() {
    let store = store();
    store.record_observed_limits(
        Vendor::Groq,
        RateLimitSnapshot::new(
            UsageWindow::new(1, 5),
            UsageWindow::new(1, 5),
            UsageWindow::new(1, 5),
        ),
    );
    assert!(!store.seed_defaults(Vendor::Groq));
    assert_eq!(
        store
            .snapshot(Vendor::Groq)
            .map(|s| s.requests_per_minute().limit()),
        Some(5)
    );
}

#[test]
fn test_unknown_vendor_defaults_are_empty() {
    let store = store();
    assert!(store.seed_defaults(Vendor::OpenAI));
    let snapshot = store.snapshot(Vendor::OpenAI).expect("seeded");
    assert_eq!(snapshot.requests_per_minute().limit(), 0);
    assert_eq!(snapshot.requests_per_minute().percent_used(), 0.0);
}

#[test]
fn test_deserialized_window_is_clamped() -> anyhow::Result<()> {
    let window: UsageWindow = serde_json::from_str(r#"{"used": 120, "limit": 100}"#)?;
    assert_eq!(window.used(), 100);
    assert_eq!(window.remaining(), 0);

    let snapshot = RateLimitSnapshot::new(
        UsageWindow::new(3, 30),
        UsageWindow::new(99_997, 100_000),
        UsageWindow::new(10, 14_400),
    );
    let restored: RateLimitSnapshot = serde_json::from_str(&serde_json::to_string(&snapshot)?)?;
    assert_eq!(restored, snapshot);
    assert_eq!(restored.tokens_per_minute().remaining(), 3);
    Ok(())
}
