//! Tests for vendor identity and provider selection parsing.

use std::str::FromStr;
use strum::IntoEnumIterator;
use switchboard_core::{ProviderSelection, Vendor};

#[test]
fn test_vendor_parse_is_case_insensitive() {
    assert_eq!(Vendor::from_str("GROQ").ok(), Some(Vendor::Groq));
    assert_eq!(Vendor::from_str("OpenAI").ok(), Some(Vendor::OpenAI));
    assert!(Vendor::from_str("anthropic").is_err());
}

#[test]
fn test_vendor_round_trips_through_display() {
    for vendor in Vendor::iter() {
        assert_eq!(Vendor::from_str(&vendor.to_string()).ok(), Some(vendor));
    }
}

#[test]
fn test_preference_with_vendor_prefix() {
    let selection = ProviderSelection::from_preference("openai:gpt-4o", "sk-test");
    assert_eq!(selection.vendor(), "openai");
    assert_eq!(selection.model().as_deref(), Some("gpt-4o"));
    assert_eq!(selection.credential(), "sk-test");
}

#[test]
fn test_preference_without_prefix_is_groq_model() {
    let selection = ProviderSelection::from_preference("llama-3.1-8b-instant", "gsk");
    assert_eq!(selection.vendor(), "groq");
    assert_eq!(selection.model().as_deref(), Some("llama-3.1-8b-instant"));
}

#[test]
fn test_preference_with_empty_model() {
    let selection = ProviderSelection::from_preference("gemini:", "key");
    assert_eq!(selection.vendor(), "gemini");
    assert_eq!(selection.model(), &None);
}

#[test]
fn test_debug_redacts_credential() {
    let selection = ProviderSelection::new("groq", "gsk_secret", None);
    let debug = format!("{selection:?}");
    assert!(!debug.contains("gsk_secret"));
    assert!(debug.contains("redacted"));
}
