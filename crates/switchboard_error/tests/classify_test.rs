//! Tests for vendor failure classification.

use std::time::Duration;
use strum::IntoEnumIterator;
use switchboard_error::{
    FailureKind, RETRY_HINT_CEILING, RetryableError, classify, hint_from_secs, is_daily_quota,
    leading_status, parse_retry_hint,
};

#[test]
fn test_content_blocked_never_retries_or_switches() {
    for text in [
        "Response blocked by safety filters: SAFETY",
        "content_filter triggered",
        "PROHIBITED_CONTENT",
    ] {
        let info = classify(text, "Gemini", None);
        assert_eq!(info.kind(), FailureKind::ContentBlocked, "{text}");
        assert!(!info.is_retryable());
        assert!(!info.suggests_switch());
    }
}

#[test]
fn test_retryable_matrix() {
    for kind in FailureKind::iter() {
        let expected = matches!(
            kind,
            FailureKind::Timeout
                | FailureKind::RateLimit
                | FailureKind::NetworkError
                | FailureKind::ProviderError
                | FailureKind::ModelNotFound
        );
        assert_eq!(kind.is_retryable(), expected, "{kind}");
    }
    assert!(FailureKind::InvalidKey.suggests_switch());
    assert!(FailureKind::QuotaExceeded.suggests_switch());
    assert!(!FailureKind::ContentBlocked.suggests_switch());
}

#[test]
fn test_vendor_texts_classify() {
    let cases = [
        ("Request timed out after 60s", FailureKind::Timeout),
        ("504 Gateway Timeout", FailureKind::Timeout),
        (
            "429 Too Many Requests: Rate limit reached for model llama-3.3-70b-versatile",
            FailureKind::RateLimit,
        ),
        ("429 RESOURCE_EXHAUSTED: Quota exceeded for metric", FailureKind::RateLimit),
        ("401 Unauthorized: Invalid API Key (invalid_api_key)", FailureKind::InvalidKey),
        (
            "400 INVALID_ARGUMENT: API key not valid. Please pass a valid API key.",
            FailureKind::InvalidKey,
        ),
        (
            "429 Too Many Requests: You exceeded your current quota (insufficient_quota)",
            FailureKind::QuotaExceeded,
        ),
        (
            "404 NOT_FOUND: models/gemini-1.0-pro is not found for API version v1beta",
            FailureKind::ModelNotFound,
        ),
        (
            "400 Bad Request: The model `mixtral-8x7b-32768` has been decommissioned",
            FailureKind::ModelNotFound,
        ),
        ("error sending request: connection refused", FailureKind::NetworkError),
        ("500 Internal Server Error: upstream exploded", FailureKind::ProviderError),
        ("   ", FailureKind::Unknown),
    ];
    for (text, kind) in cases {
        assert_eq!(FailureKind::from_message(text), kind, "{text}");
    }
}

#[test]
fn test_status_digits_inside_vendor_text_are_not_statuses() {
    let cases = [
        (
            "429 Too Many Requests: Rate limit reached for model `llama-3.3-70b-versatile` \
             on tokens per minute (TPM): Limit 12000, Used 11401, Requested 1200. \
             Please try again in 3s. (rate_limit_exceeded)",
            FailureKind::RateLimit,
        ),
        (
            "500 Internal Server Error: request req_4291 failed upstream",
            FailureKind::ProviderError,
        ),
        (
            "503 Service Unavailable: shard 404 is rebalancing",
            FailureKind::ProviderError,
        ),
        (
            "400 Bad Request: max_tokens 4010 exceeds the context window",
            FailureKind::ProviderError,
        ),
    ];
    for (text, kind) in cases {
        assert_eq!(FailureKind::from_message(text), kind, "{text}");
    }
}

#[test]
fn test_leading_status_token() {
    assert_eq!(leading_status("401 Unauthorized"), Some(401));
    assert_eq!(leading_status("  404 NOT_FOUND: gone"), Some(404));
    assert_eq!(leading_status("Used 11401 of 12000"), None);
    assert_eq!(leading_status("4290 things"), None);
    assert_eq!(FailureKind::from_message("401"), FailureKind::InvalidKey);
    assert_eq!(FailureKind::from_message("429"), FailureKind::RateLimit);
    assert_eq!(FailureKind::from_message("404"), FailureKind::ModelNotFound);
}

#[test]
fn test_classification_is_case_insensitive() {
    assert_eq!(
        FailureKind::from_message("RATE LIMIT EXCEEDED"),
        FailureKind::RateLimit
    );
    assert_eq!(FailureKind::from_message("Deadline Exceeded"), FailureKind::Timeout);
}

#[test]
fn test_user_message_names_provider_and_model() {
    let info = classify(
        "429 Too Many Requests",
        "Groq",
        Some("llama-3.3-70b-versatile".to_string()),
    );
    let text = info.user_message();
    assert!(text.starts_with("Groq (llama-3.3-70b-versatile): Rate limit reached."));
    assert!(text.ends_with("Consider switching to a different AI provider."));
    assert!(!text.contains("429"));
}

#[test]
fn test_user_message_without_switch_hint() {
    let info = classify("500 Internal Server Error: boom", "OpenAI", None);
    let text = info.user_message();
    assert!(text.contains("Details: 500 Internal Server Error: boom"));
    assert!(!text.contains("switching"));
}

#[test]
fn test_daily_quota_detection() {
    assert!(is_daily_quota(
        "Rate limit reached on tokens per day (TPD): Limit 100000, Used 99997, Requested 50"
    ));
    assert!(is_daily_quota(
        "Quota exceeded for metric: generate_content_free_tier_requests_PerDay"
    ));
    assert!(!is_daily_quota("Rate limit reached on tokens per minute (TPM)"));
}

#[test]
fn test_retry_hints() {
    assert_eq!(
        parse_retry_hint("Please try again in 7.5s. Visit https://console.groq.com"),
        Some(Duration::from_millis(7500))
    );
    assert_eq!(
        parse_retry_hint("Please try again in 450ms."),
        Some(Duration::from_millis(450))
    );
    assert_eq!(
        parse_retry_hint("Please retry in 12s."),
        Some(Duration::from_secs(12))
    );
    assert_eq!(
        parse_retry_hint(r#"{"@type": "RetryInfo", "retryDelay": "41s"}"#),
        Some(Duration::from_secs(41))
    );
    assert_eq!(parse_retry_hint("429 Too Many Requests"), None);
}

#[test]
fn test_oversized_retry_hints_are_clamped() {
    assert_eq!(
        parse_retry_hint("Rate limit reached. Please try again in 99999999999999999999999s."),
        Some(RETRY_HINT_CEILING)
    );
    assert_eq!(
        parse_retry_hint("Please try again in 9999999999999999999999999999999h."),
        Some(RETRY_HINT_CEILING)
    );
    assert_eq!(hint_from_secs(f64::INFINITY), Some(RETRY_HINT_CEILING));
    assert_eq!(hint_from_secs(f64::NAN), None);
    assert_eq!(hint_from_secs(-3.0), None);
    assert_eq!(hint_from_secs(2.5), Some(Duration::from_millis(2500)));
}
