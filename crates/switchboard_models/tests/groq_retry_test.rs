//! Groq retry behavior against a scripted transport.

mod test_utils;

use std::sync::Arc;
use std::time::Duration;
use switchboard_core::{GenerateRequest, Vendor};
use switchboard_interface::SwitchboardDriver;
use switchboard_models::GroqDriver;
use test_utils::{
    ScriptedTransport, chat_error, chat_ok, context_with_config, reply_with_headers, test_context,
};

const MODEL: &str = "llama-3.3-70b-versatile";

fn rate_limited() -> switchboard_models::WireReply {
    chat_error(
        429,
        "Rate limit reached for model `llama-3.3-70b-versatile` on requests per minute (RPM)",
        "rate_limit_exceeded",
    )
}

#[tokio::test]
async fn test_rate_limits_then_success_waits_linearly() -> anyhow::Result<()> {
    let transport = Arc::new(ScriptedTransport::replies([
        rate_limited(),
        rate_limited(),
        rate_limited(),
        chat_ok("Paris", 20),
    ]));
    let (ctx, clock) = test_context(transport.clone());
    let driver = GroqDriver::new(&ctx, "gsk_test", Some(MODEL.to_string()))?;

    let response = driver.generate(&GenerateRequest::new("Capital of France?")).await;

    assert_eq!(response.text(), "Paris");
    assert_eq!(response.error(), None);
    assert_eq!(transport.call_count(), 4);
    assert_eq!(
        clock.sleeps(),
        vec![
            Duration::from_secs(5),
            Duration::from_secs(10),
            Duration::from_secs(15)
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_daily_token_cap_fails_without_retry() -> anyhow::Result<()> {
    let transport = Arc::new(ScriptedTransport::replies([chat_error(
        429,
        "Rate limit reached for model `llama-3.3-70b-versatile` in organization `org_1` service tier \
         `on_demand` on tokens per day (TPD): Limit 100000, Used 99997, Requested 50. \
         Please try again in 1m2.5s.",
        "rate_limit_exceeded",
    )]));
    let (ctx, clock) = test_context(transport.clone());
    let driver = GroqDriver::new(&ctx, "gsk_test", Some(MODEL.to_string()))?;

    let response = driver.generate(&GenerateRequest::new("hello")).await;

    let error = response.error().expect("daily cap is a failure");
    assert!(error.contains("Daily token limit reached"), "{error}");
    assert!(error.contains("midnight UTC"));
    assert_eq!(transport.call_count(), 1);
    assert!(clock.sleeps().is_empty());

    let snapshot = ctx.usage().snapshot(Vendor::Groq).expect("limits recorded");
    assert_eq!(snapshot.tokens_per_minute().limit(), 100_000);
    assert_eq!(snapshot.tokens_per_minute().remaining(), 3);
    Ok(())
}

#[tokio::test]
async fn test_retry_hint_overrides_backoff() -> anyhow::Result<()> {
    let transport = Arc::new(ScriptedTransport::replies([
        chat_error(
            429,
            "Rate limit reached on tokens per minute (TPM): Limit 6000, Used 5900, Requested 300. \
             Please try again in 7.5s.",
            "rate_limit_exceeded",
        ),
        chat_ok("done", 5),
    ]));
    let (ctx, clock) = test_context(transport.clone());
    let driver = GroqDriver::new(&ctx, "gsk_test", None)?;

    let response = driver.generate(&GenerateRequest::new("hello")).await;

    assert!(response.is_success());
    assert_eq!(clock.sleeps(), vec![Duration::from_millis(7500)]);
    Ok(())
}

#[tokio::test]
async fn test_token_counts_containing_status_digits_still_retry() -> anyhow::Result<()> {
    let transport = Arc::new(ScriptedTransport::replies([
        chat_error(
            429,
            "Rate limit reached for model `llama-3.3-70b-versatile` in organization `org_1` \
             on tokens per minute (TPM): Limit 12000, Used 11401, Requested 1200. \
             Please try again in 3s.",
            "rate_limit_exceeded",
        ),
        chat_ok("Paris", 20),
    ]));
    let (ctx, clock) = test_context(transport.clone());
    let driver = GroqDriver::new(&ctx, "gsk_test", Some(MODEL.to_string()))?;

    let response = driver.generate(&GenerateRequest::new("Capital of France?")).await;

    assert_eq!(response.text(), "Paris");
    assert_eq!(response.error(), None);
    assert_eq!(transport.call_count(), 2);
    assert_eq!(clock.sleeps(), vec![Duration::from_secs(3)]);
    Ok(())
}

#[tokio::test]
async fn test_absurd_retry_hints_are_capped() -> anyhow::Result<()> {
    let transport = Arc::new(ScriptedTransport::replies([
        chat_error(
            429,
            "Rate limit reached. Please try again in 99999999999999999999999s.",
            "rate_limit_exceeded",
        ),
        reply_with_headers(
            429,
            r#"{"error":{"message":"slow down","code":"rate_limit_exceeded"}}"#.to_string(),
            &[("retry-after", "1e300")],
        ),
        chat_ok("done", 5),
    ]));
    let (ctx, clock) = test_context(transport.clone());
    let driver = GroqDriver::new(&ctx, "gsk_test", Some(MODEL.to_string()))?;

    let response = driver.generate(&GenerateRequest::new("hello")).await;

    assert!(response.is_success());
    assert_eq!(transport.call_count(), 3);
    assert_eq!(
        clock.sleeps(),
        vec![Duration::from_secs(60), Duration::from_secs(60)]
    );
    Ok(())
}

#[tokio::test]
async fn test_exhausted_retries_surface_and_widen_spacing() -> anyhow::Result<()> {
    let transport = Arc::new(ScriptedTransport::replies([
        rate_limited(),
        rate_limited(),
        rate_limited(),
        rate_limited(),
    ]));
    let config = switchboard_rate_limit::SwitchboardConfig::bundled()?;
    let (ctx, clock) = context_with_config(transport.clone(), config);
    let driver = GroqDriver::new(&ctx, "gsk_test", Some(MODEL.to_string()))?;

    let response = driver.generate(&GenerateRequest::new("hello")).await;

    let error = response.error().expect("retries exhausted");
    assert!(error.starts_with("Groq (llama-3.3-70b-versatile):"), "{error}");
    assert!(error.contains("different AI provider"));
    assert_eq!(transport.call_count(), 4);
    assert_eq!(clock.sleeps().len(), 3);
    assert_eq!(ctx.governor().min_interval(Vendor::Groq), Duration::from_secs(5));
    Ok(())
}

#[tokio::test]
async fn test_invalid_key_is_not_retried() -> anyhow::Result<()> {
    let transport = Arc::new(ScriptedTransport::replies([chat_error(
        401,
        "Invalid API Key",
        "invalid_api_key",
    )]));
    let (ctx, clock) = test_context(transport.clone());
    let driver = GroqDriver::new(&ctx, "gsk_bad", Some(MODEL.to_string()))?;

    let response = driver.generate(&GenerateRequest::new("hello")).await;

    assert!(!response.is_success());
    assert_eq!(transport.call_count(), 1);
    assert!(clock.sleeps().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_success_counts_against_seeded_usage() -> anyhow::Result<()> {
    let transport = Arc::new(ScriptedTransport::replies([chat_ok("Paris", 42)]));
    let (ctx, _clock) = test_context(transport.clone());
    ctx.usage().seed_defaults(Vendor::Groq);
    let driver = GroqDriver::new(&ctx, "gsk_test", Some(MODEL.to_string()))?;

    driver.generate(&GenerateRequest::new("Capital of France?")).await;

    let snapshot = ctx.usage().snapshot(Vendor::Groq).expect("seeded");
    assert_eq!(snapshot.requests_per_minute().used(), 1);
    assert_eq!(snapshot.requests_per_day().used(), 1);
    assert_eq!(snapshot.tokens_per_minute().used(), 42);
    Ok(())
}
