//! OpenAI single-attempt behavior.

mod test_utils;

use std::sync::Arc;
use switchboard_core::GenerateRequest;
use switchboard_interface::SwitchboardDriver;
use switchboard_models::OpenAIDriver;
use test_utils::{ScriptedTransport, chat_error, chat_ok, test_context};

#[tokio::test]
async fn test_rate_limit_is_not_retried() -> anyhow::Result<()> {
    let transport = Arc::new(ScriptedTransport::replies([
        chat_error(429, "Rate limit reached for requests", "rate_limit_exceeded"),
        chat_ok("never reached", 1),
    ]));
    let (ctx, clock) = test_context(transport.clone());
    let driver = OpenAIDriver::new(&ctx, "sk-test", None)?;

    let response = driver.generate(&GenerateRequest::new("hello")).await;

    let error = response.error().expect("rate limit surfaces");
    assert!(error.starts_with("OpenAI (gpt-4o-mini):"), "{error}");
    assert_eq!(transport.call_count(), 1);
    assert!(clock.sleeps().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_exhausted_credit_reads_as_quota() -> anyhow::Result<()> {
    let transport = Arc::new(ScriptedTransport::replies([chat_error(
        429,
        "You exceeded your current quota, please check your plan and billing details.",
        "insufficient_quota",
    )]));
    let (ctx, _clock) = test_context(transport.clone());
    let driver = OpenAIDriver::new(&ctx, "sk-test", None)?;

    let response = driver.generate(&GenerateRequest::new("hello")).await;

    let error = response.error().expect("quota surfaces");
    assert!(error.to_lowercase().contains("quota"), "{error}");
    assert!(error.contains("different AI provider"));
    Ok(())
}

#[tokio::test]
async fn test_json_mode_and_system_prompt_reach_the_wire() -> anyhow::Result<()> {
    let transport = Arc::new(ScriptedTransport::replies([chat_ok(r#"{"ok":true}"#, 12)]));
    let (ctx, _clock) = test_context(transport.clone());
    let driver = OpenAIDriver::new(&ctx, "sk-test", Some("gpt-4o".into()))?;
    let request = GenerateRequest::builder()
        .system_instruction("Reply in JSON.")
        .user_prompt("status?")
        .structured_json(true)
        .build()?;

    let response = driver.generate(&request).await;

    assert_eq!(response.text(), r#"{"ok":true}"#);
    let sent = &transport.requests()[0];
    assert!(sent.url.ends_with("/chat/completions"));
    assert_eq!(sent.body["model"], "gpt-4o");
    assert_eq!(sent.body["messages"][0]["content"], "Reply in JSON.");
    assert_eq!(sent.body["messages"][1]["content"], "status?");
    assert_eq!(sent.body["response_format"]["type"], "json_object");
    Ok(())
}

#[tokio::test]
async fn test_empty_completion_is_a_failure() -> anyhow::Result<()> {
    let transport = Arc::new(ScriptedTransport::replies([chat_ok("   ", 3)]));
    let (ctx, _clock) = test_context(transport.clone());
    let driver = OpenAIDriver::new(&ctx, "sk-test", None)?;

    let response = driver.generate(&GenerateRequest::new("hello")).await;

    assert!(!response.is_success());
    assert_eq!(response.text(), "");
    assert!(response.error().is_some_and(|e| e.contains("Empty response from OpenAI")));
    Ok(())
}
