//! Transport that replays canned vendor answers.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;
use switchboard_models::{Transport, VendorFailure, WireReply, WireRequest};

/// Replays scripted outcomes in order and records every request.
///
/// Once the script runs out every call answers `500`.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<WireReply, VendorFailure>>>,
    requests: Mutex<Vec<WireRequest>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn new(script: impl IntoIterator<Item = Result<WireReply, VendorFailure>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Replies only, no transport failures.
    pub fn replies(replies: impl IntoIterator<Item = WireReply>) -> Self {
        Self::new(replies.into_iter().map(Ok))
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().expect("requests lock").len()
    }

    pub fn requests(&self) -> Vec<WireRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    /// Model named by each request, from the body or the Gemini URL path.
    pub fn models(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|request| match request.body.get("model").and_then(|m| m.as_str()) {
                Some(model) => model.to_string(),
                None => request
                    .url
                    .split("/models/")
                    .nth(1)
                    .and_then(|rest| rest.split(':').next())
                    .unwrap_or_default()
                    .to_string(),
            })
            .collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post_json(&self, request: WireRequest) -> Result<WireReply, VendorFailure> {
        self.requests.lock().expect("requests lock").push(request);
        let next = self.script.lock().expect("script lock").pop_front();
        next.unwrap_or_else(|| {
            Ok(WireReply {
                status: 500,
                headers: HeaderMap::new(),
                body: r#"{"error":{"message":"script exhausted"}}"#.to_string(),
            })
        })
    }
}

#[allow(dead_code)]
pub fn reply_with_headers(status: u16, body: String, headers: &[(&'static str, &str)]) -> WireReply {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        map.insert(
            HeaderName::from_static(name),
            HeaderValue::from_str(value).expect("valid header value"),
        );
    }
    WireReply {
        status,
        headers: map,
        body,
    }
}

/// Successful chat-completions answer.
#[allow(dead_code)]
pub fn chat_ok(text: &str, total_tokens: u64) -> WireReply {
    let body = json!({
        "choices": [{"message": {"role": "assistant", "content": text}}],
        "usage": {"total_tokens": total_tokens}
    });
    reply_with_headers(200, body.to_string(), &[])
}

/// Chat-completions error answer.
#[allow(dead_code)]
pub fn chat_error(status: u16, message: &str, code: &str) -> WireReply {
    let body = json!({"error": {"message": message, "type": "error", "code": code}});
    reply_with_headers(status, body.to_string(), &[])
}

/// Successful `generateContent` answer.
#[allow(dead_code)]
pub fn gemini_ok(text: &str) -> WireReply {
    let body = json!({
        "candidates": [{"content": {"parts": [{"text": text}], "role": "model"}, "finishReason": "STOP"}],
        "usageMetadata": {"totalTokenCount": 9}
    });
    reply_with_headers(200, body.to_string(), &[])
}

/// `generateContent` error answer.
#[allow(dead_code)]
pub fn gemini_error(code: u16, status: &str, message: &str) -> WireReply {
    let body = json!({"error": {"code": code, "message": message, "status": status}});
    reply_with_headers(code, body.to_string(), &[])
}
