//! Chat-completions wire format shared by Groq and OpenAI.

use crate::wire::excerpt;
use crate::{ParsedReply, WireFormat, WireRequest};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use switchboard_core::{GenerateRequest, Vendor};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    total_tokens: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    code: Option<serde_json::Value>,
}

/// OpenAI-style `/chat/completions` encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatCompletionsFormat {
    vendor: Vendor,
}

impl ChatCompletionsFormat {
    /// Format for `vendor`'s chat-completions endpoint.
    pub fn new(vendor: Vendor) -> Self {
        Self { vendor }
    }
}

impl WireFormat for ChatCompletionsFormat {
    fn vendor(&self) -> Vendor {
        self.vendor
    }

    fn default_base_url(&self) -> &'static str {
        match self.vendor {
            Vendor::Groq => "https://api.groq.com/openai/v1",
            _ => "https://api.openai.com/v1",
        }
    }

    fn encode(
        &self,
        base_url: &str,
        credential: &str,
        model: &str,
        request: &GenerateRequest,
        max_output_tokens: Option<u32>,
    ) -> Result<WireRequest, String> {
        let body = ChatRequest {
            model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: request.system_or_default(),
                },
                ChatMessage {
                    role: "user",
                    content: request.user_prompt(),
                },
            ],
            response_format: request
                .structured_json()
                .then_some(ResponseFormat { kind: "json_object" }),
            max_tokens: max_output_tokens,
        };

        Ok(WireRequest {
            url: format!("{base_url}/chat/completions"),
            headers: vec![("authorization", format!("Bearer {credential}"))],
            body: serde_json::to_value(&body).map_err(|e| e.to_string())?,
        })
    }

    fn decode(&self, body: &str) -> Result<ParsedReply, String> {
        let response: ChatResponse = serde_json::from_str(body)
            .map_err(|e| format!("Failed to parse response: {e}"))?;
        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        Ok(ParsedReply {
            text,
            total_tokens: response.usage.and_then(|usage| usage.total_tokens),
        })
    }

    fn describe_failure(&self, status: StatusCode, body: &str) -> String {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(ErrorEnvelope { error }) => {
                let tag = error
                    .code
                    .as_ref()
                    .and_then(|code| match code {
                        serde_json::Value::String(s) => Some(s.clone()),
                        serde_json::Value::Number(n) => Some(n.to_string()),
                        _ => None,
                    })
                    .or(error.kind);
                match tag {
                    Some(tag) => format!("{status}: {} ({tag})", error.message),
                    None => format!("{status}: {}", error.message),
                }
            }
            Err(_) => format!("{status}: {}", excerpt(body)),
        }
    }
}
