//! `generateContent` wire format.

use crate::wire::excerpt;
use crate::{ParsedReply, WireFormat, WireRequest};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use switchboard_core::{GenerateRequest, Vendor};

/// Finish reasons that mean the answer was withheld.
const BLOCKING_FINISH_REASONS: &[&str] = &["SAFETY", "PROHIBITED_CONTENT", "BLOCKLIST", "SPII"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: [Content<'a>; 1],
    #[serde(skip_serializing_if = "GenerationConfig::is_empty")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: [TextPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

impl GenerationConfig {
    fn is_empty(&self) -> bool {
        self.response_mime_type.is_none() && self.max_output_tokens.is_none()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    total_token_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    details: Option<serde_json::Value>,
}

/// Gemini REST `models/{model}:generateContent` encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeminiFormat;

impl WireFormat for GeminiFormat {
    fn vendor(&self) -> Vendor {
        Vendor::Gemini
    }

    fn default_base_url(&self) -> &'static str {
        "https://generativelanguage.googleapis.com/v1beta"
    }

    fn encode(
        &self,
        base_url: &str,
        credential: &str,
        model: &str,
        request: &GenerateRequest,
        max_output_tokens: Option<u32>,
    ) -> Result<WireRequest, String> {
        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: [TextPart {
                    text: request.system_or_default(),
                }],
            },
            contents: [Content {
                role: Some("user"),
                parts: [TextPart {
                    text: request.user_prompt(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: request.structured_json().then_some("application/json"),
                max_output_tokens,
            },
        };

        Ok(WireRequest {
            url: format!("{base_url}/models/{model}:generateContent"),
            headers: vec![("x-goog-api-key", credential.to_string())],
            body: serde_json::to_value(&body).map_err(|e| e.to_string())?,
        })
    }

    fn decode(&self, body: &str) -> Result<ParsedReply, String> {
        let response: GenerateContentResponse = serde_json::from_str(body)
            .map_err(|e| format!("Failed to parse response: {e}"))?;

        if let Some(reason) = response
            .prompt_feedback
            .and_then(|feedback| feedback.block_reason)
        {
            return Err(format!("Response blocked by safety filters: {reason}"));
        }

        let total_tokens = response
            .usage_metadata
            .and_then(|usage| usage.total_token_count);
        let Some(candidate) = response.candidates.into_iter().next() else {
            return Ok(ParsedReply {
                text: String::new(),
                total_tokens,
            });
        };

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            if let Some(reason) = candidate
                .finish_reason
                .filter(|reason| BLOCKING_FINISH_REASONS.contains(&reason.as_str()))
            {
                return Err(format!("Response blocked by safety filters: {reason}"));
            }
        }

        Ok(ParsedReply { text, total_tokens })
    }

    fn describe_failure(&self, status: StatusCode, body: &str) -> String {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(ErrorEnvelope { error }) => {
                let code = error.code.unwrap_or(status.as_u16());
                let label = error
                    .status
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("").to_string());
                let mut text = format!("{code} {label}: {}", error.message);
                // Gemini puts its suggested wait in a RetryInfo detail.
                if let Some(delay) = error
                    .details
                    .as_ref()
                    .and_then(|details| details.as_array())
                    .and_then(|details| {
                        details
                            .iter()
                            .find_map(|detail| detail.get("retryDelay")?.as_str())
                    })
                {
                    text.push_str(&format!(" \"retryDelay\": \"{delay}\""));
                }
                text
            }
            Err(_) => format!("{status}: {}", excerpt(body)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concatenates_parts_and_reads_usage() {
        let body = r#"{
            "candidates": [{"content": {"parts": [{"text": "Par"}, {"text": "is"}]}, "finishReason": "STOP"}],
            "usageMetadata": {"totalTokenCount": 12}
        }"#;
        let parsed = GeminiFormat.decode(body).expect("parses");
        assert_eq!(parsed.text, "Paris");
        assert_eq!(parsed.total_tokens, Some(12));
    }

    #[test]
    fn prompt_block_is_a_failure() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let err = GeminiFormat.decode(body).expect_err("blocked");
        assert!(err.contains("blocked by safety"));
    }

    #[test]
    fn safety_finish_without_text_is_a_failure() {
        let body = r#"{"candidates": [{"finishReason": "PROHIBITED_CONTENT"}]}"#;
        assert!(GeminiFormat.decode(body).is_err());
    }

    #[test]
    fn error_text_carries_code_status_and_delay() {
        let body = r#"{"error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED",
            "details": [{"@type": "type.googleapis.com/google.rpc.RetryInfo", "retryDelay": "17s"}]}}"#;
        let text = GeminiFormat.describe_failure(StatusCode::TOO_MANY_REQUESTS, body);
        assert!(text.starts_with("429 RESOURCE_EXHAUSTED: Resource has been exhausted"));
        assert!(text.contains(r#""retryDelay": "17s""#));
    }

    #[test]
    fn json_mode_sets_mime_type() {
        let request = GenerateRequest::builder()
            .user_prompt("list colors")
            .structured_json(true)
            .build()
            .expect("valid request");
        let wire = GeminiFormat
            .encode("https://x/v1beta", "key", "gemini-2.0-flash", &request, Some(1))
            .expect("encodes");
        assert_eq!(wire.url, "https://x/v1beta/models/gemini-2.0-flash:generateContent");
        assert_eq!(wire.body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(wire.body["generationConfig"]["maxOutputTokens"], 1);
        assert_eq!(
            wire.body["systemInstruction"]["parts"][0]["text"],
            "You are a helpful assistant."
        );
    }
}
