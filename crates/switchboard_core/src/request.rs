//! Generation request type.

use serde::{Deserialize, Serialize};

/// System prompt used when the caller supplies none.
pub(crate) const DEFAULT_SYSTEM_INSTRUCTION: &str = "You are a helpful assistant.";

/// A single generation request. Immutable once built.
///
/// # Examples
///
/// ```
/// use switchboard_core::GenerateRequest;
///
/// let request = GenerateRequest::builder()
///     .system_instruction("Answer in one word.")
///     .user_prompt("Capital of France?")
///     .structured_json(false)
///     .build()
///     .unwrap();
///
/// assert_eq!(request.user_prompt(), "Capital of France?");
/// assert_eq!(request.system_or_default(), "Answer in one word.");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    derive_builder::Builder,
    derive_getters::Getters,
)]
#[builder(setter(into))]
pub struct GenerateRequest {
    /// Optional system prompt
    #[builder(default, setter(into, strip_option))]
    system_instruction: Option<String>,
    /// The user prompt, passed through verbatim
    user_prompt: String,
    /// Ask the vendor for a JSON object response
    #[builder(default)]
    structured_json: bool,
}

impl GenerateRequest {
    /// Creates a new request builder.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }

    /// Plain-text request with no system prompt.
    pub fn new(user_prompt: impl Into<String>) -> Self {
        Self {
            system_instruction: None,
            user_prompt: user_prompt.into(),
            structured_json: false,
        }
    }

    /// The system prompt, or the stock assistant prompt when absent or blank.
    pub fn system_or_default(&self) -> &str {
        self.system_instruction
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DEFAULT_SYSTEM_INSTRUCTION)
    }
}
