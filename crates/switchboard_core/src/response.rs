//! Normalized generation response.

use serde::Serialize;

/// The one shape every adapter returns.
///
/// Exactly one of `text` and `error` carries content: a success always has
/// non-empty text and no error, a failure has empty text and an error.
/// The constructors are the only way to build one.
///
/// # Examples
///
/// ```
/// use switchboard_core::GenerateResponse;
///
/// let ok = GenerateResponse::success("Paris").unwrap();
/// assert!(ok.is_success());
/// assert_eq!(ok.error(), None);
///
/// assert!(GenerateResponse::success("   ").is_none());
///
/// let failed = GenerateResponse::failure("Groq: Rate limit reached.");
/// assert_eq!(failed.text(), "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model_actually_used: Option<String>,
}

impl GenerateResponse {
    /// Successful response, or `None` when the text is blank.
    pub fn success(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return None;
        }
        Some(Self {
            text,
            error: None,
            model_actually_used: None,
        })
    }

    /// Failed response carrying user-facing error text.
    pub fn failure(error: impl Into<String>) -> Self {
        let error = error.into();
        let error = if error.trim().is_empty() {
            "Unknown error".to_string()
        } else {
            error
        };
        Self {
            text: String::new(),
            error: Some(error),
            model_actually_used: None,
        }
    }

    /// Record the model that served the request.
    pub fn with_model_used(mut self, model: impl Into<String>) -> Self {
        self.model_actually_used = Some(model.into());
        self
    }

    /// Generated text; empty on failure.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Error text; `None` on success.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Model that actually served the request, when it differs from the request.
    pub fn model_used(&self) -> Option<&str> {
        self.model_actually_used.as_deref()
    }

    /// Whether this response carries generated text.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
