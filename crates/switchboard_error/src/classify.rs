//! Vendor failure taxonomy and the text classifier that feeds it.
//!
//! Vendors share no structured error contract, so classification works on
//! the failure text alone: a fixed-priority table of lowercase substrings
//! and leading HTTP statuses, first match wins. Vendor wording drift only
//! ever needs an edit to [`PATTERNS`].

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Longest slice of raw vendor text echoed back to users.
const RAW_TEXT_LIMIT: usize = 200;

/// Closed taxonomy of vendor call failures.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    /// The call outlived its deadline
    Timeout,
    /// Per-minute or per-day request/token limits were hit
    RateLimit,
    /// The credential was rejected
    InvalidKey,
    /// Account-level quota or billing exhausted
    QuotaExceeded,
    /// Model identifier is unknown or retired
    ModelNotFound,
    /// Safety or content policy refused the prompt
    ContentBlocked,
    /// Transport-level failure before a vendor answer
    NetworkError,
    /// Vendor answered with an error nothing else matched
    ProviderError,
    /// No usable failure text at all
    Unknown,
}

/// One classification rule: HTTP statuses read from the leading status
/// token, plus lowercase substrings searched anywhere in the text.
struct Rule {
    kind: FailureKind,
    statuses: &'static [u16],
    needles: &'static [&'static str],
}

/// Ordered classification table. Order matters: timeout text frequently
/// mentions status codes that would otherwise read as a rate limit.
const PATTERNS: &[Rule] = &[
    Rule {
        kind: FailureKind::Timeout,
        statuses: &[],
        needles: &["timed out", "timeout", "deadline exceeded", "etimedout"],
    },
    Rule {
        kind: FailureKind::InvalidKey,
        statuses: &[401],
        needles: &[
            "invalid api key",
            "invalid_api_key",
            "incorrect api key",
            "api_key_invalid",
            "api key not valid",
            "unauthorized",
            "permission_denied",
            "authentication",
        ],
    },
    Rule {
        kind: FailureKind::QuotaExceeded,
        statuses: &[],
        needles: &[
            "insufficient_quota",
            "billing_hard_limit",
            "credit balance",
            "payment required",
        ],
    },
    Rule {
        kind: FailureKind::RateLimit,
        statuses: &[429],
        needles: &[
            "rate limit",
            "rate_limit",
            "too many requests",
            "resource_exhausted",
            "quota",
        ],
    },
    Rule {
        kind: FailureKind::ContentBlocked,
        statuses: &[],
        needles: &[
            "safety",
            "blocked",
            "content_filter",
            "content policy",
            "prohibited_content",
        ],
    },
    Rule {
        kind: FailureKind::ModelNotFound,
        statuses: &[404],
        needles: &[
            "model not found",
            "model_not_found",
            "does not exist",
            "is not found",
            "not supported for generatecontent",
            "decommissioned",
        ],
    },
    Rule {
        kind: FailureKind::NetworkError,
        statuses: &[],
        needles: &[
            "econnrefused",
            "econnreset",
            "enotfound",
            "network",
            "connection",
            "fetch failed",
            "dns",
        ],
    },
];

/// Status token the wire layer prefixes to vendor failures, e.g. `429 Too Many Requests: ...`.
static LEADING_STATUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([1-5][0-9]{2})\b").expect("Valid status regex"));

/// HTTP status leading the failure text, if any.
///
/// Digits elsewhere in the text (token counts, request ids) never count.
pub fn leading_status(message: &str) -> Option<u16> {
    LEADING_STATUS
        .captures(message)
        .and_then(|caps| caps.get(1))
        .and_then(|code| code.as_str().parse().ok())
}

impl Rule {
    fn matches(&self, status: Option<u16>, lowered: &str) -> bool {
        status.is_some_and(|code| self.statuses.contains(&code))
            || self.needles.iter().any(|needle| lowered.contains(needle))
    }
}

impl FailureKind {
    /// Classify raw failure text into exactly one kind.
    pub fn from_message(message: &str) -> Self {
        if message.trim().is_empty() {
            return FailureKind::Unknown;
        }
        let status = leading_status(message);
        let lowered = message.to_lowercase();
        PATTERNS
            .iter()
            .find(|rule| rule.matches(status, &lowered))
            .map(|rule| rule.kind)
            .unwrap_or(FailureKind::ProviderError)
    }

    /// Whether switching vendors is a sensible suggestion for this failure.
    pub fn suggests_switch(&self) -> bool {
        matches!(
            self,
            FailureKind::InvalidKey | FailureKind::QuotaExceeded | FailureKind::RateLimit
        )
    }

    fn sentence(&self) -> &'static str {
        match self {
            FailureKind::Timeout => "The request timed out before the provider answered.",
            FailureKind::RateLimit => "Rate limit reached. Please wait a moment and try again.",
            FailureKind::InvalidKey => "The API key was rejected. Check the key in your settings.",
            FailureKind::QuotaExceeded => "The account quota or billing limit is exhausted.",
            FailureKind::ModelNotFound => "The requested model is not available.",
            FailureKind::ContentBlocked => {
                "The request was blocked by the provider's content policy."
            }
            FailureKind::NetworkError => "Could not reach the provider. Check your connection.",
            FailureKind::ProviderError => "The provider returned an error.",
            FailureKind::Unknown => "An unexpected error occurred.",
        }
    }
}

/// Retry metadata shared by failure kinds and classified failures.
pub trait RetryableError {
    /// Whether retrying (or cascading) could plausibly succeed.
    fn is_retryable(&self) -> bool;

    /// Whether the UI should nudge the user toward another provider.
    fn suggests_switch(&self) -> bool;
}

impl RetryableError for FailureKind {
    fn is_retryable(&self) -> bool {
        matches!(
            self,
            FailureKind::Timeout
                | FailureKind::RateLimit
                | FailureKind::NetworkError
                | FailureKind::ProviderError
                | FailureKind::ModelNotFound
        )
    }

    fn suggests_switch(&self) -> bool {
        FailureKind::suggests_switch(self)
    }
}

/// A classified vendor failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    kind: FailureKind,
    message: String,
    provider: String,
    model: Option<String>,
    retryable: bool,
    suggest_switch: bool,
}

impl ErrorInfo {
    /// Build an error info with the kind's default metadata.
    pub fn new(
        kind: FailureKind,
        message: impl Into<String>,
        provider: impl Into<String>,
        model: Option<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            provider: provider.into(),
            model,
            retryable: kind.is_retryable(),
            suggest_switch: kind.suggests_switch(),
        }
    }

    /// Taxonomy kind.
    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Raw vendor failure text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Provider display name.
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Model the failing call targeted, if known.
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Human-readable text for the failed response.
    ///
    /// # Examples
    ///
    /// ```
    /// use switchboard_error::classify;
    ///
    /// let info = classify("401 Unauthorized", "OpenAI", Some("gpt-4o-mini".into()));
    /// let text = info.user_message();
    /// assert!(text.starts_with("OpenAI (gpt-4o-mini):"));
    /// assert!(text.contains("different AI provider"));
    /// ```
    pub fn user_message(&self) -> String {
        let mut text = match &self.model {
            Some(model) => format!("{} ({}): {}", self.provider, model, self.kind.sentence()),
            None => format!("{}: {}", self.provider, self.kind.sentence()),
        };
        if matches!(self.kind, FailureKind::ProviderError | FailureKind::Unknown) {
            let raw = self.message.trim();
            if !raw.is_empty() {
                let trimmed: String = raw.chars().take(RAW_TEXT_LIMIT).collect();
                text.push_str(" Details: ");
                text.push_str(&trimmed);
            }
        }
        if self.suggest_switch {
            text.push_str(" Consider switching to a different AI provider.");
        }
        text
    }
}

impl RetryableError for ErrorInfo {
    fn is_retryable(&self) -> bool {
        self.retryable
    }

    fn suggests_switch(&self) -> bool {
        self.suggest_switch
    }
}

impl std::fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} from {}: {}", self.kind, self.provider, self.message)
    }
}

/// Classify raw vendor failure text.
pub fn classify(message: &str, provider: impl Into<String>, model: Option<String>) -> ErrorInfo {
    ErrorInfo::new(FailureKind::from_message(message), message, provider, model)
}
