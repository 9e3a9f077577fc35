//! Extraction of rate-limit figures from vendor responses.
//!
//! Two ordered rule tables drive extraction:
//!
//! - header rules pair a window with the vendor's `limit` and `remaining`
//!   header names, since the same header name means different windows at
//!   different vendors (Groq reports daily requests where OpenAI reports
//!   per-minute requests);
//! - error-text rules pair a pattern with the function that folds its
//!   captures into a snapshot. The first matching rule wins.
//!
//! Headers are authoritative. Error text is a fallback for rate-limit
//! failures, which often carry the only numbers a vendor will share.

use crate::{RateLimitSnapshot, UsageWindow, WindowKind};
use regex::{Captures, Regex};
use reqwest::header::HeaderMap;
use std::sync::LazyLock;
use switchboard_core::Vendor;
use tracing::{debug, instrument};

/// One window's worth of headers.
#[derive(Debug, Clone, Copy)]
struct HeaderRule {
    window: WindowKind,
    limit_header: &'static str,
    remaining_header: &'static str,
}

const GROQ_HEADERS: &[HeaderRule] = &[
    HeaderRule {
        window: WindowKind::RequestsPerDay,
        limit_header: "x-ratelimit-limit-requests",
        remaining_header: "x-ratelimit-remaining-requests",
    },
    HeaderRule {
        window: WindowKind::TokensPerMinute,
        limit_header: "x-ratelimit-limit-tokens",
        remaining_header: "x-ratelimit-remaining-tokens",
    },
];

const OPENAI_HEADERS: &[HeaderRule] = &[
    HeaderRule {
        window: WindowKind::RequestsPerMinute,
        limit_header: "x-ratelimit-limit-requests",
        remaining_header: "x-ratelimit-remaining-requests",
    },
    HeaderRule {
        window: WindowKind::TokensPerMinute,
        limit_header: "x-ratelimit-limit-tokens",
        remaining_header: "x-ratelimit-remaining-tokens",
    },
];

/// Gemini exposes no rate-limit headers on `generateContent`.
const GEMINI_HEADERS: &[HeaderRule] = &[];

type TextExtractor = fn(&Captures<'_>, &str, RateLimitSnapshot) -> Option<RateLimitSnapshot>;

struct TextRule {
    pattern: Regex,
    extract: TextExtractor,
}

static TEXT_RULES: LazyLock<Vec<TextRule>> = LazyLock::new(|| {
    vec![
        // Groq: "... (TPD): Limit 100000, Used 99997, Requested 50"
        TextRule {
            pattern: Regex::new(r"(?i)\blimit\s+(\d+),?\s+used\s+(\d+)")
                .expect("Valid limit/used regex"),
            extract: limit_and_used,
        },
        // Gemini: "Quota exceeded for metric: ..., limit: 15, model: ..."
        TextRule {
            pattern: Regex::new(r"(?i)\blimit:\s*(\d+)").expect("Valid limit regex"),
            extract: exhausted_limit,
        },
    ]
});

fn limit_and_used(
    caps: &Captures<'_>,
    message: &str,
    baseline: RateLimitSnapshot,
) -> Option<RateLimitSnapshot> {
    let limit = caps.get(1)?.as_str().parse().ok()?;
    let used = caps.get(2)?.as_str().parse().ok()?;
    let window = window_named_in(message, WindowKind::TokensPerMinute);
    Some(baseline.with_window(window, UsageWindow::new(used, limit)))
}

fn exhausted_limit(
    caps: &Captures<'_>,
    message: &str,
    baseline: RateLimitSnapshot,
) -> Option<RateLimitSnapshot> {
    let limit = caps.get(1)?.as_str().parse().ok()?;
    let window = window_named_in(message, WindowKind::RequestsPerMinute);
    Some(baseline.with_window(window, UsageWindow::new(limit, limit)))
}

/// Which window the failure text is talking about.
///
/// There is no tokens-per-day window, so any token figure lands in the token
/// window. "requests" is matched in the plural so Groq's "Requested N" suffix
/// does not count, and the HTTP reason phrase is ignored.
fn window_named_in(message: &str, fallback: WindowKind) -> WindowKind {
    let lowered = message.to_lowercase().replace("too many requests", "");
    let daily = lowered.contains("per day") || lowered.contains("perday");
    if lowered.contains("token") {
        WindowKind::TokensPerMinute
    } else if lowered.contains("requests") && daily {
        WindowKind::RequestsPerDay
    } else if lowered.contains("requests") {
        WindowKind::RequestsPerMinute
    } else {
        fallback
    }
}

/// Detects rate-limit figures for one vendor.
///
/// # Example
///
/// ```
/// use reqwest::header::{HeaderMap, HeaderValue};
/// use switchboard_core::Vendor;
/// use switchboard_rate_limit::{DefaultLimits, HeaderRateLimitDetector, RateLimitSnapshot};
///
/// let mut headers = HeaderMap::new();
/// headers.insert("x-ratelimit-limit-tokens", HeaderValue::from_static("6000"));
/// headers.insert("x-ratelimit-remaining-tokens", HeaderValue::from_static("5000"));
///
/// let baseline = RateLimitSnapshot::from_defaults(&DefaultLimits::default());
/// let detector = HeaderRateLimitDetector::for_vendor(Vendor::Groq);
/// let snapshot = detector.detect(&headers, baseline).unwrap();
/// assert_eq!(snapshot.tokens_per_minute().used(), 1000);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct HeaderRateLimitDetector {
    vendor: Vendor,
    rules: &'static [HeaderRule],
}

impl HeaderRateLimitDetector {
    /// Detector using `vendor`'s header conventions.
    pub fn for_vendor(vendor: Vendor) -> Self {
        let rules = match vendor {
            Vendor::Groq => GROQ_HEADERS,
            Vendor::Gemini => GEMINI_HEADERS,
            Vendor::OpenAI => OPENAI_HEADERS,
        };
        Self { vendor, rules }
    }

    /// Vendor whose conventions this detector applies.
    pub fn vendor(&self) -> Vendor {
        self.vendor
    }

    /// Overlay header-reported windows onto `baseline`.
    ///
    /// Returns `None` when no rule found a usable limit header.
    #[instrument(skip(self, headers, baseline), fields(vendor = %self.vendor))]
    pub fn detect(
        &self,
        headers: &HeaderMap,
        baseline: RateLimitSnapshot,
    ) -> Option<RateLimitSnapshot> {
        let mut snapshot = baseline;
        let mut matched = false;

        for rule in self.rules {
            let Some(limit) = parse_header_u64(headers, rule.limit_header) else {
                continue;
            };
            let used = parse_header_u64(headers, rule.remaining_header)
                .map(|remaining| limit.saturating_sub(remaining))
                .unwrap_or_else(|| snapshot.window(rule.window).used());
            debug!(header = rule.limit_header, limit, used, "Detected limit from header");
            snapshot = snapshot.with_window(rule.window, UsageWindow::new(used, limit));
            matched = true;
        }

        matched.then_some(snapshot)
    }

    /// Overlay figures parsed from rate-limit failure text onto `baseline`.
    #[instrument(skip(self, message, baseline), fields(vendor = %self.vendor))]
    pub fn detect_from_error(
        &self,
        message: &str,
        baseline: RateLimitSnapshot,
    ) -> Option<RateLimitSnapshot> {
        TEXT_RULES.iter().find_map(|rule| {
            let caps = rule.pattern.captures(message)?;
            debug!(pattern = rule.pattern.as_str(), "Parsed limits from error text");
            (rule.extract)(&caps, message, baseline.clone())
        })
    }
}

/// Helper to parse u64 from header value.
fn parse_header_u64(headers: &HeaderMap, key: &str) -> Option<u64> {
    headers.get(key)?.to_str().ok()?.trim().parse().ok()
}
