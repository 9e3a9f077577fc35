//! Hints recovered from vendor failure text.

use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

const DAILY_MARKERS: &[&str] = &[
    "tokens per day",
    "requests per day",
    "(tpd)",
    "(rpd)",
    "perday",
    "per day",
];

/// Longest retry hint taken from vendor text or headers.
pub const RETRY_HINT_CEILING: Duration = Duration::from_secs(24 * 60 * 60);

static RETRY_IN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:try again|retry) in\s+([0-9][0-9hms.]*)").expect("Valid retry regex")
});

static RETRY_DELAY_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)"retryDelay"\s*:\s*"([0-9.]+s)""#).expect("Valid retryDelay regex")
});

/// Whether the failure names a daily cap rather than a per-minute window.
///
/// Daily caps cannot clear within a single call, so callers skip retries.
/// This is substring matching on vendor prose and shares the classifier's
/// fragility.
pub fn is_daily_quota(message: &str) -> bool {
    let lowered = message.to_lowercase();
    DAILY_MARKERS.iter().any(|marker| lowered.contains(marker))
}

/// Extract a "try again in ..." delay from vendor failure text.
///
/// Understands Groq's `7.66s`, `1m30.5s` and `450ms` forms, Gemini's
/// `"retryDelay": "12s"` detail, and bare `retry in 30` seconds.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use switchboard_error::parse_retry_hint;
///
/// assert_eq!(
///     parse_retry_hint("Please try again in 1m30s."),
///     Some(Duration::from_secs(90))
/// );
/// assert_eq!(parse_retry_hint("no hint here"), None);
/// ```
pub fn parse_retry_hint(message: &str) -> Option<Duration> {
    RETRY_IN
        .captures(message)
        .or_else(|| RETRY_DELAY_FIELD.captures(message))
        .and_then(|caps| caps.get(1))
        .and_then(|token| parse_duration_token(token.as_str()))
}

fn parse_duration_token(token: &str) -> Option<Duration> {
    let token = token.trim_end_matches('.');
    let mut total = 0.0_f64;
    let mut number = String::new();
    let mut chars = token.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_ascii_digit() || c == '.' {
            number.push(c);
            continue;
        }
        let value: f64 = number.parse().ok()?;
        number.clear();
        total += match c {
            'h' => value * 3600.0,
            'm' if chars.peek() == Some(&'s') => {
                chars.next();
                value / 1000.0
            }
            'm' => value * 60.0,
            's' => value,
            _ => return None,
        };
    }
    if !number.is_empty() {
        total += number.parse::<f64>().ok()?;
    }

    hint_from_secs(total)
}

/// Convert a vendor-supplied second count into a retry hint.
///
/// Non-positive and NaN values yield `None`; anything past
/// [`RETRY_HINT_CEILING`] (including values no `Duration` can hold) is
/// clamped to it.
pub fn hint_from_secs(secs: f64) -> Option<Duration> {
    if secs.is_nan() || secs <= 0.0 {
        return None;
    }
    let hint = Duration::try_from_secs_f64(secs).unwrap_or(RETRY_HINT_CEILING);
    Some(hint.min(RETRY_HINT_CEILING))
}
