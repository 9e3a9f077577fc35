//! Point-in-time quota estimates.

use crate::DefaultLimits;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One `used / limit` counter. `used` never exceeds `limit`.
///
/// # Examples
///
/// ```
/// use switchboard_rate_limit::UsageWindow;
///
/// let window = UsageWindow::new(99_997, 100_000);
/// assert_eq!(window.remaining(), 3);
///
/// let full = window.add(50);
/// assert_eq!(full.used(), 100_000);
/// assert_eq!(full.remaining(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "RawWindow")]
pub struct UsageWindow {
    used: u64,
    limit: u64,
}

/// Serialized shape of a window, clamped on the way in.
#[derive(Deserialize)]
struct RawWindow {
    used: u64,
    limit: u64,
}

impl From<RawWindow> for UsageWindow {
    fn from(raw: RawWindow) -> Self {
        Self::new(raw.used, raw.limit)
    }
}

impl UsageWindow {
    /// Window with `used` clamped into `[0, limit]`.
    pub fn new(used: u64, limit: u64) -> Self {
        Self {
            used: used.min(limit),
            limit,
        }
    }

    /// Empty window with the given limit.
    pub fn fresh(limit: u64) -> Self {
        Self::new(0, limit)
    }

    /// Consumed amount.
    pub fn used(&self) -> u64 {
        self.used
    }

    /// Capacity of the window.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Capacity left.
    pub fn remaining(&self) -> u64 {
        self.limit.saturating_sub(self.used)
    }

    /// Share consumed, 0 to 100.
    pub fn percent_used(&self) -> f64 {
        if self.limit == 0 {
            return 0.0;
        }
        self.used as f64 / self.limit as f64 * 100.0
    }

    /// Window after consuming `amount` more, still clamped.
    pub fn add(self, amount: u64) -> Self {
        Self::new(self.used.saturating_add(amount), self.limit)
    }
}

/// Which of a snapshot's windows a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowKind {
    /// Requests in the current minute
    RequestsPerMinute,
    /// Tokens in the current minute
    TokensPerMinute,
    /// Requests in the current day
    RequestsPerDay,
}

/// Best-effort view of a provider's rate-limit consumption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitSnapshot {
    requests_per_minute: UsageWindow,
    tokens_per_minute: UsageWindow,
    requests_per_day: UsageWindow,
    last_updated: DateTime<Utc>,
}

impl RateLimitSnapshot {
    /// Snapshot from explicit windows, stamped now.
    pub fn new(
        requests_per_minute: UsageWindow,
        tokens_per_minute: UsageWindow,
        requests_per_day: UsageWindow,
    ) -> Self {
        Self {
            requests_per_minute,
            tokens_per_minute,
            requests_per_day,
            last_updated: Utc::now(),
        }
    }

    /// Unused snapshot at the published default limits.
    pub fn from_defaults(limits: &DefaultLimits) -> Self {
        Self::new(
            UsageWindow::fresh(limits.requests_per_minute),
            UsageWindow::fresh(limits.tokens_per_minute),
            UsageWindow::fresh(limits.requests_per_day),
        )
    }

    /// Requests-per-minute window.
    pub fn requests_per_minute(&self) -> UsageWindow {
        self.requests_per_minute
    }

    /// Tokens-per-minute window.
    pub fn tokens_per_minute(&self) -> UsageWindow {
        self.tokens_per_minute
    }

    /// Requests-per-day window.
    pub fn requests_per_day(&self) -> UsageWindow {
        self.requests_per_day
    }

    /// When this snapshot was last written.
    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    /// Read one window by kind.
    pub fn window(&self, kind: WindowKind) -> UsageWindow {
        match kind {
            WindowKind::RequestsPerMinute => self.requests_per_minute,
            WindowKind::TokensPerMinute => self.tokens_per_minute,
            WindowKind::RequestsPerDay => self.requests_per_day,
        }
    }

    /// Copy with one window replaced and the timestamp refreshed.
    pub fn with_window(mut self, kind: WindowKind, window: UsageWindow) -> Self {
        match kind {
            WindowKind::RequestsPerMinute => self.requests_per_minute = window,
            WindowKind::TokensPerMinute => self.tokens_per_minute = window,
            WindowKind::RequestsPerDay => self.requests_per_day = window,
        }
        self.last_updated = Utc::now();
        self
    }

    /// Copy after one more request and `tokens` more tokens.
    pub fn consume(mut self, tokens: u64) -> Self {
        self.requests_per_minute = self.requests_per_minute.add(1);
        self.requests_per_day = self.requests_per_day.add(1);
        self.tokens_per_minute = self.tokens_per_minute.add(tokens);
        self.last_updated = Utc::now();
        self
    }
}
