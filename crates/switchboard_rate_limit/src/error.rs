//! Error types for guarded vendor calls.

use std::fmt;
use std::time::Duration;

/// Ways a guarded vendor call can end without a result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RateLimitErrorKind {
    /// The deadline passed first.
    TimedOut(Duration),
    /// The spawned call panicked or was torn down by the runtime.
    CallAborted(String),
}

impl fmt::Display for RateLimitErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateLimitErrorKind::TimedOut(deadline) => {
                write!(f, "Request timed out after {}s", deadline.as_secs_f64())
            }
            RateLimitErrorKind::CallAborted(msg) => write!(f, "Vendor call aborted: {}", msg),
        }
    }
}

/// Guarded-call error with location tracking.
#[derive(Debug, Clone)]
pub struct RateLimitError {
    kind: RateLimitErrorKind,
    line: u32,
    file: &'static str,
}

impl RateLimitError {
    /// Create a new error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: RateLimitErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &RateLimitErrorKind {
        &self.kind
    }
}

impl fmt::Display for RateLimitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rate Limit Error: {} at line {} in {}",
            self.kind, self.line, self.file
        )
    }
}

impl std::error::Error for RateLimitError {}

impl<T> From<T> for RateLimitError
where
    T: Into<RateLimitErrorKind>,
{
    #[track_caller]
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}
