//! Deadline enforcement for vendor calls.

use crate::{RateLimitError, RateLimitErrorKind};
use std::future::Future;
use std::time::Duration;
use tracing::{instrument, warn};

/// Races a vendor call against a fixed deadline.
///
/// The call runs as its own task. When the deadline wins, the caller gets a
/// timeout error straight away and the task is detached: it keeps running
/// until the vendor answers or the connection fails, and its result is
/// dropped. Waiting is bounded; the vendor I/O is not cancelled.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use switchboard_rate_limit::TimeoutGuard;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let guard = TimeoutGuard::new(Duration::from_secs(1));
/// let answer = guard.run(async { 42 }).await.unwrap();
/// assert_eq!(answer, 42);
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutGuard {
    deadline: Duration,
}

impl TimeoutGuard {
    /// Deadline applied when none is configured.
    pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(60);

    /// Guard with the given deadline.
    pub fn new(deadline: Duration) -> Self {
        Self { deadline }
    }

    /// Configured deadline.
    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Run `call`, giving up after the deadline.
    ///
    /// # Errors
    ///
    /// [`RateLimitErrorKind::TimedOut`] when the deadline passes first, and
    /// [`RateLimitErrorKind::CallAborted`] if the call's task panics.
    #[instrument(skip(self, call), fields(deadline_ms = self.deadline.as_millis() as u64))]
    pub async fn run<F, T>(&self, call: F) -> Result<T, RateLimitError>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let handle = tokio::spawn(call);
        match tokio::time::timeout(self.deadline, handle).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(join_error)) => Err(RateLimitError::new(RateLimitErrorKind::CallAborted(
                join_error.to_string(),
            ))),
            Err(_) => {
                warn!("Vendor call exceeded deadline, detaching");
                Err(RateLimitError::new(RateLimitErrorKind::TimedOut(
                    self.deadline,
                )))
            }
        }
    }
}

impl Default for TimeoutGuard {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DEADLINE)
    }
}
