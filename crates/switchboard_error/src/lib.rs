//! Error types for the Switchboard resilience layer.
//!
//! Two families of failure live here:
//!
//! - Construction and configuration failures, which follow the `ErrorKind` +
//!   wrapper struct pattern with `#[track_caller]` location capture and roll up
//!   into [`SwitchboardError`].
//! - Vendor call failures, which are never raised. They are classified into an
//!   [`ErrorInfo`] carrying a [`FailureKind`] and retry metadata, and later
//!   rendered into a failed response by the adapters.
//!
//! # Examples
//!
//! ```
//! use switchboard_error::{classify, FailureKind, RetryableError};
//!
//! let info = classify("429 Too Many Requests: rate limit reached", "Groq", None);
//! assert_eq!(info.kind(), FailureKind::RateLimit);
//! assert!(info.is_retryable());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod classify;
mod config;
mod error;
mod hints;
mod provider;
mod request;

pub use classify::{ErrorInfo, FailureKind, RetryableError, classify, leading_status};
pub use config::{ConfigError, ConfigErrorKind};
pub use error::{SwitchboardError, SwitchboardErrorKind, SwitchboardResult};
pub use hints::{RETRY_HINT_CEILING, hint_from_secs, is_daily_quota, parse_retry_hint};
pub use provider::{ProviderError, ProviderErrorKind};
pub use request::RequestError;
