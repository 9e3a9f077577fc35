//! Rate governance, timeouts and usage tracking.
//!
//! Every vendor call in Switchboard passes through the pieces in this crate:
//!
//! - [`RateGovernor`] spaces calls per vendor and widens the spacing after
//!   each rate-limit hit.
//! - [`TimeoutGuard`] bounds how long a caller waits on a vendor call.
//! - [`UsageStore`] keeps a best-effort quota estimate per vendor, fed by
//!   [`HeaderRateLimitDetector`] from headers and rate-limit error text.
//! - [`Clock`] abstracts time so waits can be asserted without real timers.
//!
//! Limits and intervals are loaded through [`SwitchboardConfig`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod clock;
mod config;
mod detector;
mod error;
mod governor;
mod snapshot;
mod store;
mod timeout;

pub use clock::{Clock, ManualClock, TokioClock};
pub use config::{
    DefaultLimits, GovernorSettings, ProviderSettings, SwitchboardConfig, TimeoutSettings,
};
pub use detector::HeaderRateLimitDetector;
pub use error::{RateLimitError, RateLimitErrorKind};
pub use governor::RateGovernor;
pub use snapshot::{RateLimitSnapshot, UsageWindow, WindowKind};
pub use store::UsageStore;
pub use timeout::TimeoutGuard;
