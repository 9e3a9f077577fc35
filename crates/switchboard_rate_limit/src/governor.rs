//! Adaptive client-side spacing of vendor calls.

use crate::{Clock, GovernorSettings, SwitchboardConfig};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use switchboard_core::Vendor;
use tracing::{debug, instrument, warn};

/// Interval for vendors that were never configured.
const FALLBACK_INTERVAL_MS: f64 = 1000.0;

#[derive(Debug, Clone, Copy)]
struct ClassState {
    last_dispatch: Option<Duration>,
    min_interval_ms: f64,
}

/// Enforces a minimum spacing between calls to each vendor.
///
/// The spacing starts at the configured interval and is multiplied by the
/// growth factor on every rate-limit hit, up to the ceiling. It never
/// shrinks for the lifetime of the governor.
///
/// Each check-and-update happens under one lock, and the next dispatch slot
/// is claimed before sleeping, so concurrent callers for the same vendor are
/// spaced rather than released together.
#[derive(Debug)]
pub struct RateGovernor {
    clock: Arc<dyn Clock>,
    growth_factor: f64,
    ceiling_ms: f64,
    classes: Mutex<HashMap<Vendor, ClassState>>,
}

impl RateGovernor {
    /// Governor with explicit starting intervals per vendor.
    pub fn new(
        clock: Arc<dyn Clock>,
        settings: &GovernorSettings,
        initial_intervals: impl IntoIterator<Item = (Vendor, Duration)>,
    ) -> Self {
        let ceiling_ms = settings.ceiling_ms as f64;
        let classes = initial_intervals
            .into_iter()
            .map(|(vendor, interval)| {
                let state = ClassState {
                    last_dispatch: None,
                    min_interval_ms: (interval.as_secs_f64() * 1000.0).min(ceiling_ms),
                };
                (vendor, state)
            })
            .collect();

        Self {
            clock,
            growth_factor: settings.growth_factor,
            ceiling_ms,
            classes: Mutex::new(classes),
        }
    }

    /// Governor seeded from each configured provider's `min_interval_ms`.
    pub fn from_config(clock: Arc<dyn Clock>, config: &SwitchboardConfig) -> Self {
        let intervals = config
            .configured_vendors()
            .map(|vendor| {
                let settings = config.provider(vendor);
                (vendor, Duration::from_millis(settings.min_interval_ms))
            })
            .collect::<Vec<_>>();
        Self::new(clock, &config.governor, intervals)
    }

    /// Wait until `vendor` may be called again, and claim that slot.
    ///
    /// Returns how long the caller was made to wait.
    #[instrument(skip(self), fields(vendor = %vendor))]
    pub async fn wait_turn(&self, vendor: Vendor) -> Duration {
        let wait = {
            let mut classes = self.classes();
            let now = self.clock.now();
            let state = classes.entry(vendor).or_insert_with(|| ClassState {
                last_dispatch: None,
                min_interval_ms: FALLBACK_INTERVAL_MS.min(self.ceiling_ms),
            });
            let interval = Duration::from_secs_f64(state.min_interval_ms / 1000.0);
            let wait = match state.last_dispatch {
                Some(last) => (last + interval).saturating_sub(now),
                None => Duration::ZERO,
            };
            state.last_dispatch = Some(now + wait);
            wait
        };

        if !wait.is_zero() {
            debug!(wait_ms = wait.as_millis() as u64, "Spacing call");
            self.clock.sleep(wait).await;
        }
        wait
    }

    /// Widen `vendor`'s spacing after a rate-limit classification.
    ///
    /// Returns the new minimum interval.
    #[instrument(skip(self), fields(vendor = %vendor))]
    pub fn record_rate_limit(&self, vendor: Vendor) -> Duration {
        let mut classes = self.classes();
        let state = classes.entry(vendor).or_insert_with(|| ClassState {
            last_dispatch: None,
            min_interval_ms: FALLBACK_INTERVAL_MS.min(self.ceiling_ms),
        });
        let grown = (state.min_interval_ms * self.growth_factor).min(self.ceiling_ms);
        // Monotonic even if growth_factor were misconfigured below 1.
        state.min_interval_ms = grown.max(state.min_interval_ms);
        warn!(
            min_interval_ms = state.min_interval_ms,
            "Rate limit observed, widening call spacing"
        );
        Duration::from_secs_f64(state.min_interval_ms / 1000.0)
    }

    /// Current minimum interval for `vendor`, in milliseconds.
    pub fn min_interval_ms(&self, vendor: Vendor) -> f64 {
        self.classes()
            .get(&vendor)
            .map(|state| state.min_interval_ms)
            .unwrap_or(FALLBACK_INTERVAL_MS.min(self.ceiling_ms))
    }

    /// Current minimum interval for `vendor`.
    pub fn min_interval(&self, vendor: Vendor) -> Duration {
        Duration::from_secs_f64(self.min_interval_ms(vendor) / 1000.0)
    }

    fn classes(&self) -> MutexGuard<'_, HashMap<Vendor, ClassState>> {
        self.classes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
