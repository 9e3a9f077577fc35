//! Process-lifetime usage estimates per provider.

use crate::{DefaultLimits, RateLimitSnapshot, SwitchboardConfig};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use switchboard_core::Vendor;
use tracing::{debug, instrument};

/// Advisory quota cache keyed by vendor.
///
/// Sources, most to least reliable: response headers, numbers parsed out of
/// rate-limit error text, and static published defaults. The data is for
/// display only; nothing here gates whether a request is sent. Writes are
/// last-write-wins under a lock so every write keeps `used <= limit`.
#[derive(Debug, Default)]
pub struct UsageStore {
    defaults: HashMap<Vendor, DefaultLimits>,
    snapshots: Mutex<HashMap<Vendor, RateLimitSnapshot>>,
}

impl UsageStore {
    /// Store with the given static defaults and no snapshots.
    pub fn new(defaults: HashMap<Vendor, DefaultLimits>) -> Self {
        Self {
            defaults,
            snapshots: Mutex::new(HashMap::new()),
        }
    }

    /// Store whose defaults come from each provider's `limits` table.
    pub fn from_config(config: &SwitchboardConfig) -> Self {
        let defaults = config
            .configured_vendors()
            .map(|vendor| (vendor, config.provider(vendor).limits))
            .collect();
        Self::new(defaults)
    }

    /// Replace the snapshot for `vendor` outright.
    #[instrument(skip(self, snapshot), fields(vendor = %vendor))]
    pub fn record_observed_limits(&self, vendor: Vendor, snapshot: RateLimitSnapshot) {
        debug!(
            rpm_used = snapshot.requests_per_minute().used(),
            tpm_used = snapshot.tokens_per_minute().used(),
            rpd_used = snapshot.requests_per_day().used(),
            "Recording observed limits"
        );
        self.snapshots().insert(vendor, snapshot);
    }

    /// Count one request and `tokens` tokens against the existing snapshot.
    ///
    /// Does nothing, and returns `false`, when no snapshot exists yet.
    #[instrument(skip(self), fields(vendor = %vendor))]
    pub fn record_optimistic_usage(&self, vendor: Vendor, tokens: Option<u64>) -> bool {
        let mut snapshots = self.snapshots();
        let Some(current) = snapshots.get(&vendor).cloned() else {
            debug!("No snapshot seeded, skipping optimistic usage");
            return false;
        };
        snapshots.insert(vendor, current.consume(tokens.unwrap_or(0)));
        true
    }

    /// Current snapshot for `vendor`.
    pub fn snapshot(&self, vendor: Vendor) -> Option<RateLimitSnapshot> {
        self.snapshots().get(&vendor).cloned()
    }

    /// Write static defaults for `vendor` if nothing is recorded yet.
    ///
    /// Returns whether defaults were written.
    #[instrument(skip(self), fields(vendor = %vendor))]
    pub fn seed_defaults(&self, vendor: Vendor) -> bool {
        let defaults = self.defaults_for(vendor);
        let mut snapshots = self.snapshots();
        if snapshots.contains_key(&vendor) {
            return false;
        }
        debug!("Seeding default limits");
        snapshots.insert(vendor, defaults);
        true
    }

    /// The existing snapshot, or a fresh one at default limits.
    ///
    /// Partial observations are layered on top of this.
    pub fn baseline(&self, vendor: Vendor) -> RateLimitSnapshot {
        self.snapshot(vendor)
            .unwrap_or_else(|| self.defaults_for(vendor))
    }

    fn defaults_for(&self, vendor: Vendor) -> RateLimitSnapshot {
        let limits = self.defaults.get(&vendor).copied().unwrap_or_default();
        RateLimitSnapshot::from_defaults(&limits)
    }

    fn snapshots(&self) -> MutexGuard<'_, HashMap<Vendor, RateLimitSnapshot>> {
        self.snapshots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
