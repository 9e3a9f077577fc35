//! Provider health report types.

use serde::Serialize;
use switchboard_core::Vendor;
use switchboard_rate_limit::RateLimitSnapshot;

/// Coarse provider health for usage display.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display, strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    /// Key valid and requests flowing
    Ok,
    /// Rate limited but expected to recover shortly
    Warning,
    /// Key missing or invalid, or a daily cap reached
    Error,
    /// Probe could not tell
    Unknown,
}

/// Outcome of a health probe for one provider.
#[derive(Debug, Clone, PartialEq, Serialize, derive_getters::Getters)]
pub struct ProbeReport {
    vendor: Vendor,
    status: ProbeStatus,
    message: Option<String>,
    snapshot: Option<RateLimitSnapshot>,
}

impl ProbeReport {
    /// Assemble a report.
    pub fn new(
        vendor: Vendor,
        status: ProbeStatus,
        message: Option<String>,
        snapshot: Option<RateLimitSnapshot>,
    ) -> Self {
        Self {
            vendor,
            status,
            message,
            snapshot,
        }
    }
}
