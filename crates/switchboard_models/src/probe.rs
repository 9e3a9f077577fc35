//! Minimal-cost health probes for the usage display.

use crate::{ProviderFactory, SwitchboardContext, VendorClient, WireFormat};
use futures::future::join_all;
use std::str::FromStr;
use switchboard_core::{GenerateRequest, ProviderSelection, Vendor};
use switchboard_error::{
    FailureKind, ProviderError, ProviderErrorKind, SwitchboardResult, classify, is_daily_quota,
};
use switchboard_interface::{Health, ProbeReport, ProbeStatus};
use switchboard_rate_limit::HeaderRateLimitDetector;
use tracing::{debug, instrument, warn};

const PROBE_PROMPT: &str = "hi";
const PROBE_MESSAGE_LIMIT: usize = 100;

/// Send a one-token request and read health from the outcome.
#[instrument(skip(ctx, client), fields(vendor = %client.vendor()))]
pub(crate) async fn probe_client<W: WireFormat>(
    ctx: &SwitchboardContext,
    client: &VendorClient<W>,
    model: &str,
) -> ProbeReport {
    let vendor = client.vendor();
    ctx.governor().wait_turn(vendor).await;
    let request = GenerateRequest::new(PROBE_PROMPT);
    let result = client
        .call(ctx.probe_guard(), model, &request, Some(1))
        .await;
    let detector = HeaderRateLimitDetector::for_vendor(vendor);

    let (status, message, headers) = match result {
        Ok(reply) => (ProbeStatus::Ok, None, reply.headers),
        // A one-token cap often yields no text; the key still worked.
        Err(failure) if failure.is_unusable_success() => (ProbeStatus::Ok, None, failure.headers),
        Err(failure) => {
            let info = classify(&failure.message, vendor.display_name(), Some(model.into()));
            let (status, message) = match info.kind() {
                FailureKind::RateLimit | FailureKind::QuotaExceeded
                    if is_daily_quota(&failure.message) =>
                {
                    (
                        ProbeStatus::Error,
                        "Daily token limit reached. Resets at midnight UTC.".to_string(),
                    )
                }
                FailureKind::RateLimit => (
                    ProbeStatus::Warning,
                    "Rate limited, try again shortly".to_string(),
                ),
                FailureKind::InvalidKey => (ProbeStatus::Error, "Invalid API key".to_string()),
                FailureKind::QuotaExceeded => {
                    (ProbeStatus::Error, "Account quota exhausted".to_string())
                }
                FailureKind::Timeout => (
                    ProbeStatus::Unknown,
                    "Check timed out - try again".to_string(),
                ),
                _ => (
                    ProbeStatus::Unknown,
                    failure.message.chars().take(PROBE_MESSAGE_LIMIT).collect(),
                ),
            };
            if info.kind() == FailureKind::RateLimit {
                if let Some(observed) = detector
                    .detect_from_error(&failure.message, ctx.usage().baseline(vendor))
                {
                    ctx.usage().record_observed_limits(vendor, observed);
                }
            }
            (status, Some(message), failure.headers)
        }
    };

    match detector.detect(&headers, ctx.usage().baseline(vendor)) {
        Some(observed) => ctx.usage().record_observed_limits(vendor, observed),
        None if status == ProbeStatus::Ok => {
            ctx.usage().seed_defaults(vendor);
        }
        None => {}
    }

    debug!(%status, ?message, "Probe finished");
    ProbeReport::new(vendor, status, message, ctx.usage().snapshot(vendor))
}

/// Probe the provider a selection names.
///
/// A blank credential yields an error report without network access.
///
/// # Errors
///
/// Returns error if the vendor is not recognized.
#[instrument(skip(ctx), fields(vendor = %selection.vendor()))]
pub async fn probe_provider(
    ctx: &SwitchboardContext,
    selection: &ProviderSelection,
) -> SwitchboardResult<ProbeReport> {
    let vendor = Vendor::from_str(selection.vendor().trim()).map_err(|_| {
        ProviderError::new(ProviderErrorKind::UnknownVendor(selection.vendor().clone()))
    })?;
    if selection.credential().trim().is_empty() {
        return Ok(ProbeReport::new(
            vendor,
            ProbeStatus::Error,
            Some("No API key configured".to_string()),
            ctx.usage().snapshot(vendor),
        ));
    }
    let provider = ProviderFactory::create(ctx, selection)?;
    Ok(provider.probe().await)
}

/// Probe several providers concurrently, in input order.
///
/// Selections naming unknown vendors are logged and left out.
pub async fn probe_all(
    ctx: &SwitchboardContext,
    selections: &[ProviderSelection],
) -> Vec<ProbeReport> {
    join_all(
        selections
            .iter()
            .map(|selection| probe_provider(ctx, selection)),
    )
    .await
    .into_iter()
    .filter_map(|result| {
        result
            .inspect_err(|e| warn!(error = %e, "Skipping provider probe"))
            .ok()
    })
    .collect()
}
