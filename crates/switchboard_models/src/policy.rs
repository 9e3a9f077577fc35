//! Retry state machine shared by every adapter.
//!
//! A generation runs as a sequence of [`Step`]s. Each failed attempt is
//! classified and handed to the adapter's [`RetryPolicy`], whose
//! [`Decision`] picks the next step. Waits go through the context clock so
//! tests can assert them without sleeping.

use crate::{LlmMetrics, SwitchboardContext, VendorClient, VendorFailure, VendorReply, WireFormat};
use std::time::Duration;
use switchboard_core::{GenerateRequest, GenerateResponse};
use switchboard_error::{ErrorInfo, FailureKind, classify};
use switchboard_rate_limit::HeaderRateLimitDetector;
use tracing::{debug, info, instrument, warn};

/// Where a generation stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Call the vendor with the candidate at `candidate`.
    Attempt {
        /// Zero-based attempt number for this candidate
        attempt: u32,
        /// Index into the candidate list
        candidate: usize,
    },
    /// Sleep before the next attempt on the same candidate.
    Wait {
        /// How long to sleep
        delay: Duration,
        /// Attempt number to run after the wait
        attempt: u32,
        /// Index into the candidate list
        candidate: usize,
    },
    /// Move on to the candidate at `candidate`.
    Fallback {
        /// Index into the candidate list
        candidate: usize,
    },
    /// Done; hand this back to the caller.
    Terminal(GenerateResponse),
}

/// A policy's verdict on one classified failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Wait, then retry the same candidate.
    Retry {
        /// Wait before the retry
        delay: Duration,
    },
    /// Try the next candidate, or surface the failure if none remain.
    Fallback,
    /// Stop and return this message.
    Surface {
        /// User-facing failure text
        message: String,
    },
}

/// What a policy sees about the attempt that just failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptState {
    /// Zero-based attempt number for this candidate
    pub attempt: u32,
    /// Index of the failing candidate
    pub candidate: usize,
    /// Number of candidates in play
    pub candidate_count: usize,
    /// Model that failed
    pub model: String,
}

impl AttemptState {
    /// Whether another candidate follows this one.
    pub fn has_next_candidate(&self) -> bool {
        self.candidate + 1 < self.candidate_count
    }
}

/// Per-vendor reaction to failures.
pub trait RetryPolicy: Send + Sync + std::fmt::Debug {
    /// Pick the next move after a classified failure.
    fn decide(&self, state: &AttemptState, info: &ErrorInfo, failure: &VendorFailure) -> Decision;
}

/// Drive one generation to a terminal response.
///
/// `candidates` are tried in order. The response names the model that
/// answered when it differs from `requested`.
#[instrument(
    skip(ctx, client, policy, request, candidates),
    fields(vendor = %client.vendor(), candidates = candidates.len())
)]
pub(crate) async fn run_generation<W, P>(
    ctx: &SwitchboardContext,
    client: &VendorClient<W>,
    policy: &P,
    request: &GenerateRequest,
    requested: &str,
    candidates: &[String],
) -> GenerateResponse
where
    W: WireFormat,
    P: RetryPolicy,
{
    let vendor = client.vendor();
    if candidates.is_empty() {
        return GenerateResponse::failure(format!(
            "{}: no model available to try",
            vendor.display_name()
        ));
    }

    let mut step = Step::Attempt {
        attempt: 0,
        candidate: 0,
    };
    loop {
        step = match step {
            Step::Attempt { attempt, candidate } => {
                let model = &candidates[candidate];
                match attempt_once(ctx, client, model, request).await {
                    Ok(reply) => {
                        let response = GenerateResponse::success(reply.text).unwrap_or_else(|| {
                            GenerateResponse::failure(format!(
                                "Empty response from {}",
                                vendor.display_name()
                            ))
                        });
                        let response = if model != requested {
                            info!(requested, answered = %model, "Fallback model answered");
                            response.with_model_used(model.clone())
                        } else {
                            response
                        };
                        Step::Terminal(response)
                    }
                    Err((info, failure)) => {
                        let state = AttemptState {
                            attempt,
                            candidate,
                            candidate_count: candidates.len(),
                            model: model.clone(),
                        };
                        match policy.decide(&state, &info, &failure) {
                            Decision::Retry { delay } => Step::Wait {
                                delay,
                                attempt: attempt + 1,
                                candidate,
                            },
                            Decision::Fallback if state.has_next_candidate() => Step::Fallback {
                                candidate: candidate + 1,
                            },
                            Decision::Fallback => {
                                warn!("All candidate models failed");
                                Step::Terminal(GenerateResponse::failure(info.user_message()))
                            }
                            Decision::Surface { message } => {
                                Step::Terminal(GenerateResponse::failure(message))
                            }
                        }
                    }
                }
            }
            Step::Wait {
                delay,
                attempt,
                candidate,
            } => {
                let model = &candidates[candidate];
                warn!(
                    delay_ms = delay.as_millis() as u64,
                    attempt,
                    model = %model,
                    "Rate limited, waiting before retry"
                );
                LlmMetrics::get().record_retry(vendor.as_ref(), model);
                ctx.clock().sleep(delay).await;
                Step::Attempt { attempt, candidate }
            }
            Step::Fallback { candidate } => {
                debug!(next = %candidates[candidate], "Trying next candidate model");
                Step::Attempt {
                    attempt: 0,
                    candidate,
                }
            }
            Step::Terminal(response) => return response,
        };
    }
}

/// Governed, guarded call with usage bookkeeping.
async fn attempt_once<W: WireFormat>(
    ctx: &SwitchboardContext,
    client: &VendorClient<W>,
    model: &str,
    request: &GenerateRequest,
) -> Result<VendorReply, (ErrorInfo, VendorFailure)> {
    let vendor = client.vendor();
    let metrics = LlmMetrics::get();

    ctx.governor().wait_turn(vendor).await;
    let started = ctx.clock().now();
    let result = client.call(ctx.request_guard(), model, request, None).await;
    let elapsed = ctx.clock().now().saturating_sub(started);
    let detector = HeaderRateLimitDetector::for_vendor(vendor);

    match result {
        Ok(reply) => {
            metrics.record_request(vendor.as_ref(), model, elapsed);
            if let Some(tokens) = reply.total_tokens {
                metrics.record_tokens(vendor.as_ref(), model, tokens);
            }
            match detector.detect(&reply.headers, ctx.usage().baseline(vendor)) {
                Some(observed) => ctx.usage().record_observed_limits(vendor, observed),
                None => {
                    ctx.usage()
                        .record_optimistic_usage(vendor, reply.total_tokens);
                }
            }
            Ok(reply)
        }
        Err(failure) => {
            let info = classify(
                &failure.message,
                vendor.display_name(),
                Some(model.to_string()),
            );
            metrics.record_error(vendor.as_ref(), model, info.kind());
            debug!(kind = %info.kind(), message = %failure.message, "Vendor call failed");

            if info.kind() == FailureKind::RateLimit {
                ctx.governor().record_rate_limit(vendor);
            }
            if matches!(
                info.kind(),
                FailureKind::RateLimit | FailureKind::QuotaExceeded
            ) {
                let observed = detector
                    .detect(&failure.headers, ctx.usage().baseline(vendor))
                    .or_else(|| {
                        detector.detect_from_error(&failure.message, ctx.usage().baseline(vendor))
                    });
                if let Some(observed) = observed {
                    ctx.usage().record_observed_limits(vendor, observed);
                }
            }
            Err((info, failure))
        }
    }
}
