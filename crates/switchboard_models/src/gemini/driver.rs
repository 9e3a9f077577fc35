//! Gemini driver and cascade policy.

use super::{GeminiFormat, build_cascade, normalize_model};
use crate::policy::run_generation;
use crate::probe::probe_client;
use crate::{AttemptState, Decision, RetryPolicy, SwitchboardContext, VendorClient, VendorFailure};
use async_trait::async_trait;
use switchboard_core::{GenerateRequest, GenerateResponse, Vendor};
use switchboard_error::{ErrorInfo, RetryableError, SwitchboardResult};
use switchboard_interface::{Health, ProbeReport, SwitchboardDriver};
use tracing::{debug, instrument};

/// Gemini's reaction to failures.
///
/// Anything another model might not hit (rate limits, missing models,
/// timeouts, vendor errors) moves to the next candidate. Failures that
/// would repeat on every model stop the cascade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeminiPolicy;

impl RetryPolicy for GeminiPolicy {
    fn decide(&self, state: &AttemptState, info: &ErrorInfo, _: &VendorFailure) -> Decision {
        if info.is_retryable() {
            debug!(
                kind = %info.kind(),
                model = %state.model,
                remaining = state.candidate_count - state.candidate - 1,
                "Candidate failed, cascading"
            );
            Decision::Fallback
        } else {
            Decision::Surface {
                message: info.user_message(),
            }
        }
    }
}

/// Gemini `generateContent` driver with model cascade.
#[derive(Debug, Clone)]
pub struct GeminiDriver {
    ctx: SwitchboardContext,
    client: VendorClient<GeminiFormat>,
    model: String,
    cascade: Vec<String>,
}

impl GeminiDriver {
    /// Driver for `model`, or the configured default when `None`.
    ///
    /// # Errors
    ///
    /// Returns error if the credential is blank.
    #[instrument(skip(ctx, credential), fields(model = ?model))]
    pub fn new(
        ctx: &SwitchboardContext,
        credential: impl Into<String>,
        model: Option<String>,
    ) -> SwitchboardResult<Self> {
        let client = VendorClient::new(ctx, GeminiFormat, credential)?;
        let settings = ctx.config().provider(Vendor::Gemini);
        let model = model.unwrap_or_else(|| ctx.config().default_model(Vendor::Gemini));
        let cascade = build_cascade(&model, &settings.fallback_models, settings.max_candidates);
        debug!(?cascade, "Built Gemini model cascade");
        Ok(Self {
            ctx: ctx.clone(),
            client,
            model,
            cascade,
        })
    }

    /// Models tried, in order.
    pub fn cascade(&self) -> &[String] {
        &self.cascade
    }

    /// The requested model after normalization.
    pub fn normalized_model(&self) -> String {
        normalize_model(&self.model)
    }
}

#[async_trait]
impl SwitchboardDriver for GeminiDriver {
    #[instrument(skip(self, req), fields(provider = "gemini", model = %self.model))]
    async fn generate(&self, req: &GenerateRequest) -> GenerateResponse {
        run_generation(
            &self.ctx,
            &self.client,
            &GeminiPolicy,
            req,
            &self.model,
            &self.cascade,
        )
        .await
    }

    fn vendor(&self) -> Vendor {
        Vendor::Gemini
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Health for GeminiDriver {
    async fn probe(&self) -> ProbeReport {
        let model = self.normalized_model();
        probe_client(&self.ctx, &self.client, &model).await
    }
}
