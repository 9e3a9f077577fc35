//! Groq adapter: linear backoff on rate limits, no retry on daily caps.

use crate::openai_compat::ChatCompletionsFormat;
use crate::policy::run_generation;
use crate::probe::probe_client;
use crate::{AttemptState, Decision, RetryPolicy, SwitchboardContext, VendorClient, VendorFailure};
use async_trait::async_trait;
use std::time::Duration;
use switchboard_core::{GenerateRequest, GenerateResponse, Vendor};
use switchboard_error::{ErrorInfo, FailureKind, SwitchboardResult, is_daily_quota};
use switchboard_interface::{Health, ProbeReport, SwitchboardDriver};
use switchboard_rate_limit::ProviderSettings;
use tracing::{instrument, warn};

/// Longest vendor-suggested wait honored before a retry.
const MAX_RETRY_HINT: Duration = Duration::from_secs(60);

/// Groq's reaction to failures.
///
/// Rate limits are retried up to `max_retries` times, waiting the vendor's
/// hint when present and `backoff_step × (attempt + 1)` otherwise. A
/// daily token cap cannot clear within the call and is surfaced at once.
/// Every other failure surfaces immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroqPolicy {
    max_retries: u32,
    backoff_step: Duration,
}

impl GroqPolicy {
    /// Policy with explicit limits.
    pub fn new(max_retries: u32, backoff_step: Duration) -> Self {
        Self {
            max_retries,
            backoff_step,
        }
    }

    /// Policy from provider settings.
    pub fn from_settings(settings: &ProviderSettings) -> Self {
        Self::new(settings.max_retries, settings.backoff_step())
    }

    /// Retries allowed after the first attempt.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Wait before retry number `attempt + 1`.
    pub fn backoff(&self, attempt: u32, hint: Option<Duration>) -> Duration {
        match hint {
            Some(hint) => hint.min(MAX_RETRY_HINT),
            None => self.backoff_step * (attempt + 1),
        }
    }
}

impl Default for GroqPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(5))
    }
}

impl RetryPolicy for GroqPolicy {
    fn decide(&self, state: &AttemptState, info: &ErrorInfo, failure: &VendorFailure) -> Decision {
        if info.kind() != FailureKind::RateLimit {
            return Decision::Surface {
                message: info.user_message(),
            };
        }
        if is_daily_quota(&failure.message) {
            warn!(model = %state.model, "Daily token cap reached, not retrying");
            return Decision::Surface {
                message: format!(
                    "{} ({}): Daily token limit reached. The limit resets at midnight UTC. \
                     Consider switching to a different AI provider or try again tomorrow.",
                    Vendor::Groq.display_name(),
                    state.model
                ),
            };
        }
        if state.attempt < self.max_retries {
            Decision::Retry {
                delay: self.backoff(state.attempt, failure.retry_after),
            }
        } else {
            warn!(attempts = state.attempt + 1, "Rate limit retries exhausted");
            Decision::Surface {
                message: info.user_message(),
            }
        }
    }
}

/// Groq chat-completions driver.
#[derive(Debug, Clone)]
pub struct GroqDriver {
    ctx: SwitchboardContext,
    client: VendorClient<ChatCompletionsFormat>,
    model: String,
    policy: GroqPolicy,
}

impl GroqDriver {
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
        let client = VendorClient::new(ctx, ChatCompletionsFormat::new(Vendor::Groq), credential)?;
        let settings = ctx.config().provider(Vendor::Groq);
        Ok(Self {
            ctx: ctx.clone(),
            client,
            model: model.unwrap_or_else(|| ctx.config().default_model(Vendor::Groq)),
            policy: GroqPolicy::from_settings(&settings),
        })
    }

    /// Replace the retry policy.
    pub fn with_policy(mut self, policy: GroqPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Active retry policy.
    pub fn policy(&self) -> &GroqPolicy {
        &self.policy
    }
}

#[async_trait]
impl SwitchboardDriver for GroqDriver {
    #[instrument(skip(self, req), fields(provider = "groq", model = %self.model))]
    async fn generate(&self, req: &GenerateRequest) -> GenerateResponse {
        let candidates = [self.model.clone()];
        run_generation(
            &self.ctx,
            &self.client,
            &self.policy,
            req,
            &self.model,
            &candidates,
        )
        .await
    }

    fn vendor(&self) -> Vendor {
        Vendor::Groq
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Health for GroqDriver {
    async fn probe(&self) -> ProbeReport {
        probe_client(&self.ctx, &self.client, &self.model).await
    }
}
