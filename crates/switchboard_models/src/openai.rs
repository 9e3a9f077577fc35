//! OpenAI adapter: one attempt, no retry.

use crate::openai_compat::ChatCompletionsFormat;
use crate::policy::run_generation;
use crate::probe::probe_client;
use crate::{AttemptState, Decision, RetryPolicy, SwitchboardContext, VendorClient, VendorFailure};
use async_trait::async_trait;
use switchboard_core::{GenerateRequest, GenerateResponse, Vendor};
use switchboard_error::{ErrorInfo, SwitchboardResult};
use switchboard_interface::{Health, ProbeReport, SwitchboardDriver};
use tracing::instrument;

/// Surfaces every failure as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SingleAttemptPolicy;

impl RetryPolicy for SingleAttemptPolicy {
    fn decide(&self, _: &AttemptState, info: &ErrorInfo, _: &VendorFailure) -> Decision {
        Decision::Surface {
            message: info.user_message(),
        }
    }
}

/// OpenAI chat-completions driver.
#[derive(Debug, Clone)]
pub struct OpenAIDriver {
    ctx: SwitchboardContext,
    client: VendorClient<ChatCompletionsFormat>,
    model: String,
}

impl OpenAIDriver {
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
        let client =
            VendorClient::new(ctx, ChatCompletionsFormat::new(Vendor::OpenAI), credential)?;
        Ok(Self {
            ctx: ctx.clone(),
            client,
            model: model.unwrap_or_else(|| ctx.config().default_model(Vendor::OpenAI)),
        })
    }
}

#[async_trait]
impl SwitchboardDriver for OpenAIDriver {
    #[instrument(skip(self, req), fields(provider = "openai", model = %self.model))]
    async fn generate(&self, req: &GenerateRequest) -> GenerateResponse {
        let candidates = [self.model.clone()];
        run_generation(
            &self.ctx,
            &self.client,
            &SingleAttemptPolicy,
            req,
            &self.model,
            &candidates,
        )
        .await
    }

    fn vendor(&self) -> Vendor {
        Vendor::OpenAI
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Health for OpenAIDriver {
    async fn probe(&self) -> ProbeReport {
        probe_client(&self.ctx, &self.client, &self.model).await
    }
}
