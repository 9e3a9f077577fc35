//! Trait definitions for vendor adapters and their capabilities.

use crate::ProbeReport;
use async_trait::async_trait;
use switchboard_core::{GenerateRequest, GenerateResponse, Vendor};

/// Core trait every vendor adapter implements.
///
/// `generate` is infallible by contract: every vendor failure, retry
/// exhaustion and timeout ends in a failed [`GenerateResponse`] rather than
/// an error.
#[async_trait]
pub trait SwitchboardDriver: Send + Sync {
    /// Generate text for a request.
    async fn generate(&self, req: &GenerateRequest) -> GenerateResponse;

    /// Vendor this adapter speaks to.
    fn vendor(&self) -> Vendor;

    /// Provider name (e.g., "groq", "gemini", "openai").
    fn provider_name(&self) -> &'static str {
        match self.vendor() {
            Vendor::Groq => "groq",
            Vendor::Gemini => "gemini",
            Vendor::OpenAI => "openai",
        }
    }

    /// Model identifier requested at construction.
    fn model_name(&self) -> &str;
}

/// Adapters able to check their credential and quota cheaply.
#[async_trait]
pub trait Health: SwitchboardDriver {
    /// Send one minimal request and report provider health.
    async fn probe(&self) -> ProbeReport;
}
