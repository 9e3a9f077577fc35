//! Provider factory.

use crate::{GeminiDriver, GroqDriver, OpenAIDriver, SwitchboardContext};
use std::str::FromStr;
use switchboard_core::{ProviderSelection, Vendor};
use switchboard_error::{ProviderError, ProviderErrorKind, SwitchboardResult};
use switchboard_interface::Health;
use tracing::{debug, instrument};

/// A generation adapter that can also report its health.
pub trait Provider: Health {}

impl<T: Health> Provider for T {}

/// Builds the adapter a [`ProviderSelection`] names.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProviderFactory;

impl ProviderFactory {
    /// Build an adapter for `selection`.
    ///
    /// No network traffic happens here.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderErrorKind::UnknownVendor`] for an unrecognized
    /// vendor and [`ProviderErrorKind::EmptyCredential`] for a blank
    /// credential.
    #[instrument(skip(ctx))]
    pub fn create(
        ctx: &SwitchboardContext,
        selection: &ProviderSelection,
    ) -> SwitchboardResult<Box<dyn Provider>> {
        let vendor = Vendor::from_str(selection.vendor().trim()).map_err(|_| {
            ProviderError::new(ProviderErrorKind::UnknownVendor(selection.vendor().clone()))
        })?;
        if selection.credential().trim().is_empty() {
            return Err(ProviderError::new(ProviderErrorKind::EmptyCredential(
                vendor.display_name().to_string(),
            ))
            .into());
        }

        let credential = selection.credential().clone();
        let model = selection.model().clone();
        debug!(%vendor, ?model, "Creating provider");

        let provider: Box<dyn Provider> = match vendor {
            Vendor::Groq => Box::new(GroqDriver::new(ctx, credential, model)?),
            Vendor::Gemini => Box::new(GeminiDriver::new(ctx, credential, model)?),
            Vendor::OpenAI => Box::new(OpenAIDriver::new(ctx, credential, model)?),
        };
        Ok(provider)
    }
}
