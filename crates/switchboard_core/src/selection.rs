//! Caller-supplied provider selection.

use crate::Vendor;
use serde::{Deserialize, Serialize};

/// What a credential/model resolver hands to the provider factory.
///
/// The vendor stays a raw string so the factory, not the resolver, decides
/// whether it is recognized.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ProviderSelection {
    vendor: String,
    #[serde(skip_serializing)]
    credential: String,
    model: Option<String>,
}

impl ProviderSelection {
    /// Build a selection from its parts.
    pub fn new(
        vendor: impl Into<String>,
        credential: impl Into<String>,
        model: Option<String>,
    ) -> Self {
        Self {
            vendor: vendor.into(),
            credential: credential.into(),
            model: model.filter(|m| !m.trim().is_empty()),
        }
    }

    /// Parse a stored `"vendor:model"` preference.
    ///
    /// A preference without a colon names a model for Groq; an empty
    /// preference selects Groq's default model.
    ///
    /// # Examples
    ///
    /// ```
    /// use switchboard_core::ProviderSelection;
    ///
    /// let sel = ProviderSelection::from_preference("gemini:gemini-2.5-flash", "key");
    /// assert_eq!(sel.vendor(), "gemini");
    /// assert_eq!(sel.model().as_deref(), Some("gemini-2.5-flash"));
    ///
    /// let bare = ProviderSelection::from_preference("", "key");
    /// assert_eq!(bare.vendor(), "groq");
    /// assert_eq!(bare.model().as_deref(), Some("llama-3.3-70b-versatile"));
    /// ```
    pub fn from_preference(preference: &str, credential: impl Into<String>) -> Self {
        let preference = preference.trim();
        let (vendor, model) = match preference.split_once(':') {
            Some((vendor, model)) => (vendor.trim().to_string(), model.trim().to_string()),
            None if preference.is_empty() => (
                Vendor::Groq.to_string(),
                Vendor::Groq.default_model().to_string(),
            ),
            None => (Vendor::Groq.to_string(), preference.to_string()),
        };
        Self::new(vendor, credential, Some(model))
    }
}

impl std::fmt::Debug for ProviderSelection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSelection")
            .field("vendor", &self.vendor)
            .field("credential", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}
