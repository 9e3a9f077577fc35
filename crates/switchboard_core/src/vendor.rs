//! Supported generation vendors.

use serde::{Deserialize, Serialize};

/// The three vendors behind the uniform contract.
///
/// Parsing is case-insensitive, so `"Groq"`, `"groq"` and `"GROQ"` all resolve.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use switchboard_core::Vendor;
///
/// assert_eq!(Vendor::from_str("Gemini").unwrap(), Vendor::Gemini);
/// assert_eq!(Vendor::OpenAI.to_string(), "openai");
/// assert!(Vendor::from_str("cohere").is_err());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    /// Groq's OpenAI-compatible endpoint
    Groq,
    /// Google Gemini
    Gemini,
    /// OpenAI
    OpenAI,
}

impl Vendor {
    /// Name shown to users.
    pub fn display_name(&self) -> &'static str {
        match self {
            Vendor::Groq => "Groq",
            Vendor::Gemini => "Gemini",
            Vendor::OpenAI => "OpenAI",
        }
    }

    /// Model used when a selection names none.
    pub fn default_model(&self) -> &'static str {
        match self {
            Vendor::Groq => "llama-3.3-70b-versatile",
            Vendor::Gemini => "gemini-2.0-flash",
            Vendor::OpenAI => "gpt-4o-mini",
        }
    }

    /// Environment variable conventionally holding this vendor's key.
    pub fn credential_env(&self) -> &'static str {
        match self {
            Vendor::Groq => "GROQ_API_KEY",
            Vendor::Gemini => "GEMINI_API_KEY",
            Vendor::OpenAI => "OPENAI_API_KEY",
        }
    }
}
