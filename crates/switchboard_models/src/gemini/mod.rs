//! Google Gemini adapter.
//!
//! Requested model names are normalized (legacy aliases, `models/`
//! prefixes, pinned `-00N` revisions) and then tried as the head of a short
//! cascade of fallback models. Failures that another model could avoid move
//! the cascade on; failures no model can fix end it.

mod driver;
mod format;
mod models;

pub use driver::{GeminiDriver, GeminiPolicy};
pub use format::GeminiFormat;
pub use models::{build_cascade, normalize_model};
