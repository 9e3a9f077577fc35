//! Vendor adapters for the Switchboard resilience layer.
//!
//! Three vendors sit behind [`SwitchboardDriver`](switchboard_interface::SwitchboardDriver):
//!
//! - [`GroqDriver`] retries rate limits with linear backoff and gives up at
//!   once on a daily token cap.
//! - [`GeminiDriver`] normalizes the model name and cascades through
//!   candidate models until one answers.
//! - [`OpenAIDriver`] makes a single attempt.
//!
//! All three share one retry state machine ([`Step`]), one HTTP
//! [`Transport`], and one [`SwitchboardContext`] holding the rate governor,
//! usage store and clock. [`ProviderFactory`] builds the right adapter from a
//! [`ProviderSelection`](switchboard_core::ProviderSelection).
//!
//! # Example
//!
//! ```no_run
//! use switchboard_core::{GenerateRequest, ProviderSelection};
//! use switchboard_interface::SwitchboardDriver;
//! use switchboard_models::{ProviderFactory, SwitchboardContext};
//! use switchboard_rate_limit::SwitchboardConfig;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = SwitchboardContext::builder(SwitchboardConfig::load()?).build()?;
//! let selection = ProviderSelection::from_preference("groq:llama-3.3-70b-versatile", "gsk_...");
//! let provider = ProviderFactory::create(&ctx, &selection)?;
//!
//! let response = provider.generate(&GenerateRequest::new("Capital of France?")).await;
//! match response.error() {
//!     None => println!("{}", response.text()),
//!     Some(error) => eprintln!("{error}"),
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod context;
mod factory;
mod gemini;
mod groq;
mod metrics;
mod openai;
mod openai_compat;
mod policy;
mod probe;
mod transport;
mod wire;

pub use context::{SwitchboardContext, SwitchboardContextBuilder};
pub use factory::{Provider, ProviderFactory};
pub use gemini::{GeminiDriver, GeminiFormat, GeminiPolicy, build_cascade, normalize_model};
pub use groq::{GroqDriver, GroqPolicy};
pub use metrics::LlmMetrics;
pub use openai::{OpenAIDriver, SingleAttemptPolicy};
pub use openai_compat::ChatCompletionsFormat;
pub use policy::{AttemptState, Decision, RetryPolicy, Step};
pub use probe::{probe_all, probe_provider};
pub use transport::{HttpTransport, Transport, WireReply, WireRequest};
pub use wire::{ParsedReply, VendorClient, VendorFailure, VendorReply, WireFormat};
