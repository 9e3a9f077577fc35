//! Switchboard - resilient multi-provider LLM text generation.
//!
//! Callers hand a [`GenerateRequest`] to any adapter built by
//! [`ProviderFactory`] and always get a [`GenerateResponse`] back: failures
//! are classified, retried or cascaded per vendor, and folded into a
//! human-readable error string rather than raised.
//!
//! # Quick Start
//!
//! ```no_run
//! use switchboard::{
//!     GenerateRequest, ProviderFactory, ProviderSelection, SwitchboardConfig,
//!     SwitchboardContext, SwitchboardDriver,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = SwitchboardContext::builder(SwitchboardConfig::load()?).build()?;
//! let selection = ProviderSelection::new("gemini", std::env::var("GEMINI_API_KEY")?, None);
//! let provider = ProviderFactory::create(&ctx, &selection)?;
//!
//! let response = provider.generate(&GenerateRequest::new("Capital of France?")).await;
//! println!("{}", response.error().unwrap_or(response.text()));
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - `switchboard_error` - Error classifier and crate error types
//! - `switchboard_core` - Request, response, vendor and selection types
//! - `switchboard_interface` - `SwitchboardDriver` and `Health` traits
//! - `switchboard_rate_limit` - Rate governor, timeout guard, usage store, config
//! - `switchboard_models` - Vendor adapters, retry state machine, factory
//!
//! This crate re-exports everything for convenience.

pub use switchboard_core::*;
pub use switchboard_error::*;
pub use switchboard_interface::*;
pub use switchboard_models::*;
pub use switchboard_rate_limit::*;
