//! Core data types for the Switchboard resilience layer.
//!
//! This crate holds the vendor-neutral contract shared by every adapter:
//! the request callers build, the response adapters always return, and the
//! vendor identity used to key shared state.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod request;
mod response;
mod selection;
mod telemetry;
mod vendor;

pub use request::{GenerateRequest, GenerateRequestBuilder, GenerateRequestBuilderError};
pub use response::GenerateResponse;
pub use selection::ProviderSelection;
pub use telemetry::init_tracing;
pub use vendor::Vendor;
