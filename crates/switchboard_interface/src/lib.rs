//! Trait definitions for Switchboard vendor adapters.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::{Health, SwitchboardDriver};
pub use types::{ProbeReport, ProbeStatus};
