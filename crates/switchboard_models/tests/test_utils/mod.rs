//! Test utilities for adapter tests.
//!
//! Provides a scripted transport and a context wired to a manual clock.

pub mod mock_transport;

#[allow(unused_imports)]
pub use mock_transport::{
    ScriptedTransport, chat_error, chat_ok, gemini_error, gemini_ok, reply_with_headers,
};

use std::sync::Arc;
use switchboard_models::SwitchboardContext;
use switchboard_rate_limit::{ManualClock, SwitchboardConfig};

/// Bundled configuration with call spacing disabled, so the only recorded
/// sleeps are retry waits.
#[allow(dead_code)]
pub fn unspaced_config() -> SwitchboardConfig {
    let mut config = SwitchboardConfig::bundled().expect("bundled config loads");
    for settings in config.providers.values_mut() {
        settings.min_interval_ms = 0;
    }
    config
}

/// Context over `transport` with a manual clock.
#[allow(dead_code)]
pub fn test_context(
    transport: Arc<ScriptedTransport>,
) -> (SwitchboardContext, Arc<ManualClock>) {
    context_with_config(transport, unspaced_config())
}

/// Context over `transport` and `config` with a manual clock.
#[allow(dead_code)]
pub fn context_with_config(
    transport: Arc<ScriptedTransport>,
    config: SwitchboardConfig,
) -> (SwitchboardContext, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let ctx = SwitchboardContext::builder(config)
        .clock(clock.clone())
        .transport(transport)
        .build()
        .expect("context builds");
    (ctx, clock)
}
