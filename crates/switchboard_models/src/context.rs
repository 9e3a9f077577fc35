//! Process-wide shared state for adapters.

use crate::{HttpTransport, Transport};
use std::sync::Arc;
use switchboard_error::SwitchboardResult;
use switchboard_rate_limit::{
    Clock, RateGovernor, SwitchboardConfig, TimeoutGuard, TokioClock, UsageStore,
};
use tracing::{debug, instrument};

#[derive(Debug)]
struct Inner {
    config: SwitchboardConfig,
    clock: Arc<dyn Clock>,
    governor: RateGovernor,
    usage: UsageStore,
    transport: Arc<dyn Transport>,
}

/// Governor, usage store, clock and transport shared by every adapter.
///
/// Cloning is cheap; clones share state. Build one per process and hand it
/// to [`ProviderFactory`](crate::ProviderFactory).
#[derive(Debug, Clone)]
pub struct SwitchboardContext {
    inner: Arc<Inner>,
}

impl SwitchboardContext {
    /// Start building a context over `config`.
    pub fn builder(config: SwitchboardConfig) -> SwitchboardContextBuilder {
        SwitchboardContextBuilder {
            config,
            clock: None,
            transport: None,
        }
    }

    /// Loaded configuration.
    pub fn config(&self) -> &SwitchboardConfig {
        &self.inner.config
    }

    /// Time source for waits.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.inner.clock
    }

    /// Shared rate governor.
    pub fn governor(&self) -> &RateGovernor {
        &self.inner.governor
    }

    /// Shared usage store.
    pub fn usage(&self) -> &UsageStore {
        &self.inner.usage
    }

    /// Shared transport.
    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.inner.transport)
    }

    /// Deadline guard for generation calls.
    pub fn request_guard(&self) -> TimeoutGuard {
        self.inner.config.timeouts.request_guard()
    }

    /// Deadline guard for probes.
    pub fn probe_guard(&self) -> TimeoutGuard {
        self.inner.config.timeouts.probe_guard()
    }
}

/// Builder for [`SwitchboardContext`].
#[derive(Debug)]
pub struct SwitchboardContextBuilder {
    config: SwitchboardConfig,
    clock: Option<Arc<dyn Clock>>,
    transport: Option<Arc<dyn Transport>>,
}

impl SwitchboardContextBuilder {
    /// Use `clock` instead of the Tokio clock.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Use `transport` instead of a fresh HTTP client.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the context.
    ///
    /// # Errors
    ///
    /// Returns error if the default HTTP client cannot be built.
    #[instrument(skip(self))]
    pub fn build(self) -> SwitchboardResult<SwitchboardContext> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new()?),
        };
        let clock: Arc<dyn Clock> = self
            .clock
            .unwrap_or_else(|| Arc::new(TokioClock::new()));
        let governor = RateGovernor::from_config(Arc::clone(&clock), &self.config);
        let usage = UsageStore::from_config(&self.config);
        debug!(
            providers = self.config.providers.len(),
            "Built switchboard context"
        );

        Ok(SwitchboardContext {
            inner: Arc::new(Inner {
                config: self.config,
                clock,
                governor,
                usage,
                transport,
            }),
        })
    }
}
