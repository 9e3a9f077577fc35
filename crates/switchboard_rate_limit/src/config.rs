//! Layered configuration for governance, timeouts and provider defaults.
//!
//! Sources, later ones overriding earlier:
//! 1. Bundled defaults (`include_str!` of the workspace `switchboard.toml`)
//! 2. `~/.config/switchboard/switchboard.toml`
//! 3. `./switchboard.toml`

use crate::TimeoutGuard;
use config::{Config, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;
use switchboard_core::Vendor;
use switchboard_error::{ConfigError, ConfigErrorKind, SwitchboardResult};
use tracing::{debug, instrument, warn};

const DEFAULT_CONFIG: &str = include_str!("../../../switchboard.toml");

/// Vendor call deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct TimeoutSettings {
    /// Deadline for generation calls, in seconds
    #[serde(default = "default_request_secs")]
    pub request_secs: u64,
    /// Deadline for usage probes, in seconds
    #[serde(default = "default_probe_secs")]
    pub probe_secs: u64,
}

fn default_request_secs() -> u64 {
    TimeoutGuard::DEFAULT_DEADLINE.as_secs()
}

fn default_probe_secs() -> u64 {
    5
}

impl TimeoutSettings {
    /// Guard for generation calls.
    pub fn request_guard(&self) -> TimeoutGuard {
        TimeoutGuard::new(Duration::from_secs(self.request_secs))
    }

    /// Guard for usage probes.
    pub fn probe_guard(&self) -> TimeoutGuard {
        TimeoutGuard::new(Duration::from_secs(self.probe_secs))
    }
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            request_secs: default_request_secs(),
            probe_secs: default_probe_secs(),
        }
    }
}

/// Rate governor growth parameters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct GovernorSettings {
    /// Interval multiplier per rate-limit hit
    #[serde(default = "default_growth_factor")]
    pub growth_factor: f64,
    /// Interval ceiling in milliseconds
    #[serde(default = "default_ceiling_ms")]
    pub ceiling_ms: u64,
}

fn default_growth_factor() -> f64 {
    1.5
}

fn default_ceiling_ms() -> u64 {
    5000
}

impl Default for GovernorSettings {
    fn default() -> Self {
        Self {
            growth_factor: default_growth_factor(),
            ceiling_ms: default_ceiling_ms(),
        }
    }
}

/// Published free-tier limits used when nothing better is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub struct DefaultLimits {
    /// Requests per minute
    #[serde(default)]
    pub requests_per_minute: u64,
    /// Tokens per minute
    #[serde(default)]
    pub tokens_per_minute: u64,
    /// Requests per day
    #[serde(default)]
    pub requests_per_day: u64,
}

/// Per-provider policy and defaults.
///
/// ```toml
/// [providers.groq]
/// default_model = "llama-3.3-70b-versatile"
/// min_interval_ms = 1000
/// max_retries = 3
/// backoff_step_secs = 5
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProviderSettings {
    /// Model used when a selection names none
    #[serde(default)]
    pub default_model: Option<String>,
    /// API root; tests point this at a mock server
    #[serde(default)]
    pub base_url: Option<String>,
    /// Starting minimum spacing between calls
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
    /// Retries after a rate-limited first attempt
    #[serde(default)]
    pub max_retries: u32,
    /// Linear backoff step when no retry hint is given
    #[serde(default = "default_backoff_step_secs")]
    pub backoff_step_secs: u64,
    /// Longest model cascade
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
    /// Cascade candidates tried after the requested model
    #[serde(default)]
    pub fallback_models: Vec<String>,
    /// Static usage defaults
    #[serde(default)]
    pub limits: DefaultLimits,
}

fn default_min_interval_ms() -> u64 {
    1000
}

fn default_backoff_step_secs() -> u64 {
    5
}

fn default_max_candidates() -> usize {
    1
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            default_model: None,
            base_url: None,
            min_interval_ms: default_min_interval_ms(),
            max_retries: 0,
            backoff_step_secs: default_backoff_step_secs(),
            max_candidates: default_max_candidates(),
            fallback_models: Vec::new(),
            limits: DefaultLimits::default(),
        }
    }
}

impl ProviderSettings {
    /// Backoff step as a duration.
    pub fn backoff_step(&self) -> Duration {
        Duration::from_secs(self.backoff_step_secs)
    }
}

/// Top-level Switchboard configuration.
///
/// # Example
///
/// ```no_run
/// use switchboard_core::Vendor;
/// use switchboard_rate_limit::SwitchboardConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SwitchboardConfig::load()?;
/// println!("Groq retries: {}", config.provider(Vendor::Groq).max_retries);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct SwitchboardConfig {
    /// Call deadlines
    #[serde(default)]
    pub timeouts: TimeoutSettings,
    /// Governor growth
    #[serde(default)]
    pub governor: GovernorSettings,
    /// Provider name to settings
    #[serde(default)]
    pub providers: HashMap<String, ProviderSettings>,
}

impl SwitchboardConfig {
    /// Bundled defaults only, ignoring user files.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled file fails to parse or validate.
    #[instrument]
    pub fn bundled() -> SwitchboardResult<Self> {
        debug!("Loading bundled configuration");
        Self::build(Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml)))
    }

    /// Load configuration from a specific file layered over the bundled defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> SwitchboardResult<Self> {
        debug!("Loading configuration from file");
        Self::build(
            Config::builder()
                .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
                .add_source(File::from(path.as_ref())),
        )
    }

    /// Load with precedence: current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if any present source fails to parse or validate.
    #[instrument]
    pub fn load() -> SwitchboardResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/switchboard/switchboard.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("switchboard").required(false));

        Self::build(builder)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> SwitchboardResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(ConfigErrorKind::Load(e.to_string())))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(ConfigErrorKind::Load(e.to_string())))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would break governor or timeout invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigErrorKind::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let growth = self.governor.growth_factor;
        if growth.is_nan() || growth < 1.0 {
            return Err(invalid(
                "governor.growth_factor",
                format!("must be at least 1.0, got {growth}"),
            ));
        }
        if self.governor.ceiling_ms == 0 {
            return Err(invalid("governor.ceiling_ms", "must be positive"));
        }
        if self.timeouts.request_secs == 0 {
            return Err(invalid("timeouts.request_secs", "must be positive"));
        }
        if self.timeouts.probe_secs == 0 {
            return Err(invalid("timeouts.probe_secs", "must be positive"));
        }
        for (name, settings) in &self.providers {
            if Vendor::from_str(name).is_err() {
                warn!(provider = %name, "Ignoring settings for unknown provider");
            }
            if settings.max_candidates == 0 {
                return Err(invalid(
                    format!("providers.{name}.max_candidates"),
                    "must be at least 1",
                ));
            }
        }
        Ok(())
    }

    /// Settings for `vendor`, falling back to built-in defaults.
    pub fn provider(&self, vendor: Vendor) -> ProviderSettings {
        self.providers
            .iter()
            .find(|(name, _)| Vendor::from_str(name).ok() == Some(vendor))
            .map(|(_, settings)| settings.clone())
            .unwrap_or_default()
    }

    /// Vendors with a settings table.
    pub fn configured_vendors(&self) -> impl Iterator<Item = Vendor> + '_ {
        self.providers
            .keys()
            .filter_map(|name| Vendor::from_str(name).ok())
    }

    /// Model to use for `vendor` when none is requested.
    pub fn default_model(&self, vendor: Vendor) -> String {
        self.provider(vendor)
            .default_model
            .unwrap_or_else(|| vendor.default_model().to_string())
    }
}

#[track_caller]
fn invalid(field: impl Into<String>, reason: impl Into<String>) -> ConfigError {
    ConfigError::new(ConfigErrorKind::Invalid {
        field: field.into(),
        reason: reason.into(),
    })
}
