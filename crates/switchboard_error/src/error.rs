//! Top-level error wrapper types.

use crate::{ConfigError, ProviderError, RequestError};

/// Every failure the Switchboard crates raise across a `Result` boundary.
///
/// Vendor call failures are deliberately absent: adapters fold those into a
/// failed response instead of returning an error.
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum SwitchboardErrorKind {
    /// Provider construction error
    #[from(ProviderError)]
    Provider(ProviderError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Request construction error
    #[from(RequestError)]
    Request(RequestError),
}

/// Switchboard error with kind discrimination.
///
/// # Examples
///
/// ```
/// use switchboard_error::{ProviderError, ProviderErrorKind, SwitchboardResult};
///
/// fn build() -> SwitchboardResult<()> {
///     Err(ProviderError::new(ProviderErrorKind::UnknownVendor("cohere".into())))?
/// }
///
/// let err = build().unwrap_err();
/// assert!(err.to_string().contains("cohere"));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Switchboard Error: {}", _0)]
pub struct SwitchboardError(Box<SwitchboardErrorKind>);

impl SwitchboardError {
    /// Create a new error from a kind.
    pub fn new(kind: SwitchboardErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &SwitchboardErrorKind {
        &self.0
    }
}

impl<T> From<T> for SwitchboardError
where
    T: Into<SwitchboardErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Switchboard operations.
pub type SwitchboardResult<T> = std::result::Result<T, SwitchboardError>;
