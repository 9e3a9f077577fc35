//! Request construction errors.

/// Request builder error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Request Error: {} at line {} in {}", message, line, file)]
pub struct RequestError {
    /// What was wrong with the request
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl RequestError {
    /// Create a new RequestError at the current location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Convert from derive_builder's generated error.
impl From<String> for RequestError {
    #[track_caller]
    fn from(msg: String) -> Self {
        Self::new(msg)
    }
}
