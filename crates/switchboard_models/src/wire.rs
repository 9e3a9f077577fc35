//! Vendor wire formats and the guarded single call.

use crate::{SwitchboardContext, Transport, WireRequest};
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use std::sync::Arc;
use std::time::Duration;
use switchboard_core::{GenerateRequest, Vendor};
use switchboard_error::{
    ProviderError, ProviderErrorKind, SwitchboardResult, hint_from_secs, parse_retry_hint,
};
use switchboard_rate_limit::TimeoutGuard;
use tracing::{debug, instrument, warn};

/// Text and token count pulled out of a 2xx body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedReply {
    /// Generated text, possibly empty
    pub text: String,
    /// Vendor-reported total tokens
    pub total_tokens: Option<u64>,
}

/// Successful vendor call with non-empty text.
#[derive(Debug, Clone)]
pub struct VendorReply {
    /// Generated text, never blank
    pub text: String,
    /// Vendor-reported total tokens
    pub total_tokens: Option<u64>,
    /// Response headers, for limit detection
    pub headers: HeaderMap,
}

/// A failed vendor call, described by text for the classifier.
#[derive(Debug, Clone, Default)]
pub struct VendorFailure {
    /// Failure text, prefixed with the HTTP status when there was one
    pub message: String,
    /// HTTP status, when the vendor answered
    pub status: Option<u16>,
    /// Wait suggested by a `Retry-After` header or the failure text
    pub retry_after: Option<Duration>,
    /// Response headers, when the vendor answered
    pub headers: HeaderMap,
}

impl VendorFailure {
    /// Failure with no HTTP answer behind it.
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            retry_after: parse_retry_hint(&message),
            message,
            status: None,
            headers: HeaderMap::new(),
        }
    }

    /// Failure from an HTTP answer.
    pub fn from_reply(message: impl Into<String>, status: u16, headers: HeaderMap) -> Self {
        let message = message.into();
        let header_hint = headers
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<f64>().ok())
            .and_then(hint_from_secs);
        Self {
            retry_after: header_hint.or_else(|| parse_retry_hint(&message)),
            message,
            status: Some(status),
            headers,
        }
    }

    /// Whether the vendor answered with a 2xx that was still unusable.
    pub fn is_unusable_success(&self) -> bool {
        self.status.is_some_and(|s| (200..300).contains(&s))
    }
}

/// How one vendor encodes requests and reports results.
pub trait WireFormat: Send + Sync + std::fmt::Debug + 'static {
    /// Vendor this format speaks for.
    fn vendor(&self) -> Vendor;

    /// API root used when configuration names none.
    fn default_base_url(&self) -> &'static str;

    /// Encode a request for `model`.
    ///
    /// # Errors
    ///
    /// Returns a description if the body cannot be serialized.
    fn encode(
        &self,
        base_url: &str,
        credential: &str,
        model: &str,
        request: &GenerateRequest,
        max_output_tokens: Option<u32>,
    ) -> Result<WireRequest, String>;

    /// Pull text out of a 2xx body.
    ///
    /// # Errors
    ///
    /// Returns failure text when the body is malformed or the vendor
    /// refused to answer (content blocks arrive as 2xx at some vendors).
    fn decode(&self, body: &str) -> Result<ParsedReply, String>;

    /// Describe a non-2xx answer as classifier-friendly text.
    fn describe_failure(&self, status: StatusCode, body: &str) -> String;
}

/// A credentialed client for one vendor.
#[derive(Clone)]
pub struct VendorClient<W> {
    format: Arc<W>,
    transport: Arc<dyn Transport>,
    base_url: String,
    credential: String,
}

impl<W: WireFormat> VendorClient<W> {
    /// Client using the context's transport and configured base URL.
    ///
    /// # Errors
    ///
    /// Fails before any network access when the credential is blank.
    #[track_caller]
    pub fn new(
        ctx: &SwitchboardContext,
        format: W,
        credential: impl Into<String>,
    ) -> SwitchboardResult<Self> {
        let credential = credential.into();
        let vendor = format.vendor();
        if credential.trim().is_empty() {
            return Err(ProviderError::new(ProviderErrorKind::EmptyCredential(
                vendor.display_name().to_string(),
            ))
            .into());
        }
        let base_url = ctx
            .config()
            .provider(vendor)
            .base_url
            .unwrap_or_else(|| format.default_base_url().to_string());
        Ok(Self {
            format: Arc::new(format),
            transport: ctx.transport(),
            base_url: base_url.trim_end_matches('/').to_string(),
            credential,
        })
    }

    /// Vendor this client calls.
    pub fn vendor(&self) -> Vendor {
        self.format.vendor()
    }

    /// One guarded call. No governor wait and no retry.
    #[instrument(skip(self, guard, request), fields(vendor = %self.vendor(), model = %model))]
    pub async fn call(
        &self,
        guard: TimeoutGuard,
        model: &str,
        request: &GenerateRequest,
        max_output_tokens: Option<u32>,
    ) -> Result<VendorReply, VendorFailure> {
        let wire = self
            .format
            .encode(
                &self.base_url,
                &self.credential,
                model,
                request,
                max_output_tokens,
            )
            .map_err(|e| VendorFailure::new(format!("Failed to encode request: {e}")))?;

        let transport = Arc::clone(&self.transport);
        let reply = match guard.run(async move { transport.post_json(wire).await }).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(failure)) => return Err(failure),
            Err(guard_error) => return Err(VendorFailure::new(guard_error.kind().to_string())),
        };

        let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
        if !status.is_success() {
            let message = self.format.describe_failure(status, &reply.body);
            warn!(status = reply.status, %message, "Vendor returned error");
            return Err(VendorFailure::from_reply(message, reply.status, reply.headers));
        }

        let parsed = self
            .format
            .decode(&reply.body)
            .map_err(|message| {
                VendorFailure::from_reply(message, reply.status, reply.headers.clone())
            })?;
        if parsed.text.trim().is_empty() {
            return Err(VendorFailure::from_reply(
                format!("Empty response from {}", self.vendor().display_name()),
                reply.status,
                reply.headers,
            ));
        }

        debug!(
            chars = parsed.text.len(),
            tokens = ?parsed.total_tokens,
            "Vendor call succeeded"
        );
        Ok(VendorReply {
            text: parsed.text,
            total_tokens: parsed.total_tokens,
            headers: reply.headers,
        })
    }
}

impl<W: WireFormat> std::fmt::Debug for VendorClient<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VendorClient")
            .field("format", &self.format)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Trim a vendor body for inclusion in failure text.
pub(crate) fn excerpt(body: &str) -> String {
    const LIMIT: usize = 300;
    let trimmed = body.trim();
    if trimmed.chars().count() <= LIMIT {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(LIMIT).collect();
        format!("{cut}...")
    }
}
