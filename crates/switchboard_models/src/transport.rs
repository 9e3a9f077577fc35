//! HTTP seam between adapters and the network.

use crate::VendorFailure;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::HeaderMap;
use switchboard_error::{ProviderError, ProviderErrorKind};
use tracing::{debug, error, instrument};

/// A JSON POST ready to send.
#[derive(Clone)]
pub struct WireRequest {
    /// Absolute endpoint URL
    pub url: String,
    /// Extra headers, including credentials
    pub headers: Vec<(&'static str, String)>,
    /// JSON body
    pub body: serde_json::Value,
}

impl std::fmt::Debug for WireRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let header_names: Vec<_> = self.headers.iter().map(|(name, _)| *name).collect();
        f.debug_struct("WireRequest")
            .field("url", &self.url)
            .field("headers", &header_names)
            .finish_non_exhaustive()
    }
}

/// Raw vendor answer, any status.
#[derive(Debug, Clone)]
pub struct WireReply {
    /// HTTP status code
    pub status: u16,
    /// Response headers (names lowercased)
    pub headers: HeaderMap,
    /// Response body text
    pub body: String,
}

/// Sends wire requests. Implemented over `reqwest` in production and by
/// scripted doubles in tests.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// POST `request`, returning whatever the vendor answered.
    ///
    /// Only failures that produced no HTTP answer are errors.
    async fn post_json(&self, request: WireRequest) -> Result<WireReply, VendorFailure>;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a transport with a fresh connection pool.
    ///
    /// # Errors
    ///
    /// Returns error if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(concat!("switchboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::new(ProviderErrorKind::ClientBuild(e.to_string())))?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(url = %request.url))]
    async fn post_json(&self, request: WireRequest) -> Result<WireReply, VendorFailure> {
        debug!("Sending vendor request");

        let mut builder = self.client.post(&request.url).json(&request.body);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        let response = builder.send().await.map_err(|e| {
            error!(error = ?e, "Failed to send vendor request");
            VendorFailure::new(describe_send_error(&e))
        })?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await.map_err(|e| {
            error!(error = ?e, "Failed to read vendor response body");
            VendorFailure::new(format!("Network error reading response: {e}"))
        })?;

        debug!(status, bytes = body.len(), "Received vendor response");
        Ok(WireReply {
            status,
            headers,
            body,
        })
    }
}

/// Phrase transport errors so the classifier can tell them apart.
fn describe_send_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("Request timed out: {e}")
    } else if e.is_connect() {
        format!("Network connection failed: {e}")
    } else {
        format!("Network error: {e}")
    }
}
