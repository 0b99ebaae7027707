// crates/dynform-providers/src/http.rs
// ============================================================================
// Module: HTTP Transport
// Description: Remote transport backed by an async reqwest client.
// Purpose: Fetch and post JSON for async validators and option sources.
// Dependencies: dynform-core, reqwest, serde, serde_json
// ============================================================================

//! ## Overview
//! [`HttpTransport`] implements [`RemoteTransport`] over HTTP. Every URL is
//! checked before a request goes out: the scheme must be `https` (or `http`
//! when allowed) and, when an allowlist is configured, the host must be on
//! it. Redirects are never followed and response bodies are read in chunks
//! up to a byte limit before JSON decoding.
//!
//! Schema URLs come from form definitions and are treated as untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use dynform_core::RemoteTransport;
use dynform_core::TransportError;
use reqwest::Client;
use reqwest::Response;
use reqwest::Url;
use reqwest::header::ACCEPT;
use reqwest::redirect::Policy;
use serde::Deserialize;
use serde_json::Value;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for the HTTP transport.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpTransportConfig {
    /// Allow cleartext HTTP (disabled by default).
    pub allow_http: bool,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum response size allowed, in bytes.
    pub max_response_bytes: usize,
    /// Optional host allowlist.
    pub allowed_hosts: Option<BTreeSet<String>>,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            allow_http: false,
            timeout_ms: 5_000,
            max_response_bytes: 1024 * 1024,
            allowed_hosts: None,
            user_agent: "dynform/0.1".to_string(),
        }
    }
}

// ============================================================================
// SECTION: Transport
// ============================================================================

/// Remote transport over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// Limits and URL policy.
    config: HttpTransportConfig,
    /// Shared async client.
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Request`] when the HTTP client cannot be built.
    pub fn new(config: HttpTransportConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|err| TransportError::Request {
                url: String::new(),
                reason: format!("http client build failed: {err}"),
            })?;
        Ok(Self {
            config,
            client,
        })
    }

    /// Returns the transport configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpTransportConfig {
        &self.config
    }

    /// Checks scheme and host policy for a URL.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Policy`] when the URL is rejected.
    pub fn check_url(&self, url: &str) -> Result<Url, TransportError> {
        let blocked = |reason: &str| TransportError::Policy {
            url: url.to_string(),
            reason: reason.to_string(),
        };
        let parsed = Url::parse(url).map_err(|_| blocked("invalid url"))?;
        match parsed.scheme() {
            "https" => {}
            "http" if self.config.allow_http => {}
            _ => return Err(blocked("unsupported url scheme")),
        }
        if let Some(allowlist) = &self.config.allowed_hosts {
            let host = parsed.host_str().ok_or_else(|| blocked("url host required"))?;
            if !allowlist.contains(host) {
                return Err(blocked("url host not allowed"));
            }
        }
        Ok(parsed)
    }

    /// Checks the status, reads the bounded body, and decodes it.
    async fn decode(&self, url: &str, response: Response) -> Result<Value, TransportError> {
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = read_limited(url, response, self.config.max_response_bytes).await?;
        serde_json::from_slice(&body).map_err(|err| TransportError::Decode {
            url: url.to_string(),
            reason: err.to_string(),
        })
    }
}

#[async_trait]
impl RemoteTransport for HttpTransport {
    async fn get_json(&self, url: &str) -> Result<Value, TransportError> {
        let target = self.check_url(url)?;
        let response = self
            .client
            .get(target)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| request_failed(url, &err))?;
        self.decode(url, response).await
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, TransportError> {
        let target = self.check_url(url)?;
        let response = self
            .client
            .post(target)
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| request_failed(url, &err))?;
        self.decode(url, response).await
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Maps a reqwest failure to a request error.
fn request_failed(url: &str, err: &reqwest::Error) -> TransportError {
    TransportError::Request {
        url: url.to_string(),
        reason: err.to_string(),
    }
}

/// Reads a response body while enforcing a byte limit.
async fn read_limited(
    url: &str,
    mut response: Response,
    max_bytes: usize,
) -> Result<Vec<u8>, TransportError> {
    let too_large = || TransportError::Decode {
        url: url.to_string(),
        reason: "response exceeds size limit".to_string(),
    };
    if let Some(expected) = response.content_length()
        && !usize::try_from(expected).is_ok_and(|expected| expected <= max_bytes)
    {
        return Err(too_large());
    }
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await.map_err(|err| request_failed(url, &err))? {
        let total = body.len().checked_add(chunk.len()).ok_or_else(too_large)?;
        if total > max_bytes {
            return Err(too_large());
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}
