// crates/dynform-core/src/interfaces/mod.rs
// ============================================================================
// Module: Dynform Interfaces
// Description: Collaborator contracts for rendering and remote transport.
// Purpose: Keep the form runtime independent of UI toolkits and HTTP stacks.
// Dependencies: async-trait, serde_json, thiserror, crate::core
// ============================================================================

//! ## Overview
//! The runtime drives two collaborators. A [`Renderer`] is told about every
//! visual node the dispatcher walks, in schema order. A [`RemoteTransport`]
//! performs the HTTP round trips needed by async validators and remote
//! option sources.
//!
//! Security posture: transport implementations fetch URLs taken from the
//! schema and must enforce their own scheme and host policy.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::core::ControlPath;
use crate::core::LayoutConfig;
use crate::core::LeafSpec;

// ============================================================================
// SECTION: Renderer
// ============================================================================

/// Visual collaborator notified while the dispatcher walks a schema.
///
/// Every call receives the path of the control the visual node belongs to.
/// Layout calls receive the path of the enclosing control because layouts
/// allocate nothing.
pub trait Renderer {
    /// A layout node forwarding `content` to `path`.
    fn render_layout(&mut self, path: &ControlPath, layout: &LayoutConfig, content: &Value);

    /// A group node allocated at `path` under `key`.
    fn render_group(&mut self, path: &ControlPath, key: &str, node: &Value, classes: &str);

    /// An array node allocated at `path` under `key`.
    fn render_array(&mut self, path: &ControlPath, key: &str, entries: &[Value], classes: &str);

    /// A leaf control allocated at `path` under `key`.
    fn render_control(&mut self, path: &ControlPath, key: &str, spec: &LeafSpec);
}

// ============================================================================
// SECTION: Remote Transport
// ============================================================================

/// Transport failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request could not be sent or the connection failed.
    #[error("request to `{url}` failed: {reason}")]
    Request {
        /// Target URL.
        url: String,
        /// Failure detail.
        reason: String,
    },
    /// The server answered with a non-success status.
    #[error("request to `{url}` returned status {status}")]
    Status {
        /// Target URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
    /// The response body was not valid JSON or exceeded limits.
    #[error("response from `{url}` could not be decoded: {reason}")]
    Decode {
        /// Target URL.
        url: String,
        /// Failure detail.
        reason: String,
    },
    /// The URL was rejected before any request was made.
    #[error("request to `{url}` blocked: {reason}")]
    Policy {
        /// Target URL.
        url: String,
        /// Policy that rejected the URL.
        reason: String,
    },
}

impl TransportError {
    /// Returns true when retrying the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::Policy { .. })
    }

    /// Returns a stable label for the failure kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Request {
                ..
            } => "request",
            Self::Status {
                ..
            } => "status",
            Self::Decode {
                ..
            } => "decode",
            Self::Policy {
                ..
            } => "policy",
        }
    }
}

/// JSON-over-HTTP transport used by async validators and option sources.
#[async_trait]
pub trait RemoteTransport: Send + Sync {
    /// Fetches a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the request fails or the body is not JSON.
    async fn get_json(&self, url: &str) -> Result<Value, TransportError>;

    /// Posts a JSON body and returns the JSON response.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when the request fails or the body is not JSON.
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, TransportError>;
}
