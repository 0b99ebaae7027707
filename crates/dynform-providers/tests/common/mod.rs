// crates/dynform-providers/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Local HTTP servers and transports for provider tests.
// Purpose: Exercise the real reqwest client against scripted endpoints.
// Dependencies: dynform-providers, tiny_http
// ============================================================================

//! ## Overview
//! [`spawn_server`] answers a fixed list of responses on a loopback port and
//! returns every request it saw once the list is used up.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::thread;
use std::thread::JoinHandle;

use dynform_providers::HttpTransport;
use dynform_providers::HttpTransportConfig;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// One request received by a test server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenRequest {
    /// HTTP method.
    pub method: String,
    /// Request target including the query.
    pub url: String,
    /// Raw request body.
    pub body: String,
}

/// One scripted reply.
#[derive(Debug, Clone)]
pub struct Reply {
    /// Status code.
    pub status: u16,
    /// Response body.
    pub body: String,
    /// Optional `Location` header.
    pub location: Option<String>,
}

impl Reply {
    /// JSON reply with the given status.
    #[must_use]
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            location: None,
        }
    }

    /// Redirect reply.
    #[must_use]
    pub fn redirect(location: &str) -> Self {
        Self {
            status: 302,
            body: String::new(),
            location: Some(location.to_string()),
        }
    }
}

/// Spawns a loopback server answering `replies` in order.
#[must_use]
pub fn spawn_server(replies: Vec<Reply>) -> (String, JoinHandle<Vec<SeenRequest>>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let base = format!("http://{addr}");
    let handle = thread::spawn(move || {
        let mut seen = Vec::new();
        for reply in replies {
            let Ok(mut request) = server.recv() else {
                break;
            };
            let mut body = String::new();
            let _ = request.as_reader().read_to_string(&mut body);
            seen.push(SeenRequest {
                method: request.method().to_string(),
                url: request.url().to_string(),
                body,
            });
            let mut response = Response::from_string(reply.body)
                .with_status_code(reply.status)
                .with_header(Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap());
            if let Some(location) = reply.location {
                response = response.with_header(Header::from_bytes(&b"Location"[..], location.as_bytes()).unwrap());
            }
            let _ = request.respond(response);
        }
        seen
    });
    (base, handle)
}

/// Transport allowed to reach the loopback server.
#[must_use]
pub fn local_transport() -> HttpTransport {
    local_transport_with_limit(64 * 1024)
}

/// Loopback transport with a custom response size limit.
#[must_use]
pub fn local_transport_with_limit(max_response_bytes: usize) -> HttpTransport {
    HttpTransport::new(HttpTransportConfig {
        allow_http: true,
        allowed_hosts: Some(BTreeSet::from(["127.0.0.1".to_string()])),
        timeout_ms: 5_000,
        max_response_bytes,
        ..HttpTransportConfig::default()
    })
    .unwrap()
}
