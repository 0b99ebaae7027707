// crates/dynform-core/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Shared helpers, schema fixtures, and a scripted transport.
// ============================================================================
//! ## Overview
//! Shared test helpers for consistent Result-based assertions, plus a
//! [`ScriptedTransport`] that replays queued responses and records requests.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    dead_code,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::collections::VecDeque;
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use dynform_core::Form;
use dynform_core::MemoryEventSink;
use dynform_core::NoopRenderer;
use dynform_core::RemoteTransport;
use dynform_core::RetryPolicy;
use dynform_core::TransportError;
use serde_json::Value;
use serde_json::json;

// ========================================================================
// Test Result Helpers
// ========================================================================

/// Standard result type used across core integration tests.
pub type TestResult<T = ()> = Result<T, Box<dyn Error>>;

/// Lightweight error type for test assertions.
#[derive(Debug)]
struct TestError {
    /// Human-readable failure message.
    message: String,
}

impl fmt::Display for TestError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl Error for TestError {}

/// Returns an error when a test condition fails.
///
/// # Errors
/// Returns a `TestError` when the condition is false.
pub fn ensure(condition: bool, message: impl Into<String>) -> TestResult {
    if condition {
        Ok(())
    } else {
        Err(Box::new(TestError {
            message: message.into(),
        }))
    }
}

// ========================================================================
// Form Fixtures
// ========================================================================

/// Builds a form with no renderer and an in-memory event sink.
///
/// # Errors
/// Returns the build error when the schema is malformed.
pub fn build(schema: &Value) -> TestResult<(Form, Arc<MemoryEventSink>)> {
    let events = Arc::new(MemoryEventSink::new());
    let form = Form::build(schema, &mut NoopRenderer, events.clone())?;
    Ok((form, events))
}

/// Input leaf fixture carrying the given sync and async rules.
pub fn input(sync: Value, async_rules: Value) -> Value {
    json!({
        "type": "Input",
        "name": "field",
        "label": "Field",
        "validations": {"sync": sync, "async": async_rules}
    })
}

/// Retry policy with millisecond delays for fast tests.
pub const fn fast_retry(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        initial_interval: Duration::from_millis(1),
        max_retries,
        max_interval: Some(Duration::from_millis(4)),
    }
}

// ========================================================================
// Scripted Transport
// ========================================================================

/// Request seen by the scripted transport.
#[derive(Debug, Clone, PartialEq)]
pub enum SeenRequest {
    /// GET request.
    Get(String),
    /// POST request with its body.
    Post(String, Value),
}

/// Transport replaying queued responses in order.
#[derive(Default)]
pub struct ScriptedTransport {
    /// Queued responses; an empty queue answers with a request error.
    responses: Mutex<VecDeque<Result<Value, TransportError>>>,
    /// Requests in arrival order.
    seen: Mutex<Vec<SeenRequest>>,
}

impl ScriptedTransport {
    /// Creates a transport answering with the given responses.
    pub fn new(responses: Vec<Result<Value, TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            seen: Mutex::new(Vec::new()),
        })
    }

    /// Returns the requests seen so far.
    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    /// Pops the next scripted response.
    fn next(&self, url: &str) -> Result<Value, TransportError> {
        self.responses.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(TransportError::Request {
                url: url.to_string(),
                reason: "no scripted response".to_string(),
            })
        })
    }
}

#[async_trait]
impl RemoteTransport for ScriptedTransport {
    async fn get_json(&self, url: &str) -> Result<Value, TransportError> {
        self.seen.lock().unwrap().push(SeenRequest::Get(url.to_string()));
        self.next(url)
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, TransportError> {
        self.seen.lock().unwrap().push(SeenRequest::Post(url.to_string(), body.clone()));
        self.next(url)
    }
}

/// Builds a retryable status failure.
pub fn server_error(url: &str) -> TransportError {
    TransportError::Status {
        url: url.to_string(),
        status: 503,
    }
}
