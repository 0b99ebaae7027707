// crates/dynform-core/src/runtime/async_validation.rs
// ============================================================================
// Module: Async Validation Orchestrator
// Description: Runs remote validators for a leaf value captured in a ticket.
// Purpose: Turn remote round trips into error objects without blocking input.
// Dependencies: dynform-logic, crate::interfaces, crate::runtime::retry
// ============================================================================

//! ## Overview
//! A value change that passes sync validation on a leaf with async rules
//! yields an [`AsyncTicket`]: the leaf path, the leaf generation at the time
//! of the change, the value, the async validators, and the form snapshot.
//! The orchestrator runs the ticket without touching the form; the caller
//! hands the outcome back to the form, which applies it only if the leaf
//! generation still matches.
//!
//! Transport failures are retried under the [`RetryPolicy`]. When retries
//! are exhausted the rule fails with `reason: "transport"` in its detail.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use dynform_logic::VALUE_PLACEHOLDER;
use dynform_logic::evaluate_with_value;
use dynform_logic::js_string;
use serde_json::Value;
use serde_json::json;

use crate::core::AsyncValidator;
use crate::core::ControlPath;
use crate::core::ControlStatus;
use crate::core::ValidationErrors;
use crate::core::single_error;
use crate::interfaces::RemoteTransport;
use crate::runtime::events::FormEventSink;
use crate::runtime::retry::RetryPolicy;
use crate::runtime::retry::with_backoff;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Response field read from external validators.
const VALIDATION_RESULT_FIELD: &str = "validationResult";

// ============================================================================
// SECTION: Tickets
// ============================================================================

/// Pending async validation of one leaf value.
#[derive(Debug, Clone, PartialEq)]
pub struct AsyncTicket {
    /// Leaf path.
    pub path: ControlPath,
    /// Leaf generation the ticket was issued for.
    pub generation: u64,
    /// Value under validation.
    pub value: Value,
    /// Validators to run.
    pub validators: Vec<AsyncValidator>,
    /// Form status snapshot at issue time, posted to external validators.
    pub snapshot: Value,
}

/// Result of handing an async outcome back to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The outcome was applied; carries the new leaf status.
    Applied(ControlStatus),
    /// The leaf changed since the ticket was issued; the outcome was dropped.
    Stale,
}

// ============================================================================
// SECTION: Orchestrator
// ============================================================================

/// Runs async validators through a remote transport.
#[derive(Clone)]
pub struct AsyncValidationOrchestrator {
    /// Remote transport.
    transport: Arc<dyn RemoteTransport>,
    /// Retry envelope for every call.
    policy: RetryPolicy,
    /// Event sink for retry reporting.
    events: Arc<dyn FormEventSink>,
}

impl AsyncValidationOrchestrator {
    /// Creates an orchestrator.
    #[must_use]
    pub fn new(
        transport: Arc<dyn RemoteTransport>,
        policy: RetryPolicy,
        events: Arc<dyn FormEventSink>,
    ) -> Self {
        Self {
            transport,
            policy,
            events,
        }
    }

    /// Returns the retry policy.
    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Runs every validator of the ticket and merges their errors.
    pub async fn run(&self, ticket: &AsyncTicket) -> Option<ValidationErrors> {
        let mut merged = ValidationErrors::new();
        for validator in &ticket.validators {
            if let Some(errors) = self.run_one(validator, ticket).await {
                merged.extend(errors);
            }
        }
        if merged.is_empty() { None } else { Some(merged) }
    }

    /// Runs one validator.
    async fn run_one(&self, validator: &AsyncValidator, ticket: &AsyncTicket) -> Option<ValidationErrors> {
        let value = &ticket.value;
        let passed = match validator {
            AsyncValidator::Custom {
                url,
                expression,
                ..
            } => {
                let url = substitute_url(url, value);
                let transport = Arc::clone(&self.transport);
                with_backoff(&self.policy, self.events.as_ref(), &url, || {
                    let transport = Arc::clone(&transport);
                    let url = url.clone();
                    async move { transport.get_json(&url).await }
                })
                .await
                .map(|body| evaluate_with_value(expression, value, &body))
            }
            AsyncValidator::External {
                url, ..
            } => {
                let transport = Arc::clone(&self.transport);
                with_backoff(&self.policy, self.events.as_ref(), url, || {
                    let transport = Arc::clone(&transport);
                    let url = url.clone();
                    let body = ticket.snapshot.clone();
                    async move { transport.post_json(&url, &body).await }
                })
                .await
                .map(|body| body.get(VALIDATION_RESULT_FIELD) == Some(&Value::Bool(true)))
            }
        };
        let name = validator.name();
        match passed {
            Ok(true) => None,
            Ok(false) => Some(single_error(name, json!({"value": value}))),
            Err(_) => Some(single_error(name, json!({"value": value, "reason": "transport"}))),
        }
    }
}

/// Replaces the first `"value"` token of a URL template with the value.
#[must_use]
pub fn substitute_url(template: &str, value: &Value) -> String {
    template.replacen(VALUE_PLACEHOLDER, &js_string(value), 1)
}
