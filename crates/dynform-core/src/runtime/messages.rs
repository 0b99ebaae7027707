// crates/dynform-core/src/runtime/messages.rs
// ============================================================================
// Module: Error Message Registry
// Description: Ordered failure-key to message-producer registry.
// Purpose: Resolve one human-readable message for a leaf's error object.
// Dependencies: serde_json, dynform-logic
// ============================================================================

//! ## Overview
//! The registry maps failure keys to message producers and remembers the
//! order keys were first registered. Resolution walks that order and answers
//! with the first key present in the error object, so the message a user
//! sees does not depend on how the error object itself is ordered.
//! Re-registering a key replaces its producer but keeps its position.
//!
//! A fresh registry is seeded with the built-in checks:
//! `required`, `requiredTrue`, `email`, `min`, `max`, `minLength`,
//! `maxLength`, `pattern`, `IBAN`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use dynform_logic::js_string;
use serde_json::Value;

use crate::core::ValidationErrors;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Produces a message from the failure detail.
pub type MessageProducer = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Ordered registry of message producers.
#[derive(Clone)]
pub struct MessageRegistry {
    /// Producers in first-registration order.
    entries: Vec<(String, MessageProducer)>,
}

impl fmt::Debug for MessageRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageRegistry").field("keys", &self.keys().collect::<Vec<_>>()).finish()
    }
}

impl Default for MessageRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl MessageRegistry {
    /// Creates a registry with no producers.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Creates a registry seeded with messages for the built-in checks.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register_message("required", "The field can not be empty");
        registry.register_message("requiredTrue", "The field can not be empty");
        registry.register_message("email", "Invalid email format");
        registry.register("min", |detail| format!("Value should be greater than {}", field(detail, "min")));
        registry.register("max", |detail| format!("Value should be smaller than {}", field(detail, "max")));
        registry.register("minLength", |detail| {
            format!("Value length should be greater than {}", field(detail, "requiredLength"))
        });
        registry.register("maxLength", |detail| {
            format!("Value length should be smaller than {}", field(detail, "requiredLength"))
        });
        registry.register("pattern", |detail| {
            format!("Value does not match pattern {}", field(detail, "requiredPattern"))
        });
        registry.register_message("IBAN", "Invalid IBAN");
        registry
    }

    /// Registers a producer under `key`.
    ///
    /// A new key goes last; an existing key keeps its position.
    pub fn register<F>(&mut self, key: impl Into<String>, producer: F)
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        let key = key.into();
        let producer: MessageProducer = Arc::new(producer);
        if let Some(entry) = self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            entry.1 = producer;
        } else {
            self.entries.push((key, producer));
        }
    }

    /// Registers a fixed message under `key`.
    pub fn register_message(&mut self, key: impl Into<String>, message: impl Into<String>) {
        let message = message.into();
        self.register(key, move |_| message.clone());
    }

    /// Returns true when `key` has a producer.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == key)
    }

    /// Iterates registered keys in resolution order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Resolves the message of the first registered key present in `errors`.
    ///
    /// Returns an empty string when `errors` is absent or no key matches.
    #[must_use]
    pub fn resolve(&self, errors: Option<&ValidationErrors>) -> String {
        let Some(errors) = errors else {
            return String::new();
        };
        self.entries
            .iter()
            .find_map(|(key, producer)| errors.get(key).map(|detail| producer(detail)))
            .unwrap_or_default()
    }
}

/// Stringifies a field of a failure detail.
fn field(detail: &Value, name: &str) -> String {
    js_string(detail.get(name).unwrap_or(&Value::Null))
}
