// crates/dynform-core/src/runtime/form.rs
// ============================================================================
// Module: Form Runtime
// Description: Built form holding the control store and message registry.
// Purpose: Drive value changes, validation, and async settlement per leaf.
// Dependencies: serde_json, crate::core, crate::interfaces, crate::runtime
// ============================================================================

//! ## Overview
//! [`Form::build`] interprets a schema once, growing the control store and
//! registering rule messages. Afterwards only leaf state changes.
//!
//! Every value change bumps the leaf generation and reruns the sync
//! validators. When they pass and the leaf has async validators, the leaf
//! turns pending and an [`AsyncTicket`] is returned. The ticket can be run
//! anywhere; its outcome goes back through [`Form::settle`], which drops it
//! if the leaf changed in the meantime.
//!
//! Invariants:
//! - The tree shape never changes after `build` returns.
//! - An outcome is applied only for the generation it was computed for.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde_json::Value;

use crate::core::ControlPath;
use crate::core::ControlStatus;
use crate::core::FormError;
use crate::core::LeafControl;
use crate::core::OptionSource;
use crate::core::SchemaError;
use crate::core::SelectOption;
use crate::core::StatusSnapshot;
use crate::core::ValidationErrors;
use crate::interfaces::Renderer;
use crate::runtime::async_validation::AsyncTicket;
use crate::runtime::async_validation::AsyncValidationOrchestrator;
use crate::runtime::async_validation::Settlement;
use crate::runtime::dispatcher::SchemaDispatcher;
use crate::runtime::events::FormEvent;
use crate::runtime::events::FormEventSink;
use crate::runtime::messages::MessageRegistry;
use crate::runtime::store::ControlStore;

// ============================================================================
// SECTION: Form
// ============================================================================

/// Interpreted form.
pub struct Form {
    /// Control tree.
    store: ControlStore,
    /// Failure messages.
    messages: MessageRegistry,
    /// Select leaves whose options come from a URL.
    option_sources: Vec<(ControlPath, OptionSource)>,
    /// Event sink.
    events: Arc<dyn FormEventSink>,
}

impl Form {
    /// Interprets a schema into a form.
    ///
    /// # Errors
    ///
    /// Returns [`FormError`] when the schema is malformed.
    pub fn build(
        schema: &Value,
        renderer: &mut dyn Renderer,
        events: Arc<dyn FormEventSink>,
    ) -> Result<Self, FormError> {
        Self::build_with_messages(schema, renderer, events, MessageRegistry::with_builtins())
    }

    /// Interprets a schema with a caller-provided message registry.
    ///
    /// # Errors
    ///
    /// Returns [`FormError`] when the schema is malformed.
    pub fn build_with_messages(
        schema: &Value,
        renderer: &mut dyn Renderer,
        events: Arc<dyn FormEventSink>,
        mut messages: MessageRegistry,
    ) -> Result<Self, FormError> {
        let root = schema.as_object().ok_or(SchemaError::RootNotObject)?;
        let mut store = ControlStore::new();
        let mut dispatcher = SchemaDispatcher::new(&mut store, &mut messages, renderer, events.as_ref());
        dispatcher.dispatch_mapping(&ControlPath::root(), root, "")?;
        let option_sources = dispatcher.into_option_sources();
        Ok(Self {
            store,
            messages,
            option_sources,
            events,
        })
    }

    /// Returns the control store.
    #[must_use]
    pub const fn store(&self) -> &ControlStore {
        &self.store
    }

    /// Returns the message registry.
    #[must_use]
    pub const fn messages(&self) -> &MessageRegistry {
        &self.messages
    }

    /// Registers or replaces a fixed failure message.
    pub fn register_message(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.messages.register_message(key, message);
    }

    /// Returns the select leaves whose options must be fetched.
    #[must_use]
    pub fn option_sources(&self) -> &[(ControlPath, OptionSource)] {
        &self.option_sources
    }

    /// Returns the leaf at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NotAControl`] when `path` is not a leaf.
    pub fn leaf(&self, path: &ControlPath) -> Result<&LeafControl, FormError> {
        self.store.leaf(path).ok_or_else(|| not_a_control(path))
    }

    /// Returns the assembled value of the whole form.
    #[must_use]
    pub fn value(&self) -> Value {
        self.store.root().value()
    }

    /// Returns the aggregated status of the whole form.
    #[must_use]
    pub fn status(&self) -> ControlStatus {
        self.store.root().status()
    }

    /// Captures the status snapshot of the whole form.
    #[must_use]
    pub fn snapshot(&self) -> StatusSnapshot {
        self.store.snapshot()
    }

    // ------------------------------------------------------------------------
    // Value changes
    // ------------------------------------------------------------------------

    /// Applies a user value change and revalidates the leaf.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NotAControl`] when `path` is not a leaf.
    pub fn set_value(&mut self, path: &ControlPath, value: Value) -> Result<Option<AsyncTicket>, FormError> {
        let leaf = self.leaf_mut(path)?;
        leaf.value = value;
        leaf.dirty = true;
        leaf.generation += 1;
        let generation = leaf.generation;
        self.events.emit(FormEvent::ValueChanged {
            path: path.clone(),
            generation,
        });
        Ok(self.run_validation(path))
    }

    /// Replaces the value without a change notification or dirtying the leaf.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NotAControl`] when `path` is not a leaf.
    pub fn set_default_value(
        &mut self,
        path: &ControlPath,
        value: Value,
    ) -> Result<Option<AsyncTicket>, FormError> {
        let leaf = self.leaf_mut(path)?;
        leaf.value = value;
        leaf.generation += 1;
        Ok(self.run_validation(path))
    }

    /// Marks a leaf as interacted with.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NotAControl`] when `path` is not a leaf.
    pub fn mark_touched(&mut self, path: &ControlPath) -> Result<(), FormError> {
        self.leaf_mut(path)?.touched = true;
        Ok(())
    }

    /// Assigns the first fetched option as the default value.
    ///
    /// Nothing changes when `options` is empty.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NotAControl`] when `path` is not a leaf.
    pub fn apply_options(
        &mut self,
        path: &ControlPath,
        options: &[SelectOption],
    ) -> Result<Option<AsyncTicket>, FormError> {
        match options.first() {
            Some(first) => self.set_default_value(path, first.value.clone()),
            None => self.leaf(path).map(|_| None),
        }
    }

    // ------------------------------------------------------------------------
    // Validation
    // ------------------------------------------------------------------------

    /// Reruns validation of a leaf, superseding any in-flight async result.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NotAControl`] when `path` is not a leaf.
    pub fn validate(&mut self, path: &ControlPath) -> Result<Option<AsyncTicket>, FormError> {
        self.leaf_mut(path)?.generation += 1;
        Ok(self.run_validation(path))
    }

    /// Applies the outcome of an async ticket if the leaf has not changed.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NotAControl`] when the ticket path is not a leaf.
    pub fn settle(
        &mut self,
        ticket: &AsyncTicket,
        outcome: Option<ValidationErrors>,
    ) -> Result<Settlement, FormError> {
        let leaf = self.leaf_mut(&ticket.path)?;
        if leaf.generation != ticket.generation {
            let current_generation = leaf.generation;
            self.events.emit(FormEvent::StaleResultDiscarded {
                path: ticket.path.clone(),
                ticket_generation: ticket.generation,
                current_generation,
            });
            return Ok(Settlement::Stale);
        }
        leaf.status = if outcome.is_some() { ControlStatus::Invalid } else { ControlStatus::Valid };
        leaf.errors = outcome;
        let status = leaf.status;
        let errors = error_keys(leaf.errors.as_ref());
        self.events.emit(FormEvent::ValidationSettled {
            path: ticket.path.clone(),
            status,
            errors,
        });
        Ok(Settlement::Applied(status))
    }

    /// Revalidates a leaf and drives any async validation to settlement.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NotAControl`] when `path` is not a leaf.
    pub async fn validate_async(
        &mut self,
        path: &ControlPath,
        orchestrator: &AsyncValidationOrchestrator,
    ) -> Result<Settlement, FormError> {
        match self.validate(path)? {
            Some(ticket) => {
                let outcome = orchestrator.run(&ticket).await;
                self.settle(&ticket, outcome)
            }
            None => Ok(Settlement::Applied(self.leaf(path)?.status)),
        }
    }

    /// Resolves the message shown for a leaf; empty when it is valid.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::NotAControl`] when `path` is not a leaf.
    pub fn error_message(&self, path: &ControlPath) -> Result<String, FormError> {
        Ok(self.messages.resolve(self.leaf(path)?.errors.as_ref()))
    }

    /// Runs sync validation and issues a ticket when async rules must follow.
    fn run_validation(&mut self, path: &ControlPath) -> Option<AsyncTicket> {
        let leaf = self.store.leaf_mut(path)?;
        if !leaf.run_sync() || !leaf.has_async() {
            let status = leaf.status;
            let errors = error_keys(leaf.errors.as_ref());
            self.events.emit(FormEvent::ValidationSettled {
                path: path.clone(),
                status,
                errors,
            });
            return None;
        }
        leaf.status = ControlStatus::Pending;
        let generation = leaf.generation;
        let value = leaf.value.clone();
        let validators = leaf.async_validators.clone();
        Some(AsyncTicket {
            path: path.clone(),
            generation,
            value,
            validators,
            snapshot: self.store.snapshot().to_value(),
        })
    }

    /// Resolves a mutable leaf.
    fn leaf_mut(&mut self, path: &ControlPath) -> Result<&mut LeafControl, FormError> {
        self.store.leaf_mut(path).ok_or_else(|| not_a_control(path))
    }
}

/// Builds a not-a-control error.
fn not_a_control(path: &ControlPath) -> FormError {
    FormError::NotAControl {
        path: path.clone(),
    }
}

/// Lists the failure keys of an error object.
fn error_keys(errors: Option<&ValidationErrors>) -> Vec<String> {
    errors.map(|errors| errors.keys().cloned().collect()).unwrap_or_default()
}
