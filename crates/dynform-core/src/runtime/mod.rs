// crates/dynform-core/src/runtime/mod.rs
// ============================================================================
// Module: Dynform Runtime
// Description: Control store, schema dispatch, validation, and events.
// Purpose: Interpret schemas and drive leaf state after construction.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! Runtime modules grow the control store from a schema and keep leaf state
//! current as values change. Remote work is isolated in the async validation
//! orchestrator so the form itself never awaits a transport.

pub mod async_validation;
pub mod dispatcher;
pub mod events;
pub mod form;
pub mod messages;
pub mod render;
pub mod retry;
pub mod store;
pub mod validators;

pub use async_validation::AsyncTicket;
pub use async_validation::AsyncValidationOrchestrator;
pub use async_validation::Settlement;
pub use async_validation::substitute_url;
pub use dispatcher::SchemaDispatcher;
pub use events::FileEventSink;
pub use events::FormEvent;
pub use events::FormEventRecord;
pub use events::FormEventSink;
pub use events::MemoryEventSink;
pub use events::NoopEventSink;
pub use events::StderrEventSink;
pub use form::Form;
pub use messages::MessageProducer;
pub use messages::MessageRegistry;
pub use render::NoopRenderer;
pub use render::RecordingRenderer;
pub use render::RenderCall;
pub use retry::DEFAULT_INITIAL_INTERVAL;
pub use retry::DEFAULT_MAX_RETRIES;
pub use retry::RetryPolicy;
pub use retry::with_backoff;
pub use store::ControlStore;
pub use validators::build_async_validators;
pub use validators::build_sync_validators;
