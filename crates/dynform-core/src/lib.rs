// crates/dynform-core/src/lib.rs
// ============================================================================
// Module: Dynform Core Root
// Description: Public API surface for the form schema interpreter.
// Purpose: Wire together the data model, collaborator interfaces, and runtime.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Dynform Core interprets a JSON form schema into a tree of addressable
//! controls, attaches sync and async validators to every leaf, and resolves
//! one failure message per leaf. Rendering and HTTP are collaborators behind
//! the traits in [`interfaces`].
//!
//! Security posture: schemas and remote responses are untrusted; malformed
//! schemas fail construction and remote failures degrade to validation
//! failures.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

#[cfg(test)]
mod tests;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use crate::core::*;

pub use crate::interfaces::RemoteTransport;
pub use crate::interfaces::Renderer;
pub use crate::interfaces::TransportError;
pub use crate::runtime::*;
