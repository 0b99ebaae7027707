// crates/dynform-config/src/lib.rs
// ============================================================================
// Module: Dynform Config Library
// Description: Configuration model and validation for the form runtime.
// Purpose: Single source of truth for `dynform.toml` semantics.
// Dependencies: dynform-core, dynform-providers, serde, toml
// ============================================================================

//! ## Overview
//! `dynform-config` loads the transport limits, retry envelope, and event
//! sink used when forms talk to remote validators and option sources. It
//! fails closed on oversized files, unknown fields, and out-of-range values.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
