// crates/dynform-providers/src/lib.rs
// ============================================================================
// Module: Dynform Providers
// Description: Concrete transports for remote validators and option sources.
// Purpose: Connect the form runtime to HTTP endpoints with strict limits.
// Dependencies: dynform-core, dynform-logic, jsonpath_lib, reqwest
// ============================================================================

//! ## Overview
//! This crate ships [`HttpTransport`], the reqwest-backed implementation of
//! the remote transport contract, and [`OptionSourceClient`], which fetches
//! and shapes the options of selects backed by a URL. Both run every request
//! through the retry policy configured by the caller.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod http;
pub mod options;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use http::HttpTransport;
pub use http::HttpTransportConfig;
pub use options::OptionSourceClient;
pub use options::sort_options;

#[cfg(test)]
mod tests;
