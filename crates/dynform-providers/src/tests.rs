// crates/dynform-providers/src/tests.rs
// ============================================================================
// Module: Provider Unit Tests
// Description: Unit tests for URL policy and option ordering.
// Purpose: Check the pieces that need no network.
// Dependencies: dynform-core, dynform-providers
// ============================================================================

//! ## Overview
//! Unit tests for URL policy checks and option sorting.

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
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::collections::BTreeSet;

use dynform_core::SelectOption;
use dynform_core::SortOrder;
use dynform_core::TransportError;
use serde_json::json;

use crate::HttpTransport;
use crate::HttpTransportConfig;
use crate::sort_options;

/// Builds a transport restricted to one host.
fn restricted(allow_http: bool) -> HttpTransport {
    HttpTransport::new(HttpTransportConfig {
        allow_http,
        allowed_hosts: Some(BTreeSet::from(["api.example.com".to_string()])),
        ..HttpTransportConfig::default()
    })
    .unwrap()
}

/// Returns the policy reason of a rejected URL.
fn blocked_reason(transport: &HttpTransport, url: &str) -> String {
    match transport.check_url(url) {
        Err(TransportError::Policy {
            reason, ..
        }) => reason,
        other => panic!("expected policy error, got {other:?}"),
    }
}

#[test]
fn https_on_allowed_host_passes() {
    let transport = restricted(false);
    let url = transport.check_url("https://api.example.com/codes?q=1").unwrap();
    assert_eq!(url.host_str(), Some("api.example.com"));
}

#[test]
fn cleartext_requires_opt_in() {
    assert_eq!(blocked_reason(&restricted(false), "http://api.example.com/"), "unsupported url scheme");
    assert!(restricted(true).check_url("http://api.example.com/").is_ok());
    assert_eq!(blocked_reason(&restricted(true), "ftp://api.example.com/"), "unsupported url scheme");
}

#[test]
fn hosts_outside_allowlist_are_blocked() {
    let transport = restricted(false);
    assert_eq!(blocked_reason(&transport, "https://169.254.169.254/latest"), "url host not allowed");
    assert_eq!(blocked_reason(&transport, "not a url"), "invalid url");
}

#[test]
fn policy_errors_are_not_retryable() {
    let err = restricted(false).check_url("http://api.example.com/").unwrap_err();
    assert!(!err.is_retryable());
    assert_eq!(err.kind(), "policy");
}

/// Builds an option with a string value equal to its display.
fn option(display: &str) -> SelectOption {
    SelectOption {
        display: display.to_string(),
        value: json!(display),
    }
}

#[test]
fn options_sort_both_ways() {
    let mut options = vec![option("b"), option("c"), option("a")];
    sort_options(&mut options, SortOrder::Asc);
    let displays: Vec<_> = options.iter().map(|option| option.display.as_str()).collect();
    assert_eq!(displays, ["a", "b", "c"]);
    sort_options(&mut options, SortOrder::Desc);
    let displays: Vec<_> = options.iter().map(|option| option.display.as_str()).collect();
    assert_eq!(displays, ["c", "b", "a"]);
}
