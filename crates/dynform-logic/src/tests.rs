// crates/dynform-logic/src/tests.rs
// ============================================================================
// Module: Logic Unit Tests
// Description: Unit tests for stringification, coercion, and lookups.
// Purpose: Pin the loose-typing rules comparators depend on.
// Dependencies: dynform-logic
// ============================================================================

//! ## Overview
//! Unit tests for the coercion helpers shared by comparators and option
//! projection.

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

use serde_json::json;

use crate::comparator::js_number;
use crate::comparator::js_string;
use crate::lookup::lookup;
use crate::lookup::query_first;

// ============================================================================
// SECTION: Stringification
// ============================================================================

#[test]
fn js_string_renders_scalars() {
    assert_eq!(js_string(&json!(null)), "null");
    assert_eq!(js_string(&json!(true)), "true");
    assert_eq!(js_string(&json!(15)), "15");
    assert_eq!(js_string(&json!(-3)), "-3");
    assert_eq!(js_string(&json!(2.5)), "2.5");
    assert_eq!(js_string(&json!(4.0)), "4");
    assert_eq!(js_string(&json!("ES91")), "ES91");
}

#[test]
fn js_string_joins_arrays_and_hides_objects() {
    assert_eq!(js_string(&json!([1, "a", null, true])), "1,a,,true");
    assert_eq!(js_string(&json!({"a": 1})), "[object Object]");
}

// ============================================================================
// SECTION: Coercion
// ============================================================================

#[test]
fn js_number_coerces_loose_values() {
    assert_eq!(js_number(&json!(null)), Some(0.0));
    assert_eq!(js_number(&json!(false)), Some(0.0));
    assert_eq!(js_number(&json!(true)), Some(1.0));
    assert_eq!(js_number(&json!(" 42 ")), Some(42.0));
    assert_eq!(js_number(&json!("")), Some(0.0));
    assert_eq!(js_number(&json!("4x")), None);
    assert_eq!(js_number(&json!([1])), None);
}

// ============================================================================
// SECTION: Lookup
// ============================================================================

#[test]
fn lookup_queries_only_container_contexts() {
    let context = json!({"user": {"age": 30}});
    assert_eq!(lookup(&json!("$.user.age"), &context), &json!(30));
    assert_eq!(lookup(&json!("$.user.age"), &json!(5)), &json!("$.user.age"));
}

#[test]
fn lookup_falls_back_to_literal_on_miss_or_null() {
    let context = json!({"present": null});
    assert_eq!(lookup(&json!("$.missing"), &context), &json!("$.missing"));
    assert_eq!(lookup(&json!("$.present"), &context), &json!("$.present"));
    assert_eq!(lookup(&json!(7), &context), &json!(7));
}

#[test]
fn lookup_roots_bare_member_paths() {
    let context = json!({"user": {"age": 30}, "tags": ["a", "b"]});
    assert_eq!(lookup(&json!("user.age"), &context), &json!(30));
    assert_eq!(lookup(&json!("tags[1]"), &context), &json!("b"));
    assert_eq!(lookup(&json!("user.missing"), &context), &json!("user.missing"));
    assert_eq!(lookup(&json!(""), &context), &json!(""));
}

#[test]
fn query_first_returns_first_match() {
    let context = json!({"items": [{"id": 1}, {"id": 2}]});
    assert_eq!(query_first(&context, "$.items[*].id"), Some(&json!(1)));
}
