// crates/dynform-logic/src/lookup.rs
// ============================================================================
// Module: Operand Lookup
// Description: JSONPath resolution of expression operands.
// Purpose: Resolve operands against a context, falling back to literals.
// Dependencies: jsonpath_lib, serde_json
// ============================================================================

//! ## Overview
//! A string operand is treated as a `JSONPath` query when the evaluation
//! context is a JSON object or array, and the first match wins. Operands
//! starting with `$` are queried as written; bare member paths such as
//! `account.status` or `items[0].id` are queried from the root. When the
//! query does not parse, matches nothing, or matches `null`, the operand is
//! used as a literal constant instead. A misspelled path therefore compares
//! as a plain string.

// ============================================================================
// SECTION: Imports
// ============================================================================

use jsonpath_lib::select;
use serde_json::Value;

// ============================================================================
// SECTION: Lookup
// ============================================================================

/// Resolves an operand against a context value.
#[must_use]
pub fn lookup<'a>(operand: &'a Value, context: &'a Value) -> &'a Value {
    let Value::String(path) = operand else {
        return operand;
    };
    if path.is_empty() || !matches!(context, Value::Object(_) | Value::Array(_)) {
        return operand;
    }
    let found = if path.starts_with('$') {
        query_first(context, path)
    } else {
        query_first(context, &rooted(path))
    };
    match found {
        Some(found) if !found.is_null() => found,
        _ => operand,
    }
}

/// Returns the first match of a `JSONPath` query, if any.
#[must_use]
pub fn query_first<'a>(context: &'a Value, path: &str) -> Option<&'a Value> {
    select(context, path).ok()?.into_iter().next()
}

/// Roots a bare member path at `$`.
fn rooted(path: &str) -> String {
    if path.starts_with('[') {
        format!("${path}")
    } else {
        format!("$.{path}")
    }
}
