// crates/dynform-logic/src/comparator.rs
// ============================================================================
// Module: Comparator Logic
// Description: Comparator tokens and their evaluation over JSON values.
// Purpose: Compare resolved operands with loosely-typed form semantics.
// Dependencies: regex, serde_json
// ============================================================================

//! ## Overview
//! Comparators operate on operands that were already resolved against the
//! evaluation context. Ordering comparators coerce mixed operands to numbers
//! the way loosely-typed form data expects; `equal` is structural except that
//! numbers compare numerically.
//!
//! `starts_with`, `ends_with` and `contains` are regular-expression tests of
//! the stringified operands. The right-hand side is used as a pattern without
//! escaping, so metacharacters in a rule value are interpreted as regex
//! syntax. A pattern that fails to compile never matches.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::cmp::Ordering;
use std::fmt;

use regex::Regex;
use serde_json::Value;

// ============================================================================
// SECTION: Comparator
// ============================================================================

/// Comparison applied by a basic expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    /// Left operand orders strictly after the right operand.
    GreaterThan,
    /// Left operand orders strictly before the right operand.
    LessThan,
    /// Operands are equal.
    Equal,
    /// Left operand matches `^<rhs>`.
    StartsWith,
    /// Left operand matches `<rhs>$`.
    EndsWith,
    /// Left operand matches `<rhs>` anywhere.
    Contains,
}

impl Comparator {
    /// Returns the wire token for the comparator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GreaterThan => "greater_than",
            Self::LessThan => "less_than",
            Self::Equal => "equal",
            Self::StartsWith => "starts_with",
            Self::EndsWith => "ends_with",
            Self::Contains => "contains",
        }
    }

    /// Parses a wire token, returning `None` for unknown comparators.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "greater_than" => Some(Self::GreaterThan),
            "less_than" => Some(Self::LessThan),
            "equal" => Some(Self::Equal),
            "starts_with" => Some(Self::StartsWith),
            "ends_with" => Some(Self::EndsWith),
            "contains" => Some(Self::Contains),
            _ => None,
        }
    }

    /// Applies the comparator to two resolved operands.
    #[must_use]
    pub fn apply(self, left: &Value, right: &Value) -> bool {
        match self {
            Self::GreaterThan => loose_cmp(left, right).is_some_and(Ordering::is_gt),
            Self::LessThan => loose_cmp(left, right).is_some_and(Ordering::is_lt),
            Self::Equal => loose_eq(left, right),
            Self::StartsWith => regex_test(&format!("^{}", js_string(right)), left),
            Self::EndsWith => regex_test(&format!("{}$", js_string(right)), left),
            Self::Contains => regex_test(&js_string(right), left),
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Coercion Helpers
// ============================================================================

/// Stringifies a JSON value the way loosely-typed form data is displayed.
///
/// Strings are returned verbatim, integral numbers carry no fraction, arrays
/// are comma-joined with `null` entries rendered empty, and objects collapse
/// to `[object Object]`.
#[must_use]
pub fn js_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                int.to_string()
            } else if let Some(uint) = number.as_u64() {
                uint.to_string()
            } else {
                number.as_f64().map_or_else(|| number.to_string(), |float| float.to_string())
            }
        }
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| if item.is_null() { String::new() } else { js_string(item) })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Coerces a JSON value to a number, returning `None` when it is not numeric.
#[must_use]
pub fn js_number(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::Number(number) => number.as_f64(),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Some(0.0);
            }
            trimmed.parse::<f64>().ok().filter(|parsed| parsed.is_finite())
        }
        Value::Array(_) | Value::Object(_) => None,
    }
}

/// Orders two operands; `None` means the pair is not comparable.
fn loose_cmp(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::String(left), Value::String(right)) => Some(left.cmp(right)),
        _ => {
            let left = js_number(left)?;
            let right = js_number(right)?;
            left.partial_cmp(&right)
        }
    }
}

/// Structural equality with numeric comparison for numbers.
fn loose_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(left), Value::Number(right)) => match (left.as_f64(), right.as_f64()) {
            (Some(left), Some(right)) => (left - right).abs() == 0.0,
            _ => left == right,
        },
        _ => left == right,
    }
}

/// Tests a stringified operand against a pattern; invalid patterns never match.
fn regex_test(pattern: &str, subject: &Value) -> bool {
    Regex::new(pattern).is_ok_and(|regex| regex.is_match(&js_string(subject)))
}
