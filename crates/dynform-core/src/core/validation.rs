// crates/dynform-core/src/core/validation.rs
// ============================================================================
// Module: Validator Model
// Description: Built-in checks, custom expression validators, async rules.
// Purpose: Turn decoded rules into checks that yield keyed error objects.
// Dependencies: dynform-logic, regex, serde_json
// ============================================================================

//! ## Overview
//! A validator inspects a control value and returns either nothing or an
//! error object keyed by failure kind. Failure keys of built-in checks match
//! the keys the message registry is seeded with.
//!
//! Every built-in check except `required` and `requiredTrue` passes on an
//! empty value (`null`, `""`, or `[]`), so optional fields stay valid until
//! the user types something.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use dynform_logic::LogicalExpression;
use dynform_logic::evaluate_with_value;
use dynform_logic::js_number;
use dynform_logic::js_string;
use regex::Regex;
use serde_json::Value;
use serde_json::json;

use crate::core::errors::SchemaError;
use crate::core::schema::SyncRule;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Email shape: dot-atom local part and hostname labels.
const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$";
/// Maximum total email length.
const EMAIL_MAX_LENGTH: usize = 254;
/// Maximum email local-part length.
const EMAIL_MAX_LOCAL_LENGTH: usize = 64;
/// Shortest IBAN accepted (Norway).
const IBAN_MIN_LENGTH: usize = 15;
/// Longest IBAN accepted.
const IBAN_MAX_LENGTH: usize = 34;

// ============================================================================
// SECTION: Error Objects
// ============================================================================

/// Error object of a control: failure kind mapped to failure detail.
pub type ValidationErrors = BTreeMap<String, Value>;

/// Builds a single-entry error object.
#[must_use]
pub fn single_error(key: impl Into<String>, detail: Value) -> ValidationErrors {
    BTreeMap::from([(key.into(), detail)])
}

// ============================================================================
// SECTION: Built-in Checks
// ============================================================================

/// Parameterized structural check.
#[derive(Debug, Clone)]
pub enum BuiltinCheck {
    /// Value must not be empty.
    Required,
    /// Value must be exactly `true`.
    RequiredTrue,
    /// Value must look like an email address.
    Email {
        /// Compiled address pattern.
        pattern: Regex,
    },
    /// Numeric value must be at least the bound.
    Min(f64),
    /// Numeric value must be at most the bound.
    Max(f64),
    /// Length must be at least the bound.
    MinLength(usize),
    /// Length must be at most the bound.
    MaxLength(usize),
    /// Stringified value must match the anchored pattern.
    Pattern {
        /// Pattern source after anchoring.
        source: String,
        /// Compiled pattern.
        regex: Regex,
    },
    /// Value must be a valid IBAN.
    Iban,
}

impl BuiltinCheck {
    /// Decodes a non-custom sync rule.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] for unknown check names and bad parameters.
    pub fn from_rule(rule: &SyncRule) -> Result<Self, SchemaError> {
        let kind = rule.kind.as_str();
        match kind {
            "required" => Ok(Self::Required),
            "requiredTrue" => Ok(Self::RequiredTrue),
            "email" => Regex::new(EMAIL_PATTERN)
                .map(|pattern| Self::Email {
                    pattern,
                })
                .map_err(|err| invalid_rule(kind, &err.to_string())),
            "min" => number_param(rule).map(Self::Min),
            "max" => number_param(rule).map(Self::Max),
            "minLength" => length_param(rule).map(Self::MinLength),
            "maxLength" => length_param(rule).map(Self::MaxLength),
            "pattern" => {
                let raw = rule
                    .value
                    .as_ref()
                    .and_then(Value::as_str)
                    .ok_or_else(|| invalid_rule(kind, "value must be a string pattern"))?;
                let source = anchor_pattern(raw);
                let regex = Regex::new(&source).map_err(|err| invalid_rule(kind, &err.to_string()))?;
                Ok(Self::Pattern {
                    source,
                    regex,
                })
            }
            "IBAN" => Ok(Self::Iban),
            other => Err(SchemaError::UnknownRule {
                kind: other.to_string(),
            }),
        }
    }

    /// Returns the failure key the check reports under.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::RequiredTrue => "requiredTrue",
            Self::Email {
                ..
            } => "email",
            Self::Min(_) => "min",
            Self::Max(_) => "max",
            Self::MinLength(_) => "minLength",
            Self::MaxLength(_) => "maxLength",
            Self::Pattern {
                ..
            } => "pattern",
            Self::Iban => "IBAN",
        }
    }

    /// Runs the check, returning the failure detail when it fails.
    #[must_use]
    pub fn check(&self, value: &Value) -> Option<Value> {
        match self {
            Self::Required => is_empty(value).then_some(Value::Bool(true)),
            Self::RequiredTrue => (value != &Value::Bool(true)).then_some(Value::Bool(true)),
            _ if is_empty(value) => None,
            Self::Email {
                pattern,
            } => (!is_email(pattern, &js_string(value))).then_some(Value::Bool(true)),
            Self::Min(min) => js_number(value)
                .filter(|actual| actual < min)
                .map(|_| json!({"min": min, "actual": value})),
            Self::Max(max) => js_number(value)
                .filter(|actual| actual > max)
                .map(|_| json!({"max": max, "actual": value})),
            Self::MinLength(required) => value_length(value)
                .filter(|actual| actual < required)
                .map(|actual| json!({"requiredLength": required, "actualLength": actual})),
            Self::MaxLength(required) => value_length(value)
                .filter(|actual| actual > required)
                .map(|actual| json!({"requiredLength": required, "actualLength": actual})),
            Self::Pattern {
                source,
                regex,
            } => (!regex.is_match(&js_string(value)))
                .then(|| json!({"requiredPattern": source, "actualValue": value})),
            Self::Iban => (!is_iban(&js_string(value))).then_some(Value::Bool(true)),
        }
    }
}

// ============================================================================
// SECTION: Sync Validators
// ============================================================================

/// Synchronous validator attached to a leaf.
#[derive(Debug, Clone)]
pub enum SyncValidator {
    /// Built-in structural check.
    Builtin(BuiltinCheck),
    /// Logical expression evaluated against the control value.
    Custom {
        /// Failure key.
        name: String,
        /// Expression with `"value"` placeholders.
        expression: LogicalExpression,
    },
}

impl SyncValidator {
    /// Returns the failure key of the validator.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Builtin(check) => check.key(),
            Self::Custom {
                name, ..
            } => name,
        }
    }

    /// Validates a control value.
    ///
    /// A custom validator fails unless the value is present (neither `null`
    /// nor `""`) and the substituted expression holds with the value itself
    /// as the evaluation context.
    #[must_use]
    pub fn validate(&self, value: &Value) -> Option<ValidationErrors> {
        match self {
            Self::Builtin(check) => check.check(value).map(|detail| single_error(check.key(), detail)),
            Self::Custom {
                name,
                expression,
            } => {
                let present = !value.is_null() && value.as_str() != Some("");
                if present && evaluate_with_value(expression, value, value) {
                    None
                } else {
                    Some(single_error(name.clone(), json!({"value": value})))
                }
            }
        }
    }
}

/// Runs every validator and merges their error objects.
#[must_use]
pub fn run_sync_validators(validators: &[SyncValidator], value: &Value) -> Option<ValidationErrors> {
    let mut merged = ValidationErrors::new();
    for validator in validators {
        if let Some(errors) = validator.validate(value) {
            merged.extend(errors);
        }
    }
    if merged.is_empty() { None } else { Some(merged) }
}

// ============================================================================
// SECTION: Async Validators
// ============================================================================

/// Asynchronous validator attached to a leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum AsyncValidator {
    /// Fetches a document and evaluates an expression against it.
    Custom {
        /// Failure key.
        name: String,
        /// URL template; the first `"value"` token is replaced by the value.
        url: String,
        /// Expression evaluated against the response body.
        expression: LogicalExpression,
    },
    /// Posts the form status snapshot and reads `validationResult`.
    External {
        /// Failure key.
        name: String,
        /// Endpoint receiving the snapshot.
        url: String,
    },
}

impl AsyncValidator {
    /// Returns the failure key of the validator.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Custom {
                name, ..
            }
            | Self::External {
                name, ..
            } => name,
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true for `null`, `""`, and `[]`.
#[must_use]
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Bool(_) | Value::Number(_) | Value::Object(_) => false,
    }
}

/// Length of strings (in characters) and arrays; other values have none.
fn value_length(value: &Value) -> Option<usize> {
    match value {
        Value::String(text) => Some(text.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// Anchors a pattern with `^` and `$` unless already anchored.
fn anchor_pattern(raw: &str) -> String {
    let prefix = if raw.starts_with('^') { "" } else { "^" };
    let suffix = if raw.ends_with('$') { "" } else { "$" };
    format!("{prefix}{raw}{suffix}")
}

/// Checks address length limits and shape.
fn is_email(pattern: &Regex, candidate: &str) -> bool {
    let Some((local, _)) = candidate.split_once('@') else {
        return false;
    };
    !candidate.is_empty()
        && candidate.len() <= EMAIL_MAX_LENGTH
        && !local.is_empty()
        && local.len() <= EMAIL_MAX_LOCAL_LENGTH
        && pattern.is_match(candidate)
}

/// Validates an IBAN with the ISO 13616 mod-97 check.
fn is_iban(candidate: &str) -> bool {
    let compact: String =
        candidate.chars().filter(|ch| !ch.is_whitespace()).map(|ch| ch.to_ascii_uppercase()).collect();
    if !(IBAN_MIN_LENGTH..=IBAN_MAX_LENGTH).contains(&compact.len())
        || !compact.chars().all(|ch| ch.is_ascii_alphanumeric())
    {
        return false;
    }
    let bytes = compact.as_bytes();
    if !bytes[..2].iter().all(u8::is_ascii_alphabetic) || !bytes[2..4].iter().all(u8::is_ascii_digit)
    {
        return false;
    }
    let rearranged = compact[4..].chars().chain(compact[..4].chars());
    let mut remainder: u32 = 0;
    for ch in rearranged {
        let Some(digit) = ch.to_digit(36) else {
            return false;
        };
        let step = if digit >= 10 { 100 } else { 10 };
        remainder = (remainder * step + digit) % 97;
    }
    remainder == 1
}

/// Reads a numeric rule parameter.
fn number_param(rule: &SyncRule) -> Result<f64, SchemaError> {
    rule.value
        .as_ref()
        .and_then(js_number)
        .ok_or_else(|| invalid_rule(&rule.kind, "value must be a number"))
}

/// Reads a length rule parameter.
fn length_param(rule: &SyncRule) -> Result<usize, SchemaError> {
    rule.value
        .as_ref()
        .and_then(Value::as_u64)
        .and_then(|length| usize::try_from(length).ok())
        .ok_or_else(|| invalid_rule(&rule.kind, "value must be a non-negative integer"))
}

/// Builds an invalid-rule schema error.
fn invalid_rule(kind: &str, reason: &str) -> SchemaError {
    SchemaError::InvalidRule {
        kind: kind.to_string(),
        reason: reason.to_string(),
    }
}
