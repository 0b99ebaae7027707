// crates/dynform-core/src/runtime/validators.rs
// ============================================================================
// Module: Validator Builders
// Description: Build leaf validators from decoded sync and async rules.
// Purpose: Decode rule parameters once and register failure messages.
// Dependencies: dynform-logic, crate::core, crate::runtime::messages
// ============================================================================

//! ## Overview
//! Builders run once per leaf while the form is constructed. Each sync rule
//! becomes exactly one validator. Rules that name their own failure key
//! (custom sync rules and every async rule) register their message under
//! that key, replacing any earlier producer for the same key.

// ============================================================================
// SECTION: Imports
// ============================================================================

use dynform_logic::LogicalExpression;
use serde_json::Value;

use crate::core::AsyncRule;
use crate::core::AsyncRuleKind;
use crate::core::AsyncValidator;
use crate::core::BuiltinCheck;
use crate::core::SchemaError;
use crate::core::SyncRule;
use crate::core::SyncValidator;
use crate::runtime::messages::MessageRegistry;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Rule type selecting an expression validator.
const CUSTOM_RULE: &str = "custom";

// ============================================================================
// SECTION: Builders
// ============================================================================

/// Builds the sync validators of a leaf.
///
/// # Errors
///
/// Returns [`SchemaError`] when a rule is unknown or malformed.
pub fn build_sync_validators(
    rules: &[SyncRule],
    messages: &mut MessageRegistry,
) -> Result<Vec<SyncValidator>, SchemaError> {
    rules
        .iter()
        .map(|rule| {
            if rule.kind != CUSTOM_RULE {
                return BuiltinCheck::from_rule(rule).map(SyncValidator::Builtin);
            }
            let name = rule.name.clone().ok_or_else(|| SchemaError::InvalidRule {
                kind: rule.kind.clone(),
                reason: "custom rule requires a name".to_string(),
            })?;
            let expression = decode_expression(&name, rule.value.as_ref())?;
            register_rule_message(messages, &name, rule.message.as_deref());
            Ok(SyncValidator::Custom {
                name,
                expression,
            })
        })
        .collect()
}

/// Builds the async validators of a leaf.
///
/// # Errors
///
/// Returns [`SchemaError`] when a custom rule has no valid expression.
pub fn build_async_validators(
    rules: &[AsyncRule],
    messages: &mut MessageRegistry,
) -> Result<Vec<AsyncValidator>, SchemaError> {
    rules
        .iter()
        .map(|rule| {
            let validator = match rule.kind {
                AsyncRuleKind::Custom => AsyncValidator::Custom {
                    name: rule.name.clone(),
                    url: rule.url.clone(),
                    expression: decode_expression(&rule.name, rule.value.as_ref())?,
                },
                AsyncRuleKind::External => AsyncValidator::External {
                    name: rule.name.clone(),
                    url: rule.url.clone(),
                },
            };
            register_rule_message(messages, &rule.name, rule.message.as_deref());
            Ok(validator)
        })
        .collect()
}

/// Decodes the expression of a named rule.
fn decode_expression(name: &str, value: Option<&Value>) -> Result<LogicalExpression, SchemaError> {
    let value = value.ok_or_else(|| SchemaError::InvalidRule {
        kind: CUSTOM_RULE.to_string(),
        reason: format!("rule `{name}` requires an expression value"),
    })?;
    LogicalExpression::from_value(value).map_err(|source| SchemaError::Expression {
        name: name.to_string(),
        source,
    })
}

/// Registers the message of a named rule, or a generic one when absent.
fn register_rule_message(messages: &mut MessageRegistry, name: &str, message: Option<&str>) {
    let message = message.map_or_else(|| format!("Validation '{name}' failed"), str::to_string);
    messages.register_message(name, message);
}
