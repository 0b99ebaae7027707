// crates/dynform-logic/src/expression.rs
// ============================================================================
// Module: Expression Types
// Description: Logical and basic expression trees over JSON operands.
// Purpose: Decode nested-array expressions and rewrite placeholders.
// Dependencies: serde, serde_json, smallvec
// ============================================================================

//! ## Overview
//! A logical expression is the pair `[operator, operands]`. Each operand is
//! either another logical expression (exactly two elements) or a basic
//! expression `[lhs, comparator, rhs]` (three elements). The tree is decoded
//! once and then evaluated many times; it serializes back to the same
//! nested-array wire form.
//!
//! The literal string `"value"` anywhere inside an operand is a placeholder
//! for the live control value and is rewritten by
//! [`LogicalExpression::substitute_placeholder`] before evaluation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use smallvec::SmallVec;

use crate::comparator::Comparator;
use crate::error::ExpressionError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Token replaced by the live control value before evaluation.
pub const VALUE_PLACEHOLDER: &str = "value";

// ============================================================================
// SECTION: Operator
// ============================================================================

/// Logical operator joining the operands of a logical expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Every operand must hold. Empty `and` holds.
    And,
    /// At least one operand must hold. Empty `or` does not hold.
    Or,
}

impl Operator {
    /// Returns the wire token for the operator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Expression Tree
// ============================================================================

/// Comparison `[lhs, comparator, rhs]`.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicExpression {
    /// Left operand; a `JSONPath` or a literal.
    pub lhs: Value,
    /// Comparator applied to the resolved operands.
    pub comparator: Comparator,
    /// Right operand; a `JSONPath` or a literal.
    pub rhs: Value,
}

/// Operand of a logical expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Nested logical expression.
    Logical(LogicalExpression),
    /// Leaf comparison.
    Basic(BasicExpression),
}

/// Boolean expression `[operator, operands]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct LogicalExpression {
    /// Operator reducing the operand results.
    pub operator: Operator,
    /// Operands evaluated in order.
    pub operands: SmallVec<[Box<Expression>; 4]>,
}

impl LogicalExpression {
    /// Builds an `and` expression.
    #[must_use]
    pub fn and(operands: Vec<Expression>) -> Self {
        Self {
            operator: Operator::And,
            operands: operands.into_iter().map(Box::new).collect(),
        }
    }

    /// Builds an `or` expression.
    #[must_use]
    pub fn or(operands: Vec<Expression>) -> Self {
        Self {
            operator: Operator::Or,
            operands: operands.into_iter().map(Box::new).collect(),
        }
    }

    /// Decodes a logical expression from its nested-array JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`ExpressionError`] when the shape, operator, or a comparator
    /// is malformed.
    pub fn from_value(value: &Value) -> Result<Self, ExpressionError> {
        decode_logical(value, "root")
    }

    /// Encodes the expression back into its nested-array JSON form.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let operands = self.operands.iter().map(|operand| operand.to_value()).collect();
        Value::Array(vec![Value::String(self.operator.as_str().to_string()), Value::Array(operands)])
    }

    /// Returns a deep copy with every `"value"` token replaced by `control_value`.
    ///
    /// Tokens are replaced inside both operands of every basic expression at
    /// any nesting depth, including inside array and object literals.
    /// Expressions without the token come back unchanged.
    #[must_use]
    pub fn substitute_placeholder(&self, control_value: &Value) -> Self {
        Self {
            operator: self.operator,
            operands: self
                .operands
                .iter()
                .map(|operand| Box::new(operand.substitute_placeholder(control_value)))
                .collect(),
        }
    }

    /// Returns true when the `"value"` token occurs anywhere in the tree.
    #[must_use]
    pub fn mentions_placeholder(&self) -> bool {
        self.operands.iter().any(|operand| match operand.as_ref() {
            Expression::Logical(logical) => logical.mentions_placeholder(),
            Expression::Basic(basic) => {
                contains_placeholder(&basic.lhs) || contains_placeholder(&basic.rhs)
            }
        })
    }
}

impl Expression {
    /// Builds a basic comparison operand.
    #[must_use]
    pub const fn basic(lhs: Value, comparator: Comparator, rhs: Value) -> Self {
        Self::Basic(BasicExpression {
            lhs,
            comparator,
            rhs,
        })
    }

    /// Encodes the operand into its nested-array JSON form.
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Logical(logical) => logical.to_value(),
            Self::Basic(basic) => Value::Array(vec![
                basic.lhs.clone(),
                Value::String(basic.comparator.as_str().to_string()),
                basic.rhs.clone(),
            ]),
        }
    }

    /// Returns a deep copy with every `"value"` token replaced.
    #[must_use]
    pub fn substitute_placeholder(&self, control_value: &Value) -> Self {
        match self {
            Self::Logical(logical) => Self::Logical(logical.substitute_placeholder(control_value)),
            Self::Basic(basic) => Self::Basic(BasicExpression {
                lhs: replace_placeholder(&basic.lhs, control_value),
                comparator: basic.comparator,
                rhs: replace_placeholder(&basic.rhs, control_value),
            }),
        }
    }
}

impl TryFrom<Value> for LogicalExpression {
    type Error = ExpressionError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}

impl From<LogicalExpression> for Value {
    fn from(expression: LogicalExpression) -> Self {
        expression.to_value()
    }
}

// ============================================================================
// SECTION: Decoding
// ============================================================================

/// Decodes a `[operator, operands]` node.
fn decode_logical(value: &Value, location: &str) -> Result<LogicalExpression, ExpressionError> {
    let Value::Array(parts) = value else {
        return Err(ExpressionError::NotLogical {
            location: location.to_string(),
        });
    };
    let [operator, operands] = parts.as_slice() else {
        return Err(ExpressionError::NotLogical {
            location: location.to_string(),
        });
    };
    let operator = match operator.as_str() {
        Some("and") => Operator::And,
        Some("or") => Operator::Or,
        _ => {
            return Err(ExpressionError::UnknownOperator {
                location: location.to_string(),
                token: token_label(operator),
            });
        }
    };
    let Value::Array(items) = operands else {
        return Err(ExpressionError::OperandsNotArray {
            location: location.to_string(),
        });
    };
    let mut decoded = SmallVec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let child = format!("{location}.{index}");
        decoded.push(Box::new(decode_operand(item, &child)?));
    }
    Ok(LogicalExpression {
        operator,
        operands: decoded,
    })
}

/// Decodes an operand, choosing logical or basic by arity.
fn decode_operand(value: &Value, location: &str) -> Result<Expression, ExpressionError> {
    let Value::Array(parts) = value else {
        return Err(ExpressionError::OperandArity {
            location: location.to_string(),
            found: 0,
        });
    };
    match parts.as_slice() {
        [_, _] => decode_logical(value, location).map(Expression::Logical),
        [lhs, comparator, rhs] => {
            let comparator = comparator.as_str().and_then(Comparator::from_token).ok_or_else(
                || ExpressionError::UnknownComparator {
                    location: location.to_string(),
                    token: token_label(comparator),
                },
            )?;
            Ok(Expression::basic(lhs.clone(), comparator, rhs.clone()))
        }
        other => Err(ExpressionError::OperandArity {
            location: location.to_string(),
            found: other.len(),
        }),
    }
}

/// Renders a token for error messages.
fn token_label(token: &Value) -> String {
    token.as_str().map_or_else(|| token.to_string(), ToString::to_string)
}

// ============================================================================
// SECTION: Placeholder Rewriting
// ============================================================================

/// Deep-copies a JSON value, replacing every `"value"` string.
fn replace_placeholder(value: &Value, control_value: &Value) -> Value {
    match value {
        Value::String(text) if text == VALUE_PLACEHOLDER => control_value.clone(),
        Value::Array(items) => {
            Value::Array(items.iter().map(|item| replace_placeholder(item, control_value)).collect())
        }
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, item)| (key.clone(), replace_placeholder(item, control_value)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Returns true when the `"value"` token occurs inside a JSON value.
fn contains_placeholder(value: &Value) -> bool {
    match value {
        Value::String(text) => text == VALUE_PLACEHOLDER,
        Value::Array(items) => items.iter().any(contains_placeholder),
        Value::Object(map) => map.values().any(contains_placeholder),
        Value::Null | Value::Bool(_) | Value::Number(_) => false,
    }
}
