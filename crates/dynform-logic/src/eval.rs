// crates/dynform-logic/src/eval.rs
// ============================================================================
// Module: Expression Evaluation
// Description: Boolean reduction of logical expressions over a JSON context.
// Purpose: Evaluate validation rules against control values or responses.
// Dependencies: crate::{comparator, expression, lookup}
// ============================================================================

//! ## Overview
//! Evaluation is total: it never fails. Operands resolve through
//! [`lookup`](crate::lookup::lookup) and fall back to literals, and
//! comparisons that are not meaningful evaluate to `false`.
//! `and` short-circuits on the first failing operand and `or` on the first
//! holding one, so `and([])` holds and `or([])` does not.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::expression::BasicExpression;
use crate::expression::Expression;
use crate::expression::LogicalExpression;
use crate::expression::Operator;
use crate::lookup::lookup;

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Evaluates a basic comparison against a context value.
#[must_use]
pub fn evaluate_basic(expression: &BasicExpression, context: &Value) -> bool {
    let left = lookup(&expression.lhs, context);
    let right = lookup(&expression.rhs, context);
    expression.comparator.apply(left, right)
}

/// Evaluates a logical expression against a context value.
#[must_use]
pub fn evaluate_logical(expression: &LogicalExpression, context: &Value) -> bool {
    let mut operands = expression.operands.iter().map(|operand| evaluate(operand, context));
    match expression.operator {
        Operator::And => operands.all(|held| held),
        Operator::Or => operands.any(|held| held),
    }
}

/// Evaluates any operand.
#[must_use]
pub fn evaluate(expression: &Expression, context: &Value) -> bool {
    match expression {
        Expression::Logical(logical) => evaluate_logical(logical, context),
        Expression::Basic(basic) => evaluate_basic(basic, context),
    }
}

/// Substitutes the control value for every placeholder, then evaluates.
///
/// This is the form used by validation rules: the placeholder is rewritten
/// with `control_value` and the result is evaluated against `context`, which
/// is the control value itself for sync rules and the remote document for
/// async rules.
#[must_use]
pub fn evaluate_with_value(
    expression: &LogicalExpression,
    control_value: &Value,
    context: &Value,
) -> bool {
    evaluate_logical(&expression.substitute_placeholder(control_value), context)
}
