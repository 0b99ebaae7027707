// crates/dynform-logic/src/lib.rs
// ============================================================================
// Module: Dynform Logic Root
// Description: Public API surface for the validation expression engine.
// Purpose: Wire together expression types, lookups, comparators, evaluation.
// Dependencies: crate::{comparator, error, eval, expression, lookup}
// ============================================================================

//! ## Overview
//! This crate evaluates the small boolean expression language used by form
//! validation rules. Expressions are pre-structured nested arrays, so there
//! is no textual grammar: decoding checks the shape and evaluation reduces
//! `and`/`or` trees of comparisons over JSON data with `JSONPath` lookups.

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod comparator;
pub mod error;
pub mod eval;
pub mod expression;
pub mod lookup;

#[cfg(test)]
mod tests;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use comparator::Comparator;
pub use comparator::js_number;
pub use comparator::js_string;
pub use error::ExpressionError;
pub use eval::evaluate;
pub use eval::evaluate_basic;
pub use eval::evaluate_logical;
pub use eval::evaluate_with_value;
pub use expression::BasicExpression;
pub use expression::Expression;
pub use expression::LogicalExpression;
pub use expression::Operator;
pub use expression::VALUE_PLACEHOLDER;
pub use lookup::lookup;
pub use lookup::query_first;

// ============================================================================
// SECTION: Convenience Builders
// ============================================================================

/// Convenience functions for building expressions in code.
pub mod convenience {
    use serde_json::Value;

    use super::Comparator;
    use super::Expression;
    use super::LogicalExpression;

    /// Creates an expression requiring all operands.
    #[must_use]
    pub fn all(operands: Vec<Expression>) -> LogicalExpression {
        LogicalExpression::and(operands)
    }

    /// Creates an expression requiring any operand.
    #[must_use]
    pub fn any(operands: Vec<Expression>) -> LogicalExpression {
        LogicalExpression::or(operands)
    }

    /// Wraps a logical expression as an operand.
    #[must_use]
    pub const fn nested(expression: LogicalExpression) -> Expression {
        Expression::Logical(expression)
    }

    /// Creates a comparison operand.
    #[must_use]
    pub fn compare(lhs: impl Into<Value>, comparator: Comparator, rhs: impl Into<Value>) -> Expression {
        Expression::basic(lhs.into(), comparator, rhs.into())
    }
}
