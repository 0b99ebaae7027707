// crates/dynform-logic/src/error.rs
// ============================================================================
// Module: Expression Errors
// Description: Decode failures for nested-array validation expressions.
// Purpose: Report malformed expression shapes with the offending location.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Expressions arrive pre-structured as nested JSON arrays. Decoding is the
//! only fallible step; evaluation itself never fails and degrades malformed
//! lookups to literal comparisons instead.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while decoding an expression from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    /// A logical expression was not a two-element `[operator, operands]` array.
    #[error("logical expression at {location} must be [operator, operands]")]
    NotLogical {
        /// Position of the malformed node (dot-separated operand indices).
        location: String,
    },
    /// The operands element of a logical expression was not an array.
    #[error("operands at {location} must be an array")]
    OperandsNotArray {
        /// Position of the malformed node.
        location: String,
    },
    /// An operand had neither two (logical) nor three (basic) elements.
    #[error("operand at {location} must have 2 or 3 elements, found {found}")]
    OperandArity {
        /// Position of the malformed operand.
        location: String,
        /// Number of elements observed.
        found: usize,
    },
    /// The operator token was not `and` or `or`.
    #[error("unknown logical operator `{token}` at {location}")]
    UnknownOperator {
        /// Position of the logical node.
        location: String,
        /// Offending operator token.
        token: String,
    },
    /// The comparator token was not one of the supported comparators.
    #[error("unknown comparator `{token}` at {location}")]
    UnknownComparator {
        /// Position of the basic expression.
        location: String,
        /// Offending comparator token.
        token: String,
    },
}
