// crates/dynform-logic/tests/proptest_logic.rs
// ============================================================================
// Module: Expression Property-Based Tests
// Description: Algebraic laws of logical reduction and substitution.
// Purpose: Ensure and/or reduce exactly like all/any over operand results.
// ============================================================================

//! ## Overview
//! Generates random comparison lists and checks that `and`/`or` agree with
//! the individual operand results, and that substitution is idempotent.

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
    reason = "Test-only assertions and helpers are permitted."
)]

use dynform_logic::Comparator;
use dynform_logic::Expression;
use dynform_logic::LogicalExpression;
use dynform_logic::evaluate;
use dynform_logic::evaluate_logical;
use proptest::prelude::*;
use serde_json::Value;
use serde_json::json;

/// Strategy producing numeric comparisons against the placeholder.
fn comparison() -> impl Strategy<Value = Expression> {
    (
        -50i64..50,
        prop_oneof![Just(Comparator::GreaterThan), Just(Comparator::LessThan), Just(Comparator::Equal)],
    )
        .prop_map(|(bound, comparator)| Expression::basic(json!("value"), comparator, json!(bound)))
}

proptest! {
    #[test]
    fn and_is_all_and_or_is_any(
        operands in prop::collection::vec(comparison(), 0..6),
        control in -60i64..60,
    ) {
        let control = Value::from(control);
        let and = LogicalExpression::and(operands.clone()).substitute_placeholder(&control);
        let or = LogicalExpression::or(operands).substitute_placeholder(&control);
        let results: Vec<bool> = and.operands.iter().map(|op| evaluate(op, &control)).collect();
        prop_assert_eq!(evaluate_logical(&and, &control), results.iter().all(|held| *held));
        prop_assert_eq!(evaluate_logical(&or, &control), results.iter().any(|held| *held));
    }

    #[test]
    fn substitution_is_idempotent(
        operands in prop::collection::vec(comparison(), 0..6),
        control in -60i64..60,
    ) {
        let control = Value::from(control);
        let once = LogicalExpression::and(operands).substitute_placeholder(&control);
        prop_assert_eq!(once.substitute_placeholder(&control), once);
    }
}
