// crates/dynform-logic/tests/evaluation.rs
// ============================================================================
// Module: Expression Evaluation Tests
// Description: Logical reduction, comparators, and context lookups.
// ============================================================================
//! ## Overview
//! Integration tests for evaluating decoded expressions against control
//! values and remote documents.

mod support;

use dynform_logic::evaluate_logical;
use dynform_logic::evaluate_with_value;
use serde_json::json;
use support::TestResult;
use support::ensure;
use support::expr;

// ========================================================================
// SECTION: Logical Reduction
// ========================================================================

#[test]
fn empty_and_holds_and_empty_or_fails() -> TestResult {
    ensure(evaluate_logical(&expr(json!(["and", []]))?, &json!(null)), "and([]) must hold")?;
    ensure(!evaluate_logical(&expr(json!(["or", []]))?, &json!(null)), "or([]) must fail")?;
    Ok(())
}

#[test]
fn range_rule_passes_inside_and_fails_outside() -> TestResult {
    let rule = expr(json!(["and", [["value", "greater_than", 0], ["value", "less_than", 10]]]))?;
    ensure(evaluate_with_value(&rule, &json!(5), &json!(5)), "5 is inside (0, 10)")?;
    ensure(!evaluate_with_value(&rule, &json!(15), &json!(15)), "15 is outside (0, 10)")?;
    ensure(!evaluate_with_value(&rule, &json!(0), &json!(0)), "bounds are exclusive")?;
    Ok(())
}

#[test]
fn nested_or_inside_and() -> TestResult {
    let rule = expr(json!([
        "and",
        [
            ["value", "starts_with", "ES"],
            ["or", [["value", "ends_with", "00"], ["value", "contains", "99"]]]
        ]
    ]))?;
    ensure(evaluate_with_value(&rule, &json!("ES1200"), &json!("ES1200")), "ES..00 passes")?;
    ensure(evaluate_with_value(&rule, &json!("ES991"), &json!("ES991")), "ES.99. passes")?;
    ensure(!evaluate_with_value(&rule, &json!("FR1200"), &json!("FR1200")), "FR prefix fails")?;
    ensure(!evaluate_with_value(&rule, &json!("ES1234"), &json!("ES1234")), "no suffix fails")?;
    Ok(())
}

// ========================================================================
// SECTION: Comparators
// ========================================================================

#[test]
fn equal_compares_numbers_numerically_and_other_values_structurally() -> TestResult {
    ensure(evaluate_logical(&expr(json!(["and", [[5, "equal", 5.0]]]))?, &json!(null)), "5 == 5.0")?;
    ensure(
        !evaluate_logical(&expr(json!(["and", [[5, "equal", "5"]]]))?, &json!(null)),
        "equal does not coerce strings",
    )?;
    ensure(
        evaluate_logical(&expr(json!(["and", [[[1, 2], "equal", [1, 2]]]]))?, &json!(null)),
        "arrays compare structurally",
    )?;
    Ok(())
}

#[test]
fn ordering_coerces_mixed_operands() -> TestResult {
    ensure(
        evaluate_logical(&expr(json!(["and", [["10", "greater_than", 9]]]))?, &json!(null)),
        "numeric string coerces",
    )?;
    ensure(
        evaluate_logical(&expr(json!(["and", [["b", "greater_than", "a"]]]))?, &json!(null)),
        "strings order lexicographically",
    )?;
    ensure(
        !evaluate_logical(&expr(json!(["and", [["abc", "greater_than", 1]]]))?, &json!(null)),
        "non-numeric string is not comparable",
    )?;
    Ok(())
}

#[test]
fn regex_comparators_interpret_metacharacters() -> TestResult {
    let rule = expr(json!(["and", [["value", "contains", "a.c"]]]))?;
    ensure(evaluate_with_value(&rule, &json!("xxabcxx"), &json!("xxabcxx")), "dot is a wildcard")?;
    let digits = expr(json!(["and", [["value", "starts_with", "[0-9]{3}"]]]))?;
    ensure(evaluate_with_value(&digits, &json!("123-x"), &json!("123-x")), "class matches")?;
    ensure(!evaluate_with_value(&digits, &json!("12-x"), &json!("12-x")), "class rejects")?;
    Ok(())
}

#[test]
fn invalid_regex_never_matches() -> TestResult {
    let rule = expr(json!(["or", [["value", "contains", "(unclosed"]]]))?;
    ensure(!evaluate_with_value(&rule, &json!("(unclosed"), &json!("(unclosed")), "bad regex fails")?;
    Ok(())
}

#[test]
fn regex_comparators_stringify_numbers() -> TestResult {
    let rule = expr(json!(["and", [["value", "ends_with", 7]]]))?;
    ensure(evaluate_with_value(&rule, &json!(1337), &json!(1337)), "1337 ends with 7")?;
    Ok(())
}

// ========================================================================
// SECTION: Remote Documents
// ========================================================================

#[test]
fn paths_resolve_against_remote_documents() -> TestResult {
    let response = json!({"account": {"status": "open", "limit": 500}});
    let rule = expr(json!([
        "and",
        [["$.account.status", "equal", "open"], ["$.account.limit", "greater_than", "value"]]
    ]))?;
    ensure(evaluate_with_value(&rule, &json!(200), &response), "limit 500 > 200")?;
    ensure(!evaluate_with_value(&rule, &json!(800), &response), "limit 500 <= 800")?;
    Ok(())
}

#[test]
fn bare_member_paths_resolve_against_remote_documents() -> TestResult {
    let response = json!({"account": {"status": "open"}});
    let rule = expr(json!(["and", [["account.status", "equal", "open"]]]))?;
    ensure(evaluate_logical(&rule, &response), "account.status resolves to open")?;
    let closed = json!({"account": {"status": "closed"}});
    ensure(!evaluate_logical(&rule, &closed), "account.status resolves to closed")?;
    Ok(())
}

#[test]
fn rhs_paths_resolve_against_context() -> TestResult {
    let response = json!({"min": 3, "actual": 4});
    let rule = expr(json!(["and", [["$.actual", "greater_than", "$.min"]]]))?;
    ensure(evaluate_logical(&rule, &response), "rhs path resolves to 3")?;
    Ok(())
}

#[test]
fn unresolved_paths_compare_as_literals() -> TestResult {
    let response = json!({"status": "open"});
    let rule = expr(json!(["and", [["$.stauts", "equal", "$.stauts"]]]))?;
    ensure(evaluate_logical(&rule, &response), "typo falls back to literal on both sides")?;
    Ok(())
}
