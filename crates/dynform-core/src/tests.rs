// crates/dynform-core/src/tests.rs
// ============================================================================
// Module: Core Unit Tests
// Description: Unit tests for paths, classification, checks, and status folds.
// Purpose: Pin the small building blocks the runtime composes.
// Dependencies: dynform-core
// ============================================================================

//! ## Overview
//! Unit tests for data-model helpers that do not need a built form.

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
    reason = "Test-only output and panic-based assertions are permitted."
)]

use serde_json::Value;
use serde_json::json;

use crate::core::BuiltinCheck;
use crate::core::ControlPath;
use crate::core::ControlStatus;
use crate::core::LayoutConfig;
use crate::core::NodeKind;
use crate::core::SchemaError;
use crate::core::SyncRule;
use crate::core::classify;

/// Builds a sync rule fixture.
fn rule(kind: &str, value: Option<Value>) -> SyncRule {
    SyncRule {
        kind: kind.to_string(),
        value,
        name: None,
        message: None,
    }
}

/// Decodes a built-in check fixture.
fn check(kind: &str, value: Option<Value>) -> BuiltinCheck {
    BuiltinCheck::from_rule(&rule(kind, value)).unwrap()
}

// ============================================================================
// SECTION: Paths
// ============================================================================

#[test]
fn child_paths_join_with_dots() {
    let root = ControlPath::root();
    let group = root.child_key("person");
    assert_eq!(group.as_str(), "person");
    assert_eq!(group.child_key("name").as_str(), "person.name");
    assert_eq!(group.child_index(3).as_str(), "person.3");
    assert_eq!(root.segments().count(), 0);
    assert_eq!(ControlPath::from("a.0.b").segments().collect::<Vec<_>>(), vec!["a", "0", "b"]);
}

// ============================================================================
// SECTION: Classification
// ============================================================================

#[test]
fn classification_follows_priority_order() {
    let leaf = json!({"type": "Input", "validations": {"sync": [], "async": []}});
    assert_eq!(classify(Some("F-layout"), &json!([])), NodeKind::Layout);
    assert_eq!(classify(Some("items"), &json!([leaf.clone()])), NodeKind::Array);
    assert_eq!(classify(Some("person"), &json!({"name": leaf.clone()})), NodeKind::Group);
    assert_eq!(classify(Some("name"), &leaf), NodeKind::Leaf);
    assert_eq!(classify(None, &json!({"validations": {"sync": []}})), NodeKind::Group);
    assert_eq!(classify(None, &json!("text")), NodeKind::Leaf);
    assert_eq!(classify(Some("x"), &json!(null)), NodeKind::Group);
    assert_eq!(classify(Some("g"), &json!({"x": null})), NodeKind::Group);
}

#[test]
fn layout_classes_depend_on_direction() {
    let row: LayoutConfig = serde_json::from_value(json!({
        "direction": "flex-row",
        "alignment": {"x": "justify-center", "y": "align-items-start"},
        "gap": "2"
    }))
    .unwrap();
    assert_eq!(row.classes(), "flex flex-row justify-center align-items-start gap-2");
    let column: LayoutConfig =
        serde_json::from_value(json!({"direction": "flex-column", "gap": "3"})).unwrap();
    assert_eq!(column.classes(), "flex flex-column column-gap-3");
    assert_eq!(LayoutConfig::default().classes(), "flex");
}

// ============================================================================
// SECTION: Built-in Checks
// ============================================================================

#[test]
fn required_rejects_empty_values_only() {
    let required = check("required", None);
    assert_eq!(required.check(&json!(null)), Some(json!(true)));
    assert_eq!(required.check(&json!("")), Some(json!(true)));
    assert_eq!(required.check(&json!([])), Some(json!(true)));
    assert_eq!(required.check(&json!(0)), None);
    assert_eq!(required.check(&json!(false)), None);
}

#[test]
fn required_true_demands_literal_true() {
    let required_true = check("requiredTrue", None);
    assert_eq!(required_true.check(&json!(true)), None);
    assert_eq!(required_true.check(&json!(false)), Some(json!(true)));
    assert_eq!(required_true.check(&json!("true")), Some(json!(true)));
}

#[test]
fn bounds_report_limits_and_actual_values() {
    let min = check("min", Some(json!(18)));
    assert_eq!(min.check(&json!(17)), Some(json!({"min": 18.0, "actual": 17})));
    assert_eq!(min.check(&json!(18)), None);
    assert_eq!(min.check(&json!("")), None);
    let max = check("max", Some(json!(10)));
    assert_eq!(max.check(&json!("11")), Some(json!({"max": 10.0, "actual": "11"})));
    assert_eq!(max.check(&json!("abc")), None);
}

#[test]
fn lengths_count_characters_and_items() {
    let min_length = check("minLength", Some(json!(3)));
    assert_eq!(min_length.check(&json!("ab")), Some(json!({"requiredLength": 3, "actualLength": 2})));
    assert_eq!(min_length.check(&json!("abc")), None);
    let max_length = check("maxLength", Some(json!(2)));
    assert_eq!(max_length.check(&json!([1, 2, 3])), Some(json!({"requiredLength": 2, "actualLength": 3})));
    assert_eq!(max_length.check(&json!(12345)), None);
}

#[test]
fn pattern_is_anchored() {
    let pattern = check("pattern", Some(json!("[0-9]+")));
    assert_eq!(pattern.check(&json!("123")), None);
    assert_eq!(
        pattern.check(&json!("12a")),
        Some(json!({"requiredPattern": "^[0-9]+$", "actualValue": "12a"}))
    );
    assert_eq!(pattern.check(&json!(42)), None);
}

#[test]
fn email_checks_shape() {
    let email = check("email", None);
    assert_eq!(email.check(&json!("someone@example.com")), None);
    assert_eq!(email.check(&json!("someone@")), Some(json!(true)));
    assert_eq!(email.check(&json!("no-at-sign")), Some(json!(true)));
    assert_eq!(email.check(&json!("")), None);
}

#[test]
fn iban_uses_mod_97() {
    let iban = check("IBAN", None);
    assert_eq!(iban.check(&json!("GB82 WEST 1234 5698 7654 32")), None);
    assert_eq!(iban.check(&json!("DE89370400440532013000")), None);
    assert_eq!(iban.check(&json!("GB82 WEST 1234 5698 7654 33")), Some(json!(true)));
    assert_eq!(iban.check(&json!("XX")), Some(json!(true)));
}

#[test]
fn rule_decoding_rejects_bad_input() {
    assert!(matches!(
        BuiltinCheck::from_rule(&rule("unknown", None)),
        Err(SchemaError::UnknownRule { .. })
    ));
    assert!(matches!(
        BuiltinCheck::from_rule(&rule("minLength", Some(json!(-1)))),
        Err(SchemaError::InvalidRule { .. })
    ));
    assert!(matches!(
        BuiltinCheck::from_rule(&rule("pattern", Some(json!("(")))),
        Err(SchemaError::InvalidRule { .. })
    ));
}

// ============================================================================
// SECTION: Status
// ============================================================================

#[test]
fn status_aggregation_prefers_invalid_then_pending() {
    use ControlStatus::Invalid;
    use ControlStatus::Pending;
    use ControlStatus::Valid;
    assert_eq!(ControlStatus::aggregate([] as [ControlStatus; 0]), Valid);
    assert_eq!(ControlStatus::aggregate([Valid, Pending]), Pending);
    assert_eq!(ControlStatus::aggregate([Pending, Invalid, Valid]), Invalid);
    assert_eq!(serde_json::to_value(Pending).unwrap(), json!("PENDING"));
}
