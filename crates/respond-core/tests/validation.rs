// crates/respond-core/tests/validation.rs
// ============================================================================
// Module: Rule Validator Tests
// Description: Field rules for trigger and response rows.
// Purpose: Ensure every violated rule is reported with its dedicated message.
// Dependencies: respond-core, serde_json
// ============================================================================

//! Rule validator and trigger set boundary tests.

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

use respond_core::ResponseFields;
use respond_core::Rule;
use respond_core::RuleSet;
use respond_core::TriggerFields;
use respond_core::TriggerSet;
use respond_core::response_from_value;
use respond_core::rules::validate_response;
use respond_core::rules::validate_trigger;
use serde_json::json;

fn trigger<'a>(
    text: Option<&'a str>,
    chance: Option<f64>,
    author: Option<&'a str>,
) -> TriggerFields<'a> {
    TriggerFields { trigger: text, chance, created_by: author }
}

#[test]
fn complete_trigger_passes_creating_rules() {
    validate_trigger(RuleSet::Creating, &trigger(Some("hi"), Some(0.5), Some("bob"))).unwrap();
}

#[test]
fn every_violation_is_reported() {
    let error = validate_trigger(RuleSet::Creating, &trigger(None, None, None)).unwrap_err();
    assert!(error.has_violation("trigger", Rule::Required));
    assert!(error.has_violation("chance", Rule::Required));
    assert!(error.has_violation("created_by", Rule::Required));
    assert_eq!(error.violations("created_by")[0].message, "The created_by is required");
}

#[test]
fn saving_rules_skip_author() {
    validate_trigger(RuleSet::Saving, &trigger(Some("hi"), Some(0.5), None)).unwrap();
    validate_response(RuleSet::Saving, &ResponseFields { response: Some("r"), created_by: None })
        .unwrap();
}

#[test]
fn chance_boundaries_are_inclusive() {
    for chance in [0.0, 1.0] {
        validate_trigger(RuleSet::Saving, &trigger(Some("t"), Some(chance), None)).unwrap();
    }
}

#[test]
fn chance_below_zero_names_lower_bound() {
    let fields = trigger(Some("t"), Some(-0.000_000_1), None);
    let error = validate_trigger(RuleSet::Saving, &fields).unwrap_err();
    let violations = error.violations("chance");
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].rule, Rule::GreaterThanEqualTo);
    assert_eq!(violations[0].message, "The chance must be greater than or equal to 0");
}

#[test]
fn chance_above_one_names_upper_bound() {
    let fields = trigger(Some("t"), Some(1.000_000_1), None);
    let error = validate_trigger(RuleSet::Saving, &fields).unwrap_err();
    let violations = error.violations("chance");
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].rule, Rule::LessThanEqualTo);
    assert_eq!(violations[0].message, "The chance must be less than or equal to 1");
}

#[test]
fn non_finite_chance_is_not_numeric() {
    let error =
        validate_trigger(RuleSet::Saving, &trigger(Some("t"), Some(f64::NAN), None)).unwrap_err();
    assert!(error.has_violation("chance", Rule::Numeric));
    assert!(!error.has_violation("chance", Rule::GreaterThanEqualTo));
}

#[test]
fn response_requires_text_and_author_on_create() {
    let error = validate_response(
        RuleSet::Creating,
        &ResponseFields { response: Some(""), created_by: Some("") },
    )
    .unwrap_err();
    assert!(error.has_violation("response", Rule::Required));
    assert!(error.has_violation("created_by", Rule::Required));
}

#[test]
fn trigger_set_accepts_strings_and_string_lists() {
    assert_eq!(TriggerSet::from_value(&json!("a")).unwrap(), TriggerSet::One("a".to_string()));
    let many = TriggerSet::from_value(&json!(["a", "b"])).unwrap();
    assert_eq!(many.len(), 2);
    assert!(TriggerSet::from_value(&json!([])).unwrap().is_empty());
}

#[test]
fn trigger_set_rejects_other_types_with_dedicated_message() {
    for value in [json!(3), json!({"a": 1}), json!(["a", 2]), json!([["a"]]), json!(true)] {
        let error = TriggerSet::from_value(&value).unwrap_err();
        let violations = error.violations("trigger");
        assert_eq!(violations[0].rule, Rule::String);
        assert_eq!(violations[0].message, "Trigger must be a string or an array.");
    }
}

#[test]
fn trigger_set_null_is_required() {
    let error = TriggerSet::from_value(&json!(null)).unwrap_err();
    assert!(error.has_violation("trigger", Rule::Required));
}

#[test]
fn response_value_must_be_a_string() {
    assert_eq!(response_from_value(&json!("pong")).unwrap(), "pong");
    for value in [json!(7), json!(["pong"]), json!({"text": "pong"}), json!(false)] {
        let error = response_from_value(&value).unwrap_err();
        let violations = error.violations("response");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, Rule::String);
        assert_eq!(violations[0].message, "Value must be a string.");
        assert!(!error.has_violation("trigger", Rule::String));
    }
}

#[test]
fn response_value_null_is_required() {
    let error = response_from_value(&json!(null)).unwrap_err();
    assert!(error.has_violation("response", Rule::Required));
    assert_eq!(error.violations("response")[0].message, "The response is required");
}
