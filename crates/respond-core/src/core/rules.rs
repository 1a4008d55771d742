// crates/respond-core/src/core/rules.rs
// ============================================================================
// Module: Respond Rule Validator
// Description: Field rules for trigger and response rows.
// Purpose: Reject malformed rows before they reach storage.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Validation runs against the candidate row before insert
//! ([`RuleSet::Creating`]) or before save ([`RuleSet::Saving`]). Every
//! violated rule is collected, so a single [`ValidationError`] lists all
//! failing fields instead of stopping at the first.
//!
//! Creating rules are a superset of saving rules: `created_by` is only
//! checked on insert because authorship never changes.
//!
//! Chance values outside `[0, 1]` are rejected here, never clamped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Lower bound for trigger chance (inclusive).
pub const CHANCE_MIN: f64 = 0.0;

/// Upper bound for trigger chance (inclusive).
pub const CHANCE_MAX: f64 = 1.0;

/// Message used when a trigger value is neither a string nor a list of strings.
pub const TRIGGER_TYPE_MESSAGE: &str = "Trigger must be a string or an array.";

/// Message used when any other text field holds a non-string value.
pub const RESPONSE_TYPE_MESSAGE: &str = "Value must be a string.";

// ============================================================================
// SECTION: Rules
// ============================================================================

/// Validation phase selecting which rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleSet {
    /// Rules applied before insert.
    Creating,
    /// Rules applied before update.
    Saving,
}

/// Individual rule identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// Value must be present and non-blank.
    Required,
    /// Value must be a string (or a list of strings for triggers).
    String,
    /// Value must be a finite number.
    Numeric,
    /// Value must be at least the lower bound.
    GreaterThanEqualTo,
    /// Value must be at most the upper bound.
    LessThanEqualTo,
}

impl Rule {
    /// Returns the stable rule label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::String => "string",
            Self::Numeric => "numeric",
            Self::GreaterThanEqualTo => "greater_than_equal_to",
            Self::LessThanEqualTo => "less_than_equal_to",
        }
    }

    /// Returns the default message for this rule on `field`.
    #[must_use]
    pub fn default_message(self, field: &str) -> String {
        match self {
            Self::Required => format!("The {field} is required"),
            Self::String if field == "trigger" => TRIGGER_TYPE_MESSAGE.to_string(),
            Self::String => RESPONSE_TYPE_MESSAGE.to_string(),
            Self::Numeric => format!("The {field} must be numeric"),
            Self::GreaterThanEqualTo => {
                format!("The {field} must be greater than or equal to {CHANCE_MIN}")
            }
            Self::LessThanEqualTo => {
                format!("The {field} must be less than or equal to {CHANCE_MAX}")
            }
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// One violated rule on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleViolation {
    /// Violated rule.
    pub rule: Rule,
    /// Human-readable message.
    pub message: String,
}

/// Structured validation failure listing every violated rule per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Violations keyed by field name.
    fields: BTreeMap<String, Vec<RuleViolation>>,
}

impl ValidationError {
    /// Creates an empty error.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an error holding a single violation.
    #[must_use]
    pub fn single(field: &str, rule: Rule, message: impl Into<String>) -> Self {
        let mut error = Self::new();
        error.push(field, rule, message);
        error
    }

    /// Records a violation for `field`.
    pub fn push(&mut self, field: &str, rule: Rule, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(RuleViolation { rule, message: message.into() });
    }

    /// Returns true when no violation was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the violations recorded for `field`.
    #[must_use]
    pub fn violations(&self, field: &str) -> &[RuleViolation] {
        self.fields.get(field).map_or(&[], Vec::as_slice)
    }

    /// Returns true when `field` violated `rule`.
    #[must_use]
    pub fn has_violation(&self, field: &str, rule: Rule) -> bool {
        self.violations(field).iter().any(|violation| violation.rule == rule)
    }

    /// Returns the names of every failing field, in sorted order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Converts the collected violations into a result.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one violation was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for violations in self.fields.values() {
            for violation in violations {
                if !first {
                    f.write_str("; ")?;
                }
                f.write_str(&violation.message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// SECTION: Candidate Rows
// ============================================================================

/// Trigger fields checked by the validator.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TriggerFields<'a> {
    /// Trigger text.
    pub trigger: Option<&'a str>,
    /// Firing probability.
    pub chance: Option<f64>,
    /// Author identity.
    pub created_by: Option<&'a str>,
}

/// Response fields checked by the validator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseFields<'a> {
    /// Reply text.
    pub response: Option<&'a str>,
    /// Author identity.
    pub created_by: Option<&'a str>,
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Validates a trigger row.
///
/// # Errors
///
/// Returns [`ValidationError`] listing every violated rule.
pub fn validate_trigger(rules: RuleSet, fields: &TriggerFields<'_>) -> Result<(), ValidationError> {
    let mut error = ValidationError::new();
    require_text(&mut error, "trigger", fields.trigger);
    check_chance(&mut error, fields.chance);
    if rules == RuleSet::Creating {
        require_text(&mut error, "created_by", fields.created_by);
    }
    error.into_result()
}

/// Validates a response row.
///
/// # Errors
///
/// Returns [`ValidationError`] listing every violated rule.
pub fn validate_response(
    rules: RuleSet,
    fields: &ResponseFields<'_>,
) -> Result<(), ValidationError> {
    let mut error = ValidationError::new();
    require_text(&mut error, "response", fields.response);
    if rules == RuleSet::Creating {
        require_text(&mut error, "created_by", fields.created_by);
    }
    error.into_result()
}

/// Records a `required` violation when `value` is missing or blank.
fn require_text(error: &mut ValidationError, field: &str, value: Option<&str>) {
    if value.is_none_or(|text| text.trim().is_empty()) {
        error.push(field, Rule::Required, Rule::Required.default_message(field));
    }
}

/// Records chance violations.
fn check_chance(error: &mut ValidationError, chance: Option<f64>) {
    const FIELD: &str = "chance";
    let Some(chance) = chance else {
        error.push(FIELD, Rule::Required, Rule::Required.default_message(FIELD));
        return;
    };
    if !chance.is_finite() {
        error.push(FIELD, Rule::Numeric, Rule::Numeric.default_message(FIELD));
        return;
    }
    if chance < CHANCE_MIN {
        error.push(
            FIELD,
            Rule::GreaterThanEqualTo,
            Rule::GreaterThanEqualTo.default_message(FIELD),
        );
    }
    if chance > CHANCE_MAX {
        error.push(FIELD, Rule::LessThanEqualTo, Rule::LessThanEqualTo.default_message(FIELD));
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::use_debug,
        reason = "Test-only output and panic-based assertions are permitted."
    )]

    use super::*;

    #[test]
    fn chance_messages_name_their_bounds() {
        assert_eq!(
            Rule::GreaterThanEqualTo.default_message("chance"),
            "The chance must be greater than or equal to 0"
        );
        assert_eq!(
            Rule::LessThanEqualTo.default_message("chance"),
            "The chance must be less than or equal to 1"
        );
        assert_eq!(Rule::Numeric.default_message("chance"), "The chance must be numeric");
    }

    #[test]
    fn string_message_depends_on_field() {
        assert_eq!(Rule::String.default_message("trigger"), TRIGGER_TYPE_MESSAGE);
        assert_eq!(Rule::String.default_message("response"), RESPONSE_TYPE_MESSAGE);
    }

    #[test]
    fn blank_strings_fail_required() {
        let fields = TriggerFields { trigger: Some("   "), chance: Some(0.5), created_by: None };
        let error = validate_trigger(RuleSet::Saving, &fields).unwrap_err();
        assert!(error.has_violation("trigger", Rule::Required));
        assert_eq!(error.fields().collect::<Vec<_>>(), vec!["trigger"]);
    }

    #[test]
    fn display_joins_every_message() {
        let error = validate_response(RuleSet::Creating, &ResponseFields::default()).unwrap_err();
        assert_eq!(error.to_string(), "The created_by is required; The response is required");
    }
}
