// crates/respond-core/src/core/model.rs
// ============================================================================
// Module: Respond Data Model
// Description: Response and trigger entities plus mutation inputs and results.
// Purpose: Define the records persisted by stores and returned to callers.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A [`Response`] is a reply payload owned by one or more [`Trigger`]s. A
//! trigger is a case-sensitive substring plus a firing probability in
//! `[0, 1]`. The remaining types describe mutation inputs ([`TriggerSet`],
//! [`ResponseUpdate`], [`EditTarget`]) and removal snapshots.
//!
//! Invariants:
//! - A stored response always has at least one trigger.
//! - Every trigger references exactly one existing response.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::ResponseId;
use crate::core::identifiers::TriggerId;
use crate::core::rules::Rule;
use crate::core::rules::ValidationError;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Field name used for trigger validation failures.
pub const TRIGGER_FIELD: &str = "trigger";

/// Field name used for response validation failures.
pub const RESPONSE_FIELD: &str = "response";

// ============================================================================
// SECTION: Entities
// ============================================================================

/// Reply payload selected when one of its triggers fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Store-assigned identifier.
    pub id: ResponseId,
    /// Reply text, or a shell command when `executable` is set.
    pub response: String,
    /// Whether the text is executed and its output used as the reply.
    pub executable: bool,
    /// Author identity.
    pub created_by: String,
    /// Creation timestamp.
    pub created_at: Timestamp,
    /// Last update timestamp.
    pub updated_at: Timestamp,
    /// Owned triggers, present only when loaded with the relationship.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggers: Option<Vec<Trigger>>,
}

impl Response {
    /// Returns the loaded triggers, or an empty slice when not loaded.
    #[must_use]
    pub fn triggers(&self) -> &[Trigger] {
        self.triggers.as_deref().unwrap_or_default()
    }

    /// Returns a copy without the trigger relationship.
    #[must_use]
    pub fn without_triggers(&self) -> Self {
        Self { triggers: None, ..self.clone() }
    }
}

/// Matchable substring with a firing probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    /// Store-assigned identifier.
    pub id: TriggerId,
    /// Case-sensitive substring matched against incoming messages.
    pub trigger: String,
    /// Firing probability in `[0, 1]`.
    pub chance: f64,
    /// Owning response.
    pub response_id: ResponseId,
    /// Author identity.
    pub created_by: String,
    /// Creation timestamp.
    pub created_at: Timestamp,
    /// Last update timestamp.
    pub updated_at: Timestamp,
}

impl Trigger {
    /// Returns true when `message` contains this trigger's text.
    #[must_use]
    pub fn matches(&self, message: &str) -> bool {
        message.contains(self.trigger.as_str())
    }
}

// ============================================================================
// SECTION: Mutation Inputs
// ============================================================================

/// One trigger or a list of triggers supplied to `add`/`add_triggers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TriggerSet {
    /// A single trigger string.
    One(String),
    /// A list of trigger strings; an empty list is rejected by the caller.
    Many(Vec<String>),
}

impl TriggerSet {
    /// Resolves a loosely typed value into a trigger set.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] with a `required` violation for null and a
    /// `string` violation for numbers, booleans, objects, or lists holding
    /// anything but strings.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        match value {
            Value::Null => Err(ValidationError::single(
                TRIGGER_FIELD,
                Rule::Required,
                Rule::Required.default_message(TRIGGER_FIELD),
            )),
            Value::String(text) => Ok(Self::One(text.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(Self::Many)
                .ok_or_else(type_violation),
            Value::Bool(_) | Value::Number(_) | Value::Object(_) => Err(type_violation()),
        }
    }

    /// Returns the triggers as a slice-backed list.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(text) => vec![text],
            Self::Many(items) => items,
        }
    }

    /// Returns true when the set is an explicitly empty list.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Many(items) if items.is_empty())
    }

    /// Returns the number of triggers in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(items) => items.len(),
        }
    }
}

/// Builds the dedicated trigger type violation.
fn type_violation() -> ValidationError {
    let message = Rule::String.default_message(TRIGGER_FIELD);
    ValidationError::single(TRIGGER_FIELD, Rule::String, message)
}

/// Resolves a loosely typed response payload into its text.
///
/// # Errors
///
/// Returns [`ValidationError`] with a `required` violation for null and a
/// `string` violation for every other non-string value.
pub fn response_from_value(value: &Value) -> Result<&str, ValidationError> {
    match value {
        Value::String(text) => Ok(text.as_str()),
        Value::Null => Err(ValidationError::single(
            RESPONSE_FIELD,
            Rule::Required,
            Rule::Required.default_message(RESPONSE_FIELD),
        )),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => {
            Err(ValidationError::single(
                RESPONSE_FIELD,
                Rule::String,
                Rule::String.default_message(RESPONSE_FIELD),
            ))
        }
    }
}

impl From<String> for TriggerSet {
    fn from(value: String) -> Self {
        Self::One(value)
    }
}

impl From<&str> for TriggerSet {
    fn from(value: &str) -> Self {
        Self::One(value.to_string())
    }
}

impl From<Vec<String>> for TriggerSet {
    fn from(value: Vec<String>) -> Self {
        Self::Many(value)
    }
}

impl From<Vec<&str>> for TriggerSet {
    fn from(value: Vec<&str>) -> Self {
        Self::Many(value.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for TriggerSet {
    fn from(value: [&str; N]) -> Self {
        Self::Many(value.into_iter().map(str::to_string).collect())
    }
}

/// Fields written by a response update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseUpdate {
    /// Replacement reply text.
    pub text: String,
    /// Replacement executable flag; `None` keeps the stored value.
    pub executable: Option<bool>,
}

/// Entity kind addressed by `edit` and `remove`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditTarget {
    /// A response row.
    Response,
    /// A trigger row.
    Trigger,
}

impl EditTarget {
    /// Returns the canonical lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Response => "response",
            Self::Trigger => "trigger",
        }
    }
}

impl fmt::Display for EditTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an edit target label is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Respond types must be either a response, or a trigger. Provided: {provided}")]
pub struct InvalidEditTarget {
    /// The rejected label.
    pub provided: String,
}

impl FromStr for EditTarget {
    type Err = InvalidEditTarget;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "response" => Ok(Self::Response),
            "trigger" => Ok(Self::Trigger),
            other => Err(InvalidEditTarget { provided: other.to_string() }),
        }
    }
}

// ============================================================================
// SECTION: Removal Snapshots
// ============================================================================

/// Pre-deletion snapshot returned by response removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemovedResponse {
    /// The removed response, without its trigger relationship.
    pub response: Response,
    /// Every trigger destroyed with the response.
    pub triggers: Vec<Trigger>,
}

/// Pre-deletion snapshot returned by trigger removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemovedTrigger {
    /// The removed trigger.
    pub trigger: Trigger,
    /// The parent response when it was removed by cascade.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Response>,
}
