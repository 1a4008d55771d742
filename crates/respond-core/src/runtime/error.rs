// crates/respond-core/src/runtime/error.rs
// ============================================================================
// Module: Respond Runtime Errors
// Description: Error taxonomy surfaced by the matching engine and mutations.
// Purpose: Make every failure kind distinguishable for callers.
// Dependencies: crate::{core, interfaces}, thiserror
// ============================================================================

//! ## Overview
//! [`RespondError`] separates expected outcomes (no trigger matched, or none
//! passed its chance check) from operator-visible failures. Callers use
//! [`RespondError::is_expected`] to decide whether to log.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::InvalidEditTarget;
use crate::core::ValidationError;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors returned by [`crate::Respond`] operations.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - [`RespondError::kind`] labels never change once published.
#[derive(Debug, Error)]
pub enum RespondError {
    /// A row failed the rule validator.
    #[error("{0}")]
    Validation(ValidationError),
    /// A required fetch matched no row.
    #[error("EmptyResponse: no {entity} with id {id}")]
    NotFound {
        /// Entity label.
        entity: &'static str,
        /// Requested identifier.
        id: i64,
    },
    /// An update matched no row.
    #[error("No Rows Updated: no {entity} with id {id}")]
    NoRowsUpdated {
        /// Entity label.
        entity: &'static str,
        /// Requested identifier.
        id: i64,
    },
    /// An explicitly empty trigger list was supplied.
    #[error("Array can not be empty.")]
    EmptyTriggerSet,
    /// A non-string value was supplied where a string was required.
    #[error("{param} must be a valid string")]
    ParameterType {
        /// Parameter name.
        param: &'static str,
    },
    /// No cached trigger matched the message.
    #[error("No trigger for message {message}")]
    NoMatch {
        /// The message that was scanned.
        message: String,
    },
    /// Triggers matched but none passed its chance check.
    #[error("trigger(s) were hit, but none passed their chance checks.")]
    NoAdmittedMatch,
    /// An edit or remove targeted an unknown entity type.
    #[error("Respond types must be either a response, or a trigger. Provided: {provided}")]
    TypeInvalid {
        /// The rejected type label.
        provided: String,
    },
    /// Infrastructure failure reported by the store.
    #[error(transparent)]
    Store(StoreError),
}

impl RespondError {
    /// Returns the stable kind label.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "respond.validation",
            Self::NotFound { .. } => "respond.notfound",
            Self::NoRowsUpdated { .. } => "respond.norowsupdated",
            Self::EmptyTriggerSet => "respond.triggerarrayempty",
            Self::ParameterType { .. } => "respond.parameternotstring",
            Self::NoMatch { .. } => "respond.notrigger",
            Self::NoAdmittedMatch => "respond.notriggerpassedchancecheck",
            Self::TypeInvalid { .. } => "respond.typeinvalid",
            Self::Store(_) => "respond.store",
        }
    }

    /// Returns true for high-frequency outcomes callers should not log.
    #[must_use]
    pub const fn is_expected(&self) -> bool {
        matches!(self, Self::NoMatch { .. } | Self::NoAdmittedMatch)
    }
}

impl From<StoreError> for RespondError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound { entity, id } => Self::NotFound { entity, id },
            StoreError::NoRowsUpdated { entity, id } => Self::NoRowsUpdated { entity, id },
            StoreError::Validation(error) => Self::Validation(error),
            other => Self::Store(other),
        }
    }
}

impl From<ValidationError> for RespondError {
    fn from(error: ValidationError) -> Self {
        Self::Validation(error)
    }
}

impl From<InvalidEditTarget> for RespondError {
    fn from(error: InvalidEditTarget) -> Self {
        Self::TypeInvalid { provided: error.provided }
    }
}
