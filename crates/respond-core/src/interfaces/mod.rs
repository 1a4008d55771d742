// crates/respond-core/src/interfaces/mod.rs
// ============================================================================
// Module: Respond Interfaces
// Description: Backend-agnostic persistence contract for responses and triggers.
// Purpose: Define the store surface used by the Respond runtime.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Stores hand out scoped transactions. Every operation of the runtime runs
//! inside exactly one [`StoreTransaction`]; the transaction is committed
//! explicitly and rolled back when dropped uncommitted, so partial failures
//! never leave orphaned rows behind.
//!
//! Implementations provide row-level primitives. The multi-row operations
//! (trigger appends, cascading deletes) are provided methods so every backend
//! applies the same ordering.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::RemovedResponse;
use crate::core::RemovedTrigger;
use crate::core::Response;
use crate::core::ResponseId;
use crate::core::ResponseUpdate;
use crate::core::Trigger;
use crate::core::TriggerId;
use crate::core::ValidationError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Response store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - `NotFound` (required fetch) and `NoRowsUpdated` (write) stay distinct.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required fetch matched no row.
    #[error("EmptyResponse: no {entity} with id {id}")]
    NotFound {
        /// Entity label (`response` or `trigger`).
        entity: &'static str,
        /// Requested identifier.
        id: i64,
    },
    /// An update matched no row.
    #[error("No Rows Updated: no {entity} with id {id}")]
    NoRowsUpdated {
        /// Entity label (`response` or `trigger`).
        entity: &'static str,
        /// Requested identifier.
        id: i64,
    },
    /// Row failed validation before write.
    #[error("{0}")]
    Validation(#[from] ValidationError),
    /// Store I/O error.
    #[error("response store io error: {0}")]
    Io(String),
    /// Store data is corrupted or fails integrity checks.
    #[error("response store corruption: {0}")]
    Corrupt(String),
    /// Store data version is incompatible.
    #[error("response store version mismatch: {0}")]
    VersionMismatch(String),
    /// Store data is invalid.
    #[error("response store invalid data: {0}")]
    Invalid(String),
    /// Store reported an error.
    #[error("response store error: {0}")]
    Store(String),
}

impl StoreError {
    /// Builds a missing-response error.
    #[must_use]
    pub const fn response_not_found(id: ResponseId) -> Self {
        Self::NotFound { entity: "response", id: id.get() }
    }

    /// Builds a missing-trigger error.
    #[must_use]
    pub const fn trigger_not_found(id: TriggerId) -> Self {
        Self::NotFound { entity: "trigger", id: id.get() }
    }
}

// ============================================================================
// SECTION: Response Store
// ============================================================================

/// Transactional store for responses and their triggers.
pub trait ResponseStore {
    /// Scoped transaction handle.
    type Transaction<'a>: StoreTransaction
    where
        Self: 'a;

    /// Opens a transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the transaction cannot be started.
    fn begin(&self) -> Result<Self::Transaction<'_>, StoreError>;
}

/// Operations available inside one store transaction.
///
/// Dropping a transaction without calling [`StoreTransaction::commit`] discards
/// every write it made.
pub trait StoreTransaction {
    /// Inserts a response after applying the creating rules.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for invalid rows, or a backend error.
    fn create_response(
        &mut self,
        text: &str,
        executable: bool,
        author: &str,
    ) -> Result<Response, StoreError>;

    /// Inserts a trigger for `response_id` after applying the creating rules.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for invalid rows, or a backend error.
    fn create_trigger(
        &mut self,
        response_id: ResponseId,
        text: &str,
        chance: f64,
        author: &str,
    ) -> Result<Trigger, StoreError>;

    /// Fetches a response, optionally with its triggers loaded.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no row matches.
    fn fetch_response(
        &mut self,
        id: ResponseId,
        with_triggers: bool,
    ) -> Result<Response, StoreError>;

    /// Fetches a trigger.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no row matches.
    fn fetch_trigger(&mut self, id: TriggerId) -> Result<Trigger, StoreError>;

    /// Lists every trigger in id order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when reading fails.
    fn list_triggers(&mut self) -> Result<Vec<Trigger>, StoreError>;

    /// Lists every response with its triggers, both in id order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when reading fails.
    fn list_all(&mut self) -> Result<Vec<Response>, StoreError>;

    /// Updates a response after applying the saving rules.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoRowsUpdated`] when no row matches.
    fn update_response(
        &mut self,
        id: ResponseId,
        update: &ResponseUpdate,
    ) -> Result<Response, StoreError>;

    /// Writes trigger text and chance after applying the saving rules.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoRowsUpdated`] when no row matches.
    fn patch_trigger(
        &mut self,
        id: TriggerId,
        text: &str,
        chance: f64,
    ) -> Result<Trigger, StoreError>;

    /// Deletes a single response row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the delete fails.
    fn destroy_response(&mut self, id: ResponseId) -> Result<(), StoreError>;

    /// Deletes a single trigger row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the delete fails.
    fn destroy_trigger(&mut self, id: TriggerId) -> Result<(), StoreError>;

    /// Commits every write made through this transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the commit fails; nothing is persisted.
    fn commit(self) -> Result<(), StoreError>
    where
        Self: Sized;

    /// Inserts one trigger per entry in `triggers` for an existing response.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the response does not exist, or
    /// the first insert failure.
    fn append_triggers(
        &mut self,
        response_id: ResponseId,
        triggers: &[String],
        chance: f64,
        author: &str,
    ) -> Result<Vec<Trigger>, StoreError> {
        self.fetch_response(response_id, false)?;
        triggers.iter().map(|text| self.create_trigger(response_id, text, chance, author)).collect()
    }

    /// Appends triggers to an existing response and returns it hydrated.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] as for [`StoreTransaction::append_triggers`].
    fn create_triggers_for_response(
        &mut self,
        response_id: ResponseId,
        triggers: &[String],
        chance: f64,
        author: &str,
    ) -> Result<Response, StoreError> {
        self.append_triggers(response_id, triggers, chance, author)?;
        self.fetch_response(response_id, true)
    }

    /// Updates a trigger, keeping the stored chance when `chance` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the chance lookup misses, or
    /// [`StoreError::NoRowsUpdated`] when the write matches no row.
    fn update_trigger(
        &mut self,
        id: TriggerId,
        text: &str,
        chance: Option<f64>,
    ) -> Result<Trigger, StoreError> {
        let chance = match chance {
            Some(chance) => chance,
            None => self.fetch_trigger(id)?.chance,
        };
        self.patch_trigger(id, text, chance)
    }

    /// Deletes a response and every trigger it owns.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the response does not exist.
    fn delete_response(&mut self, id: ResponseId) -> Result<RemovedResponse, StoreError> {
        let mut response = self.fetch_response(id, true)?;
        let triggers = response.triggers.take().unwrap_or_default();
        for trigger in &triggers {
            self.destroy_trigger(trigger.id)?;
        }
        self.destroy_response(id)?;
        Ok(RemovedResponse { response, triggers })
    }

    /// Deletes a trigger, cascading to its response when it was the only one.
    ///
    /// The cascade decision uses the sibling count read before any delete.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when the trigger or its parent is missing.
    fn delete_trigger(&mut self, id: TriggerId) -> Result<RemovedTrigger, StoreError> {
        let trigger = self.fetch_trigger(id)?;
        let mut parent = self.fetch_response(trigger.response_id, true)?;
        let cascade = parent.triggers().len() == 1;
        self.destroy_trigger(id)?;
        if !cascade {
            return Ok(RemovedTrigger { trigger, response: None });
        }
        self.destroy_response(parent.id)?;
        parent.triggers = None;
        Ok(RemovedTrigger { trigger, response: Some(parent) })
    }
}
