// crates/respond-core/src/runtime/respond.rs
// ============================================================================
// Module: Respond Engine
// Description: Matching and resolution engine plus mutation orchestrator.
// Purpose: Resolve messages to responses and keep store and cache in step.
// Dependencies: crate::{core, interfaces}, rand, serde_json, tracing
// ============================================================================

//! ## Overview
//! [`Respond`] is the application-lifetime handle that owns the
//! [`TriggerCache`]. Matching reads the cache and re-fetches admitted
//! responses from the store so callers always see the latest persisted edit.
//! Mutations validate, write inside one transaction, commit, and only then
//! apply the matching cache change.
//!
//! Invariants:
//! - After every successful call, the cached trigger ids equal the stored ones.
//! - A failed call leaves both the store and the cache unchanged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use rand::Rng;
use serde_json::Value;
use tracing::debug;
use tracing::info;
use tracing::trace;

use crate::core::EditTarget;
use crate::core::RemovedResponse;
use crate::core::RemovedTrigger;
use crate::core::Response;
use crate::core::ResponseId;
use crate::core::ResponseUpdate;
use crate::core::Trigger;
use crate::core::TriggerCache;
use crate::core::TriggerId;
use crate::core::TriggerSet;
use crate::interfaces::ResponseStore;
use crate::interfaces::StoreTransaction;
use crate::runtime::error::RespondError;
use crate::runtime::matching;

// ============================================================================
// SECTION: Results
// ============================================================================

/// Entity returned by [`Respond::edit`].
#[derive(Debug, Clone, PartialEq)]
pub enum Edited {
    /// Updated response.
    Response(Response),
    /// Updated trigger.
    Trigger(Trigger),
}

/// Snapshot returned by [`Respond::remove`].
#[derive(Debug, Clone, PartialEq)]
pub enum Removed {
    /// Removed response and its triggers.
    Response(RemovedResponse),
    /// Removed trigger and, on cascade, its response.
    Trigger(RemovedTrigger),
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// Trigger matching engine and mutation orchestrator over a response store.
#[derive(Debug)]
pub struct Respond<S> {
    /// Durable store.
    store: S,
    /// Mirror of every stored trigger.
    cache: TriggerCache,
}

impl<S: ResponseStore> Respond<S> {
    /// Creates an engine and fills the cache from every stored trigger.
    ///
    /// # Errors
    ///
    /// Returns [`RespondError::Store`] when the triggers cannot be read.
    pub fn load(store: S) -> Result<Self, RespondError> {
        let mut respond = Self { store, cache: TriggerCache::new() };
        respond.reload()?;
        Ok(respond)
    }

    /// Empties the cache in place and repopulates it from the store.
    ///
    /// # Errors
    ///
    /// Returns [`RespondError::Store`] when the triggers cannot be read. The
    /// cache is left untouched on failure.
    pub fn reload(&mut self) -> Result<(), RespondError> {
        let mut tx = self.store.begin()?;
        let triggers = tx.list_triggers()?;
        tx.commit()?;
        self.cache.clear();
        self.cache.extend(triggers);
        info!(count = self.cache.len(), "loaded {} trigger(s)", self.cache.len());
        Ok(())
    }

    /// Returns the trigger cache.
    #[must_use]
    pub const fn cache(&self) -> &TriggerCache {
        &self.cache
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    // ------------------------------------------------------------------------
    // Matching
    // ------------------------------------------------------------------------

    /// Resolves `message` to responses using thread-local randomness.
    ///
    /// # Errors
    ///
    /// See [`Respond::try_emit_with_rng`].
    pub fn try_emit(&self, message: &str) -> Result<Vec<Response>, RespondError> {
        self.try_emit_with_rng(message, &mut rand::thread_rng())
    }

    /// Resolves a loosely typed message value.
    ///
    /// # Errors
    ///
    /// Returns [`RespondError::ParameterType`] when `message` is not a string,
    /// otherwise as for [`Respond::try_emit`].
    pub fn try_emit_value(&self, message: &Value) -> Result<Vec<Response>, RespondError> {
        let Some(text) = message.as_str() else {
            return Err(RespondError::ParameterType { param: "message" });
        };
        self.try_emit(text)
    }

    /// Resolves `message` to responses, drawing admissions from `rng`.
    ///
    /// Responses are re-read from the store, deduplicated by id, and returned
    /// in the order their first trigger was admitted.
    ///
    /// # Errors
    ///
    /// Returns [`RespondError::NoMatch`] when no trigger occurs in the message,
    /// [`RespondError::NoAdmittedMatch`] when none passes its chance draw, or a
    /// store error from the re-fetch.
    pub fn try_emit_with_rng<R: Rng + ?Sized>(
        &self,
        message: &str,
        rng: &mut R,
    ) -> Result<Vec<Response>, RespondError> {
        let candidates = matching::candidates(&self.cache, message);
        if candidates.is_empty() {
            trace!("no trigger matched");
            return Err(RespondError::NoMatch { message: message.to_string() });
        }
        let admitted = matching::admit(&candidates, rng);
        if admitted.is_empty() {
            trace!(candidates = candidates.len(), "no trigger passed its chance check");
            return Err(RespondError::NoAdmittedMatch);
        }
        let mut tx = self.store.begin()?;
        let responses = matching::parent_ids(&admitted)
            .into_iter()
            .map(|id| tx.fetch_response(id, false))
            .collect::<Result<Vec<_>, _>>()?;
        tx.commit()?;
        Ok(responses)
    }

    // ------------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------------

    /// Creates a response owning one trigger per entry in `triggers`.
    ///
    /// # Errors
    ///
    /// Returns [`RespondError::EmptyTriggerSet`] before touching the store when
    /// `triggers` is an empty list, or a validation/store error; nothing is
    /// written on failure.
    pub fn add(
        &mut self,
        triggers: impl Into<TriggerSet>,
        response: &str,
        chance: f64,
        author: &str,
        executable: bool,
    ) -> Result<Response, RespondError> {
        let triggers = non_empty(triggers.into())?;
        let mut tx = self.store.begin()?;
        let created = tx.create_response(response, executable, author)?;
        let added = tx.append_triggers(created.id, &triggers, chance, author)?;
        let hydrated = tx.fetch_response(created.id, true)?;
        tx.commit()?;
        self.cache.extend(added);
        debug!(response_id = created.id.get(), cache = self.cache.len(), "response added");
        Ok(hydrated)
    }

    /// Appends triggers to an existing response.
    ///
    /// # Errors
    ///
    /// Returns [`RespondError::EmptyTriggerSet`], [`RespondError::NotFound`]
    /// when the response does not exist, or a validation/store error.
    pub fn add_triggers(
        &mut self,
        response_id: ResponseId,
        triggers: impl Into<TriggerSet>,
        chance: f64,
        author: &str,
    ) -> Result<Response, RespondError> {
        let triggers = non_empty(triggers.into())?;
        let mut tx = self.store.begin()?;
        let added = tx.append_triggers(response_id, &triggers, chance, author)?;
        let hydrated = tx.fetch_response(response_id, true)?;
        tx.commit()?;
        self.cache.extend(added);
        debug!(response_id = response_id.get(), cache = self.cache.len(), "triggers added");
        Ok(hydrated)
    }

    /// Edits a response or trigger selected by a type label.
    ///
    /// `chance` applies to triggers only and defaults to the stored value;
    /// `executable` applies to responses only.
    ///
    /// # Errors
    ///
    /// Returns [`RespondError::TypeInvalid`] for unknown labels, otherwise as
    /// for [`Respond::edit_response`] and [`Respond::edit_trigger`].
    pub fn edit(
        &mut self,
        target: &str,
        id: i64,
        text: &str,
        chance: Option<f64>,
        executable: Option<bool>,
    ) -> Result<Edited, RespondError> {
        match target.parse::<EditTarget>()? {
            EditTarget::Response => {
                self.edit_response(ResponseId::new(id), text, executable).map(Edited::Response)
            }
            EditTarget::Trigger => {
                self.edit_trigger(TriggerId::new(id), text, chance).map(Edited::Trigger)
            }
        }
    }

    /// Replaces a response's text and, when given, its executable flag.
    ///
    /// # Errors
    ///
    /// Returns [`RespondError::NoRowsUpdated`] for unknown ids, or a
    /// validation/store error.
    pub fn edit_response(
        &mut self,
        id: ResponseId,
        text: &str,
        executable: Option<bool>,
    ) -> Result<Response, RespondError> {
        let update = ResponseUpdate { text: text.to_string(), executable };
        let mut tx = self.store.begin()?;
        let response = tx.update_response(id, &update)?;
        tx.commit()?;
        debug!(response_id = id.get(), "response edited");
        Ok(response)
    }

    /// Replaces a trigger's text and, when given, its chance.
    ///
    /// # Errors
    ///
    /// Returns [`RespondError::NotFound`] when `chance` is omitted and the
    /// trigger does not exist, [`RespondError::NoRowsUpdated`] when `chance`
    /// is given and the trigger does not exist, or a validation/store error.
    pub fn edit_trigger(
        &mut self,
        id: TriggerId,
        text: &str,
        chance: Option<f64>,
    ) -> Result<Trigger, RespondError> {
        let mut tx = self.store.begin()?;
        let trigger = tx.update_trigger(id, text, chance)?;
        tx.commit()?;
        self.cache.update(&trigger);
        debug!(trigger_id = id.get(), "trigger edited");
        Ok(trigger)
    }

    /// Removes a response or trigger selected by a type label.
    ///
    /// # Errors
    ///
    /// Returns [`RespondError::TypeInvalid`] for unknown labels, otherwise as
    /// for [`Respond::remove_response`] and [`Respond::remove_trigger`].
    pub fn remove(&mut self, target: &str, id: i64) -> Result<Removed, RespondError> {
        match target.parse::<EditTarget>()? {
            EditTarget::Response => {
                self.remove_response(ResponseId::new(id)).map(Removed::Response)
            }
            EditTarget::Trigger => self.remove_trigger(TriggerId::new(id)).map(Removed::Trigger),
        }
    }

    /// Removes a response together with all of its triggers.
    ///
    /// # Errors
    ///
    /// Returns [`RespondError::NotFound`] for unknown ids, or a store error.
    pub fn remove_response(&mut self, id: ResponseId) -> Result<RemovedResponse, RespondError> {
        let mut tx = self.store.begin()?;
        let removed = tx.delete_response(id)?;
        tx.commit()?;
        for trigger in &removed.triggers {
            self.cache.remove(trigger.id);
        }
        debug!(response_id = id.get(), cache = self.cache.len(), "response removed");
        Ok(removed)
    }

    /// Removes a trigger, and its response when it was the last trigger.
    ///
    /// # Errors
    ///
    /// Returns [`RespondError::NotFound`] for unknown ids, or a store error.
    pub fn remove_trigger(&mut self, id: TriggerId) -> Result<RemovedTrigger, RespondError> {
        let mut tx = self.store.begin()?;
        let removed = tx.delete_trigger(id)?;
        tx.commit()?;
        self.cache.remove(removed.trigger.id);
        debug!(
            trigger_id = id.get(),
            cascade = removed.response.is_some(),
            cache = self.cache.len(),
            "trigger removed"
        );
        Ok(removed)
    }

    /// Lists every response with its triggers, read fresh from the store.
    ///
    /// # Errors
    ///
    /// Returns [`RespondError::Store`] when reading fails.
    pub fn get_all(&self) -> Result<Vec<Response>, RespondError> {
        let mut tx = self.store.begin()?;
        let responses = tx.list_all()?;
        tx.commit()?;
        Ok(responses)
    }
}

/// Rejects an explicitly empty trigger list.
fn non_empty(triggers: TriggerSet) -> Result<Vec<String>, RespondError> {
    if triggers.is_empty() {
        return Err(RespondError::EmptyTriggerSet);
    }
    Ok(triggers.into_vec())
}
