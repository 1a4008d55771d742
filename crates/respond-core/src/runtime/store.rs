// crates/respond-core/src/runtime/store.rs
// ============================================================================
// Module: Respond In-Memory Store
// Description: Transactional in-memory response store for tests and demos.
// Purpose: Provide a deterministic store implementation without external deps.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! This module provides an in-memory implementation of [`ResponseStore`].
//! A transaction holds the store lock and edits a private copy of the rows;
//! committing swaps the copy in, dropping it discards every change. It
//! enforces the same rules and foreign-key checks as the SQLite store.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::core::Response;
use crate::core::ResponseId;
use crate::core::ResponseUpdate;
use crate::core::Timestamp;
use crate::core::Trigger;
use crate::core::TriggerId;
use crate::core::rules::ResponseFields;
use crate::core::rules::RuleSet;
use crate::core::rules::TriggerFields;
use crate::core::rules::validate_response;
use crate::core::rules::validate_trigger;
use crate::interfaces::ResponseStore;
use crate::interfaces::StoreError;
use crate::interfaces::StoreTransaction;

// ============================================================================
// SECTION: State
// ============================================================================

/// Rows and id sequences held by the store.
#[derive(Debug, Clone, Default)]
struct MemoryState {
    /// Response rows without their trigger relationship.
    responses: BTreeMap<ResponseId, Response>,
    /// Trigger rows.
    triggers: BTreeMap<TriggerId, Trigger>,
    /// Last assigned response id.
    last_response_id: i64,
    /// Last assigned trigger id.
    last_trigger_id: i64,
}

impl MemoryState {
    /// Returns the triggers owned by `response_id`, in id order.
    fn triggers_of(&self, response_id: ResponseId) -> Vec<Trigger> {
        self.triggers
            .values()
            .filter(|trigger| trigger.response_id == response_id)
            .cloned()
            .collect()
    }
}

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// In-memory response store for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct InMemoryResponseStore {
    /// Committed state protected by a mutex.
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryResponseStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self { state: Arc::new(Mutex::new(MemoryState::default())) }
    }
}

impl ResponseStore for InMemoryResponseStore {
    type Transaction<'a> = InMemoryTransaction<'a>;

    fn begin(&self) -> Result<Self::Transaction<'_>, StoreError> {
        let guard = self
            .state
            .lock()
            .map_err(|_| StoreError::Store("response store mutex poisoned".to_string()))?;
        let working = guard.clone();
        Ok(InMemoryTransaction { guard, working })
    }
}

/// Transaction over [`InMemoryResponseStore`].
#[derive(Debug)]
pub struct InMemoryTransaction<'a> {
    /// Lock on the committed state, held for the transaction lifetime.
    guard: MutexGuard<'a, MemoryState>,
    /// Working copy receiving every write.
    working: MemoryState,
}

impl StoreTransaction for InMemoryTransaction<'_> {
    fn create_response(
        &mut self,
        text: &str,
        executable: bool,
        author: &str,
    ) -> Result<Response, StoreError> {
        validate_response(
            RuleSet::Creating,
            &ResponseFields { response: Some(text), created_by: Some(author) },
        )?;
        self.working.last_response_id += 1;
        let now = Timestamp::now();
        let response = Response {
            id: ResponseId::new(self.working.last_response_id),
            response: text.to_string(),
            executable,
            created_by: author.to_string(),
            created_at: now,
            updated_at: now,
            triggers: None,
        };
        self.working.responses.insert(response.id, response.clone());
        Ok(response)
    }

    fn create_trigger(
        &mut self,
        response_id: ResponseId,
        text: &str,
        chance: f64,
        author: &str,
    ) -> Result<Trigger, StoreError> {
        validate_trigger(
            RuleSet::Creating,
            &TriggerFields { trigger: Some(text), chance: Some(chance), created_by: Some(author) },
        )?;
        if !self.working.responses.contains_key(&response_id) {
            return Err(StoreError::Invalid(format!(
                "trigger references missing response {response_id}"
            )));
        }
        self.working.last_trigger_id += 1;
        let now = Timestamp::now();
        let trigger = Trigger {
            id: TriggerId::new(self.working.last_trigger_id),
            trigger: text.to_string(),
            chance,
            response_id,
            created_by: author.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.working.triggers.insert(trigger.id, trigger.clone());
        Ok(trigger)
    }

    fn fetch_response(
        &mut self,
        id: ResponseId,
        with_triggers: bool,
    ) -> Result<Response, StoreError> {
        let mut response = self
            .working
            .responses
            .get(&id)
            .cloned()
            .ok_or(StoreError::response_not_found(id))?;
        if with_triggers {
            response.triggers = Some(self.working.triggers_of(id));
        }
        Ok(response)
    }

    fn fetch_trigger(&mut self, id: TriggerId) -> Result<Trigger, StoreError> {
        self.working.triggers.get(&id).cloned().ok_or(StoreError::trigger_not_found(id))
    }

    fn list_triggers(&mut self) -> Result<Vec<Trigger>, StoreError> {
        Ok(self.working.triggers.values().cloned().collect())
    }

    fn list_all(&mut self) -> Result<Vec<Response>, StoreError> {
        Ok(self
            .working
            .responses
            .values()
            .map(|response| Response {
                triggers: Some(self.working.triggers_of(response.id)),
                ..response.clone()
            })
            .collect())
    }

    fn update_response(
        &mut self,
        id: ResponseId,
        update: &ResponseUpdate,
    ) -> Result<Response, StoreError> {
        validate_response(
            RuleSet::Saving,
            &ResponseFields { response: Some(&update.text), created_by: None },
        )?;
        let row = self
            .working
            .responses
            .get_mut(&id)
            .ok_or(StoreError::NoRowsUpdated { entity: "response", id: id.get() })?;
        row.response.clone_from(&update.text);
        if let Some(executable) = update.executable {
            row.executable = executable;
        }
        row.updated_at = Timestamp::now();
        Ok(row.clone())
    }

    fn patch_trigger(
        &mut self,
        id: TriggerId,
        text: &str,
        chance: f64,
    ) -> Result<Trigger, StoreError> {
        validate_trigger(
            RuleSet::Saving,
            &TriggerFields { trigger: Some(text), chance: Some(chance), created_by: None },
        )?;
        let row = self
            .working
            .triggers
            .get_mut(&id)
            .ok_or(StoreError::NoRowsUpdated { entity: "trigger", id: id.get() })?;
        text.clone_into(&mut row.trigger);
        row.chance = chance;
        row.updated_at = Timestamp::now();
        Ok(row.clone())
    }

    fn destroy_response(&mut self, id: ResponseId) -> Result<(), StoreError> {
        if self.working.triggers.values().any(|trigger| trigger.response_id == id) {
            return Err(StoreError::Invalid(format!("response {id} still owns triggers")));
        }
        self.working.responses.remove(&id);
        Ok(())
    }

    fn destroy_trigger(&mut self, id: TriggerId) -> Result<(), StoreError> {
        self.working.triggers.remove(&id);
        Ok(())
    }

    fn commit(mut self) -> Result<(), StoreError> {
        *self.guard = std::mem::take(&mut self.working);
        Ok(())
    }
}
