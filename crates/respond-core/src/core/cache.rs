// crates/respond-core/src/core/cache.rs
// ============================================================================
// Module: Trigger Cache
// Description: In-process mirror of every stored trigger row.
// Purpose: Give the matching engine a store-free view of active triggers.
// Dependencies: none
// ============================================================================

//! ## Overview
//! The cache is the single source of truth for matching. It is filled once
//! at startup and then kept in step with the store by explicit calls made
//! after each committed mutation. Divergence from the store is a bug.
//!
//! The cache performs no locking; its owner serializes access.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use crate::core::identifiers::TriggerId;
use crate::core::model::Trigger;

// ============================================================================
// SECTION: Cache
// ============================================================================

/// Mutable list of cached triggers keyed by identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriggerCache {
    /// Cached trigger rows.
    entries: Vec<Trigger>,
}

impl TriggerCache {
    /// Creates an empty cache.
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Appends a trigger.
    pub fn add(&mut self, trigger: Trigger) {
        self.entries.push(trigger);
    }

    /// Removes every entry with the given identity and returns how many were dropped.
    pub fn remove(&mut self, id: TriggerId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        before - self.entries.len()
    }

    /// Merges `trigger` into the entry with the same identity.
    ///
    /// Returns false when no entry matched.
    pub fn update(&mut self, trigger: &Trigger) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == trigger.id) else {
            return false;
        };
        entry.clone_from(trigger);
        true
    }

    /// Empties the cache, keeping the backing allocation.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the number of cached triggers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates cached triggers.
    pub fn iter(&self) -> impl Iterator<Item = &Trigger> {
        self.entries.iter()
    }

    /// Returns the cached entry for `id`.
    #[must_use]
    pub fn get(&self, id: TriggerId) -> Option<&Trigger> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Returns true when `id` is cached.
    #[must_use]
    pub fn contains(&self, id: TriggerId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the set of cached identities.
    #[must_use]
    pub fn ids(&self) -> BTreeSet<TriggerId> {
        self.entries.iter().map(|entry| entry.id).collect()
    }
}

impl Extend<Trigger> for TriggerCache {
    fn extend<I: IntoIterator<Item = Trigger>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl<'a> IntoIterator for &'a TriggerCache {
    type IntoIter = std::slice::Iter<'a, Trigger>;
    type Item = &'a Trigger;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
