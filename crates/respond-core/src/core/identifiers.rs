// crates/respond-core/src/core/identifiers.rs
// ============================================================================
// Module: Respond Identifiers
// Description: Store-assigned identifiers for responses and triggers.
// Purpose: Keep response and trigger ids from being mixed up at call sites.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Identifiers are opaque integers assigned by the store on insert. They
//! serialize as bare numbers so reports and JSON payloads stay flat.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Response identifier assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseId(i64);

impl ResponseId {
    /// Creates a response identifier from its raw value.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ResponseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for ResponseId {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

/// Trigger identifier assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TriggerId(i64);

impl TriggerId {
    /// Creates a trigger identifier from its raw value.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for TriggerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for TriggerId {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}
