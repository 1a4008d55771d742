// crates/respond-core/src/lib.rs
// ============================================================================
// Module: Respond Core Library
// Description: Public API surface for the respond trigger engine.
// Purpose: Expose the data model, trigger cache, store interfaces, and runtime.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Respond core maintains (trigger -> response) pairs with probabilistic
//! firing. Incoming chat text is scanned against an in-memory trigger cache,
//! matched triggers are admitted by their per-trigger chance, and the parent
//! responses are resolved fresh from the store and deduplicated.
//!
//! Persistence is reached only through the [`ResponseStore`] interface so the
//! engine stays backend-agnostic; the SQLite adapter lives in
//! `respond-store-sqlite` and an in-memory store ships here for tests.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::ResponseStore;
pub use interfaces::StoreError;
pub use interfaces::StoreTransaction;
pub use runtime::Edited;
pub use runtime::InMemoryResponseStore;
pub use runtime::Removed;
pub use runtime::Respond;
pub use runtime::RespondError;
