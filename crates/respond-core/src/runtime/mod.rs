// crates/respond-core/src/runtime/mod.rs
// ============================================================================
// Module: Respond Runtime
// Description: Matching engine, mutation orchestrator, and in-memory store.
// Purpose: Resolve incoming messages to responses and apply edits atomically.
// Dependencies: crate::{core, interfaces}, rand, tracing
// ============================================================================

//! ## Overview
//! [`Respond`] owns the trigger cache and a store handle. Reads go through
//! the cache; every mutation runs in one store transaction and touches the
//! cache only after the commit succeeds.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod error;
pub mod matching;
pub mod respond;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use error::RespondError;
pub use respond::Edited;
pub use respond::Removed;
pub use respond::Respond;
pub use store::InMemoryResponseStore;
