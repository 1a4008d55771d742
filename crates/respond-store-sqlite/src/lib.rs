// crates/respond-store-sqlite/src/lib.rs
// ============================================================================
// Module: Respond SQLite Store Library
// Description: SQLite-backed ResponseStore implementation.
// Purpose: Persist responses and triggers with transactional integrity.
// Dependencies: respond-core, rusqlite
// ============================================================================

//! ## Overview
//! `respond-store-sqlite` implements [`respond_core::ResponseStore`] over a
//! local `SQLite` database. Every operation runs inside a `BEGIN IMMEDIATE`
//! transaction that is rolled back unless explicitly committed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::SqliteResponseStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
pub use store::SqliteTransaction;
