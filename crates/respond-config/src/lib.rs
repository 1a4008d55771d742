// crates/respond-config/src/lib.rs
// ============================================================================
// Module: Respond Config Library
// Description: Canonical config model and validation for respond.toml.
// Purpose: Single source of truth for respond.toml semantics.
// Dependencies: respond-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `respond-config` defines the configuration model for the `respond` binary:
//! engine defaults and the admin gate, the store backend, the report
//! publisher, and the executable-response runner. Loading is strict and
//! fails closed on invalid input.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
