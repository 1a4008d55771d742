// crates/respond-cli/src/lib.rs
// ============================================================================
// Module: Respond CLI Library
// Description: Command semantics shared by the respond binary and its tests.
// Purpose: Expose admin checks, chance policy, formatting, and sessions.
// Dependencies: respond-broker, respond-core
// ============================================================================

//! ## Overview
//! The `respond` binary is a thin clap front end over [`session::Session`].
//! Everything it prints is produced here so it can be tested without a
//! terminal.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod admin;
pub mod chance;
pub mod format;
pub mod intent;
pub mod session;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use admin::AdminGate;
pub use admin::PermissionDenied;
pub use chance::ChancePolicy;
pub use intent::Intent;
pub use intent::Reply;
pub use session::AddRequest;
pub use session::AddTriggersRequest;
pub use session::EditRequest;
pub use session::Session;
pub use session::SessionError;
