// crates/respond-core/src/core/mod.rs
// ============================================================================
// Module: Respond Core Types
// Description: Canonical response/trigger records, validation, and cache.
// Purpose: Provide stable, serializable types shared by stores and runtime.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Core types define the two persisted entities ([`Response`], [`Trigger`]),
//! the rule validator that guards them, and the [`TriggerCache`] mirror used
//! by the matching engine.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod cache;
pub mod identifiers;
pub mod model;
pub mod rules;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use cache::TriggerCache;
pub use identifiers::ResponseId;
pub use identifiers::TriggerId;
pub use model::EditTarget;
pub use model::InvalidEditTarget;
pub use model::RemovedResponse;
pub use model::RemovedTrigger;
pub use model::Response;
pub use model::ResponseUpdate;
pub use model::Trigger;
pub use model::TriggerSet;
pub use model::response_from_value;
pub use rules::ResponseFields;
pub use rules::Rule;
pub use rules::RuleSet;
pub use rules::RuleViolation;
pub use rules::TriggerFields;
pub use rules::ValidationError;
pub use time::Timestamp;
