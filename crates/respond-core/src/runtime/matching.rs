// crates/respond-core/src/runtime/matching.rs
// ============================================================================
// Module: Respond Matching
// Description: Candidate scan, chance admission, and response deduplication.
// Purpose: Keep the store-free half of message resolution pure and testable.
// Dependencies: crate::core, rand, tracing
// ============================================================================

//! ## Overview
//! A trigger is a candidate when the message contains its text (case
//! sensitive, no word boundaries). Each candidate gets one independent
//! uniform draw in `[0, 1)` and is admitted when the draw is below its
//! chance, so a chance of `1` always fires and `0` never does.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use rand::Rng;
use tracing::debug;

use crate::core::ResponseId;
use crate::core::Trigger;
use crate::core::TriggerCache;

// ============================================================================
// SECTION: Matching
// ============================================================================

/// Returns every cached trigger whose text occurs in `message`.
#[must_use]
pub fn candidates<'a>(cache: &'a TriggerCache, message: &str) -> Vec<&'a Trigger> {
    cache.iter().filter(|trigger| trigger.matches(message)).collect()
}

/// Applies one chance draw per candidate and keeps the admitted ones.
pub fn admit<'a, R: Rng + ?Sized>(candidates: &[&'a Trigger], rng: &mut R) -> Vec<&'a Trigger> {
    candidates
        .iter()
        .copied()
        .filter(|trigger| {
            let draw: f64 = rng.gen_range(0.0..1.0);
            let admitted = draw < trigger.chance;
            debug!(
                trigger_id = trigger.id.get(),
                chance = trigger.chance,
                draw,
                admitted,
                "chance draw"
            );
            admitted
        })
        .collect()
}

/// Returns the distinct parent ids of `admitted`, in first-admission order.
#[must_use]
pub fn parent_ids(admitted: &[&Trigger]) -> Vec<ResponseId> {
    let mut seen = BTreeSet::new();
    admitted
        .iter()
        .map(|trigger| trigger.response_id)
        .filter(|id| seen.insert(*id))
        .collect()
}
