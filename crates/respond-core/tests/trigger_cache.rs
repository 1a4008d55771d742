// crates/respond-core/tests/trigger_cache.rs
// ============================================================================
// Module: Trigger Cache Tests
// Description: Add, update, remove, and clear semantics of the trigger cache.
// Purpose: Ensure the cache mirrors trigger rows by identity.
// Dependencies: respond-core
// ============================================================================

//! Trigger cache unit behavior.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use respond_core::ResponseId;
use respond_core::Timestamp;
use respond_core::Trigger;
use respond_core::TriggerCache;
use respond_core::TriggerId;

fn trigger(id: i64, text: &str) -> Trigger {
    Trigger {
        id: TriggerId::new(id),
        trigger: text.to_string(),
        chance: 0.5,
        response_id: ResponseId::new(1),
        created_by: "tester".to_string(),
        created_at: Timestamp::from_unix_millis(0),
        updated_at: Timestamp::from_unix_millis(0),
    }
}

#[test]
fn add_appends_entries() {
    let mut cache = TriggerCache::new();
    assert!(cache.is_empty());
    cache.add(trigger(1, "a"));
    cache.add(trigger(2, "b"));
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.iter().map(|t| t.trigger.as_str()).collect::<Vec<_>>(), vec!["a", "b"]);
}

#[test]
fn remove_drops_every_entry_with_the_identity() {
    let mut cache = TriggerCache::new();
    cache.add(trigger(1, "a"));
    cache.add(trigger(1, "stale copy"));
    cache.add(trigger(2, "b"));
    assert_eq!(cache.remove(TriggerId::new(1)), 2);
    assert_eq!(cache.len(), 1);
    assert!(cache.contains(TriggerId::new(2)));
    assert_eq!(cache.remove(TriggerId::new(9)), 0);
}

#[test]
fn update_merges_by_identity() {
    let mut cache = TriggerCache::new();
    cache.add(trigger(1, "a"));
    let mut changed = trigger(1, "renamed");
    changed.chance = 0.9;
    assert!(cache.update(&changed));
    let cached = cache.get(TriggerId::new(1)).unwrap();
    assert_eq!(cached.trigger, "renamed");
    assert!((cached.chance - 0.9).abs() < f64::EPSILON);
}

#[test]
fn update_of_unknown_identity_is_noop() {
    let mut cache = TriggerCache::new();
    cache.add(trigger(1, "a"));
    let before = cache.clone();
    assert!(!cache.update(&trigger(7, "ghost")));
    assert_eq!(cache, before);
}

#[test]
fn clear_empties_in_place() {
    let mut cache = TriggerCache::new();
    cache.extend([trigger(1, "a"), trigger(2, "b")]);
    cache.clear();
    assert!(cache.is_empty());
    assert!(cache.ids().is_empty());
    cache.add(trigger(3, "c"));
    assert_eq!(cache.ids().into_iter().collect::<Vec<_>>(), vec![TriggerId::new(3)]);
}
