// crates/respond-core/tests/common/mod.rs
// ============================================================================
// Module: Respond Test Fixtures
// Description: Shared seed data for engine tests.
// Purpose: Build a populated engine over the in-memory store.
// ============================================================================

#![allow(
    dead_code,
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Shared fixtures are not used by every test binary."
)]

use respond_core::InMemoryResponseStore;
use respond_core::Respond;
use respond_core::Response;
use respond_core::ResponseId;

/// Seeded engine plus the ids of the three seed responses.
pub struct Seeded {
    pub respond: Respond<InMemoryResponseStore>,
    pub one: ResponseId,
    pub two: ResponseId,
    pub three: ResponseId,
}

/// Builds an empty engine.
pub fn empty() -> Respond<InMemoryResponseStore> {
    Respond::load(InMemoryResponseStore::new()).expect("load empty store")
}

/// Builds an engine holding three responses and six triggers.
pub fn seeded() -> Seeded {
    let mut respond = empty();
    let one = respond.add("trigger one", "response one.", 0.03, "TestUser2", false).unwrap().id;
    respond.add_triggers(one, "trigger two", 0.43, "TestUser2").unwrap();
    respond.add_triggers(one, "trigger three", 0.93, "TestUser2").unwrap();
    let two = respond.add("trigger four", "response two.", 0.01, "TestUser", false).unwrap().id;
    respond.add_triggers(two, "trigger five", 1.0, "TestUser").unwrap();
    let three = respond.add("trigger six", "response three.", 0.01, "TestUser", false).unwrap().id;
    Seeded { respond, one, two, three }
}

/// Returns the trigger texts of `response` in id order.
pub fn trigger_texts(response: &Response) -> Vec<&str> {
    response.triggers().iter().map(|trigger| trigger.trigger.as_str()).collect()
}

/// Returns the set of trigger ids held by the store.
pub fn stored_trigger_ids(
    respond: &Respond<InMemoryResponseStore>,
) -> std::collections::BTreeSet<respond_core::TriggerId> {
    respond
        .get_all()
        .unwrap()
        .iter()
        .flat_map(|response| response.triggers().iter().map(|trigger| trigger.id))
        .collect()
}
