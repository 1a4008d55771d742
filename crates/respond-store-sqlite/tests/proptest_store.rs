// crates/respond-store-sqlite/tests/proptest_store.rs
// ============================================================================
// Module: SQLite Store Property-Based Tests
// Description: Generated mutation sequences against the SQLite store.
// Purpose: Keep the trigger cache and the database in step across reopen.
// Dependencies: proptest, respond-core, respond-store-sqlite, tempfile
// ============================================================================

//! Property-based tests for cache and database consistency.

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

use std::collections::BTreeSet;
use std::path::Path;

use proptest::prelude::*;
use respond_core::Respond;
use respond_core::TriggerId;
use respond_store_sqlite::SqliteResponseStore;
use respond_store_sqlite::SqliteStoreConfig;
use tempfile::TempDir;

/// Mutation applied to the engine in a generated sequence.
#[derive(Debug, Clone)]
enum Op {
    Add(Vec<String>),
    AddTriggers(usize, String),
    EditTrigger(usize, String),
    RemoveTrigger(usize),
    RemoveResponse(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let text = "[a-z ]{0,5}";
    prop_oneof![
        prop::collection::vec(text, 0 .. 3).prop_map(Op::Add),
        (any::<usize>(), text).prop_map(|(pick, t)| Op::AddTriggers(pick, t)),
        (any::<usize>(), text).prop_map(|(pick, t)| Op::EditTrigger(pick, t)),
        any::<usize>().prop_map(Op::RemoveTrigger),
        any::<usize>().prop_map(Op::RemoveResponse),
    ]
}

fn open(path: &Path) -> Respond<SqliteResponseStore> {
    Respond::load(SqliteResponseStore::new(SqliteStoreConfig::new(path)).unwrap()).unwrap()
}

fn stored_ids(respond: &Respond<SqliteResponseStore>) -> BTreeSet<TriggerId> {
    respond
        .get_all()
        .unwrap()
        .iter()
        .flat_map(|response| response.triggers().iter().map(|trigger| trigger.id))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn cache_matches_database_after_any_sequence(
        ops in prop::collection::vec(op_strategy(), 1 .. 16),
    ) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("respond.db");
        let mut respond = open(&path);
        for op in ops {
            let all = respond.get_all().unwrap();
            let triggers: Vec<_> =
                all.iter().flat_map(|r| r.triggers().iter().map(|t| t.id)).collect();
            let _ = match op {
                Op::Add(texts) => respond.add(texts, "reply", 0.5, "prop", false).map(|_| ()),
                Op::AddTriggers(pick, text) if !all.is_empty() => {
                    respond.add_triggers(all[pick % all.len()].id, text, 0.5, "prop").map(|_| ())
                }
                Op::EditTrigger(pick, text) if !triggers.is_empty() => {
                    respond.edit_trigger(triggers[pick % triggers.len()], &text, None).map(|_| ())
                }
                Op::RemoveTrigger(pick) if !triggers.is_empty() => {
                    respond.remove_trigger(triggers[pick % triggers.len()]).map(|_| ())
                }
                Op::RemoveResponse(pick) if !all.is_empty() => {
                    respond.remove_response(all[pick % all.len()].id).map(|_| ())
                }
                _ => Ok(()),
            };
            prop_assert_eq!(respond.cache().ids(), stored_ids(&respond));
            let all = respond.get_all().unwrap();
            prop_assert!(all.iter().all(|response| !response.triggers().is_empty()));
        }

        let expected = respond.cache().ids();
        drop(respond);
        let reopened = open(&path);
        prop_assert_eq!(reopened.cache().ids(), expected);
    }
}
