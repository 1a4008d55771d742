// crates/respond-cli/src/format.rs
// ============================================================================
// Module: Respond Report Formatting
// Description: Human-readable renderings of responses and triggers.
// Purpose: Build list reports and chat-sized mutation summaries.
// Dependencies: respond-core
// ============================================================================

//! ## Overview
//! Reports render each response on its own line followed by one tab-indented
//! line per trigger, with chance shown as a percentage. Chat output splits a
//! report into non-empty lines, replaces tabs with an arrow, and leads with an
//! action header.

// ============================================================================
// SECTION: Imports
// ============================================================================

use respond_core::Edited;
use respond_core::Removed;
use respond_core::Response;
use respond_core::Trigger;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Reply when `list` finds nothing stored.
pub const EMPTY_LIST_MESSAGE: &str =
    "There are no responses yet. Use \"!help respond\" to add some.";
/// Replacement for tab indentation in chat output.
const CHAT_INDENT: &str = "---->";

// ============================================================================
// SECTION: Report Lines
// ============================================================================

/// Formats a response with its author.
#[must_use]
pub fn format_response(response: &Response) -> String {
    format!(
        "\nResponse (ID:{}) (Executable: {}) \"{}\" created by: {}\n",
        response.id, response.executable, response.response, response.created_by
    )
}

/// Formats a trigger with its author.
#[must_use]
pub fn format_trigger(trigger: &Trigger) -> String {
    format!(
        "\tTrigger (ID:{}) \"{}\" (Chance: {}%) created by: {}\n",
        trigger.id,
        trigger.trigger,
        percent(trigger.chance),
        trigger.created_by
    )
}

/// Formats a response after an edit.
#[must_use]
pub fn format_updated_response(response: &Response) -> String {
    format!(
        "\nResponse (ID:{}) (Executable: {}) \"{}\"\n",
        response.id, response.executable, response.response
    )
}

/// Formats a trigger after an edit.
#[must_use]
pub fn format_updated_trigger(trigger: &Trigger) -> String {
    format!(
        "\tTrigger (ID:{}) \"{}\" (Chance: {}%)\n",
        trigger.id,
        trigger.trigger,
        percent(trigger.chance)
    )
}

/// Formats a response followed by its loaded triggers.
#[must_use]
pub fn format_response_tree(response: &Response) -> String {
    let mut out = format_response(response);
    for trigger in response.triggers() {
        out.push_str(&format_trigger(trigger));
    }
    out
}

/// Formats every response and its triggers into one report.
#[must_use]
pub fn format_all(responses: &[Response]) -> String {
    responses.iter().map(format_response_tree).collect()
}

/// Formats the result of an edit.
#[must_use]
pub fn format_edited(edited: &Edited) -> String {
    match edited {
        Edited::Response(response) => format_updated_response(response),
        Edited::Trigger(trigger) => format_updated_trigger(trigger),
    }
}

/// Formats the result of a removal.
#[must_use]
pub fn format_removed(removed: &Removed) -> String {
    match removed {
        Removed::Response(removed) => {
            let mut out = format_response(&removed.response);
            for trigger in &removed.triggers {
                out.push_str(&format_trigger(trigger));
            }
            out
        }
        Removed::Trigger(removed) => {
            let mut out = String::new();
            if let Some(response) = &removed.response {
                out.push_str(&format_response(response));
            }
            out.push_str(&format_trigger(&removed.trigger));
            out
        }
    }
}

// ============================================================================
// SECTION: Chat Output
// ============================================================================

/// Splits a report into chat lines led by `action`.
#[must_use]
pub fn chat_lines(action: &str, formatted: &str) -> Vec<String> {
    let mut lines = vec![action.to_string()];
    lines.extend(
        formatted
            .split('\n')
            .filter(|line| !line.is_empty())
            .map(|line| line.replace('\t', CHAT_INDENT)),
    );
    lines
}

/// Renders a chance as a percentage without trailing zeros.
fn percent(chance: f64) -> String {
    (chance * 100.0).to_string()
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use respond_core::ResponseId;
    use respond_core::Timestamp;
    use respond_core::TriggerId;

    use super::*;

    fn trigger(id: i64, text: &str, chance: f64) -> Trigger {
        Trigger {
            id: TriggerId::new(id),
            trigger: text.to_string(),
            chance,
            response_id: ResponseId::new(1),
            created_by: "TestUser".to_string(),
            created_at: Timestamp::from_unix_millis(0),
            updated_at: Timestamp::from_unix_millis(0),
        }
    }

    fn response(triggers: Vec<Trigger>) -> Response {
        Response {
            id: ResponseId::new(1),
            response: "response one.".to_string(),
            executable: false,
            created_by: "TestUser2".to_string(),
            created_at: Timestamp::from_unix_millis(0),
            updated_at: Timestamp::from_unix_millis(0),
            triggers: Some(triggers),
        }
    }

    #[test]
    fn report_layout_matches_list_format() {
        let report = format_all(&[response(vec![trigger(4, "hello", 0.5), trigger(5, "hi", 1.0)])]);
        assert_eq!(
            report,
            "\nResponse (ID:1) (Executable: false) \"response one.\" created by: TestUser2\n\
             \tTrigger (ID:4) \"hello\" (Chance: 50%) created by: TestUser\n\
             \tTrigger (ID:5) \"hi\" (Chance: 100%) created by: TestUser\n"
        );
    }

    #[test]
    fn updated_formats_omit_author() {
        let edited = Edited::Trigger(trigger(2, "yo", 0.25));
        assert_eq!(format_edited(&edited), "\tTrigger (ID:2) \"yo\" (Chance: 25%)\n");
        let edited = Edited::Response(response(Vec::new()));
        assert_eq!(
            format_edited(&edited),
            "\nResponse (ID:1) (Executable: false) \"response one.\"\n"
        );
    }

    #[test]
    fn chat_lines_drop_blanks_and_replace_tabs() {
        let tree = format_response_tree(&response(vec![trigger(4, "hello", 0.5)]));
        let lines = chat_lines("Added:", &tree);
        assert_eq!(
            lines,
            vec![
                "Added:".to_string(),
                "Response (ID:1) (Executable: false) \"response one.\" created by: TestUser2"
                    .to_string(),
                "---->Trigger (ID:4) \"hello\" (Chance: 50%) created by: TestUser"
                    .to_string(),
            ]
        );
    }
}
