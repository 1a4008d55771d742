// crates/respond-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for respond-config integration tests.
// Purpose: Parse TOML fixtures and assert on validation failures.
// =============================================================================

#![allow(dead_code, reason = "Helpers are shared across test binaries.")]

use respond_config::ConfigError;
use respond_config::RespondConfig;

/// Result type used by config tests.
pub type TestResult = Result<(), String>;

/// Engine section prepended to fixtures that do not declare one.
pub const RESPOND_SECTION: &str = "[respond]\ndefault_chance = 0.3\n";

/// Parses a TOML fixture without validating it.
///
/// Fixtures without a `[respond]` table get [`RESPOND_SECTION`] so they only
/// exercise the section under test.
pub fn config_from_toml(text: &str) -> Result<RespondConfig, String> {
    if text.contains("[respond]") {
        return toml::from_str(text).map_err(|err| err.to_string());
    }
    toml::from_str(&format!("{RESPOND_SECTION}{text}")).map_err(|err| err.to_string())
}

/// Returns a config parsed from the minimal valid fixture.
pub fn minimal_config() -> Result<RespondConfig, String> {
    config_from_toml(
        r#"
[respond]
default_chance = 0.3

[store]
type = "memory"
"#,
    )
}

/// Asserts that validation fails with an error containing `needle`.
pub fn assert_invalid(result: Result<(), ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(()) => Err("expected invalid config".to_string()),
    }
}
