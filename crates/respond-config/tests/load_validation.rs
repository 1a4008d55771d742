//! Config load validation tests for respond-config.
// crates/respond-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

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

use std::io::Write;
use std::path::Path;

use respond_config::ConfigError;
use respond_config::RespondConfig;
use respond_config::StoreType;
use tempfile::NamedTempFile;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<RespondConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

fn write_config(text: &str) -> Result<NamedTempFile, String> {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(text.as_bytes()).map_err(|err| err.to_string())?;
    Ok(file)
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    let path = Path::new(&long_path);
    assert_invalid(RespondConfig::load(Some(path)), "config path exceeds max length")?;
    Ok(())
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    let path = Path::new(&long_component);
    assert_invalid(RespondConfig::load(Some(path)), "config path component too long")?;
    Ok(())
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let payload = vec![b'a'; 1_048_577];
    file.write_all(&payload).map_err(|err| err.to_string())?;
    assert_invalid(RespondConfig::load(Some(file.path())), "config file exceeds size limit")?;
    Ok(())
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(&[0xFF, 0xFE, 0xFF]).map_err(|err| err.to_string())?;
    assert_invalid(RespondConfig::load(Some(file.path())), "config file must be utf-8")?;
    Ok(())
}

#[test]
fn load_rejects_missing_explicit_path() -> TestResult {
    let dir = tempfile::tempdir().map_err(|err| err.to_string())?;
    let path = dir.path().join("absent.toml");
    assert_invalid(RespondConfig::load(Some(&path)), "config io error")?;
    Ok(())
}

#[test]
fn load_rejects_malformed_toml() -> TestResult {
    let file = write_config("[respond\ndefault_chance = ")?;
    assert_invalid(RespondConfig::load(Some(file.path())), "config parse error")?;
    Ok(())
}

#[test]
fn load_rejects_unknown_fields() -> TestResult {
    let file = write_config("[respond]\nmystery = true\n")?;
    assert_invalid(RespondConfig::load(Some(file.path())), "config parse error")?;
    Ok(())
}

#[test]
fn load_runs_validation() -> TestResult {
    let file = write_config("[respond]\ndefault_chance = 2.0\n")?;
    assert_invalid(
        RespondConfig::load(Some(file.path())),
        "respond.default_chance must be between 0 and 1",
    )?;
    Ok(())
}

#[test]
fn load_rejects_missing_default_chance() -> TestResult {
    let file = write_config("[respond]\nno_admin = true\n[store]\ntype = \"memory\"\n")?;
    assert_invalid(RespondConfig::load(Some(file.path())), "respond.default_chance is required")?;
    let file = write_config("")?;
    assert_invalid(RespondConfig::load(Some(file.path())), "respond.default_chance is required")?;
    Ok(())
}

#[test]
fn load_fills_defaults_around_default_chance() -> TestResult {
    let file = write_config("[respond]\ndefault_chance = 0.3\n")?;
    let config = RespondConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config.store.store_type != StoreType::Sqlite {
        return Err("expected sqlite default store".to_string());
    }
    if config.store.path.as_deref() != Some(Path::new("respond.db")) {
        return Err("expected default store path".to_string());
    }
    let chance = config.respond.chance().map_err(|err| err.to_string())?;
    if (chance - 0.3).abs() > f64::EPSILON {
        return Err("expected configured chance 0.3".to_string());
    }
    if !config.exec.enabled || !config.respond.clamp_chance {
        return Err("expected exec and clamping enabled by default".to_string());
    }
    Ok(())
}

#[test]
fn load_accepts_full_config() -> TestResult {
    let file = write_config(
        r#"
[respond]
default_chance = 0.5
no_admin = false
admins = [" ops.example.org ", "nick!user@host"]
clamp_chance = false

[store]
type = "sqlite"
path = "data/respond.db"
busy_timeout_ms = 1000
journal_mode = "delete"
sync_mode = "normal"

[publish]
type = "pastebin"
api_key = "dev-key"
timeout_ms = 2000

[exec]
enabled = false
shell = "/bin/bash"
timeout_ms = 1500
max_output_lines = 3
"#,
    )?;
    let config = RespondConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if config.respond.admins != vec!["ops.example.org".to_string(), "nick!user@host".to_string()] {
        return Err("expected trimmed admin entries".to_string());
    }
    let sqlite = config.store.sqlite().ok_or_else(|| "expected sqlite config".to_string())?;
    if sqlite.busy_timeout_ms != 1000 {
        return Err("expected busy timeout to carry over".to_string());
    }
    if config.publish.effective_base_url() != "https://pastebin.com" {
        return Err("expected pastebin default url".to_string());
    }
    if config.exec.max_output_lines != 3 {
        return Err("expected max_output_lines 3".to_string());
    }
    Ok(())
}
