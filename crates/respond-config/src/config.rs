// crates/respond-config/src/config.rs
// ============================================================================
// Module: Respond Configuration
// Description: Configuration loading and validation for the respond binary.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: respond-store-sqlite, serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! The path comes from the caller, then `RESPOND_CONFIG`, then
//! `./respond.toml`. Only the implicit default file may be absent, in which
//! case every section takes its defaults. Invalid values fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use respond_store_sqlite::SqliteStoreConfig;
use respond_store_sqlite::SqliteStoreMode;
use respond_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "respond.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "RESPOND_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of admin entries.
pub(crate) const MAX_ADMINS: usize = 256;
/// Default database filename for the sqlite backend.
pub(crate) const DEFAULT_STORE_PATH: &str = "respond.db";
/// Default busy timeout for the sqlite backend (ms).
pub(crate) const DEFAULT_STORE_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Default hastebin base URL.
pub const DEFAULT_HASTE_URL: &str = "https://hastebin.com";
/// Default pastebin API base URL.
pub const DEFAULT_PASTEBIN_URL: &str = "https://pastebin.com";
/// Default publish request timeout (ms).
pub(crate) const DEFAULT_PUBLISH_TIMEOUT_MS: u64 = 10_000;
/// Minimum publish and exec timeout (ms).
pub(crate) const MIN_TIMEOUT_MS: u64 = 100;
/// Maximum publish and exec timeout (ms).
pub(crate) const MAX_TIMEOUT_MS: u64 = 60_000;
/// Default shell used for executable responses.
pub(crate) const DEFAULT_SHELL: &str = "/bin/sh";
/// Default exec timeout (ms).
pub(crate) const DEFAULT_EXEC_TIMEOUT_MS: u64 = 5_000;
/// Default cap on reply lines produced by one executable response.
pub(crate) const DEFAULT_MAX_OUTPUT_LINES: usize = 10;
/// Maximum configurable reply lines per executable response.
pub(crate) const MAX_OUTPUT_LINES: usize = 100;
/// Message returned when pastebin is selected without a key.
pub const PASTEBIN_KEY_MESSAGE: &str =
    "Provide a Pastebin API Key in your configuration to enable this feature.";

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Respond binary configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RespondConfig {
    /// Engine defaults and admin gate.
    #[serde(default)]
    pub respond: RespondSettings,
    /// Response store configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Report publisher configuration.
    #[serde(default)]
    pub publish: PublishConfig,
    /// Executable response configuration.
    #[serde(default)]
    pub exec: ExecConfig,
}

impl RespondConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved.path)?;
        if resolved.implicit && !resolved.path.exists() {
            let mut config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        let bytes = fs::read(&resolved.path).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.respond.validate()?;
        self.store.validate()?;
        self.publish.validate()?;
        self.exec.validate()?;
        Ok(())
    }
}

/// Engine defaults and the admin gate.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RespondSettings {
    /// Chance used when a command does not supply one. Required.
    #[serde(default)]
    pub default_chance: Option<f64>,
    /// Bypasses the admin gate for every caller.
    #[serde(default)]
    pub no_admin: bool,
    /// Hostnames or full hostmasks treated as administrators.
    #[serde(default)]
    pub admins: Vec<String>,
    /// Clamps out-of-range chance input into `[0, 1]` before validation.
    #[serde(default = "default_true")]
    pub clamp_chance: bool,
}

impl Default for RespondSettings {
    fn default() -> Self {
        Self {
            default_chance: None,
            no_admin: false,
            admins: Vec::new(),
            clamp_chance: true,
        }
    }
}

impl RespondSettings {
    /// Returns the configured default chance.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the chance is missing or outside `[0, 1]`.
    pub fn chance(&self) -> Result<f64, ConfigError> {
        let Some(chance) = self.default_chance else {
            return Err(ConfigError::Invalid("respond.default_chance is required".to_string()));
        };
        if !chance.is_finite() || !(0.0 ..= 1.0).contains(&chance) {
            return Err(ConfigError::Invalid(
                "respond.default_chance must be between 0 and 1".to_string(),
            ));
        }
        Ok(chance)
    }

    /// Validates engine settings.
    fn validate(&mut self) -> Result<(), ConfigError> {
        self.chance()?;
        if self.admins.len() > MAX_ADMINS {
            return Err(ConfigError::Invalid(format!(
                "respond.admins exceeds max entries ({MAX_ADMINS})"
            )));
        }
        for admin in &mut self.admins {
            let trimmed = admin.trim();
            if trimmed.is_empty() {
                return Err(ConfigError::Invalid(
                    "respond.admins entries must be non-empty".to_string(),
                ));
            }
            *admin = trimmed.to_string();
        }
        Ok(())
    }
}

/// Response store configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Store backend type.
    #[serde(rename = "type", default)]
    pub store_type: StoreType,
    /// `SQLite` database path when using the sqlite backend.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_store_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` synchronous mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_type: StoreType::default(),
            path: Some(PathBuf::from(DEFAULT_STORE_PATH)),
            busy_timeout_ms: default_store_busy_timeout_ms(),
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

impl StoreConfig {
    /// Validates store configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match self.store_type {
            StoreType::Memory => {
                if self.path.is_some() {
                    return Err(ConfigError::Invalid("memory store must not set path".to_string()));
                }
                Ok(())
            }
            StoreType::Sqlite => {
                let path = self.path.as_ref().ok_or_else(|| {
                    ConfigError::Invalid("sqlite store requires path".to_string())
                })?;
                validate_store_path(path)?;
                if self.busy_timeout_ms == 0 {
                    return Err(ConfigError::Invalid(
                        "store busy_timeout_ms must be greater than zero".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Returns the sqlite store configuration when the sqlite backend is selected.
    #[must_use]
    pub fn sqlite(&self) -> Option<SqliteStoreConfig> {
        match (self.store_type, &self.path) {
            (StoreType::Sqlite, Some(path)) => Some(SqliteStoreConfig {
                path: path.clone(),
                busy_timeout_ms: self.busy_timeout_ms,
                journal_mode: self.journal_mode,
                sync_mode: self.sync_mode,
            }),
            _ => None,
        }
    }
}

/// Response store backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreType {
    /// Use the in-memory store (state is lost on exit).
    Memory,
    /// Use the `SQLite`-backed durable store.
    #[default]
    Sqlite,
}

/// Report publisher configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublishConfig {
    /// Publisher backend.
    #[serde(rename = "type", default)]
    pub publish_type: PublishType,
    /// Service base URL; defaults per backend.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Pastebin developer key.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Request timeout in milliseconds.
    #[serde(default = "default_publish_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            publish_type: PublishType::default(),
            base_url: None,
            api_key: None,
            timeout_ms: default_publish_timeout_ms(),
        }
    }
}

impl PublishConfig {
    /// Validates publisher configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_timeout("publish.timeout_ms", self.timeout_ms)?;
        if let Some(base_url) = &self.base_url {
            let parsed = Url::parse(base_url.trim()).map_err(|err| {
                ConfigError::Invalid(format!("publish.base_url is not a valid url: {err}"))
            })?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ConfigError::Invalid(
                    "publish.base_url must use http:// or https://".to_string(),
                ));
            }
        }
        if self.publish_type == PublishType::Pastebin
            && self.api_key.as_deref().is_none_or(|key| key.trim().is_empty())
        {
            return Err(ConfigError::Invalid(PASTEBIN_KEY_MESSAGE.to_string()));
        }
        Ok(())
    }

    /// Returns the effective base URL for the selected backend.
    #[must_use]
    pub fn effective_base_url(&self) -> &str {
        match (&self.base_url, self.publish_type) {
            (Some(url), _) => url.trim(),
            (None, PublishType::Pastebin) => DEFAULT_PASTEBIN_URL,
            (None, PublishType::Haste | PublishType::None) => DEFAULT_HASTE_URL,
        }
    }
}

/// Report publisher backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PublishType {
    /// Hastebin-compatible document service.
    #[default]
    Haste,
    /// Pastebin API.
    Pastebin,
    /// Publishing disabled; reports must be printed locally.
    None,
}

/// Executable response configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecConfig {
    /// Whether executable responses are run at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Shell used as `shell -c <text>`.
    #[serde(default = "default_shell")]
    pub shell: PathBuf,
    /// Timeout per command in milliseconds.
    #[serde(default = "default_exec_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum reply lines taken from command output.
    #[serde(default = "default_max_output_lines")]
    pub max_output_lines: usize,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            shell: default_shell(),
            timeout_ms: default_exec_timeout_ms(),
            max_output_lines: default_max_output_lines(),
        }
    }
}

impl ExecConfig {
    /// Validates exec configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_timeout("exec.timeout_ms", self.timeout_ms)?;
        if self.shell.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("exec.shell must be non-empty".to_string()));
        }
        validate_path(&self.shell)?;
        if self.max_output_lines == 0 || self.max_output_lines > MAX_OUTPUT_LINES {
            return Err(ConfigError::Invalid(format!(
                "exec.max_output_lines must be between 1 and {MAX_OUTPUT_LINES}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Config path together with how it was chosen.
struct ResolvedPath {
    /// Path to read.
    path: PathBuf,
    /// True when neither the caller nor the environment supplied the path.
    implicit: bool,
}

/// Resolves the config path from arguments or environment.
fn resolve_path(path: Option<&Path>) -> Result<ResolvedPath, ConfigError> {
    if let Some(path) = path {
        return Ok(ResolvedPath { path: path.to_path_buf(), implicit: false });
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(ResolvedPath { path: PathBuf::from(env_path), implicit: false });
    }
    Ok(ResolvedPath { path: PathBuf::from(DEFAULT_CONFIG_NAME), implicit: true })
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates store paths against length limits.
fn validate_store_path(path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::Invalid("store path must be non-empty".to_string()));
    }
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("store path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("store path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a timeout value in milliseconds.
fn validate_timeout(field: &str, value: u64) -> Result<(), ConfigError> {
    if !(MIN_TIMEOUT_MS ..= MAX_TIMEOUT_MS).contains(&value) {
        return Err(ConfigError::Invalid(format!(
            "{field} must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS}"
        )));
    }
    Ok(())
}

/// Returns `true` for serde defaults.
const fn default_true() -> bool {
    true
}

/// Returns the default store busy timeout.
const fn default_store_busy_timeout_ms() -> u64 {
    DEFAULT_STORE_BUSY_TIMEOUT_MS
}

/// Returns the default publish timeout.
const fn default_publish_timeout_ms() -> u64 {
    DEFAULT_PUBLISH_TIMEOUT_MS
}

/// Returns the default exec shell.
fn default_shell() -> PathBuf {
    PathBuf::from(DEFAULT_SHELL)
}

/// Returns the default exec timeout.
const fn default_exec_timeout_ms() -> u64 {
    DEFAULT_EXEC_TIMEOUT_MS
}

/// Returns the default exec output line cap.
const fn default_max_output_lines() -> usize {
    DEFAULT_MAX_OUTPUT_LINES
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use super::*;

    #[test]
    fn validate_timeout_accepts_bounds() {
        assert!(validate_timeout("t", MIN_TIMEOUT_MS).is_ok());
        assert!(validate_timeout("t", MAX_TIMEOUT_MS).is_ok());
    }

    #[test]
    fn validate_timeout_rejects_out_of_range() {
        let err = validate_timeout("exec.timeout_ms", 0).unwrap_err();
        assert!(err.to_string().contains("exec.timeout_ms must be between"));
        assert!(validate_timeout("t", MAX_TIMEOUT_MS + 1).is_err());
    }

    #[test]
    fn validate_store_path_rejects_empty() {
        let err = validate_store_path(Path::new("")).unwrap_err();
        assert!(err.to_string().contains("non-empty"));
    }

    #[test]
    fn missing_default_chance_is_required() {
        let settings = RespondSettings::default();
        let err = settings.chance().unwrap_err();
        assert!(err.to_string().contains("respond.default_chance is required"));
    }

    #[test]
    fn explicit_path_is_not_implicit() {
        let resolved = resolve_path(Some(Path::new("custom.toml"))).unwrap();
        assert!(!resolved.implicit);
        assert_eq!(resolved.path, PathBuf::from("custom.toml"));
    }
}
