// crates/respond-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Response Store
// Description: Durable ResponseStore backed by SQLite.
// Purpose: Persist responses and triggers with transactional integrity.
// Dependencies: respond-core, rusqlite, serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! This module implements a durable [`ResponseStore`] using `SQLite`. The
//! schema holds a `response` table and a `"trigger"` table whose rows
//! reference their response through an enforced foreign key. Each
//! [`SqliteTransaction`] holds the connection lock and an open
//! `BEGIN IMMEDIATE` transaction; it is rolled back when dropped uncommitted.
//!
//! Rows are validated with the core rule validator before every insert and
//! update, so invalid data is rejected before it reaches `SQLite`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use respond_core::Response;
use respond_core::ResponseFields;
use respond_core::ResponseId;
use respond_core::ResponseStore;
use respond_core::ResponseUpdate;
use respond_core::RuleSet;
use respond_core::StoreError;
use respond_core::StoreTransaction;
use respond_core::Timestamp;
use respond_core::Trigger;
use respond_core::TriggerFields;
use respond_core::TriggerId;
use respond_core::rules::validate_response;
use respond_core::rules::validate_trigger;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::params;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Response columns in row-mapping order.
const RESPONSE_COLUMNS: &str = "id, response, executable, created_by, created_at, updated_at";
/// Trigger columns in row-mapping order.
const TRIGGER_COLUMNS: &str =
    "id, \"trigger\", chance, response_id, created_by, created_at, updated_at";

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `synchronous` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` response store.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory).
/// - `busy_timeout_ms` is interpreted as milliseconds.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Creates a config for `path` with default pragmas.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
///
/// # Invariants
/// - Error messages avoid embedding row payloads.
#[derive(Debug, Error, Clone)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Stored row could not be decoded.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store configuration or data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
        }
    }
}

impl From<rusqlite::Error> for SqliteStoreError {
    fn from(error: rusqlite::Error) -> Self {
        match error {
            rusqlite::Error::InvalidColumnType(..)
            | rusqlite::Error::FromSqlConversionFailure(..)
            | rusqlite::Error::IntegralValueOutOfRange(..) => Self::Corrupt(error.to_string()),
            other => Self::Db(other.to_string()),
        }
    }
}

/// Converts a rusqlite error into a core store error.
fn db_error(error: rusqlite::Error) -> StoreError {
    SqliteStoreError::from(error).into()
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed response store.
///
/// # Invariants
/// - `SQLite` connection access is serialized through a mutex.
/// - Foreign keys are enforced on every connection.
#[derive(Debug, Clone)]
pub struct SqliteResponseStore {
    /// Store configuration.
    config: SqliteStoreConfig,
    /// Shared `SQLite` connection.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteResponseStore {
    /// Opens (or creates) the store at the configured path.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the path is unsafe, the database
    /// cannot be opened, or its schema version does not match.
    pub fn new(config: SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(&config)?;
        initialize_schema(&mut connection)?;
        Ok(Self { config, connection: Arc::new(Mutex::new(connection)) })
    }

    /// Returns the store configuration.
    #[must_use]
    pub const fn config(&self) -> &SqliteStoreConfig {
        &self.config
    }
}

impl ResponseStore for SqliteResponseStore {
    type Transaction<'a> = SqliteTransaction<'a>;

    fn begin(&self) -> Result<Self::Transaction<'_>, StoreError> {
        let guard = self
            .connection
            .lock()
            .map_err(|_| StoreError::Store("sqlite store mutex poisoned".to_string()))?;
        guard.execute_batch("BEGIN IMMEDIATE;").map_err(db_error)?;
        Ok(SqliteTransaction { guard, finished: false })
    }
}

// ============================================================================
// SECTION: Transactions
// ============================================================================

/// Open `SQLite` transaction holding the connection lock.
#[derive(Debug)]
pub struct SqliteTransaction<'a> {
    /// Locked connection with an open transaction.
    guard: MutexGuard<'a, Connection>,
    /// True once the transaction was committed.
    finished: bool,
}

impl SqliteTransaction<'_> {
    /// Loads a response row.
    fn query_response(&self, id: ResponseId) -> Result<Option<Response>, StoreError> {
        self.guard
            .query_row(
                &format!("SELECT {RESPONSE_COLUMNS} FROM response WHERE id = ?1"),
                params![id.get()],
                map_response,
            )
            .optional()
            .map_err(db_error)
    }

    /// Loads a trigger row.
    fn query_trigger(&self, id: TriggerId) -> Result<Option<Trigger>, StoreError> {
        self.guard
            .query_row(
                &format!("SELECT {TRIGGER_COLUMNS} FROM \"trigger\" WHERE id = ?1"),
                params![id.get()],
                map_trigger,
            )
            .optional()
            .map_err(db_error)
    }

    /// Loads the triggers owned by `response_id`, in id order.
    fn query_triggers_of(&self, response_id: ResponseId) -> Result<Vec<Trigger>, StoreError> {
        let mut stmt = self
            .guard
            .prepare(&format!(
                "SELECT {TRIGGER_COLUMNS} FROM \"trigger\" WHERE response_id = ?1 ORDER BY id"
            ))
            .map_err(db_error)?;
        let rows = stmt.query_map(params![response_id.get()], map_trigger).map_err(db_error)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(db_error)
    }
}

impl StoreTransaction for SqliteTransaction<'_> {
    fn create_response(
        &mut self,
        text: &str,
        executable: bool,
        author: &str,
    ) -> Result<Response, StoreError> {
        validate_response(
            RuleSet::Creating,
            &ResponseFields { response: Some(text), created_by: Some(author) },
        )?;
        let now = Timestamp::now();
        self.guard
            .execute(
                "INSERT INTO response (response, executable, created_by, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                params![text, executable, author, now.as_unix_millis()],
            )
            .map_err(db_error)?;
        Ok(Response {
            id: ResponseId::new(self.guard.last_insert_rowid()),
            response: text.to_string(),
            executable,
            created_by: author.to_string(),
            created_at: now,
            updated_at: now,
            triggers: None,
        })
    }

    fn create_trigger(
        &mut self,
        response_id: ResponseId,
        text: &str,
        chance: f64,
        author: &str,
    ) -> Result<Trigger, StoreError> {
        validate_trigger(
            RuleSet::Creating,
            &TriggerFields { trigger: Some(text), chance: Some(chance), created_by: Some(author) },
        )?;
        let now = Timestamp::now();
        self.guard
            .execute(
                "INSERT INTO \"trigger\"
                 (\"trigger\", chance, response_id, created_by, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                params![text, chance, response_id.get(), author, now.as_unix_millis()],
            )
            .map_err(db_error)?;
        Ok(Trigger {
            id: TriggerId::new(self.guard.last_insert_rowid()),
            trigger: text.to_string(),
            chance,
            response_id,
            created_by: author.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    fn fetch_response(
        &mut self,
        id: ResponseId,
        with_triggers: bool,
    ) -> Result<Response, StoreError> {
        let mut response =
            self.query_response(id)?.ok_or(StoreError::response_not_found(id))?;
        if with_triggers {
            response.triggers = Some(self.query_triggers_of(id)?);
        }
        Ok(response)
    }

    fn fetch_trigger(&mut self, id: TriggerId) -> Result<Trigger, StoreError> {
        self.query_trigger(id)?.ok_or(StoreError::trigger_not_found(id))
    }

    fn list_triggers(&mut self) -> Result<Vec<Trigger>, StoreError> {
        let mut stmt = self
            .guard
            .prepare(&format!("SELECT {TRIGGER_COLUMNS} FROM \"trigger\" ORDER BY id"))
            .map_err(db_error)?;
        let rows = stmt.query_map(params![], map_trigger).map_err(db_error)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(db_error)
    }

    fn list_all(&mut self) -> Result<Vec<Response>, StoreError> {
        let mut by_response: BTreeMap<ResponseId, Vec<Trigger>> = BTreeMap::new();
        for trigger in self.list_triggers()? {
            by_response.entry(trigger.response_id).or_default().push(trigger);
        }
        let mut stmt = self
            .guard
            .prepare(&format!("SELECT {RESPONSE_COLUMNS} FROM response ORDER BY id"))
            .map_err(db_error)?;
        let rows = stmt.query_map(params![], map_response).map_err(db_error)?;
        rows.map(|row| {
            let mut response = row.map_err(db_error)?;
            response.triggers = Some(by_response.remove(&response.id).unwrap_or_default());
            Ok(response)
        })
        .collect()
    }

    fn update_response(
        &mut self,
        id: ResponseId,
        update: &ResponseUpdate,
    ) -> Result<Response, StoreError> {
        validate_response(
            RuleSet::Saving,
            &ResponseFields { response: Some(&update.text), created_by: None },
        )?;
        let now = Timestamp::now().as_unix_millis();
        let changed = match update.executable {
            Some(executable) => self.guard.execute(
                "UPDATE response SET response = ?1, executable = ?2, updated_at = ?3 WHERE id = ?4",
                params![update.text, executable, now, id.get()],
            ),
            None => self.guard.execute(
                "UPDATE response SET response = ?1, updated_at = ?2 WHERE id = ?3",
                params![update.text, now, id.get()],
            ),
        }
        .map_err(db_error)?;
        if changed == 0 {
            return Err(StoreError::NoRowsUpdated { entity: "response", id: id.get() });
        }
        self.query_response(id)?.ok_or(StoreError::response_not_found(id))
    }

    fn patch_trigger(
        &mut self,
        id: TriggerId,
        text: &str,
        chance: f64,
    ) -> Result<Trigger, StoreError> {
        validate_trigger(
            RuleSet::Saving,
            &TriggerFields { trigger: Some(text), chance: Some(chance), created_by: None },
        )?;
        let changed = self
            .guard
            .execute(
                "UPDATE \"trigger\" SET \"trigger\" = ?1, chance = ?2, updated_at = ?3
                 WHERE id = ?4",
                params![text, chance, Timestamp::now().as_unix_millis(), id.get()],
            )
            .map_err(db_error)?;
        if changed == 0 {
            return Err(StoreError::NoRowsUpdated { entity: "trigger", id: id.get() });
        }
        self.query_trigger(id)?.ok_or(StoreError::trigger_not_found(id))
    }

    fn destroy_response(&mut self, id: ResponseId) -> Result<(), StoreError> {
        self.guard
            .execute("DELETE FROM response WHERE id = ?1", params![id.get()])
            .map_err(db_error)?;
        Ok(())
    }

    fn destroy_trigger(&mut self, id: TriggerId) -> Result<(), StoreError> {
        self.guard
            .execute("DELETE FROM \"trigger\" WHERE id = ?1", params![id.get()])
            .map_err(db_error)?;
        Ok(())
    }

    fn commit(mut self) -> Result<(), StoreError> {
        self.guard.execute_batch("COMMIT;").map_err(db_error)?;
        self.finished = true;
        Ok(())
    }
}

impl Drop for SqliteTransaction<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(err) = self.guard.execute_batch("ROLLBACK;") {
            warn!(error = %err, "sqlite rollback failed");
        }
    }
}

// ============================================================================
// SECTION: Row Mapping
// ============================================================================

/// Maps a row selected with [`RESPONSE_COLUMNS`].
fn map_response(row: &Row<'_>) -> rusqlite::Result<Response> {
    Ok(Response {
        id: ResponseId::new(row.get(0)?),
        response: row.get(1)?,
        executable: row.get(2)?,
        created_by: row.get(3)?,
        created_at: Timestamp::from_unix_millis(row.get(4)?),
        updated_at: Timestamp::from_unix_millis(row.get(5)?),
        triggers: None,
    })
}

/// Maps a row selected with [`TRIGGER_COLUMNS`].
fn map_trigger(row: &Row<'_>) -> rusqlite::Result<Trigger> {
    Ok(Trigger {
        id: TriggerId::new(row.get(0)?),
        trigger: row.get(1)?,
        chance: row.get(2)?,
        response_id: ResponseId::new(row.get(3)?),
        created_by: row.get(4)?,
        created_at: Timestamp::from_unix_millis(row.get(5)?),
        updated_at: Timestamp::from_unix_millis(row.get(6)?),
    })
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    if path.as_os_str().is_empty() {
        return Err(SqliteStoreError::Invalid("store path must not be empty".to_string()));
    }
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.exists() && path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS response (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    response TEXT NOT NULL,
                    created_by TEXT NOT NULL,
                    executable BOOLEAN NOT NULL DEFAULT 0,
                    created_at INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL
                );
                CREATE TABLE IF NOT EXISTS \"trigger\" (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    \"trigger\" TEXT NOT NULL,
                    chance DECIMAL NOT NULL,
                    response_id INTEGER NOT NULL REFERENCES response(id),
                    created_by TEXT NOT NULL,
                    created_at INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_trigger_response_id
                    ON \"trigger\" (response_id);",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        }
        Some(SCHEMA_VERSION) => {}
        Some(other) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "expected schema version {SCHEMA_VERSION}, found {other}"
            )));
        }
    }
    tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}
