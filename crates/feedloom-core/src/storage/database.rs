//! SQLite-based preference storage.
//!
//! Each user owns two independent JSON documents:
//! - Notification settings
//! - Summary preferences
//!
//! Reads are get-or-create: a user without a stored document gets the
//! defaults, which are persisted on first access.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

use super::data_dir;
use crate::effective::EffectiveConfiguration;
use crate::error::{DatabaseError, Result, ValidationError};
use crate::preferences::{defaults, NotificationSettings, SummaryPreferences};

const NOTIFICATION_TABLE: &str = "notification_settings";
const SUMMARY_TABLE: &str = "summary_preferences";

/// SQLite database holding per-user preference documents.
pub struct PreferenceDb {
    conn: Connection,
    default_timezone: String,
}

impl PreferenceDb {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data dir>/feedloom.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("feedloom.db"))
    }

    /// Open (or create) the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let db = Self {
            conn,
            default_timezone: defaults::DEFAULT_TIMEZONE.to_string(),
        };
        db.migrate()?;
        Ok(db)
    }

    /// Timezone seeded into notification settings created from now on.
    pub fn with_default_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.default_timezone = timezone.into();
        self
    }

    fn migrate(&self) -> Result<()> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS notification_settings (
                    user_id    TEXT PRIMARY KEY,
                    document   TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS summary_preferences (
                    user_id    TEXT PRIMARY KEY,
                    document   TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    /// Notification settings for `user_id`, created from defaults if absent.
    ///
    /// # Errors
    /// Returns an error for an empty user id, a failed query or a stored
    /// document that no longer decodes.
    pub fn notification_settings(&self, user_id: &str) -> Result<NotificationSettings> {
        check_user_id(user_id)?;
        self.get_or_create(NOTIFICATION_TABLE, "notification", user_id, || {
            NotificationSettings::with_timezone(user_id, self.default_timezone.as_str())
        })
    }

    /// Summary preferences for `user_id`, created from defaults if absent.
    ///
    /// # Errors
    /// Same as [`PreferenceDb::notification_settings`].
    pub fn summary_preferences(&self, user_id: &str) -> Result<SummaryPreferences> {
        check_user_id(user_id)?;
        self.get_or_create(SUMMARY_TABLE, "summary", user_id, || {
            SummaryPreferences::new(user_id)
        })
    }

    /// Replace the whole notification document.
    pub fn replace_notification_settings(&self, settings: &NotificationSettings) -> Result<()> {
        check_user_id(&settings.user_id)?;
        self.upsert(NOTIFICATION_TABLE, &settings.user_id, settings)
    }

    /// Replace the whole summary document.
    ///
    /// # Errors
    /// Refuses documents whose length parameters or behavior metrics are out
    /// of range.
    pub fn replace_summary_preferences(&self, prefs: &SummaryPreferences) -> Result<()> {
        check_user_id(&prefs.user_id)?;
        let violations = prefs.write_violations();
        if !violations.is_empty() {
            return Err(ValidationError::OutOfRange(violations).into());
        }
        self.upsert(SUMMARY_TABLE, &prefs.user_id, prefs)
    }

    /// Remove both documents for `user_id`. Returns whether anything was stored.
    pub fn reset(&self, user_id: &str) -> Result<bool> {
        check_user_id(user_id)?;
        let mut removed = 0;
        for table in [NOTIFICATION_TABLE, SUMMARY_TABLE] {
            removed += self.conn.execute(
                &format!("DELETE FROM {table} WHERE user_id = ?1"),
                params![user_id],
            )?;
        }
        if removed > 0 {
            info!(user_id, "preferences reset to defaults");
        }
        Ok(removed > 0)
    }

    /// Both documents for `user_id`, each created from defaults if absent.
    pub fn effective_configuration(&self, user_id: &str) -> Result<EffectiveConfiguration> {
        Ok(EffectiveConfiguration::new(
            self.notification_settings(user_id)?,
            self.summary_preferences(user_id)?,
        ))
    }

    fn get_or_create<T, F>(
        &self,
        table: &str,
        kind: &'static str,
        user_id: &str,
        default: F,
    ) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        let document = serde_json::to_string(&default())?;
        let inserted = self.conn.execute(
            &format!(
                "INSERT OR IGNORE INTO {table} (user_id, document, updated_at)
                 VALUES (?1, ?2, ?3)"
            ),
            params![user_id, document, Utc::now().to_rfc3339()],
        )?;
        if inserted > 0 {
            info!(user_id, kind, "created default preferences");
        }

        let stored: Option<String> = self
            .conn
            .query_row(
                &format!("SELECT document FROM {table} WHERE user_id = ?1"),
                params![user_id],
                |row| row.get(0),
            )
            .optional()?;
        let stored = stored.ok_or_else(|| {
            DatabaseError::QueryFailed(format!("{kind} document for '{user_id}' vanished"))
        })?;

        let value = serde_json::from_str(&stored).map_err(|e| DatabaseError::CorruptDocument {
            kind,
            user_id: user_id.to_string(),
            message: e.to_string(),
        })?;
        Ok(value)
    }

    fn upsert<T: Serialize>(&self, table: &str, user_id: &str, document: &T) -> Result<()> {
        let document = serde_json::to_string(document)?;
        self.conn.execute(
            &format!(
                "INSERT INTO {table} (user_id, document, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(user_id) DO UPDATE SET
                    document = excluded.document,
                    updated_at = excluded.updated_at"
            ),
            params![user_id, document, Utc::now().to_rfc3339()],
        )?;
        debug!(user_id, table, "document replaced");
        Ok(())
    }
}

fn check_user_id(user_id: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(ValidationError::invalid("user_id", "must not be empty").into());
    }
    Ok(())
}
