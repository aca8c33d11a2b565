//! SQLite database connection and key-value operations.
//!
//! The database is stored at `~/.tether/tether.db`. The connection sits
//! behind a mutex so the database can be shared across async tasks; every
//! statement is short-lived, so contention is negligible.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};

use crate::config::Paths;
use crate::error::TetherError;
use crate::storage::KeyValue;

use super::migrations;

/// Database connection wrapper.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open the database at the default location.
    ///
    /// Creates the database file and runs migrations if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open() -> Result<Self, TetherError> {
        let paths = Paths::new()?;
        paths.ensure_dirs()?;
        Self::open_at(&paths.database)
    }

    /// Open the database at a specific path.
    ///
    /// Creates the database file and runs migrations if necessary.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open_at(path: &std::path::Path) -> Result<Self, TetherError> {
        let conn = Connection::open(path).map_err(|e| {
            TetherError::Storage(format!("Failed to open database {}: {e}", path.display()))
        })?;

        Self::from_connection(conn)
    }

    /// Open an in-memory database (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrations fail.
    pub fn open_in_memory() -> Result<Self, TetherError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            TetherError::Storage(format!("Failed to open in-memory database: {e}"))
        })?;

        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, TetherError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| TetherError::Storage(format!("Failed to enable foreign keys: {e}")))?;

        migrations::run(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Get the current schema version.
    ///
    /// # Errors
    ///
    /// Returns an error if the version cannot be read.
    pub fn schema_version(&self) -> Result<i32, TetherError> {
        let conn = self.lock()?;
        migrations::get_version(&conn)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, TetherError> {
        self.conn
            .lock()
            .map_err(|_| TetherError::Storage("Database mutex poisoned".to_string()))
    }
}

impl KeyValue for Database {
    fn get(&self, key: &str) -> Result<Option<String>, TetherError> {
        let conn = self.lock()?;

        conn.query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()
        .map_err(|e| TetherError::Storage(format!("Failed to read key {key}: {e}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), TetherError> {
        let conn = self.lock()?;

        conn.execute(
            r"INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
              ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3",
            rusqlite::params![key, value, Utc::now().to_rfc3339()],
        )
        .map_err(|e| TetherError::Storage(format!("Failed to write key {key}: {e}")))?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), TetherError> {
        let conn = self.lock()?;

        conn.execute("DELETE FROM kv WHERE key = ?1", [key])
            .map_err(|e| TetherError::Storage(format!("Failed to delete key {key}: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.schema_version().unwrap() > 0);
    }

    #[test]
    fn test_open_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let db = Database::open_at(&db_path).unwrap();
        assert!(db.schema_version().unwrap() > 0);
        assert!(db_path.exists());
    }

    #[test]
    fn test_set_get_remove() {
        let db = Database::open_in_memory().unwrap();

        assert!(db.get("missing").unwrap().is_none());

        db.set("queue", "[]").unwrap();
        assert_eq!(db.get("queue").unwrap(), Some("[]".to_string()));

        db.set("queue", r#"[{"id":"req-1"}]"#).unwrap();
        assert_eq!(
            db.get("queue").unwrap(),
            Some(r#"[{"id":"req-1"}]"#.to_string())
        );

        db.remove("queue").unwrap();
        assert!(db.get("queue").unwrap().is_none());
    }

    #[test]
    fn test_values_survive_reopen() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        {
            let db = Database::open_at(&db_path).unwrap();
            db.set("k", "persisted").unwrap();
        }

        let db = Database::open_at(&db_path).unwrap();
        assert_eq!(db.get("k").unwrap(), Some("persisted".to_string()));
    }
}
