use log::{debug, info};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use std::path::Path;

use super::error::{PersistenceError, PersistenceResult};
use super::models::{NewUser, User};
use super::UserStore;
use crate::types::RevisionToken;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        firstname TEXT NOT NULL DEFAULT '',
        lastname TEXT NOT NULL DEFAULT '',
        deleted INTEGER NOT NULL DEFAULT 0,
        picture INTEGER NOT NULL DEFAULT 0
    );

    CREATE INDEX IF NOT EXISTS idx_users_lastname ON users(lastname, deleted);";

const USER_COLUMNS: &str = "id, username, firstname, lastname, deleted, picture";

/// User store backed by a SQLite database
pub struct SqliteUserStore {
    conn: Connection,
}

impl SqliteUserStore {
    /// Open (and create if missing) the database at `path`
    pub fn open(path: &Path) -> PersistenceResult<Self> {
        Self::open_with_flags(path, OpenFlags::default())
    }

    /// Open the database at `path`, failing if it does not exist yet
    pub fn open_existing(path: &Path) -> PersistenceResult<Self> {
        Self::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
    }

    fn open_with_flags(path: &Path, flags: OpenFlags) -> PersistenceResult<Self> {
        let conn = Connection::open_with_flags(path, flags).map_err(|e| {
            PersistenceError::Initialization(format!(
                "Failed to open database {}: {}",
                path.display(),
                e
            ))
        })?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 10000;",
        )
        .map_err(|e| {
            PersistenceError::Initialization(format!("Failed to set database pragmas: {}", e))
        })?;

        let store = Self::with_connection(conn)?;
        info!("User database opened at {}", path.display());
        Ok(store)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> PersistenceResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> PersistenceResult<Self> {
        conn.execute_batch(SCHEMA).map_err(|e| {
            PersistenceError::Initialization(format!("Failed to create database schema: {}", e))
        })?;
        Ok(Self { conn })
    }

    /// Insert a user and return its ID
    pub fn insert_user(&self, user: &NewUser) -> PersistenceResult<i64> {
        self.conn.execute(
            "INSERT INTO users (username, firstname, lastname, deleted, picture)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user.username,
                user.firstname,
                user.lastname,
                user.deleted,
                user.picture
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Fetch a user by ID, deleted or not
    pub fn user(&self, id: i64) -> PersistenceResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS);
        let user = self
            .conn
            .query_row(&sql, params![id], user_from_row)
            .optional()?;
        Ok(user)
    }

    /// Number of users in the table
    pub fn count_users(&self) -> PersistenceResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }
}

impl UserStore for SqliteUserStore {
    fn find_live_by_key(&self, key: &str) -> PersistenceResult<Option<User>> {
        // Several live users may share a lastname; the lowest ID wins.
        let sql = format!(
            "SELECT {} FROM users WHERE lastname = ?1 AND deleted = 0 ORDER BY id LIMIT 1",
            USER_COLUMNS
        );
        let user = self
            .conn
            .query_row(&sql, params![key], user_from_row)
            .optional()?;
        Ok(user)
    }

    fn picture(&self, id: i64) -> PersistenceResult<i64> {
        self.conn
            .query_row("SELECT picture FROM users WHERE id = ?1", params![id], |row| {
                row.get(0)
            })
            .optional()?
            .ok_or_else(|| PersistenceError::NotFound(format!("user {}", id)))
    }

    fn set_picture(&self, id: i64, revision: RevisionToken) -> PersistenceResult<()> {
        let changed = self.conn.execute(
            "UPDATE users SET picture = ?1 WHERE id = ?2",
            params![revision.0, id],
        )?;
        if changed == 0 {
            return Err(PersistenceError::NotFound(format!("user {}", id)));
        }
        debug!("Set picture of user {} to revision {}", id, revision);
        Ok(())
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        firstname: row.get(2)?,
        lastname: row.get(3)?,
        deleted: row.get(4)?,
        picture: row.get(5)?,
    })
}
