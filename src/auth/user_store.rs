//! User Storage
//! Mission: Persist user accounts behind a store interface, with a SQLite backend

use crate::auth::models::User;
use crate::error::StoreError;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use tracing::info;
use uuid::Uuid;

/// Persistence contract for user accounts.
///
/// Email uniqueness is the backend's job; a duplicate insert surfaces as a
/// backend error.
pub trait CredentialStore: Send + Sync {
    fn create(&self, user: &User) -> Result<(), StoreError>;
    fn find_by_email(&self, email: &str) -> Result<User, StoreError>;
    fn find_by_id(&self, id: &Uuid) -> Result<User, StoreError>;
}

/// User storage with SQLite backend
pub struct SqliteUserStore {
    conn: Mutex<Connection>,
}

impl SqliteUserStore {
    /// Open (or create) the user database at the given path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;
        Self::with_connection(conn)
    }

    /// Create an in-memory store (for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL
            )",
            [],
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn user_from_row(row: &Row<'_>) -> rusqlite::Result<(String, User)> {
        let id: String = row.get(0)?;
        Ok((
            id,
            User {
                id: Uuid::nil(),
                name: row.get(1)?,
                email: row.get(2)?,
                password_hash: row.get(3)?,
            },
        ))
    }

    fn finish(found: Option<(String, User)>) -> Result<User, StoreError> {
        let (id, mut user) = found.ok_or(StoreError::NotFound)?;
        user.id = Uuid::parse_str(&id)
            .map_err(|_| StoreError::Corrupt(format!("user id {:?} is not a UUID", id)))?;
        Ok(user)
    }
}

impl CredentialStore for SqliteUserStore {
    fn create(&self, user: &User) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO users (id, name, email, password_hash) VALUES (?1, ?2, ?3, ?4)",
            params![
                user.id.to_string(),
                user.name,
                user.email,
                user.password_hash,
            ],
        )?;

        info!("✅ Created user: {}", user.id);
        Ok(())
    }

    fn find_by_email(&self, email: &str) -> Result<User, StoreError> {
        let conn = self.conn.lock();
        let found = conn
            .query_row(
                "SELECT id, name, email, password_hash FROM users WHERE email = ?1",
                params![email],
                Self::user_from_row,
            )
            .optional()?;
        Self::finish(found)
    }

    fn find_by_id(&self, id: &Uuid) -> Result<User, StoreError> {
        let conn = self.conn.lock();
        let found = conn
            .query_row(
                "SELECT id, name, email, password_hash FROM users WHERE id = ?1",
                params![id.to_string()],
                Self::user_from_row,
            )
            .optional()?;
        Self::finish(found)
    }
}
