//! SQLite persistence for cafes and insights snapshots.
//!
//! A `Store` wraps one `rusqlite::Connection` behind a mutex. It is opened in
//! `main.rs`, cloned into `AppState`, and every read or write goes through it.
//! All methods are blocking; handlers call them inside `web::block`.
//!
//! Holding the connection for the whole replace transaction means a reader in
//! this process sees either the previous dataset or the new one, never the
//! empty state between the deletes and the inserts.

mod queries;
mod replace;

use crate::error::AppError;
use log::info;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS cafes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        location TEXT NOT NULL,
        recycling_rate REAL NOT NULL DEFAULT 0,
        cups_recycled INTEGER NOT NULL CHECK (cups_recycled >= 0),
        trend REAL NOT NULL DEFAULT 0,
        website TEXT NOT NULL DEFAULT '',
        waste_reduction REAL NOT NULL DEFAULT 0,
        compost_produced REAL NOT NULL DEFAULT 0,
        contamination_rate REAL NOT NULL DEFAULT 0,
        rank INTEGER NOT NULL DEFAULT 0
    );

    CREATE INDEX IF NOT EXISTS idx_cafes_cups_recycled ON cafes (cups_recycled DESC);

    CREATE TABLE IF NOT EXISTS insights (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        cups_recycled INTEGER NOT NULL,
        co2_saved REAL NOT NULL,
        waste_diverted REAL NOT NULL,
        source_md5 TEXT,
        date TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
"#;

#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Opens (or creates) the database file and makes sure the schema exists.
    pub fn open(database_path: &str) -> Result<Self, AppError> {
        if let Some(parent) = Path::new(database_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let store = Self::from_connection(Connection::open(database_path)?)?;
        info!("Connected to SQLite database: {}", database_path);
        Ok(store)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, AppError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Runs raw SQL against the store, for tests that need to break it.
    #[cfg(test)]
    pub fn execute_batch(&self, sql: &str) -> Result<(), AppError> {
        self.lock()?.execute_batch(sql)?;
        Ok(())
    }

    fn from_connection(conn: Connection) -> Result<Self, AppError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, AppError> {
        self.conn
            .lock()
            .map_err(|_| AppError::Internal("store connection lock poisoned".into()))
    }
}
