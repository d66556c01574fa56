//! Database connection management
//!
//! Provides utilities for opening and configuring SQLite connections

use crate::config::{StoreConfig, StoreLocation};
use crate::errors::{from_rusqlite, io_error, storage_unavailable, Result};
use crate::migrations::apply_migrations;
use rusqlite::Connection;
use std::path::Path;

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Configure a connection with the store's settings
pub fn configure(conn: &Connection, wal: bool) -> Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(from_rusqlite)?;

    if wal {
        // journal_mode answers with the mode actually in effect
        let mode: String = conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))
            .map_err(from_rusqlite)?;
        tracing::debug!(journal_mode = %mode, "configured journal mode");
    }

    Ok(())
}

/// Open, configure and migrate a connection for `config`
///
/// Any failure on a file location is reported as `StorageUnavailable`.
pub fn connect(config: &StoreConfig) -> Result<Connection> {
    match &config.location {
        StoreLocation::InMemory => {
            let mut conn = open_in_memory()?;
            configure(&conn, false)?;
            apply_migrations(&mut conn)?;
            Ok(conn)
        }
        StoreLocation::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .map_err(|e| storage_unavailable(path, io_error("create_db_dir", e)))?;
            }
            let mut conn = open(path).map_err(|e| storage_unavailable(path, e))?;
            configure(&conn, config.wal).map_err(|e| storage_unavailable(path, e))?;
            apply_migrations(&mut conn).map_err(|e| storage_unavailable(path, e))?;
            Ok(conn)
        }
    }
}
