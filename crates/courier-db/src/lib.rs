pub mod migrations;
pub mod models;
pub mod queries;

use anyhow::{Context, Result};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use tracing::debug;

/// A single connection to the relational store.
///
/// Opened at the start of an invocation and dropped when it ends; never shared
/// or pooled across invocations.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open an existing store. The database must already exist; a missing file
    /// is an error rather than a fresh empty database.
    pub fn open(dsn: &str) -> Result<Self> {
        let path = dsn_path(dsn);
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .with_context(|| format!("failed to open store at {}", path.display()))?;

        conn.pragma_update(None, "foreign_keys", "ON")?;

        debug!("Store opened at {}", path.display());
        Ok(Self { conn })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        f(&self.conn)
    }

    pub fn with_conn_mut<F, T>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        f(&mut self.conn)
    }
}

/// Strip an optional `sqlite://` / `sqlite:` scheme from a connection string.
pub fn dsn_path(dsn: &str) -> &Path {
    let trimmed = dsn
        .strip_prefix("sqlite://")
        .or_else(|| dsn.strip_prefix("sqlite:"))
        .unwrap_or(dsn);
    Path::new(trimmed)
}
