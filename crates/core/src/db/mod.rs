// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed local store.
//!
//! The [`Database`] struct provides all data access for domain records, the
//! sync operation log, the key/value configuration table, the audit trail
//! and user accounts. Access is split by concern across submodules, each
//! adding an `impl Database` block.

mod audit;
mod config;
mod queue;
mod records;
mod users;

pub use audit::AuditEntry;
pub use config::{
    SyncCredentials, KEY_CURRENT_USER, KEY_GOOGLE_API_KEY, KEY_GOOGLE_CLIENT_ID,
    KEY_GOOGLE_SPREADSHEET_ID, KEY_LAST_SYNC, KEY_REMOTE_ACCESS_TOKEN, KEY_REMOTE_USER_ID,
};
pub use users::{User, STATUS_ACTIVE};

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::path::Path;

use crate::error::{Error, Result};
use crate::table::Table;

/// SQL schema for the fixed (non-domain) tables.
pub const SCHEMA: &str = r#"
-- Operation log: one row per local mutation awaiting remote delivery
CREATE TABLE IF NOT EXISTS sync_ops (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    table_name TEXT NOT NULL,
    record_id INTEGER NOT NULL,
    action TEXT NOT NULL,
    timestamp INTEGER NOT NULL,
    synced INTEGER NOT NULL DEFAULT 0 CHECK (synced IN (0, 1))
);

-- Key/value settings (credentials, session, sync bookkeeping)
CREATE TABLE IF NOT EXISTS config (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- Audit trail of mutations and logins
CREATE TABLE IF NOT EXISTS audit_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER,
    action TEXT NOT NULL,
    table_name TEXT NOT NULL,
    record_id INTEGER NOT NULL,
    timestamp INTEGER NOT NULL
);

-- Local user accounts
CREATE TABLE IF NOT EXISTS usuarios (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    perfil TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'active',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sync_ops_synced ON sync_ops(synced, id);
CREATE INDEX IF NOT EXISTS idx_sync_ops_record ON sync_ops(table_name, record_id);
CREATE INDEX IF NOT EXISTS idx_audit_log_user ON audit_log(user_id);
"#;

/// DDL for one domain table. Field values live in a JSON document.
fn domain_table_ddl(table: Table) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS \"{name}\" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            data TEXT NOT NULL DEFAULT '{{}}',
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );",
        name = table.as_str()
    )
}

/// Run schema creation on a database connection.
///
/// Idempotent: every statement is `IF NOT EXISTS`, so opening an older
/// database picks up tables added since it was created.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    for table in Table::ALL {
        conn.execute_batch(&domain_table_ddl(table))?;
    }
    Ok(())
}

/// Parse a string value from the database, returning a rusqlite error on parse failure.
pub(crate) fn parse_db<T: std::str::FromStr>(
    value: &str,
    column: &str,
) -> std::result::Result<T, rusqlite::Error> {
    value.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(Error::CorruptedData(format!(
                "invalid value '{value}' in column '{column}'"
            ))),
        )
    })
}

/// Parse an RFC3339 timestamp from the database.
pub(crate) fn parse_timestamp(
    value: &str,
    column: &str,
) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(Error::CorruptedData(format!(
                    "invalid timestamp '{value}' in column '{column}'"
                ))),
            )
        })
}

/// Convert epoch milliseconds from the database into a timestamp.
pub(crate) fn parse_millis(
    value: i64,
    column: &str,
) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::from_timestamp_millis(value).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Integer,
            Box::new(Error::CorruptedData(format!(
                "invalid epoch millis '{value}' in column '{column}'"
            ))),
        )
    })
}

/// SQLite database connection with local store operations.
pub struct Database {
    /// The underlying SQLite connection.
    pub conn: Connection,
}

impl Database {
    /// Open a database connection at the given path, creating and migrating if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // WAL lets a sync run read while the CLI writes
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;

        let db = Database { conn };
        run_migrations(&db.conn)?;
        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        run_migrations(&db.conn)?;
        Ok(db)
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
