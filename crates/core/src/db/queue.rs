// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Durable operation queue.
//!
//! `sync_ops` is append-only apart from the `synced` flag. Queue position is
//! the autoincrement id; timestamps never go backwards even if the wall
//! clock does.

use chrono::Utc;
use rusqlite::{params, Row};

use super::{parse_db, parse_millis, Database};
use crate::error::{Error, Result};
use crate::op::{Action, Operation};
use crate::table::Table;

fn row_to_operation(row: &Row<'_>) -> std::result::Result<Operation, rusqlite::Error> {
    let table_str: String = row.get(1)?;
    let action_str: String = row.get(3)?;
    let millis: i64 = row.get(4)?;
    let synced: i64 = row.get(5)?;
    Ok(Operation {
        id: row.get(0)?,
        table: parse_db(&table_str, "table_name")?,
        record_id: row.get(2)?,
        action: parse_db(&action_str, "action")?,
        timestamp: parse_millis(millis, "timestamp")?,
        synced: synced != 0,
    })
}

const SELECT_OPS: &str =
    "SELECT id, table_name, record_id, action, timestamp, synced FROM sync_ops";

impl Database {
    /// Append an operation to the queue.
    ///
    /// Never fails the caller: the data write has already committed, so a
    /// queue failure is logged and the mutation stands.
    pub fn enqueue(&self, table: Table, record_id: i64, action: Action) {
        if let Err(e) = self.try_enqueue(table, record_id, action) {
            tracing::warn!(
                table = %table,
                record_id,
                action = %action,
                error = %e,
                "failed to enqueue sync operation"
            );
        }
    }

    /// Append an operation to the queue, returning its id.
    pub fn try_enqueue(&self, table: Table, record_id: i64, action: Action) -> Result<i64> {
        let now = Utc::now().timestamp_millis();
        self.conn.execute(
            "INSERT INTO sync_ops (table_name, record_id, action, timestamp, synced)
             VALUES (?1, ?2, ?3, MAX(?4, COALESCE((SELECT MAX(timestamp) FROM sync_ops), 0)), 0)",
            params![table.as_str(), record_id, action.as_str(), now],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, table = %table, record_id, action = %action, "enqueued");
        Ok(id)
    }

    /// Number of operations not yet delivered.
    pub fn pending_count(&self) -> Result<usize> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM sync_ops WHERE synced = 0", [], |row| {
                    row.get(0)
                })?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Pending operations in queue order, snapshotted at call time.
    pub fn drain_candidates(&self) -> Result<Vec<Operation>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SELECT_OPS} WHERE synced = 0 ORDER BY id"))?;
        let ops = stmt
            .query_map([], row_to_operation)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(ops)
    }

    /// Mark an operation as delivered. Marking twice is harmless.
    pub fn mark_synced(&self, op_id: i64) -> Result<()> {
        let updated = self
            .conn
            .execute("UPDATE sync_ops SET synced = 1 WHERE id = ?1", params![op_id])?;
        if updated == 0 {
            return Err(Error::OperationNotFound(op_id));
        }
        Ok(())
    }

    /// Most recent operations, newest first, synced or not.
    pub fn operations(&self, limit: Option<usize>) -> Result<Vec<Operation>> {
        let limit = limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));
        let mut stmt = self.conn.prepare(&format!("{SELECT_OPS} ORDER BY id DESC LIMIT ?1"))?;
        let ops = stmt
            .query_map(params![limit], row_to_operation)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(ops)
    }

    /// True if the record has any undelivered operation.
    pub fn has_pending(&self, table: Table, record_id: i64) -> Result<bool> {
        let pending: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM sync_ops
             WHERE synced = 0 AND table_name = ?1 AND record_id = ?2",
            params![table.as_str(), record_id],
            |row| row.get(0),
        )?;
        Ok(pending)
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
