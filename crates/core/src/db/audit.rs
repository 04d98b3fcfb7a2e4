// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Audit trail.

use chrono::{DateTime, Utc};
use rusqlite::params;
use serde::Serialize;

use super::{parse_millis, Database};
use crate::error::Result;

/// One audited action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    pub id: i64,
    /// Acting user; `None` when nobody was signed in.
    pub user_id: Option<i64>,
    pub action: String,
    pub table: String,
    pub record_id: i64,
    pub timestamp: DateTime<Utc>,
}

impl Database {
    /// Append an entry to the audit trail.
    pub fn log_audit(
        &self,
        user_id: Option<i64>,
        action: &str,
        table: &str,
        record_id: i64,
    ) -> Result<()> {
        self.conn.execute(
            "INSERT INTO audit_log (user_id, action, table_name, record_id, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user_id,
                action,
                table,
                record_id,
                Utc::now().timestamp_millis()
            ],
        )?;
        Ok(())
    }

    /// Most recent audit entries, newest first.
    pub fn audit_entries(&self, limit: Option<usize>) -> Result<Vec<AuditEntry>> {
        let limit = limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, action, table_name, record_id, timestamp
             FROM audit_log ORDER BY id DESC LIMIT ?1",
        )?;
        let entries = stmt
            .query_map(params![limit], |row| {
                let millis: i64 = row.get(5)?;
                Ok(AuditEntry {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    action: row.get(2)?,
                    table: row.get(3)?,
                    record_id: row.get(4)?,
                    timestamp: parse_millis(millis, "timestamp")?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

#[cfg(test)]
#[path = "audit_tests.rs"]
mod tests;
