// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Domain record storage.
//!
//! These methods touch only the entity tables. Queueing and auditing belong
//! to the CRUD path in [`crate::store`], which wraps them.

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use serde_json::Value;

use super::{parse_timestamp, Database};
use crate::error::{Error, Result};
use crate::record::{validate_fields, Fields, Record};
use crate::table::Table;

fn row_to_record(table: Table, row: &Row<'_>) -> std::result::Result<Record, rusqlite::Error> {
    let data: String = row.get(1)?;
    let created_str: String = row.get(2)?;
    let updated_str: String = row.get(3)?;
    let fields: Fields = serde_json::from_str(&data).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Record {
        table,
        id: row.get(0)?,
        fields,
        created_at: parse_timestamp(&created_str, "created_at")?,
        updated_at: parse_timestamp(&updated_str, "updated_at")?,
    })
}

impl Database {
    /// Insert a new record; the store assigns the id and both timestamps.
    pub fn insert_record(&self, table: Table, fields: Fields) -> Result<Record> {
        let fields = validate_fields(table, fields)?;
        let now = Utc::now();
        let data = serde_json::to_string(&fields)?;
        self.conn.execute(
            &format!(
                "INSERT INTO \"{}\" (data, created_at, updated_at) VALUES (?1, ?2, ?3)",
                table.as_str()
            ),
            params![data, now.to_rfc3339(), now.to_rfc3339()],
        )?;
        Ok(Record {
            table,
            id: self.conn.last_insert_rowid(),
            fields,
            created_at: now,
            updated_at: now,
        })
    }

    /// Insert or replace a record keeping its id and timestamps.
    ///
    /// Used by import and pull, which bring records from outside the store.
    pub fn upsert_record(&self, record: &Record) -> Result<()> {
        let fields = validate_fields(record.table, record.fields.clone())?;
        let data = serde_json::to_string(&fields)?;
        self.conn.execute(
            &format!(
                "INSERT INTO \"{}\" (id, data, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(id) DO UPDATE SET
                     data = excluded.data,
                     created_at = excluded.created_at,
                     updated_at = excluded.updated_at",
                record.table.as_str()
            ),
            params![
                record.id,
                data,
                record.created_at.to_rfc3339(),
                record.updated_at.to_rfc3339()
            ],
        )?;
        Ok(())
    }

    /// Get a record by id, if it exists.
    pub fn find_record(&self, table: Table, id: i64) -> Result<Option<Record>> {
        let record = self
            .conn
            .query_row(
                &format!(
                    "SELECT id, data, created_at, updated_at FROM \"{}\" WHERE id = ?1",
                    table.as_str()
                ),
                params![id],
                |row| row_to_record(table, row),
            )
            .optional()?;
        Ok(record)
    }

    /// Get a record by id.
    pub fn get_record(&self, table: Table, id: i64) -> Result<Record> {
        self.find_record(table, id)?
            .ok_or_else(|| Error::RecordNotFound {
                table: table.to_string(),
                id,
            })
    }

    /// Merge changes into a record. A `null` value removes the field.
    pub fn update_record(&self, table: Table, id: i64, changes: Fields) -> Result<Record> {
        let changes = validate_fields(table, changes)?;
        let mut record = self.get_record(table, id)?;
        for (name, value) in changes {
            if value.is_null() {
                record.fields.remove(&name);
            } else {
                record.fields.insert(name, value);
            }
        }
        record.updated_at = Utc::now();

        let data = serde_json::to_string(&record.fields)?;
        self.conn.execute(
            &format!(
                "UPDATE \"{}\" SET data = ?1, updated_at = ?2 WHERE id = ?3",
                table.as_str()
            ),
            params![data, record.updated_at.to_rfc3339(), id],
        )?;
        Ok(record)
    }

    /// Delete a record by id.
    pub fn delete_record(&self, table: Table, id: i64) -> Result<()> {
        let deleted = self.conn.execute(
            &format!("DELETE FROM \"{}\" WHERE id = ?1", table.as_str()),
            params![id],
        )?;
        if deleted == 0 {
            return Err(Error::RecordNotFound {
                table: table.to_string(),
                id,
            });
        }
        Ok(())
    }

    /// List records in id order, keeping those whose fields equal every filter.
    pub fn list_records(&self, table: Table, filters: &[(String, Value)]) -> Result<Vec<Record>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, data, created_at, updated_at FROM \"{}\" ORDER BY id",
            table.as_str()
        ))?;
        let records = stmt
            .query_map([], |row| row_to_record(table, row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records
            .into_iter()
            .filter(|r| {
                filters
                    .iter()
                    .all(|(field, value)| r.fields.get(field) == Some(value))
            })
            .collect())
    }

    /// Count records in a table.
    pub fn count_records(&self, table: Table) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM \"{}\"", table.as_str()),
            [],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod tests;
