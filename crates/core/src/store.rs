// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! CRUD path for domain records.
//!
//! Every mutation commits the record first, then appends exactly one
//! operation to the sync queue and one audit entry. Neither append can fail
//! the mutation; failures are logged.

use serde_json::Value;

use crate::auth;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::op::Action;
use crate::record::{Fields, Record};
use crate::table::Table;

/// Create a record and queue it for sync.
pub fn create(db: &Database, table: Table, fields: Fields) -> Result<Record> {
    let record = db.insert_record(table, fields)?;
    after_write(db, table, record.id, Action::Create);
    Ok(record)
}

pub fn read(db: &Database, table: Table, id: i64) -> Result<Record> {
    db.get_record(table, id)
}

/// Merge changes into a record and queue the update.
pub fn update(db: &Database, table: Table, id: i64, changes: Fields) -> Result<Record> {
    let record = db.update_record(table, id, changes)?;
    after_write(db, table, id, Action::Update);
    Ok(record)
}

/// Delete a record and queue the deletion.
pub fn delete(db: &Database, table: Table, id: i64) -> Result<()> {
    db.delete_record(table, id)?;
    after_write(db, table, id, Action::Delete);
    Ok(())
}

pub fn list(db: &Database, table: Table, filters: &[(String, Value)]) -> Result<Vec<Record>> {
    db.list_records(table, filters)
}

fn after_write(db: &Database, table: Table, id: i64, action: Action) {
    db.enqueue(table, id, action);

    let user_id = auth::current_user(db).map(|s| s.id);
    if let Err(e) = db.log_audit(user_id, action.as_str(), table.as_str(), id) {
        tracing::warn!(table = %table, id, action = %action, error = %e, "failed to write audit entry");
    }
}

/// Dump every domain table as `{table: [object, ...]}`.
pub fn export_all(db: &Database) -> Result<Fields> {
    let mut out = Fields::new();
    for table in Table::ALL {
        let rows = db
            .list_records(table, &[])?
            .iter()
            .map(|r| Value::Object(r.to_object()))
            .collect();
        out.insert(table.as_str().to_string(), Value::Array(rows));
    }
    Ok(out)
}

/// Load a dump produced by [`export_all`]. Records keep their ids and are
/// not queued for sync. Returns the number of records written.
pub fn import_all(db: &Database, data: &Fields) -> Result<usize> {
    let mut count = 0;
    let tx = db.conn.unchecked_transaction()?;
    for (name, rows) in data {
        let table: Table = name.parse()?;
        let rows = rows
            .as_array()
            .ok_or_else(|| Error::CorruptedData(format!("{table}: expected an array")))?;
        for row in rows {
            let object = row
                .as_object()
                .ok_or_else(|| Error::CorruptedData(format!("{table}: expected an object")))?;
            db.upsert_record(&Record::from_object(table, object)?)?;
            count += 1;
        }
    }
    tx.commit()?;
    tracing::info!(count, "imported records");
    Ok(count)
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
