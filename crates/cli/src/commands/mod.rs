// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod export;
pub mod import;
pub mod init;
pub mod list;
pub mod log;
pub mod record;
pub mod remote;
pub mod session;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
pub mod user;

use std::path::PathBuf;

use dete_core::record::parse_field_value;
use dete_core::{auth, Database, Fields, Session, Table};
use serde_json::Value;

use crate::config::{find_work_dir, get_db_path, Config};
use crate::error::{Error, Result};

/// Helper to open the database from the current context.
pub fn open_db() -> Result<(Database, Config, PathBuf)> {
    let work_dir = find_work_dir()?;
    let config = Config::load(&work_dir)?;
    let db = Database::open(&get_db_path(&work_dir))?;
    Ok((db, config, work_dir))
}

/// Return the signed-in local user.
pub fn require_session(db: &Database) -> Result<Session> {
    auth::current_user(db).ok_or(Error::NotLoggedIn)
}

/// Return the signed-in local user if they hold `permission`.
pub fn require_permission(db: &Database, permission: &str) -> Result<Session> {
    let session = require_session(db)?;
    if !session.has_permission(permission) {
        return Err(Error::PermissionDenied {
            permission: permission.to_string(),
        });
    }
    Ok(session)
}

/// Permission check for a CRUD verb (`view`, `create`, `edit`, `delete`) on a table.
pub fn require_table_permission(db: &Database, table: Table, verb: &str) -> Result<Session> {
    require_permission(db, &auth::permission_for(table, verb))
}

/// Parse `field=value` arguments against the table schema.
///
/// An empty value parses to `null`, which clears the field on edit.
pub fn parse_assignments(table: Table, assignments: &[String]) -> Result<Fields> {
    let mut fields = Fields::new();
    for assignment in assignments {
        let (name, raw) = split_assignment(assignment)?;
        let value = parse_field_value(table, name, raw)?;
        fields.insert(name.to_string(), value);
    }
    Ok(fields)
}

/// Parse `field=value` filters. Every filter must name a schema field.
pub fn parse_filters(table: Table, filters: &[String]) -> Result<Vec<(String, Value)>> {
    filters
        .iter()
        .map(|filter| {
            let (name, raw) = split_assignment(filter)?;
            Ok((name.to_string(), parse_field_value(table, name, raw)?))
        })
        .collect()
}

fn split_assignment(assignment: &str) -> Result<(&str, &str)> {
    match assignment.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value)),
        _ => Err(Error::InvalidAssignment(assignment.to_string())),
    }
}

/// Print a serializable value as one line of JSON.
pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}
