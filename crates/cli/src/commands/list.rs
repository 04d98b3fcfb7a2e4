// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use dete_core::{store, Database, Record, Table};
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::display::format_record_line;
use crate::error::Result;

use super::{open_db, parse_filters, require_table_permission};

pub fn run(table: &str, filters: &[String], output: OutputFormat) -> Result<()> {
    let (db, _, _) = open_db()?;
    let table: Table = table.parse()?;
    let records = run_impl(&db, table, filters)?;

    match output {
        OutputFormat::Json => {
            let objects: Vec<Value> = records
                .iter()
                .map(|r| Value::Object(r.to_object()))
                .collect();
            println!("{}", serde_json::to_string(&objects)?);
        }
        OutputFormat::Text => {
            if records.is_empty() {
                println!("No {table} records");
            }
            for record in &records {
                println!("{}", format_record_line(record));
            }
        }
    }
    Ok(())
}

/// Internal implementation that accepts db for testing.
pub(crate) fn run_impl(db: &Database, table: Table, filters: &[String]) -> Result<Vec<Record>> {
    require_table_permission(db, table, "view")?;
    let filters = parse_filters(table, filters)?;
    Ok(store::list(db, table, &filters)?)
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
