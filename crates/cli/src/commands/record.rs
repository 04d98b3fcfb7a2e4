// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Single-record commands: add, show, edit, rm.

use dete_core::{store, Database, Record, Table};

use crate::cli::OutputFormat;
use crate::display::format_record_details;
use crate::error::Result;

use super::{open_db, parse_assignments, print_json, require_table_permission};

fn print_record(record: &Record, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Json => print_json(&record.to_object()),
        OutputFormat::Text => {
            for line in format_record_details(record) {
                println!("{line}");
            }
            Ok(())
        }
    }
}

pub fn add(table: &str, assignments: &[String], output: OutputFormat) -> Result<()> {
    let (db, _, _) = open_db()?;
    let record = add_impl(&db, table.parse()?, assignments)?;
    match output {
        OutputFormat::Json => print_record(&record, output),
        OutputFormat::Text => {
            println!("Created {} #{}", record.table, record.id);
            Ok(())
        }
    }
}

pub(crate) fn add_impl(db: &Database, table: Table, assignments: &[String]) -> Result<Record> {
    require_table_permission(db, table, "create")?;
    let mut fields = parse_assignments(table, assignments)?;
    fields.retain(|_, v| !v.is_null());
    Ok(store::create(db, table, fields)?)
}

pub fn show(table: &str, id: i64, output: OutputFormat) -> Result<()> {
    let (db, _, _) = open_db()?;
    let record = show_impl(&db, table.parse()?, id)?;
    print_record(&record, output)
}

pub(crate) fn show_impl(db: &Database, table: Table, id: i64) -> Result<Record> {
    require_table_permission(db, table, "view")?;
    Ok(store::read(db, table, id)?)
}

pub fn edit(table: &str, id: i64, assignments: &[String]) -> Result<()> {
    let (db, _, _) = open_db()?;
    let record = edit_impl(&db, table.parse()?, id, assignments)?;
    println!("Updated {} #{}", record.table, record.id);
    Ok(())
}

pub(crate) fn edit_impl(
    db: &Database,
    table: Table,
    id: i64,
    assignments: &[String],
) -> Result<Record> {
    require_table_permission(db, table, "edit")?;
    let changes = parse_assignments(table, assignments)?;
    Ok(store::update(db, table, id, changes)?)
}

pub fn rm(table: &str, id: i64) -> Result<()> {
    let (db, _, _) = open_db()?;
    let table: Table = table.parse()?;
    rm_impl(&db, table, id)?;
    println!("Deleted {table} #{id}");
    Ok(())
}

pub(crate) fn rm_impl(db: &Database, table: Table, id: i64) -> Result<()> {
    require_table_permission(db, table, "delete")?;
    Ok(store::delete(db, table, id)?)
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
