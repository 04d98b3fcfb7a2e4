// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use dete_core::{AuditEntry, Database, Operation};

use crate::cli::OutputFormat;
use crate::display::{format_audit, format_operation};
use crate::error::Result;

use super::{open_db, print_json, require_permission};

/// Number of entries shown when no limit is given.
pub const DEFAULT_LIMIT: usize = 20;

pub fn run(pending: bool, audit: bool, limit: Option<usize>, output: OutputFormat) -> Result<()> {
    let (db, _, _) = open_db()?;

    if audit {
        let entries = audit_impl(&db, limit)?;
        match output {
            OutputFormat::Json => print_json(&entries)?,
            OutputFormat::Text if entries.is_empty() => println!("No audit entries"),
            OutputFormat::Text => entries.iter().for_each(|e| println!("{}", format_audit(e))),
        }
        return Ok(());
    }

    let ops = operations_impl(&db, pending, limit)?;
    match output {
        OutputFormat::Json => print_json(&ops)?,
        OutputFormat::Text if ops.is_empty() => println!("No operations"),
        OutputFormat::Text => ops.iter().for_each(|op| println!("{}", format_operation(op))),
    }
    Ok(())
}

/// Queued operations, newest first. `pending` keeps only undelivered ones.
pub(crate) fn operations_impl(
    db: &Database,
    pending: bool,
    limit: Option<usize>,
) -> Result<Vec<Operation>> {
    if !pending {
        return Ok(db.operations(limit)?);
    }
    let mut ops = db.drain_candidates()?;
    ops.reverse();
    if let Some(limit) = limit {
        ops.truncate(limit);
    }
    Ok(ops)
}

/// Audit trail, newest first. Reading it is an administrative action.
pub(crate) fn audit_impl(db: &Database, limit: Option<usize>) -> Result<Vec<AuditEntry>> {
    require_permission(db, "configuracoes.view")?;
    Ok(db.audit_entries(limit)?)
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
