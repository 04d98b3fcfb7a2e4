// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fs::File;
use std::io::{self, BufWriter, Write};

use dete_core::{store, Database};

use crate::error::{Error, Result};

use super::{open_db, require_permission};

pub fn run(filepath: &str) -> Result<()> {
    if filepath.trim().is_empty() {
        return Err(Error::RequiredFor {
            context: "an output path",
            operation: "export",
        });
    }

    let (db, _, _) = open_db()?;
    let count = if filepath == "-" {
        run_impl(&db, io::stdout().lock())?
    } else {
        run_impl(&db, BufWriter::new(File::create(filepath)?))?
    };
    if filepath != "-" {
        println!("Exported {count} record(s) to {filepath}");
    }
    Ok(())
}

/// Write every table as one pretty-printed JSON object. Returns the
/// number of records written.
pub(crate) fn run_impl<W: Write>(db: &Database, mut writer: W) -> Result<usize> {
    require_permission(db, "relatorios.export")?;
    let data = store::export_all(db)?;
    let count = data
        .values()
        .filter_map(|rows| rows.as_array())
        .map(Vec::len)
        .sum();
    serde_json::to_writer_pretty(&mut writer, &data)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(count)
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
