// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fs::File;
use std::io::{self, BufReader, Read};

use dete_core::{store, Database};
use serde_json::Value;

use crate::error::{Error, Result};

use super::{open_db, require_permission};

pub fn run(file: &str) -> Result<()> {
    let (db, _, _) = open_db()?;
    let count = if file == "-" {
        run_impl(&db, io::stdin().lock())?
    } else {
        run_impl(&db, BufReader::new(File::open(file)?))?
    };
    println!("Imported {count} record(s)");
    Ok(())
}

/// Load an export. Imported records are not queued for sync.
pub(crate) fn run_impl<R: Read>(db: &Database, reader: R) -> Result<usize> {
    require_permission(db, "configuracoes.edit")?;
    let Value::Object(data) = serde_json::from_reader(reader)? else {
        return Err(Error::InvalidImport);
    };
    Ok(store::import_all(db, &data)?)
}

#[cfg(test)]
#[path = "import_tests.rs"]
mod tests;
