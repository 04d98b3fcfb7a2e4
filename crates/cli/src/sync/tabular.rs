// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Adapter for spreadsheet-style remotes.
//!
//! Rows have no key of their own: column A holds the stringified local id
//! and row 1 is a header. Locating a record scans column A once per sheet
//! per drain; the id-to-row index is cached until the next drain starts or
//! a row is appended to that sheet.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use dete_core::{Record, Table};

use super::mapping::ResourceMap;
use super::remote::{Pulled, RemoteAdapter, RemoteFuture, RemoteResult};

/// Low-level row access to a tabular remote. Row numbers are 1-based.
pub trait TabularBackend: Send + Sync {
    /// Append a row after the last non-empty row.
    fn append_row<'a>(&'a self, sheet: &'a str, row: Vec<String>) -> RemoteFuture<'a, ()>;

    /// Read the identity column; element 0 is row 1.
    fn read_ids<'a>(&'a self, sheet: &'a str) -> RemoteFuture<'a, Vec<String>>;

    /// Overwrite a row in place.
    fn write_row<'a>(
        &'a self,
        sheet: &'a str,
        row_number: usize,
        row: Vec<String>,
    ) -> RemoteFuture<'a, ()>;

    /// Blank a row's cells. The row itself stays.
    fn clear_row<'a>(&'a self, sheet: &'a str, row_number: usize) -> RemoteFuture<'a, ()>;

    /// Read every row, header included.
    fn read_rows<'a>(&'a self, sheet: &'a str) -> RemoteFuture<'a, Vec<Vec<String>>>;
}

type RowIndex = HashMap<String, usize>;

/// [`RemoteAdapter`] over any [`TabularBackend`].
pub struct TabularAdapter<B> {
    backend: B,
    resources: ResourceMap,
    index: Mutex<HashMap<String, RowIndex>>,
}

impl<B: TabularBackend> TabularAdapter<B> {
    pub fn new(backend: B, resources: ResourceMap) -> Self {
        TabularAdapter {
            backend,
            resources,
            index: Mutex::new(HashMap::new()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn index(&self) -> MutexGuard<'_, HashMap<String, RowIndex>> {
        self.index.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn invalidate(&self, sheet: &str) {
        self.index().remove(sheet);
    }

    /// Find the row holding a record id, scanning column A on a cache miss.
    pub async fn locate(&self, sheet: &str, record_id: i64) -> RemoteResult<Option<usize>> {
        let key = record_id.to_string();
        if let Some(rows) = self.index().get(sheet) {
            return Ok(rows.get(&key).copied());
        }

        let ids = self.backend.read_ids(sheet).await?;
        let mut rows = RowIndex::new();
        // Skip the header; on duplicates the first row wins
        for (i, id) in ids.iter().enumerate().skip(1) {
            let id = id.trim();
            if !id.is_empty() {
                rows.entry(id.to_string()).or_insert(i + 1);
            }
        }
        tracing::debug!(sheet, rows = rows.len(), "indexed identity column");
        let found = rows.get(&key).copied();
        self.index().insert(sheet.to_string(), rows);
        Ok(found)
    }

    async fn append_record(&self, sheet: &str, record: &Record) -> RemoteResult<()> {
        tracing::debug!(sheet, id = record.id, "append row");
        self.backend.append_row(sheet, record.to_row()).await?;
        self.invalidate(sheet);
        Ok(())
    }

    async fn update_record(&self, sheet: &str, record: &Record) -> RemoteResult<()> {
        match self.locate(sheet, record.id).await? {
            Some(row_number) => {
                tracing::debug!(sheet, id = record.id, row_number, "update row");
                self.backend
                    .write_row(sheet, row_number, record.to_row())
                    .await
            }
            None => {
                tracing::debug!(sheet, id = record.id, "row not found, appending");
                self.append_record(sheet, record).await
            }
        }
    }

    async fn delete_record(&self, sheet: &str, record_id: i64) -> RemoteResult<()> {
        let Some(row_number) = self.locate(sheet, record_id).await? else {
            tracing::debug!(sheet, id = record_id, "row not found, nothing to delete");
            return Ok(());
        };
        tracing::debug!(sheet, id = record_id, row_number, "clear row");
        self.backend.clear_row(sheet, row_number).await?;
        if let Some(rows) = self.index().get_mut(sheet) {
            rows.remove(&record_id.to_string());
        }
        Ok(())
    }

    async fn pull_records(&self, sheet: &str, table: Table) -> RemoteResult<Pulled> {
        let rows = self.backend.read_rows(sheet).await?;
        let mut pulled = Pulled::default();
        for (i, row) in rows.iter().enumerate().skip(1) {
            match Record::from_row(table, row) {
                Ok(Some(record)) => pulled.records.push(record),
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(sheet, row_number = i + 1, error = %e, "rejected malformed row");
                    pulled.rejected += 1;
                }
            }
        }
        Ok(pulled)
    }
}

impl<B: TabularBackend> RemoteAdapter for TabularAdapter<B> {
    fn resource_for(&self, table: Table) -> Option<&str> {
        self.resources.get(table)
    }

    fn begin_drain(&self) {
        self.index().clear();
    }

    fn append<'a>(&'a self, resource: &'a str, record: &'a Record) -> RemoteFuture<'a, ()> {
        Box::pin(self.append_record(resource, record))
    }

    fn update<'a>(&'a self, resource: &'a str, record: &'a Record) -> RemoteFuture<'a, ()> {
        Box::pin(self.update_record(resource, record))
    }

    fn delete<'a>(&'a self, resource: &'a str, record_id: i64) -> RemoteFuture<'a, ()> {
        Box::pin(self.delete_record(resource, record_id))
    }

    fn pull<'a>(&'a self, resource: &'a str, table: Table) -> RemoteFuture<'a, Pulled> {
        Box::pin(self.pull_records(resource, table))
    }
}

#[cfg(test)]
#[path = "tabular_tests.rs"]
mod tests;
