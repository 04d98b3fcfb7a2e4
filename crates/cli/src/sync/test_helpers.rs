// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use super::remote::{RemoteError, RemoteFuture};
use super::session::SessionProvider;
use super::tabular::TabularBackend;

/// A call observed by [`MemorySheets`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetCall {
    Append { sheet: String, row: Vec<String> },
    ReadIds { sheet: String },
    Write { sheet: String, row_number: usize },
    Clear { sheet: String, row_number: usize },
    ReadRows { sheet: String },
}

#[derive(Debug, Default)]
struct State {
    sheets: HashMap<String, Vec<Vec<String>>>,
    calls: Vec<SheetCall>,
    failing_ids: HashSet<String>,
    transient_failures: u32,
}

/// In-memory spreadsheet. Every call yields once before completing so
/// concurrent drains interleave.
#[derive(Debug, Clone, Default)]
pub struct MemorySheets {
    state: Arc<Mutex<State>>,
}

impl MemorySheets {
    /// Spreadsheet with a header row on each named sheet.
    pub fn with_headers(sheets: &[&str]) -> Self {
        let memory = MemorySheets::default();
        {
            let mut state = memory.state.lock().unwrap();
            for sheet in sheets {
                state
                    .sheets
                    .insert(sheet.to_string(), vec![vec!["id".to_string()]]);
            }
        }
        memory
    }

    /// Rows of a sheet, header included.
    pub fn rows(&self, sheet: &str) -> Vec<Vec<String>> {
        let state = self.state.lock().unwrap();
        state.sheets.get(sheet).cloned().unwrap_or_default()
    }

    /// Data rows whose identity cell equals `id`.
    pub fn rows_for(&self, sheet: &str, id: i64) -> Vec<Vec<String>> {
        let id = id.to_string();
        self.rows(sheet)
            .into_iter()
            .skip(1)
            .filter(|row| row.first() == Some(&id))
            .collect()
    }

    pub fn set_rows(&self, sheet: &str, rows: Vec<Vec<String>>) {
        let mut state = self.state.lock().unwrap();
        state.sheets.insert(sheet.to_string(), rows);
    }

    pub fn calls(&self) -> Vec<SheetCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn appends(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, SheetCall::Append { .. }))
            .count()
    }

    pub fn writes(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, SheetCall::Append { .. } | SheetCall::Write { .. } | SheetCall::Clear { .. }))
            .count()
    }

    /// Reject every write whose row identity is `id` with HTTP 400.
    pub fn fail_id(&self, id: i64) {
        self.state.lock().unwrap().failing_ids.insert(id.to_string());
    }

    /// Fail the next `n` calls with HTTP 503.
    pub fn fail_next(&self, n: u32) {
        self.state.lock().unwrap().transient_failures = n;
    }

    fn call(&self, call: SheetCall, id: Option<&str>) -> Result<(), RemoteError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.transient_failures > 0 {
            state.transient_failures -= 1;
            return Err(RemoteError::Status {
                status: 503,
                body: "unavailable".into(),
            });
        }
        if let Some(id) = id {
            if state.failing_ids.contains(id) {
                return Err(RemoteError::Status {
                    status: 400,
                    body: format!("rejected row {id}"),
                });
            }
        }
        Ok(())
    }

    fn id_at(&self, sheet: &str, row_number: usize) -> Option<String> {
        let state = self.state.lock().unwrap();
        state
            .sheets
            .get(sheet)
            .and_then(|rows| rows.get(row_number - 1))
            .and_then(|row| row.first().cloned())
    }
}

impl TabularBackend for MemorySheets {
    fn append_row<'a>(&'a self, sheet: &'a str, row: Vec<String>) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            tokio::task::yield_now().await;
            let call = SheetCall::Append {
                sheet: sheet.to_string(),
                row: row.clone(),
            };
            self.call(call, row.first().map(String::as_str))?;
            let mut state = self.state.lock().unwrap();
            state.sheets.entry(sheet.to_string()).or_default().push(row);
            Ok(())
        })
    }

    fn read_ids<'a>(&'a self, sheet: &'a str) -> RemoteFuture<'a, Vec<String>> {
        Box::pin(async move {
            tokio::task::yield_now().await;
            self.call(
                SheetCall::ReadIds {
                    sheet: sheet.to_string(),
                },
                None,
            )?;
            Ok(self
                .rows(sheet)
                .into_iter()
                .map(|row| row.into_iter().next().unwrap_or_default())
                .collect())
        })
    }

    fn write_row<'a>(
        &'a self,
        sheet: &'a str,
        row_number: usize,
        row: Vec<String>,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            tokio::task::yield_now().await;
            let call = SheetCall::Write {
                sheet: sheet.to_string(),
                row_number,
            };
            self.call(call, row.first().map(String::as_str))?;
            let mut state = self.state.lock().unwrap();
            let rows = state.sheets.entry(sheet.to_string()).or_default();
            if rows.len() < row_number {
                rows.resize(row_number, Vec::new());
            }
            rows[row_number - 1] = row;
            Ok(())
        })
    }

    fn clear_row<'a>(&'a self, sheet: &'a str, row_number: usize) -> RemoteFuture<'a, ()> {
        Box::pin(async move {
            tokio::task::yield_now().await;
            let id = self.id_at(sheet, row_number);
            let call = SheetCall::Clear {
                sheet: sheet.to_string(),
                row_number,
            };
            self.call(call, id.as_deref())?;
            let mut state = self.state.lock().unwrap();
            if let Some(row) = state
                .sheets
                .get_mut(sheet)
                .and_then(|rows| rows.get_mut(row_number - 1))
            {
                row.clear();
            }
            Ok(())
        })
    }

    fn read_rows<'a>(&'a self, sheet: &'a str) -> RemoteFuture<'a, Vec<Vec<String>>> {
        Box::pin(async move {
            tokio::task::yield_now().await;
            self.call(
                SheetCall::ReadRows {
                    sheet: sheet.to_string(),
                },
                None,
            )?;
            Ok(self.rows(sheet))
        })
    }
}

/// Session whose sign-in state is fixed at construction.
#[derive(Debug, Clone)]
pub struct FakeSession {
    pub signed_in: bool,
}

impl FakeSession {
    pub fn signed_in() -> Self {
        FakeSession { signed_in: true }
    }

    pub fn signed_out() -> Self {
        FakeSession { signed_in: false }
    }
}

impl SessionProvider for FakeSession {
    fn is_signed_in(&self) -> bool {
        self.signed_in
    }

    fn user_id(&self) -> Option<&str> {
        None
    }
}
