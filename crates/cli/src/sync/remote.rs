// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote adapter abstraction.
//!
//! An adapter translates queued table operations into calls against one
//! remote backend. Implementations exist for spreadsheet-style tabular
//! stores and for a hosted row store; tests use in-memory fakes.

use std::future::Future;
use std::pin::Pin;

use dete_core::{Record, Table};

/// Error type for remote calls.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    /// The remote answered with a non-success status.
    #[error("remote returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("authentication failed: {0}")]
    Auth(String),
}

impl RemoteError {
    /// True for failures worth retrying within the same drain.
    pub fn is_transient(&self) -> bool {
        match self {
            RemoteError::Network(_) | RemoteError::Timeout => true,
            RemoteError::Status { status, .. } => *status == 429 || *status >= 500,
            RemoteError::Decode(_) | RemoteError::Auth(_) => false,
        }
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RemoteError::Timeout
        } else if e.is_decode() {
            RemoteError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            RemoteError::Status {
                status: status.as_u16(),
                body: e.to_string(),
            }
        } else {
            RemoteError::Network(e.to_string())
        }
    }
}

/// Result type for remote calls.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Boxed future returned by adapter methods.
pub type RemoteFuture<'a, T> = Pin<Box<dyn Future<Output = RemoteResult<T>> + Send + 'a>>;

/// Records read from a remote resource.
#[derive(Debug, Default)]
pub struct Pulled {
    pub records: Vec<Record>,
    /// Rows that could not be parsed against the local schema.
    pub rejected: usize,
}

/// A remote store that queued operations are replayed against.
pub trait RemoteAdapter: Send + Sync {
    /// Remote resource (sheet, collection) holding a table, if mapped.
    fn resource_for(&self, table: Table) -> Option<&str>;

    /// Called once at the start of every drain; drops per-drain caches.
    fn begin_drain(&self);

    /// Add a new remote row for the record.
    fn append<'a>(&'a self, resource: &'a str, record: &'a Record) -> RemoteFuture<'a, ()>;

    /// Overwrite the remote row for the record, appending if it has none.
    fn update<'a>(&'a self, resource: &'a str, record: &'a Record) -> RemoteFuture<'a, ()>;

    /// Remove the remote row for a record id. A missing row is not an error.
    fn delete<'a>(&'a self, resource: &'a str, record_id: i64) -> RemoteFuture<'a, ()>;

    /// Read every record from a resource. Rows that do not fit the table
    /// schema are counted, never returned.
    fn pull<'a>(&'a self, resource: &'a str, table: Table) -> RemoteFuture<'a, Pulled>;
}

impl<T: RemoteAdapter + ?Sized> RemoteAdapter for Box<T> {
    fn resource_for(&self, table: Table) -> Option<&str> {
        (**self).resource_for(table)
    }

    fn begin_drain(&self) {
        (**self).begin_drain()
    }

    fn append<'a>(&'a self, resource: &'a str, record: &'a Record) -> RemoteFuture<'a, ()> {
        (**self).append(resource, record)
    }

    fn update<'a>(&'a self, resource: &'a str, record: &'a Record) -> RemoteFuture<'a, ()> {
        (**self).update(resource, record)
    }

    fn delete<'a>(&'a self, resource: &'a str, record_id: i64) -> RemoteFuture<'a, ()> {
        (**self).delete(resource, record_id)
    }

    fn pull<'a>(&'a self, resource: &'a str, table: Table) -> RemoteFuture<'a, Pulled> {
        (**self).pull(resource, table)
    }
}

/// Turns a non-success HTTP response into [`RemoteError::Status`].
pub(crate) async fn check_status(response: reqwest::Response) -> RemoteResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RemoteError::Status {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
#[path = "remote_tests.rs"]
mod tests;
