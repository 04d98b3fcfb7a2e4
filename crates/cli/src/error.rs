// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::sync::{RemoteError, SyncError};

/// All possible errors that can occur in the dete CLI.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: run 'dete init' first")]
    NotInitialized,

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("not logged in\n  hint: run 'dete login <username>' first")]
    NotLoggedIn,

    #[error("permission denied: '{permission}' is required")]
    PermissionDenied { permission: String },

    #[error("no remote configured\n  hint: run 'dete remote config' to set one up")]
    RemoteNotConfigured,

    #[error("remote credentials incomplete: {0}\n  hint: run 'dete remote config' to set them")]
    CredentialsMissing(&'static str),

    #[error("another sync is running in this workspace")]
    SyncBusy,

    #[error("some operations failed: {succeeded} succeeded, {failed} failed\n  hint: failed operations stay queued for the next push")]
    SyncIncomplete { succeeded: usize, failed: usize },

    #[error("invalid assignment '{0}'\n  hint: use field=value")]
    InvalidAssignment(String),

    #[error("{context} is required for {operation}")]
    RequiredFor {
        context: &'static str,
        operation: &'static str,
    },

    #[error("expected a JSON object keyed by table name")]
    InvalidImport,

    #[error(transparent)]
    Core(#[from] dete_core::Error),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),
}

/// A specialized Result type for dete CLI operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
