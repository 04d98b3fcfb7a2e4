// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote sync for the offline-first store.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌─────────────────┐     ┌──────────────┐
//! │ SyncOrchestrator │────►│  RemoteAdapter  │────►│    Remote    │
//! │  (drain / pull)  │◄────│     (trait)     │◄────│ Sheets/REST  │
//! └──────────────────┘     └─────────────────┘     └──────────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │  sync_ops queue  │  (local store)
//! └──────────────────┘
//! ```
//!
//! - [`TabularAdapter`] locates rows by their identity column and serves any
//!   [`TabularBackend`]; [`SheetsClient`] is the Google Sheets backend.
//! - [`HostedAdapter`] speaks PostgREST to a hosted database.
//! - [`ResourceMap`] decides which local tables have a remote counterpart.

mod hosted;
mod mapping;
mod orchestrator;
mod remote;
mod session;
mod sheets;
mod tabular;

pub use hosted::{sign_in_with_password, HostedAdapter, HostedConfig, HostedSignIn};
pub use mapping::ResourceMap;
pub use orchestrator::{
    DrainReport, PullReport, RetryPolicy, SyncError, SyncOrchestrator, SyncStatus, PULL_TABLES,
};
pub use remote::{Pulled, RemoteAdapter, RemoteError, RemoteFuture, RemoteResult};
pub use session::{SessionProvider, StoredSession};
pub use sheets::{SheetsClient, SheetsConfig, DEFAULT_SHEETS_URL};
pub use tabular::{TabularAdapter, TabularBackend};

#[cfg(test)]
mod test_helpers;
