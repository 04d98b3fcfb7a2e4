// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! dete-core: local store for the dete home-care records system
//!
//! This crate provides the domain tables, the SQLite store, the durable
//! sync operation queue, the CRUD path that feeds it, and local users and
//! sessions. Remote delivery lives in the `dete` crate.

pub mod auth;
pub mod db;
pub mod error;
pub mod op;
pub mod record;
pub mod store;
pub mod table;

pub use auth::{Profile, Session};
pub use db::{AuditEntry, Database, SyncCredentials, User};
pub use error::{Error, Result};
pub use op::{Action, Operation};
pub use record::{Fields, Record};
pub use table::{Field, FieldKind, Table, CREATED_AT_FIELD, ID_FIELD, UPDATED_AT_FIELD};
