// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for dete-core operations.

use thiserror::Error;

/// All possible errors that can occur in dete-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("record not found: {table} #{id}")]
    RecordNotFound { table: String, id: i64 },

    #[error("operation not found: #{0}")]
    OperationNotFound(i64),

    #[error("unknown table: '{0}'\n  hint: valid tables are: {valid}", valid = crate::table::Table::names())]
    UnknownTable(String),

    #[error("unknown field '{field}' for table {table}\n  hint: valid fields are: {valid}")]
    UnknownField {
        table: String,
        field: String,
        valid: String,
    },

    #[error("invalid value for {table}.{field}: '{value}' is not a number")]
    InvalidNumber {
        table: String,
        field: String,
        value: String,
    },

    #[error("field '{0}' is managed by the store and cannot be set")]
    ReservedField(String),

    #[error("invalid action: '{0}'\n  hint: valid actions are: create, update, delete")]
    InvalidAction(String),

    #[error("invalid profile: '{0}'\n  hint: valid profiles are: admin, medico, cuidador, financeiro")]
    InvalidProfile(String),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("username already exists: {0}")]
    UsernameTaken(String),

    #[error("email already registered: {0}")]
    EmailTaken(String),

    #[error("incorrect password for {0}")]
    WrongPassword(String),

    #[error("user is inactive: {0}")]
    UserInactive(String),

    #[error("not logged in")]
    NotLoggedIn,

    #[error("failed to hash password: {0}")]
    PasswordHash(String),

    #[error("{field} is required")]
    FieldRequired { field: &'static str },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

/// A specialized Result type for dete-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
