// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote sign-in state.
//!
//! The access token and remote user id are kept in the local `config`
//! table so a sign-in survives between CLI invocations.

use dete_core::db::{KEY_REMOTE_ACCESS_TOKEN, KEY_REMOTE_USER_ID};
use dete_core::Database;
use serde_json::Value;

/// Answers whether remote calls may be attempted.
pub trait SessionProvider: Send + Sync {
    fn is_signed_in(&self) -> bool;

    /// Remote identity of the signed-in user, when the backend has one.
    fn user_id(&self) -> Option<&str>;
}

/// Session loaded from the local config table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredSession {
    access_token: Option<String>,
    user_id: Option<String>,
}

impl StoredSession {
    pub fn load(db: &Database) -> dete_core::Result<Self> {
        Ok(StoredSession {
            access_token: db
                .get_config_str(KEY_REMOTE_ACCESS_TOKEN)?
                .filter(|t| !t.is_empty()),
            user_id: db.get_config_str(KEY_REMOTE_USER_ID)?,
        })
    }

    /// Persist a new sign-in.
    pub fn sign_in(
        db: &Database,
        access_token: &str,
        user_id: Option<&str>,
    ) -> dete_core::Result<Self> {
        db.set_config(KEY_REMOTE_ACCESS_TOKEN, &Value::from(access_token))?;
        match user_id {
            Some(id) => db.set_config(KEY_REMOTE_USER_ID, &Value::from(id))?,
            None => db.delete_config(KEY_REMOTE_USER_ID)?,
        }
        Self::load(db)
    }

    pub fn sign_out(db: &Database) -> dete_core::Result<()> {
        db.delete_config(KEY_REMOTE_ACCESS_TOKEN)?;
        db.delete_config(KEY_REMOTE_USER_ID)
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }
}

impl SessionProvider for StoredSession {
    fn is_signed_in(&self) -> bool {
        self.access_token.is_some()
    }

    fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
