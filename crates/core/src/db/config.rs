// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Key/value settings stored alongside the data.
//!
//! Values are JSON documents so the session object and plain strings share
//! one table.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use serde_json::Value;

use super::Database;
use crate::error::Result;

pub const KEY_GOOGLE_CLIENT_ID: &str = "google_client_id";
pub const KEY_GOOGLE_API_KEY: &str = "google_api_key";
pub const KEY_GOOGLE_SPREADSHEET_ID: &str = "google_spreadsheet_id";
pub const KEY_LAST_SYNC: &str = "last_sync";
pub const KEY_CURRENT_USER: &str = "currentUser";
pub const KEY_REMOTE_ACCESS_TOKEN: &str = "remote_access_token";
pub const KEY_REMOTE_USER_ID: &str = "remote_user_id";

/// Credentials identifying the remote spreadsheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncCredentials {
    pub client_id: String,
    pub api_key: String,
    pub spreadsheet_id: String,
}

impl SyncCredentials {
    /// True when the spreadsheet can be addressed.
    pub fn is_complete(&self) -> bool {
        !self.api_key.is_empty() && !self.spreadsheet_id.is_empty()
    }
}

impl Database {
    pub fn get_config(&self, key: &str) -> Result<Option<Value>> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM config WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        match raw {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn set_config(&self, key: &str, value: &Value) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT INTO config (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, raw],
        )?;
        Ok(())
    }

    pub fn delete_config(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM config WHERE key = ?1", params![key])?;
        Ok(())
    }

    /// String-valued setting; non-string values read as absent.
    pub fn get_config_str(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .get_config(key)?
            .and_then(|v| v.as_str().map(str::to_string)))
    }

    /// Load the stored spreadsheet credentials; missing keys read as empty.
    pub fn sync_credentials(&self) -> Result<SyncCredentials> {
        Ok(SyncCredentials {
            client_id: self.get_config_str(KEY_GOOGLE_CLIENT_ID)?.unwrap_or_default(),
            api_key: self.get_config_str(KEY_GOOGLE_API_KEY)?.unwrap_or_default(),
            spreadsheet_id: self
                .get_config_str(KEY_GOOGLE_SPREADSHEET_ID)?
                .unwrap_or_default(),
        })
    }

    /// Store credentials. Empty values leave the existing setting untouched.
    pub fn save_sync_credentials(&self, creds: &SyncCredentials) -> Result<()> {
        for (key, value) in [
            (KEY_GOOGLE_CLIENT_ID, &creds.client_id),
            (KEY_GOOGLE_API_KEY, &creds.api_key),
            (KEY_GOOGLE_SPREADSHEET_ID, &creds.spreadsheet_id),
        ] {
            if !value.is_empty() {
                self.set_config(key, &Value::String(value.clone()))?;
            }
        }
        Ok(())
    }

    /// Time of the last successful full drain.
    pub fn last_sync(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self
            .get_config(KEY_LAST_SYNC)?
            .and_then(|v| v.as_i64())
            .and_then(DateTime::from_timestamp_millis))
    }

    pub fn set_last_sync(&self, at: DateTime<Utc>) -> Result<()> {
        self.set_config(KEY_LAST_SYNC, &Value::from(at.timestamp_millis()))
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
