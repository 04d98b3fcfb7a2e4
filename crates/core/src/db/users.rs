// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Local user accounts.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use serde::Serialize;

use super::{parse_db, parse_timestamp, Database};
use crate::auth::Profile;
use crate::error::{Error, Result};

pub const STATUS_ACTIVE: &str = "active";

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub profile: Profile,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_active(&self) -> bool {
        self.status == STATUS_ACTIVE
    }
}

fn row_to_user(row: &Row<'_>) -> std::result::Result<User, rusqlite::Error> {
    let profile_str: String = row.get(4)?;
    let created_str: String = row.get(6)?;
    let updated_str: String = row.get(7)?;
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        profile: parse_db(&profile_str, "perfil")?,
        status: row.get(5)?,
        created_at: parse_timestamp(&created_str, "created_at")?,
        updated_at: parse_timestamp(&updated_str, "updated_at")?,
    })
}

const SELECT_USERS: &str = "SELECT id, username, email, password_hash, perfil, status, created_at, updated_at FROM usuarios";

impl Database {
    /// Create an active user. Username and email must both be unused.
    pub fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        profile: Profile,
    ) -> Result<User> {
        if self.find_user_by_username(username)?.is_some() {
            return Err(Error::UsernameTaken(username.to_string()));
        }
        let email_used: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM usuarios WHERE email = ?1",
            params![email],
            |row| row.get(0),
        )?;
        if email_used {
            return Err(Error::EmailTaken(email.to_string()));
        }

        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO usuarios (username, email, password_hash, perfil, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                username,
                email,
                password_hash,
                profile.as_str(),
                STATUS_ACTIVE,
                now.to_rfc3339(),
                now.to_rfc3339()
            ],
        )?;
        Ok(User {
            id: self.conn.last_insert_rowid(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            profile,
            status: STATUS_ACTIVE.to_string(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("{SELECT_USERS} WHERE username = ?1"),
                params![username],
                row_to_user,
            )
            .optional()?;
        Ok(user)
    }

    pub fn list_users(&self) -> Result<Vec<User>> {
        let mut stmt = self.conn.prepare(&format!("{SELECT_USERS} ORDER BY id"))?;
        let users = stmt
            .query_map([], row_to_user)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(users)
    }

    pub fn count_users(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM usuarios", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// Store a new password hash for a user.
    pub fn set_password_hash(&self, username: &str, password_hash: &str) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE usuarios SET password_hash = ?1, updated_at = ?2 WHERE username = ?3",
            params![password_hash, Utc::now().to_rfc3339(), username],
        )?;
        if updated == 0 {
            return Err(Error::UserNotFound(username.to_string()));
        }
        Ok(())
    }

    /// Set a user's status (`active` or `inactive`).
    pub fn set_user_status(&self, username: &str, status: &str) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE usuarios SET status = ?1, updated_at = ?2 WHERE username = ?3",
            params![status, Utc::now().to_rfc3339(), username],
        )?;
        if updated == 0 {
            return Err(Error::UserNotFound(username.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;
