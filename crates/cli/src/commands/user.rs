// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use dete_core::auth::{self, NewUser};
use dete_core::db::STATUS_ACTIVE;
use dete_core::{Database, Profile, User};

use crate::cli::OutputFormat;
use crate::display::format_user_line;
use crate::error::Result;

use super::{open_db, print_json, require_permission, require_session};

/// Status given to disabled accounts.
const STATUS_INACTIVE: &str = "inactive";

pub fn add(username: &str, email: &str, password: &str, profile: &str) -> Result<()> {
    let (db, _, _) = open_db()?;
    let user = add_impl(&db, username, email, password, profile)?;
    println!("Created user {} ({})", user.username, user.profile);
    Ok(())
}

/// Register a user. Only the very first account may be created without a
/// session; after that `usuarios.create` is required.
pub(crate) fn add_impl(
    db: &Database,
    username: &str,
    email: &str,
    password: &str,
    profile: &str,
) -> Result<User> {
    let profile: Profile = profile.parse()?;
    if db.count_users()? > 0 {
        require_permission(db, "usuarios.create")?;
    }
    Ok(auth::register(
        db,
        &NewUser {
            username,
            email,
            password,
            profile,
        },
    )?)
}

pub fn list(output: OutputFormat) -> Result<()> {
    let (db, _, _) = open_db()?;
    let users = list_impl(&db)?;
    match output {
        OutputFormat::Json => print_json(&users)?,
        OutputFormat::Text => {
            if users.is_empty() {
                println!("No users");
            }
            for user in &users {
                println!("{}", format_user_line(user));
            }
        }
    }
    Ok(())
}

pub(crate) fn list_impl(db: &Database) -> Result<Vec<User>> {
    require_permission(db, "usuarios.view")?;
    Ok(db.list_users()?)
}

pub fn set_active(username: &str, active: bool) -> Result<()> {
    let (db, _, _) = open_db()?;
    set_active_impl(&db, username, active)?;
    let state = if active { "enabled" } else { "disabled" };
    println!("User {username} {state}");
    Ok(())
}

pub(crate) fn set_active_impl(db: &Database, username: &str, active: bool) -> Result<()> {
    require_permission(db, "usuarios.edit")?;
    let status = if active {
        STATUS_ACTIVE
    } else {
        STATUS_INACTIVE
    };
    db.set_user_status(username, status)?;
    Ok(())
}

pub fn passwd(current: &str, new: &str) -> Result<()> {
    let (db, _, _) = open_db()?;
    let username = passwd_impl(&db, current, new)?;
    println!("Password changed for {username}");
    Ok(())
}

pub(crate) fn passwd_impl(db: &Database, current: &str, new: &str) -> Result<String> {
    let session = require_session(db)?;
    auth::change_password(db, current, new)?;
    Ok(session.username)
}

#[cfg(test)]
#[path = "user_tests.rs"]
mod tests;
