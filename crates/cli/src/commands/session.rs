// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use dete_core::{auth, Database, Session};

use crate::cli::OutputFormat;
use crate::display::format_session;
use crate::error::{Error, Result};

use super::{open_db, print_json};

pub fn login(username: &str, password: &str) -> Result<()> {
    let (db, _, _) = open_db()?;
    let session = auth::login(&db, username, password)?;
    println!("Logged in as {}", format_session(&session));
    Ok(())
}

pub fn logout() -> Result<()> {
    let (db, _, _) = open_db()?;
    match auth::logout(&db)? {
        Some(session) => println!("Logged out {}", session.username),
        None => println!("Not logged in"),
    }
    Ok(())
}

pub fn whoami(output: OutputFormat) -> Result<()> {
    let (db, _, _) = open_db()?;
    let session = whoami_impl(&db)?;
    match output {
        OutputFormat::Json => print_json(&session)?,
        OutputFormat::Text => {
            println!("{}", format_session(&session));
            println!("Permissions: {}", session.permissions.join(", "));
        }
    }
    Ok(())
}

pub(crate) fn whoami_impl(db: &Database) -> Result<Session> {
    auth::current_user(db).ok_or(Error::NotLoggedIn)
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
