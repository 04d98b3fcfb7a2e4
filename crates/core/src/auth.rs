// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Local users, profiles and the signed-in session.
//!
//! The session lives in the `currentUser` config key. Permissions are
//! `<area>.<verb>` strings; the admin profile holds every permission.
//! Passwords are stored as Argon2id PHC strings.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::db::{Database, User, KEY_CURRENT_USER};
use crate::error::{Error, Result};
use crate::table::Table;

const ADMIN_PERMISSIONS: &[&str] = &[
    "dashboard.view",
    "pacientes.view",
    "pacientes.create",
    "pacientes.edit",
    "pacientes.delete",
    "cuidadores.view",
    "cuidadores.create",
    "cuidadores.edit",
    "cuidadores.delete",
    "financeiro.view",
    "financeiro.create",
    "financeiro.edit",
    "financeiro.delete",
    "agendamentos.view",
    "agendamentos.create",
    "agendamentos.edit",
    "agendamentos.delete",
    "relatorios.view",
    "relatorios.export",
    "configuracoes.view",
    "configuracoes.edit",
    "usuarios.view",
    "usuarios.create",
    "usuarios.edit",
    "usuarios.delete",
];

const MEDICO_PERMISSIONS: &[&str] = &[
    "dashboard.view",
    "pacientes.view",
    "pacientes.create",
    "pacientes.edit",
    "agendamentos.view",
    "agendamentos.create",
    "agendamentos.edit",
    "relatorios.view",
];

const CUIDADOR_PERMISSIONS: &[&str] = &[
    "dashboard.view",
    "pacientes.view",
    "agendamentos.view",
    "escalas.view",
];

const FINANCEIRO_PERMISSIONS: &[&str] = &[
    "dashboard.view",
    "financeiro.view",
    "financeiro.create",
    "financeiro.edit",
    "relatorios.view",
    "relatorios.export",
];

/// Role assigned to a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    Admin,
    Medico,
    Cuidador,
    Financeiro,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Admin => "admin",
            Profile::Medico => "medico",
            Profile::Cuidador => "cuidador",
            Profile::Financeiro => "financeiro",
        }
    }

    /// The permission set granted to this profile.
    pub fn permissions(&self) -> &'static [&'static str] {
        match self {
            Profile::Admin => ADMIN_PERMISSIONS,
            Profile::Medico => MEDICO_PERMISSIONS,
            Profile::Cuidador => CUIDADOR_PERMISSIONS,
            Profile::Financeiro => FINANCEIRO_PERMISSIONS,
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Profile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Profile::Admin),
            "medico" => Ok(Profile::Medico),
            "cuidador" => Ok(Profile::Cuidador),
            "financeiro" => Ok(Profile::Financeiro),
            _ => Err(Error::InvalidProfile(s.to_string())),
        }
    }
}

/// Builds the permission string guarding `verb` on a table.
pub fn permission_for(table: Table, verb: &str) -> String {
    format!("{}.{verb}", table.permission_area())
}

/// The signed-in user as stored in `currentUser`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(rename = "perfil")]
    pub profile: Profile,
    pub permissions: Vec<String>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub login_time: DateTime<Utc>,
}

impl Session {
    fn for_user(user: &User) -> Self {
        Session {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            profile: user.profile,
            permissions: user
                .profile
                .permissions()
                .iter()
                .map(|p| p.to_string())
                .collect(),
            login_time: now_millis(),
        }
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.profile == Profile::Admin || self.permissions.iter().any(|p| p == permission)
    }

    pub fn has_role(&self, roles: &[Profile]) -> bool {
        roles.contains(&self.profile)
    }
}

/// Current time at the millisecond precision the session is stored with.
fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

/// Hashes a password with Argon2id and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::PasswordHash(e.to_string()))
}

/// Checks a password against a stored PHC string. Unreadable hashes never match.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "unreadable password hash");
            false
        }
    }
}

/// Input for [`register`].
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub profile: Profile,
}

/// Create a user account after validating required fields.
pub fn register(db: &Database, new: &NewUser<'_>) -> Result<User> {
    for (field, value) in [
        ("username", new.username),
        ("email", new.email),
        ("password", new.password),
    ] {
        if value.trim().is_empty() {
            return Err(Error::FieldRequired { field });
        }
    }
    let hash = hash_password(new.password)?;
    let user = db.create_user(new.username, new.email, &hash, new.profile)?;
    tracing::info!(username = %user.username, profile = %user.profile, "user registered");
    Ok(user)
}

/// Verify credentials and store a new session.
pub fn login(db: &Database, username: &str, password: &str) -> Result<Session> {
    let user = db
        .find_user_by_username(username)?
        .ok_or_else(|| Error::UserNotFound(username.to_string()))?;

    if !verify_password(password, &user.password_hash) {
        return Err(Error::WrongPassword(username.to_string()));
    }
    if !user.is_active() {
        return Err(Error::UserInactive(username.to_string()));
    }

    let session = Session::for_user(&user);
    db.set_config(KEY_CURRENT_USER, &serde_json::to_value(&session)?)?;
    audit(db, &session, "login");
    Ok(session)
}

/// Replace the signed-in user's password after checking the current one.
pub fn change_password(db: &Database, current: &str, new: &str) -> Result<()> {
    let session = current_user(db).ok_or(Error::NotLoggedIn)?;
    if new.trim().is_empty() {
        return Err(Error::FieldRequired {
            field: "new password",
        });
    }
    let user = db
        .find_user_by_username(&session.username)?
        .ok_or_else(|| Error::UserNotFound(session.username.clone()))?;
    if !verify_password(current, &user.password_hash) {
        return Err(Error::WrongPassword(session.username));
    }

    db.set_password_hash(&user.username, &hash_password(new)?)?;
    audit(db, &session, "password_change");
    tracing::info!(username = %user.username, "password changed");
    Ok(())
}

/// Clear the session, returning the user who was signed in.
pub fn logout(db: &Database) -> Result<Option<Session>> {
    let session = current_user(db);
    if let Some(session) = &session {
        audit(db, session, "logout");
    }
    db.delete_config(KEY_CURRENT_USER)?;
    Ok(session)
}

/// The signed-in user. Unreadable sessions read as signed out.
pub fn current_user(db: &Database) -> Option<Session> {
    match db.get_config(KEY_CURRENT_USER) {
        Ok(Some(value)) => serde_json::from_value(value)
            .map_err(|e| tracing::warn!(error = %e, "ignoring malformed session"))
            .ok(),
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(error = %e, "failed to read session");
            None
        }
    }
}

fn audit(db: &Database, session: &Session, action: &str) {
    if let Err(e) = db.log_audit(Some(session.id), action, "usuarios", session.id) {
        tracing::warn!(action, error = %e, "failed to write audit entry");
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
