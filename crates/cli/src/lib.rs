// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! dete - offline-first home-care records with remote sync.
//!
//! This crate provides the `dete` CLI on top of [`dete_core`]: every change
//! is written to the local store and queued, and the [`sync`] module replays
//! the queue against Google Sheets or a hosted PostgREST database.
//!
//! # Main Components
//!
//! - [`config`] - Workspace location and `config.toml` (remote backend, retry tuning)
//! - [`sync`] - Remote adapters and the [`SyncOrchestrator`](sync::SyncOrchestrator)
//! - [`Error`] - Error types for all commands
//!
//! # Initialization
//!
//! Use [`init_work_dir`] to create a new `.dete/` directory, then open the store:
//!
//! ```rust,ignore
//! use dete::{init_work_dir, find_work_dir, get_db_path};
//! use dete_core::Database;
//!
//! let work_dir = init_work_dir(Path::new("."), None)?;
//!
//! let work_dir = find_work_dir()?;
//! let db = Database::open(&get_db_path(&work_dir))?;
//! ```

mod cli;
mod commands;
mod display;

pub mod config;
pub mod error;
pub mod sync;

pub use cli::{Cli, Command, LimitArgs, OutputFormat, RecordArgs, RemoteCommand, UserCommand};
pub use config::{find_work_dir, get_db_path, init_work_dir, Backend, Config, RemoteConfig};
pub use error::{Error, Result};

use commands::remote::RemoteSettings;

/// Run a parsed command.
pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Add {
            table,
            assignments,
            output,
        } => commands::record::add(&table, &assignments, output),
        Command::Show { record, output } => commands::record::show(&record.table, record.id, output),
        Command::Edit {
            record,
            assignments,
        } => commands::record::edit(&record.table, record.id, &assignments),
        Command::Rm { record } => commands::record::rm(&record.table, record.id),
        Command::List {
            table,
            filters,
            output,
        } => commands::list::run(&table, &filters, output),
        Command::Log {
            pending,
            audit,
            limits,
            output,
        } => commands::log::run(
            pending,
            audit,
            limits.resolve(commands::log::DEFAULT_LIMIT),
            output,
        ),
        Command::User(cmd) => run_user(cmd),
        Command::Login { username, password } => commands::session::login(&username, &password),
        Command::Logout => commands::session::logout(),
        Command::Whoami { output } => commands::session::whoami(output),
        Command::Remote(cmd) => run_remote(cmd),
        Command::Init { path, remote } => commands::init::run(path, remote),
        Command::Export { filepath } => commands::export::run(&filepath),
        Command::Import { file } => commands::import::run(&file),
    }
}

fn run_user(command: UserCommand) -> Result<()> {
    match command {
        UserCommand::Add {
            username,
            email,
            password,
            profile,
        } => commands::user::add(&username, &email, &password, &profile),
        UserCommand::List { output } => commands::user::list(output),
        UserCommand::Disable { username } => commands::user::set_active(&username, false),
        UserCommand::Enable { username } => commands::user::set_active(&username, true),
        UserCommand::Passwd { current, new } => commands::user::passwd(&current, &new),
    }
}

fn run_remote(command: RemoteCommand) -> Result<()> {
    match command {
        RemoteCommand::Config {
            backend,
            client_id,
            api_key,
            spreadsheet_id,
            api_url,
            anon_key,
            output,
        } => commands::remote::config(
            RemoteSettings {
                backend,
                client_id,
                api_key,
                spreadsheet_id,
                api_url,
                anon_key,
            },
            output,
        ),
        RemoteCommand::Login {
            token,
            email,
            password,
        } => commands::remote::login(token, email, password),
        RemoteCommand::Logout => commands::remote::logout(),
        RemoteCommand::Status { output } => commands::remote::status(output),
        RemoteCommand::Push {
            watch,
            interval,
            output,
        } => commands::remote::push(watch, interval, output),
        RemoteCommand::Pull { output } => commands::remote::pull(output),
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
