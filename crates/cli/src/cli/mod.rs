// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

mod args;

use clap::{Parser, Subcommand, ValueEnum};

pub use args::{LimitArgs, RecordArgs};

use crate::config::Backend;

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

fn parse_backend(s: &str) -> Result<Backend, String> {
    s.parse().map_err(|e: crate::Error| e.to_string())
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "dete")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(disable_version_flag = true)]
#[command(about = "Offline-first home-care records with spreadsheet and hosted sync")]
#[command(
    long_about = "Offline-first home-care records.\n\n\
    Every change is written to a local SQLite store and queued; 'dete remote push' \
    replays the queue against Google Sheets or a hosted database."
)]
// Allow the unit type field pattern which is required for clap's ArgAction::Version/Help
#[allow(clippy::manual_non_exhaustive)]
pub struct Cli {
    /// Run as if dete was started in <path>
    #[arg(short = 'C', long = "directory", global = true, value_name = "path")]
    pub directory: Option<String>,

    /// Print version
    #[arg(short = 'v', short_alias = 'V', long = "version", action = clap::ArgAction::Version)]
    version: (),

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    // ─────────────────────────────────────────────────────────────────────────
    // Records
    // ─────────────────────────────────────────────────────────────────────────
    /// Create a record
    #[command(
        arg_required_else_help = true,
        after_help = "\
Examples:
  dete add pacientes nome=\"Ana Souza\" cpf=123      Create a patient
  dete add agendamentos pacienteId=1 data=2026-10-20 -o json"
    )]
    Add {
        /// Table name
        table: String,

        /// Field assignments (field=value)
        assignments: Vec<String>,

        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Show a record
    #[command(arg_required_else_help = true)]
    Show {
        #[command(flatten)]
        record: RecordArgs,

        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Change fields of a record (an empty value clears the field)
    #[command(
        arg_required_else_help = true,
        after_help = "\
Examples:
  dete edit pacientes 7 nome=\"Ana Maria\"    Rename patient 7
  dete edit pacientes 7 cpf=                 Clear the cpf field"
    )]
    Edit {
        #[command(flatten)]
        record: RecordArgs,

        /// Field assignments (field=value)
        #[arg(required = true)]
        assignments: Vec<String>,
    },

    /// Delete a record
    #[command(arg_required_else_help = true)]
    Rm {
        #[command(flatten)]
        record: RecordArgs,
    },

    /// List records of a table
    #[command(
        arg_required_else_help = true,
        after_help = "\
Examples:
  dete list pacientes                        All patients
  dete list pacientes -w status=ativo        Patients whose status is 'ativo'
  dete list agendamentos -w pacienteId=3 -o json"
    )]
    List {
        /// Table name
        table: String,

        /// Equality filter (field=value), repeat for AND
        #[arg(long = "where", short = 'w')]
        filters: Vec<String>,

        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// View the sync queue or the audit trail
    Log {
        /// Only operations not yet delivered
        #[arg(long, conflicts_with = "audit")]
        pending: bool,

        /// Show the audit trail instead of the sync queue
        #[arg(long)]
        audit: bool,

        #[command(flatten)]
        limits: LimitArgs,

        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Users & Session
    // ─────────────────────────────────────────────────────────────────────────
    /// Manage local users
    #[command(subcommand)]
    User(UserCommand),

    /// Sign in as a local user
    #[command(arg_required_else_help = true)]
    Login {
        /// Username
        username: String,

        /// Password
        #[arg(long, short = 'p')]
        password: String,
    },

    /// Sign out the current local user
    Logout,

    /// Show the signed-in local user
    Whoami {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Sync
    // ─────────────────────────────────────────────────────────────────────────
    /// Configure and run remote sync
    #[command(subcommand)]
    Remote(RemoteCommand),

    // ─────────────────────────────────────────────────────────────────────────
    // Setup & Data
    // ─────────────────────────────────────────────────────────────────────────
    /// Initialize a dete workspace in the current directory (or specified path)
    #[command(after_help = "\
Examples:
  dete init                       Local-only workspace
  dete init --remote sheets       Workspace syncing to Google Sheets
  dete init --remote hosted       Workspace syncing to a hosted database")]
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(long)]
        path: Option<String>,

        /// Remote backend to configure (sheets, hosted)
        #[arg(long, value_parser = parse_backend)]
        remote: Option<Backend>,
    },

    /// Export every table to a JSON file
    #[command(arg_required_else_help = true)]
    Export {
        /// Output file path ('-' for stdout)
        filepath: String,
    },

    /// Import records from a JSON export (not queued for sync)
    #[command(arg_required_else_help = true)]
    Import {
        /// Input file ('-' for stdin)
        #[arg(value_name = "FILE")]
        file: String,
    },
}

/// Local user management commands.
#[derive(Subcommand)]
pub enum UserCommand {
    /// Register a user. The first user needs no session.
    #[command(
        arg_required_else_help = true,
        after_help = "\
Examples:
  dete user add admin --email admin@dete.com --password s3cret --profile admin
  dete user add maria --email maria@dete.com --password s3cret --profile cuidador"
    )]
    Add {
        /// Username
        #[arg(value_parser = non_empty_string)]
        username: String,

        /// Email address
        #[arg(long, value_parser = non_empty_string)]
        email: String,

        /// Password
        #[arg(long, short = 'p', value_parser = non_empty_string)]
        password: String,

        /// Profile (admin, medico, cuidador, financeiro)
        #[arg(long, default_value = "cuidador")]
        profile: String,
    },

    /// List users
    List {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Deactivate a user (they can no longer log in)
    #[command(arg_required_else_help = true)]
    Disable {
        /// Username
        username: String,
    },

    /// Reactivate a user
    #[command(arg_required_else_help = true)]
    Enable {
        /// Username
        username: String,
    },

    /// Change the signed-in user's password
    #[command(
        arg_required_else_help = true,
        after_help = "\
Examples:
  dete user passwd --current s3cret --new n0va"
    )]
    Passwd {
        /// Current password
        #[arg(long)]
        current: String,

        /// New password
        #[arg(long, value_parser = non_empty_string)]
        new: String,
    },
}

/// Remote sync commands.
#[derive(Subcommand)]
pub enum RemoteCommand {
    /// Show or change remote credentials
    #[command(after_help = "\
Examples:
  dete remote config                                 Show current settings
  dete remote config --api-key K --spreadsheet-id S  Set Sheets credentials
  dete remote config --backend hosted --api-url https://x.supabase.co --anon-key K")]
    Config {
        /// Remote backend (sheets, hosted)
        #[arg(long, value_parser = parse_backend)]
        backend: Option<Backend>,

        /// Google OAuth client id
        #[arg(long)]
        client_id: Option<String>,

        /// Google API key
        #[arg(long)]
        api_key: Option<String>,

        /// Google spreadsheet id
        #[arg(long)]
        spreadsheet_id: Option<String>,

        /// Remote API base URL
        #[arg(long)]
        api_url: Option<String>,

        /// Hosted public API key
        #[arg(long)]
        anon_key: Option<String>,

        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Sign in to the remote
    #[command(after_help = "\
Examples:
  dete remote login --token ya29.a0...                  Use an OAuth access token
  dete remote login --email a@dete.com --password s3cret  Hosted password sign-in")]
    Login {
        /// Access token obtained elsewhere
        #[arg(long, conflicts_with_all = ["email", "password"])]
        token: Option<String>,

        /// Hosted account email
        #[arg(long, requires = "password")]
        email: Option<String>,

        /// Hosted account password
        #[arg(long, short = 'p', requires = "email")]
        password: Option<String>,
    },

    /// Forget the remote session
    Logout,

    /// Show sync status
    Status {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Replay pending operations against the remote
    #[command(after_help = "\
Examples:
  dete remote push                 Drain the queue once
  dete remote push --watch         Drain every 60 seconds until Ctrl-C
  dete remote push --watch -i 300  Drain every 5 minutes")]
    Push {
        /// Keep draining on an interval until interrupted
        #[arg(long)]
        watch: bool,

        /// Seconds between drains in watch mode
        #[arg(long, short = 'i', default_value_t = 60, requires = "watch")]
        interval: u64,

        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Refresh local tables from the remote
    Pull {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
