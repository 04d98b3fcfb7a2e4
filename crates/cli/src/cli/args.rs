// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared argument structs for CLI commands.
//!
//! These structs are used with `#[command(flatten)]` to reduce duplication
//! across commands that address records or page through results.

use clap::Args;

/// Table and record id addressing a single record.
#[derive(Args, Clone, Debug)]
pub struct RecordArgs {
    /// Table name (e.g. pacientes, agendamentos)
    pub table: String,

    /// Record id
    pub id: i64,
}

/// Limit arguments for paginated results.
#[derive(Args, Clone, Debug, Default)]
pub struct LimitArgs {
    /// Maximum number of results
    #[arg(short = 'n', long, conflicts_with = "no_limit")]
    pub limit: Option<usize>,

    #[arg(long, conflicts_with = "limit")]
    pub no_limit: bool,
}

impl LimitArgs {
    /// Effective limit, defaulting to `default` unless `--no-limit` is set.
    pub fn resolve(&self, default: usize) -> Option<usize> {
        if self.no_limit {
            None
        } else {
            Some(self.limit.unwrap_or(default))
        }
    }
}
