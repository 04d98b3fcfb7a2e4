// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::{Path, PathBuf};

use dete_core::Database;

use crate::config::{get_db_path, init_work_dir, Backend, RemoteConfig};
use crate::error::Result;

pub fn run(path: Option<String>, remote: Option<Backend>) -> Result<()> {
    let target_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?,
    };
    let work_dir = run_impl(&target_path, remote)?;

    println!("Initialized dete workspace at {}", work_dir.display());
    match remote {
        Some(backend) => {
            println!("Remote: {backend}");
            println!("Next: set credentials with 'dete remote config', then 'dete remote login'");
        }
        None => println!("Remote: none (local-only)"),
    }
    println!("Next: create the first user with 'dete user add <name> --profile admin ...'");
    Ok(())
}

/// Create `.dete/`, its config and an empty store.
pub(crate) fn run_impl(target_path: &Path, remote: Option<Backend>) -> Result<PathBuf> {
    let work_dir = init_work_dir(target_path, remote.map(RemoteConfig::new))?;
    Database::open(&get_db_path(&work_dir))?;
    tracing::info!(path = %work_dir.display(), "workspace initialized");
    Ok(work_dir)
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
