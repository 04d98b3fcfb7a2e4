// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace configuration.
//!
//! Configuration is stored in `.dete/config.toml`. The only section is the
//! optional `[remote]` table; without it the workspace runs local-only.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::sync::{ResourceMap, RetryPolicy};

const WORK_DIR_NAME: &str = ".dete";
const CONFIG_FILE_NAME: &str = "config.toml";
const DB_FILE_NAME: &str = "dete.db";
const LOCK_FILE_NAME: &str = "sync.lock";
const GITIGNORE_FILE_NAME: &str = ".gitignore";

/// Workspace configuration stored in `.dete/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Remote sync configuration (absent means local-only mode).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteConfig>,
}

/// Which remote the queue drains into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Google Sheets spreadsheet, one sheet per table.
    #[default]
    Sheets,
    /// Hosted PostgREST database.
    Hosted,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Sheets => "sheets",
            Backend::Hosted => "hosted",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "sheets" => Ok(Backend::Sheets),
            "hosted" => Ok(Backend::Hosted),
            _ => Err(Error::Config(format!(
                "invalid backend '{s}': expected 'sheets' or 'hosted'"
            ))),
        }
    }
}

/// Remote sync configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default)]
    pub backend: Backend,
    /// Base URL of the remote API. Defaults to the public Sheets endpoint;
    /// required for the hosted backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    /// Public API key sent with every hosted request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anon_key: Option<String>,
    /// Attempts per remote call, including the first (default: 3).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Delay before the first retry in milliseconds (default: 500).
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Upper bound for the retry delay in milliseconds (default: 10000).
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Per-request timeout in seconds (default: 30).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Table name → remote resource overrides. An empty value unmaps the table.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub resources: BTreeMap<String, String>,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    500
}

fn default_max_delay_ms() -> u64 {
    10_000
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl RemoteConfig {
    pub fn new(backend: Backend) -> Self {
        RemoteConfig {
            backend,
            api_url: None,
            anon_key: None,
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            resources: BTreeMap::new(),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            initial_delay: Duration::from_millis(self.initial_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Backend defaults with the configured overrides applied.
    pub fn resource_map(&self) -> Result<ResourceMap> {
        let base = match self.backend {
            Backend::Sheets => ResourceMap::sheets_default(),
            Backend::Hosted => ResourceMap::hosted_default(),
        };
        Ok(base.with_overrides(&self.resources)?)
    }

    /// Hosted API URL, which has no default.
    pub fn hosted_url(&self) -> Result<&str> {
        self.api_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| Error::Config("hosted backend requires 'api_url'".to_string()))
    }
}

impl Config {
    /// Loads configuration from the given `.dete/` directory.
    pub fn load(work_dir: &Path) -> Result<Self> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Saves configuration to the given `.dete/` directory.
    pub fn save(&self, work_dir: &Path) -> Result<()> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    /// Returns the remote section, or an error naming the fix.
    pub fn require_remote(&self) -> Result<&RemoteConfig> {
        self.remote.as_ref().ok_or(Error::RemoteNotConfigured)
    }
}

/// Find the .dete directory by walking up from the current directory
pub fn find_work_dir() -> Result<PathBuf> {
    let mut current = std::env::current_dir()?;
    loop {
        let work_dir = current.join(WORK_DIR_NAME);
        if work_dir.is_dir() {
            return Ok(work_dir);
        }
        if !current.pop() {
            return Err(Error::NotInitialized);
        }
    }
}

pub fn get_db_path(work_dir: &Path) -> PathBuf {
    work_dir.join(DB_FILE_NAME)
}

/// Lock file held for the duration of a push or pull.
pub fn get_lock_path(work_dir: &Path) -> PathBuf {
    work_dir.join(LOCK_FILE_NAME)
}

/// Initialize a new .dete directory at the given path
pub fn init_work_dir(path: &Path, remote: Option<RemoteConfig>) -> Result<PathBuf> {
    let work_dir = path.join(WORK_DIR_NAME);

    if work_dir.exists() {
        return Err(Error::AlreadyInitialized(work_dir.display().to_string()));
    }

    fs::create_dir_all(&work_dir)?;

    let config = Config { remote };
    config.save(&work_dir)?;
    write_gitignore(&work_dir)?;

    Ok(work_dir)
}

/// The database holds patient data and session tokens; keep it out of git.
fn write_gitignore(work_dir: &Path) -> Result<()> {
    let content = "# Local store and session state\ndete.db\ndete.db-*\nsync.lock\n";
    fs::write(work_dir.join(GITIGNORE_FILE_NAME), content)?;
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
