// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote sync commands.
//!
//! Credentials and the remote session live in the store's config table;
//! backend choice and tuning live in `.dete/config.toml`. A push or pull
//! needs a signed-in local user and holds an exclusive lock on
//! `.dete/sync.lock` so two processes never drain the same queue at once.

use std::fs::{self, File};
use std::path::Path;
use std::time::Duration;

use dete_core::{Database, SyncCredentials};
use fs2::FileExt;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::config::{get_lock_path, Backend, Config, RemoteConfig};
use crate::display::{format_drain, format_pull, format_status};
use crate::error::{Error, Result};
use crate::sync::{
    sign_in_with_password, HostedAdapter, HostedConfig, RemoteAdapter, SessionProvider,
    SheetsClient, SheetsConfig, StoredSession, SyncOrchestrator, SyncStatus, TabularAdapter,
    DEFAULT_SHEETS_URL,
};

use super::{open_db, print_json, require_permission, require_session};

/// Orchestrator over whichever backend the workspace is configured for.
pub(crate) type Orchestrator = SyncOrchestrator<Box<dyn RemoteAdapter>, StoredSession>;

/// Requested changes to remote settings. `None` leaves a value alone.
#[derive(Debug, Clone, Default)]
pub struct RemoteSettings {
    pub backend: Option<Backend>,
    pub client_id: Option<String>,
    pub api_key: Option<String>,
    pub spreadsheet_id: Option<String>,
    pub api_url: Option<String>,
    pub anon_key: Option<String>,
}

impl RemoteSettings {
    fn is_empty(&self) -> bool {
        self.backend.is_none()
            && self.client_id.is_none()
            && self.api_key.is_none()
            && self.spreadsheet_id.is_none()
            && self.api_url.is_none()
            && self.anon_key.is_none()
    }
}

/// Settings as shown by `dete remote config`. Secrets are masked.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RemoteView {
    backend: Option<Backend>,
    api_url: Option<String>,
    anon_key: Option<String>,
    client_id: String,
    api_key: String,
    spreadsheet_id: String,
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        return String::new();
    }
    let tail: String = secret
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("****{tail}")
}

pub fn config(settings: RemoteSettings, output: OutputFormat) -> Result<()> {
    let (db, mut config, work_dir) = open_db()?;
    let changed = !settings.is_empty();
    let view = config_impl(&db, &mut config, settings)?;
    if changed {
        config.save(&work_dir)?;
    }

    match output {
        OutputFormat::Json => print_json(&view)?,
        OutputFormat::Text => {
            let backend = view
                .backend
                .map(|b| b.to_string())
                .unwrap_or_else(|| "none (local-only)".to_string());
            println!("Backend:        {backend}");
            if let Some(url) = &view.api_url {
                println!("API URL:        {url}");
            }
            if let Some(key) = &view.anon_key {
                println!("Anon key:       {key}");
            }
            println!("Client id:      {}", view.client_id);
            println!("API key:        {}", view.api_key);
            println!("Spreadsheet id: {}", view.spreadsheet_id);
        }
    }
    Ok(())
}

/// Apply `settings` to the store and `config`, returning the resulting view.
/// Changing anything needs `configuracoes.edit`; reading needs `configuracoes.view`.
pub(crate) fn config_impl(
    db: &Database,
    config: &mut Config,
    settings: RemoteSettings,
) -> Result<RemoteView> {
    if settings.is_empty() {
        require_permission(db, "configuracoes.view")?;
    } else {
        require_permission(db, "configuracoes.edit")?;

        db.save_sync_credentials(&SyncCredentials {
            client_id: settings.client_id.unwrap_or_default(),
            api_key: settings.api_key.unwrap_or_default(),
            spreadsheet_id: settings.spreadsheet_id.unwrap_or_default(),
        })?;

        if settings.backend.is_some() || settings.api_url.is_some() || settings.anon_key.is_some()
        {
            let remote = config.remote.get_or_insert_with(|| {
                RemoteConfig::new(settings.backend.unwrap_or_default())
            });
            if let Some(backend) = settings.backend {
                remote.backend = backend;
            }
            if let Some(url) = settings.api_url {
                remote.api_url = Some(url).filter(|u| !u.is_empty());
            }
            if let Some(key) = settings.anon_key {
                remote.anon_key = Some(key).filter(|k| !k.is_empty());
            }
        }
        tracing::info!("remote settings updated");
    }

    let creds = db.sync_credentials()?;
    let remote = config.remote.as_ref();
    Ok(RemoteView {
        backend: remote.map(|r| r.backend),
        api_url: remote.and_then(|r| r.api_url.clone()),
        anon_key: remote.and_then(|r| r.anon_key.as_deref().map(mask)),
        client_id: creds.client_id,
        api_key: mask(&creds.api_key),
        spreadsheet_id: creds.spreadsheet_id,
    })
}

/// Build the orchestrator for the configured backend.
pub(crate) fn connect(db: &Database, remote: &RemoteConfig) -> Result<Orchestrator> {
    let session = StoredSession::load(db)?;
    let resources = remote.resource_map()?;
    let access_token = session.access_token().unwrap_or_default().to_string();

    let adapter: Box<dyn RemoteAdapter> = match remote.backend {
        Backend::Sheets => {
            let creds = db.sync_credentials()?;
            if !creds.is_complete() {
                return Err(Error::CredentialsMissing("api key and spreadsheet id"));
            }
            let client = SheetsClient::new(SheetsConfig {
                api_base_url: remote
                    .api_url
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SHEETS_URL.to_string()),
                spreadsheet_id: creds.spreadsheet_id,
                api_key: creds.api_key,
                access_token,
                timeout: remote.timeout(),
            })?;
            Box::new(TabularAdapter::new(client, resources))
        }
        Backend::Hosted => Box::new(HostedAdapter::new(
            HostedConfig {
                api_url: remote.hosted_url()?.to_string(),
                anon_key: remote.anon_key.clone().unwrap_or_default(),
                access_token,
                user_id: session.user_id().map(String::from),
                timeout: remote.timeout(),
            },
            resources,
        )?),
    };

    Ok(SyncOrchestrator::new(adapter, session).with_retry(remote.retry_policy()))
}

/// Take the workspace sync lock, failing fast if another process holds it.
pub(crate) fn acquire_sync_lock(work_dir: &Path) -> Result<File> {
    let file = fs::OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(get_lock_path(work_dir))?;
    file.try_lock_exclusive().map_err(|_| Error::SyncBusy)?;
    Ok(file)
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Io(std::io::Error::other(format!("tokio: {}", e))))
}

pub fn login(token: Option<String>, email: Option<String>, password: Option<String>) -> Result<()> {
    let (db, config, _) = open_db()?;
    let remote = config.require_remote()?;

    let session = match (token, email, password) {
        (Some(token), _, _) => login_with_token(&db, &token)?,
        (None, Some(email), Some(password)) => {
            if remote.backend != Backend::Hosted {
                return Err(Error::RequiredFor {
                    context: "the hosted backend",
                    operation: "password sign-in",
                });
            }
            let url = remote.hosted_url()?;
            let anon_key = remote.anon_key.clone().unwrap_or_default();
            let signed_in = runtime()?.block_on(sign_in_with_password(
                url,
                &anon_key,
                &email,
                &password,
                remote.timeout(),
            ))?;
            StoredSession::sign_in(&db, &signed_in.access_token, Some(&signed_in.user_id))?
        }
        _ => {
            return Err(Error::RequiredFor {
                context: "--token or --email/--password",
                operation: "remote login",
            })
        }
    };

    match session.user_id() {
        Some(id) => println!("Signed in to {} remote as {id}", remote.backend),
        None => println!("Signed in to {} remote", remote.backend),
    }
    Ok(())
}

pub(crate) fn login_with_token(db: &Database, token: &str) -> Result<StoredSession> {
    if token.trim().is_empty() {
        return Err(Error::RequiredFor {
            context: "a non-empty token",
            operation: "remote login",
        });
    }
    Ok(StoredSession::sign_in(db, token.trim(), None)?)
}

pub fn logout() -> Result<()> {
    let (db, _, _) = open_db()?;
    StoredSession::sign_out(&db)?;
    println!("Signed out of remote");
    Ok(())
}

pub fn status(output: OutputFormat) -> Result<()> {
    let (db, config, work_dir) = open_db()?;
    let mut status = status_impl(&db, config.remote.as_ref())?;
    if acquire_sync_lock(&work_dir).is_err() {
        status.syncing = true;
    }

    match output {
        OutputFormat::Json => print_json(&status)?,
        OutputFormat::Text => {
            for line in format_status(&status) {
                println!("{line}");
            }
        }
    }
    Ok(())
}

/// Status from the store alone when the remote cannot be built.
pub(crate) fn status_impl(db: &Database, remote: Option<&RemoteConfig>) -> Result<SyncStatus> {
    if let Some(remote) = remote {
        match connect(db, remote) {
            Ok(orchestrator) => return Ok(orchestrator.status(db)?),
            Err(e) => tracing::debug!(error = %e, "remote not ready"),
        }
    }
    Ok(SyncStatus {
        initialized: false,
        signed_in: StoredSession::load(db)?.is_signed_in(),
        syncing: false,
        last_sync: db.last_sync()?,
        pending_operations: db.pending_count()?,
    })
}

pub fn push(watch: bool, interval: u64, output: OutputFormat) -> Result<()> {
    let (db, config, work_dir) = open_db()?;
    let session = require_session(&db)?;
    let remote = config.require_remote()?;
    tracing::info!(user = %session.username, watch, "push requested");
    let _lock = acquire_sync_lock(&work_dir)?;
    let orchestrator = connect(&db, remote)?;
    let rt = runtime()?;

    if watch {
        let interval = Duration::from_secs(interval.max(1));
        println!("Pushing every {}s, Ctrl-C to stop", interval.as_secs());
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        };
        let drains = rt.block_on(orchestrator.run_periodic(&db, interval, shutdown, |result| {
            match result {
                Ok(report) => match output {
                    OutputFormat::Json => {
                        if let Ok(json) = serde_json::to_string(report) {
                            println!("{json}");
                        }
                    }
                    OutputFormat::Text => println!("{}", format_drain(report)),
                },
                Err(e) => eprintln!("error: {e}"),
            }
        }));
        tracing::info!(drains, "watch stopped");
        return Ok(());
    }

    let report = rt.block_on(orchestrator.sync_all(&db))?;
    match output {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => println!("{}", format_drain(&report)),
    }
    if report.error_count > 0 {
        return Err(Error::SyncIncomplete {
            succeeded: report.success_count,
            failed: report.error_count,
        });
    }
    Ok(())
}

pub fn pull(output: OutputFormat) -> Result<()> {
    let (db, config, work_dir) = open_db()?;
    let session = require_session(&db)?;
    let remote = config.require_remote()?;
    tracing::info!(user = %session.username, "pull requested");
    let _lock = acquire_sync_lock(&work_dir)?;
    let orchestrator = connect(&db, remote)?;

    let report = runtime()?.block_on(orchestrator.pull_all(&db))?;
    match output {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => println!("{}", format_pull(&report)),
    }
    Ok(())
}

#[cfg(test)]
#[path = "remote_tests.rs"]
mod tests;
