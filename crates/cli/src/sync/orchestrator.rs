// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync orchestrator.
//!
//! Drains the operation queue against a [`RemoteAdapter`], strictly one
//! operation at a time and in queue order. A failed operation stays pending
//! for the next drain; delivery is at-least-once. Only one drain (or pull)
//! runs per orchestrator at a time.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use dete_core::{Action, Database, Operation, Table};
use serde::Serialize;
use tokio::time::MissedTickBehavior;

use super::remote::{RemoteAdapter, RemoteError, RemoteResult};
use super::session::SessionProvider;

/// Tables refreshed by [`SyncOrchestrator::pull_all`].
pub const PULL_TABLES: [Table; 4] = [
    Table::Pacientes,
    Table::Cuidadores,
    Table::Agendamentos,
    Table::LancamentosFinanceiros,
];

/// Error type for orchestrator entry points.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("sync already in progress")]
    Busy,

    #[error("not signed in to the remote\n  hint: run 'dete remote login' first")]
    NotSignedIn,

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Store(#[from] dete_core::Error),
}

/// Retry settings for a single remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        RetryPolicy {
            max_attempts: 1,
            ..RetryPolicy::default()
        }
    }

    /// Run a remote call, retrying transient failures with capped
    /// exponential backoff.
    pub async fn run<T, F, Fut>(&self, what: &str, mut call: F) -> RemoteResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = RemoteResult<T>>,
    {
        let mut attempt = 0;
        let mut delay = self.initial_delay;

        loop {
            attempt += 1;
            match call().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.max_attempts => {
                    tracing::debug!(what, attempt, error = %e, "transient failure, retrying");
                    tokio::time::sleep(delay).await;
                    delay = std::cmp::min(delay * 2, self.max_delay);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Point-in-time view of the orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStatus {
    /// A remote backend is configured.
    pub initialized: bool,
    pub signed_in: bool,
    pub syncing: bool,
    pub last_sync: Option<DateTime<Utc>>,
    pub pending_operations: usize,
}

/// Outcome of one drain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DrainReport {
    pub success_count: usize,
    pub error_count: usize,
    /// Operations marked synced without a remote call (unmapped table or
    /// record gone locally). Included in `success_count`.
    pub skipped: usize,
}

/// Outcome of one pull.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PullReport {
    pub tables: usize,
    pub failed_tables: usize,
    /// Remote records written to the local store.
    pub applied: usize,
    /// Remote records ignored because the local copy has pending changes.
    pub kept_local: usize,
    /// Remote records the local schema rejected.
    pub rejected: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Delivered,
    Skipped,
}

/// Resets the syncing flag when a drain ends, however it ends.
struct DrainGuard<'a>(&'a AtomicBool);

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Drives queue drains and pulls for one remote.
pub struct SyncOrchestrator<R, S> {
    adapter: R,
    session: S,
    retry: RetryPolicy,
    syncing: AtomicBool,
}

impl<R: RemoteAdapter, S: SessionProvider> SyncOrchestrator<R, S> {
    pub fn new(adapter: R, session: S) -> Self {
        SyncOrchestrator {
            adapter,
            session,
            retry: RetryPolicy::default(),
            syncing: AtomicBool::new(false),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn adapter(&self) -> &R {
        &self.adapter
    }

    pub fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::Acquire)
    }

    pub fn pending_count(&self, db: &Database) -> Result<usize, SyncError> {
        Ok(db.pending_count()?)
    }

    pub fn status(&self, db: &Database) -> Result<SyncStatus, SyncError> {
        Ok(SyncStatus {
            initialized: true,
            signed_in: self.session.is_signed_in(),
            syncing: self.is_syncing(),
            last_sync: db.last_sync()?,
            pending_operations: db.pending_count()?,
        })
    }

    fn acquire(&self) -> Result<DrainGuard<'_>, SyncError> {
        self.syncing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SyncError::Busy)?;
        Ok(DrainGuard(&self.syncing))
    }

    /// Replay every pending operation once.
    ///
    /// Returns `Busy` without side effects if a drain is already running and
    /// `NotSignedIn` before touching the queue if there is no session.
    pub async fn sync_all(&self, db: &Database) -> Result<DrainReport, SyncError> {
        let _guard = self.acquire()?;
        if !self.session.is_signed_in() {
            return Err(SyncError::NotSignedIn);
        }

        self.adapter.begin_drain();
        let ops = db.drain_candidates()?;
        tracing::info!(pending = ops.len(), "drain started");

        let mut report = DrainReport::default();
        for op in &ops {
            let outcome = match self.replay(db, op).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(
                        op = op.id,
                        table = %op.table,
                        record_id = op.record_id,
                        action = %op.action,
                        error = %e,
                        "operation failed, will retry next sync"
                    );
                    report.error_count += 1;
                    continue;
                }
            };
            if let Err(e) = db.mark_synced(op.id) {
                tracing::error!(op = op.id, error = %e, "failed to mark operation synced");
                report.error_count += 1;
                continue;
            }
            report.success_count += 1;
            if outcome == Outcome::Skipped {
                report.skipped += 1;
            }
        }

        if let Err(e) = db.set_last_sync(Utc::now()) {
            tracing::warn!(error = %e, "failed to record last sync time");
        }
        tracing::info!(
            success = report.success_count,
            errors = report.error_count,
            skipped = report.skipped,
            "drain finished"
        );
        Ok(report)
    }

    async fn replay(&self, db: &Database, op: &Operation) -> Result<Outcome, SyncError> {
        let Some(resource) = self.adapter.resource_for(op.table) else {
            tracing::warn!(table = %op.table, op = op.id, "table has no remote resource, skipping");
            return Ok(Outcome::Skipped);
        };

        match op.action {
            Action::Create | Action::Update => {
                let Some(record) = db.find_record(op.table, op.record_id)? else {
                    tracing::warn!(
                        table = %op.table,
                        record_id = op.record_id,
                        "record no longer exists locally, skipping"
                    );
                    return Ok(Outcome::Skipped);
                };
                if op.action == Action::Create {
                    self.retry
                        .run("append", || self.adapter.append(resource, &record))
                        .await?;
                } else {
                    self.retry
                        .run("update", || self.adapter.update(resource, &record))
                        .await?;
                }
            }
            Action::Delete => {
                self.retry
                    .run("delete", || self.adapter.delete(resource, op.record_id))
                    .await?;
            }
        }
        Ok(Outcome::Delivered)
    }

    /// Refresh the pulled tables from the remote without queueing.
    ///
    /// A record with pending local operations keeps its local state; any
    /// other record is overwritten by the remote copy. Remote deletions are
    /// not detected.
    pub async fn pull_all(&self, db: &Database) -> Result<PullReport, SyncError> {
        let _guard = self.acquire()?;
        if !self.session.is_signed_in() {
            return Err(SyncError::NotSignedIn);
        }

        let mut report = PullReport::default();
        for table in PULL_TABLES {
            let Some(resource) = self.adapter.resource_for(table) else {
                continue;
            };
            let pulled = match self
                .retry
                .run("pull", || self.adapter.pull(resource, table))
                .await
            {
                Ok(pulled) => pulled,
                Err(e) => {
                    tracing::warn!(table = %table, error = %e, "pull failed");
                    report.failed_tables += 1;
                    continue;
                }
            };
            report.tables += 1;
            report.rejected += pulled.rejected;

            for record in pulled.records {
                if db.has_pending(table, record.id)? {
                    report.kept_local += 1;
                    continue;
                }
                match db.upsert_record(&record) {
                    Ok(()) => report.applied += 1,
                    Err(e) => {
                        tracing::warn!(table = %table, id = record.id, error = %e, "rejected remote record");
                        report.rejected += 1;
                    }
                }
            }
        }
        tracing::info!(
            tables = report.tables,
            applied = report.applied,
            kept_local = report.kept_local,
            rejected = report.rejected,
            "pull finished"
        );
        Ok(report)
    }

    /// Drain on a fixed interval until `shutdown` resolves. The first drain
    /// starts immediately. Returns the number of drains attempted.
    pub async fn run_periodic<F, C>(
        &self,
        db: &Database,
        interval: Duration,
        shutdown: F,
        mut on_drain: C,
    ) -> usize
    where
        F: Future<Output = ()>,
        C: FnMut(&Result<DrainReport, SyncError>),
    {
        tokio::pin!(shutdown);
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut drains = 0;
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    let result = self.sync_all(db).await;
                    drains += 1;
                    on_drain(&result);
                }
            }
        }
        drains
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
