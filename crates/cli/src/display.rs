// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use dete_core::{AuditEntry, Operation, Record, Session, User};
use serde_json::Value;

use crate::sync::{DrainReport, PullReport, SyncStatus};

/// Longest value shown in a one-line record summary.
const SUMMARY_WIDTH: usize = 40;

/// Render a field value without JSON quoting.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// One line per record: `#id  field=value ...` in schema order.
pub fn format_record_line(record: &Record) -> String {
    let mut line = format!("#{}", record.id);
    for field in record.table.fields() {
        if let Some(value) = record.get(field.name) {
            line.push_str(&format!(
                "  {}={}",
                field.name,
                truncate(&value_text(value), SUMMARY_WIDTH)
            ));
        }
    }
    line
}

/// Full record view, one field per line.
pub fn format_record_details(record: &Record) -> Vec<String> {
    let mut lines = vec![format!("{} #{}", record.table, record.id)];
    let width = record
        .table
        .fields()
        .iter()
        .map(|f| f.name.len())
        .max()
        .unwrap_or(0);
    for field in record.table.fields() {
        if let Some(value) = record.get(field.name) {
            lines.push(format!(
                "  {:<width$}  {}",
                field.name,
                value_text(value),
                width = width
            ));
        }
    }
    lines.push(format!(
        "  Created: {}",
        record.created_at.format("%Y-%m-%d %H:%M")
    ));
    lines.push(format!(
        "  Updated: {}",
        record.updated_at.format("%Y-%m-%d %H:%M")
    ));
    lines
}

/// Format a queued operation for log output
pub fn format_operation(op: &Operation) -> String {
    let timestamp = op.timestamp.format("%Y-%m-%d %H:%M:%S");
    let state = if op.synced { "synced" } else { "pending" };
    format!(
        "  {:>4}  {}  {:<7} {} #{}  ({})",
        op.id,
        timestamp,
        op.action.as_str(),
        op.table,
        op.record_id,
        state
    )
}

/// Format an audit entry for log output
pub fn format_audit(entry: &AuditEntry) -> String {
    let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S");
    let who = entry
        .user_id
        .map(|id| format!("user {id}"))
        .unwrap_or_else(|| "anonymous".to_string());
    format!(
        "  {}  {:<9} {} #{}  by {}",
        timestamp, entry.action, entry.table, entry.record_id, who
    )
}

pub fn format_session(session: &Session) -> String {
    format!(
        "{} <{}> ({})",
        session.username, session.email, session.profile
    )
}

pub fn format_user_line(user: &User) -> String {
    format!(
        "  {:<16} {:<28} {:<10} {}",
        user.username,
        user.email,
        user.profile.as_str(),
        user.status
    )
}

pub fn format_status(status: &SyncStatus) -> Vec<String> {
    let last_sync = status
        .last_sync
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());
    vec![
        format!(
            "Remote:   {}",
            if status.initialized {
                "configured"
            } else {
                "not configured"
            }
        ),
        format!(
            "Session:  {}",
            if status.signed_in {
                "signed in"
            } else {
                "signed out"
            }
        ),
        format!("Pending:  {} operation(s)", status.pending_operations),
        format!("Last sync: {last_sync}"),
    ]
}

pub fn format_drain(report: &DrainReport) -> String {
    let mut line = format!(
        "Synced {} operation(s), {} failed",
        report.success_count, report.error_count
    );
    if report.skipped > 0 {
        line.push_str(&format!(" ({} skipped)", report.skipped));
    }
    line
}

pub fn format_pull(report: &PullReport) -> String {
    let mut line = format!(
        "Pulled {} table(s): {} record(s) applied, {} kept local",
        report.tables, report.applied, report.kept_local
    );
    if report.failed_tables > 0 {
        line.push_str(&format!(", {} table(s) failed", report.failed_tables));
    }
    if report.rejected > 0 {
        line.push_str(&format!(", {} record(s) rejected", report.rejected));
    }
    line
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
