// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use chrono::{TimeZone, Utc};
use dete_core::{Action, Fields, Table};
use serde_json::json;
use yare::parameterized;

fn paciente(fields: Value) -> Record {
    let at = Utc.with_ymd_and_hms(2026, 10, 1, 9, 30, 0).unwrap();
    Record {
        table: Table::Pacientes,
        id: 7,
        fields: fields.as_object().cloned().unwrap_or_else(Fields::new),
        created_at: at,
        updated_at: at,
    }
}

#[parameterized(
    null = { json!(null), "" },
    text = { json!("Ana"), "Ana" },
    integer = { json!(12), "12" },
    float = { json!(1.5), "1.5" },
)]
fn test_value_text(value: Value, expected: &str) {
    assert_eq!(value_text(&value), expected);
}

#[test]
fn test_format_record_line_uses_schema_order() {
    let record = paciente(json!({ "cpf": "123", "nome": "Ana" }));
    assert_eq!(format_record_line(&record), "#7  nome=Ana  cpf=123");
}

#[test]
fn test_format_record_line_truncates_long_values() {
    let record = paciente(json!({ "nome": "x".repeat(60) }));
    let line = format_record_line(&record);
    assert!(line.ends_with("..."));
    assert!(line.len() < 60);
}

#[test]
fn test_format_record_details() {
    let record = paciente(json!({ "nome": "Ana", "cuidadorResponsavel": 3 }));
    let lines = format_record_details(&record);
    assert_eq!(lines[0], "pacientes #7");
    assert!(lines[1].contains("nome") && lines[1].ends_with("Ana"));
    assert!(lines[2].contains("cuidadorResponsavel") && lines[2].ends_with('3'));
    assert_eq!(lines[3], "  Created: 2026-10-01 09:30");
}

#[test]
fn test_format_operation_shows_state() {
    let op = Operation {
        id: 3,
        table: Table::Pacientes,
        record_id: 7,
        action: Action::Update,
        timestamp: Utc.with_ymd_and_hms(2026, 10, 1, 9, 30, 0).unwrap(),
        synced: false,
    };
    let line = format_operation(&op);
    assert!(line.contains("pacientes #7"));
    assert!(line.contains("update"));
    assert!(line.ends_with("(pending)"));
}

#[test]
fn test_format_audit_anonymous() {
    let entry = AuditEntry {
        id: 1,
        user_id: None,
        action: "create".to_string(),
        table: "pacientes".to_string(),
        record_id: 7,
        timestamp: Utc.with_ymd_and_hms(2026, 10, 1, 9, 30, 0).unwrap(),
    };
    assert!(format_audit(&entry).ends_with("by anonymous"));
}

#[test]
fn test_format_drain() {
    let report = DrainReport {
        success_count: 4,
        error_count: 1,
        skipped: 2,
    };
    assert_eq!(
        format_drain(&report),
        "Synced 4 operation(s), 1 failed (2 skipped)"
    );
    assert_eq!(
        format_drain(&DrainReport::default()),
        "Synced 0 operation(s), 0 failed"
    );
}

#[test]
fn test_format_status_never_synced() {
    let lines = format_status(&SyncStatus::default());
    assert_eq!(lines.last().unwrap(), "Last sync: never");
    assert!(lines[0].contains("not configured"));
}

#[test]
fn test_format_pull_mentions_failures() {
    let report = PullReport {
        tables: 3,
        failed_tables: 1,
        applied: 10,
        kept_local: 2,
        rejected: 0,
    };
    assert_eq!(
        format_pull(&report),
        "Pulled 3 table(s): 10 record(s) applied, 2 kept local, 1 table(s) failed"
    );
}
