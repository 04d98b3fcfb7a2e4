// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;

#[test]
fn entries_are_newest_first() {
    let db = Database::open_in_memory().unwrap();
    db.log_audit(Some(1), "create", "pacientes", 10).unwrap();
    db.log_audit(None, "delete", "exames", 4).unwrap();

    let entries = db.audit_entries(None).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].action, "delete");
    assert_eq!(entries[0].user_id, None);
    assert_eq!(entries[1].user_id, Some(1));
    assert_eq!(entries[1].table, "pacientes");
    assert_eq!(entries[1].record_id, 10);
}

#[test]
fn limit_caps_results() {
    let db = Database::open_in_memory().unwrap();
    for i in 0..5 {
        db.log_audit(Some(1), "update", "pacientes", i).unwrap();
    }
    let entries = db.audit_entries(Some(2)).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].record_id, 4);
}
