// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use crate::commands::testing::TestContext;
use dete_core::{store, Profile, Table};
use serde_json::json;

#[test]
fn test_operations_newest_first() {
    let ctx = TestContext::new();
    let a = ctx.create(Table::Pacientes, json!({ "nome": "Ana" }));
    let b = ctx.create(Table::Pacientes, json!({ "nome": "Bia" }));

    let ops = operations_impl(&ctx.db, false, None).unwrap();
    assert_eq!(ops.len(), 2);
    assert_eq!(ops[0].record_id, b.id);
    assert_eq!(ops[1].record_id, a.id);
}

#[test]
fn test_pending_only_hides_synced() {
    let ctx = TestContext::new();
    ctx.create(Table::Pacientes, json!({ "nome": "Ana" }));
    ctx.create(Table::Pacientes, json!({ "nome": "Bia" }));
    let first = ctx.db.drain_candidates().unwrap()[0].id;
    ctx.db.mark_synced(first).unwrap();

    let pending = operations_impl(&ctx.db, true, None).unwrap();
    assert_eq!(pending.len(), 1);
    assert!(!pending[0].synced);
    assert_eq!(operations_impl(&ctx.db, false, None).unwrap().len(), 2);
}

#[test]
fn test_limit_applies() {
    let ctx = TestContext::new();
    for nome in ["a", "b", "c"] {
        ctx.create(Table::Pacientes, json!({ "nome": nome }));
    }
    assert_eq!(operations_impl(&ctx.db, false, Some(2)).unwrap().len(), 2);
    assert_eq!(operations_impl(&ctx.db, true, Some(1)).unwrap().len(), 1);
}

#[test]
fn test_audit_records_user_and_requires_permission() {
    let ctx = TestContext::new();
    ctx.login_as(Profile::Cuidador);
    assert!(audit_impl(&ctx.db, None).is_err());

    ctx.login_as(Profile::Admin);
    let record = ctx.create(Table::Pacientes, json!({ "nome": "Ana" }));
    store::delete(&ctx.db, Table::Pacientes, record.id).unwrap();

    let entries = audit_impl(&ctx.db, Some(2)).unwrap();
    assert_eq!(entries[0].action, "delete");
    assert_eq!(entries[1].action, "create");
    assert!(entries[0].user_id.is_some());
}
