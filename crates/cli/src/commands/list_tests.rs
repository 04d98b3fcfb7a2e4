// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use crate::commands::testing::TestContext;
use crate::error::Error;
use dete_core::Profile;
use serde_json::json;

fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn seeded() -> TestContext {
    let ctx = TestContext::new();
    ctx.create(Table::Pacientes, json!({ "nome": "Ana", "status": "ativo" }));
    ctx.create(Table::Pacientes, json!({ "nome": "Bia", "status": "inativo" }));
    ctx.create(
        Table::Pacientes,
        json!({ "nome": "Caio", "status": "ativo", "cuidadorResponsavel": 2 }),
    );
    ctx
}

#[test]
fn test_list_all_in_id_order() {
    let ctx = seeded();
    ctx.login_as(Profile::Cuidador);
    let ids: Vec<i64> = run_impl(&ctx.db, Table::Pacientes, &[])
        .unwrap()
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn test_list_with_equality_filters() {
    let ctx = seeded();
    ctx.login_as(Profile::Cuidador);

    let active = run_impl(&ctx.db, Table::Pacientes, &args(&["status=ativo"])).unwrap();
    assert_eq!(active.len(), 2);

    let both = run_impl(
        &ctx.db,
        Table::Pacientes,
        &args(&["status=ativo", "cuidadorResponsavel=2"]),
    )
    .unwrap();
    assert_eq!(both.len(), 1);
    assert_eq!(both[0].get("nome"), Some(&json!("Caio")));
}

#[test]
fn test_list_filter_on_unknown_field() {
    let ctx = seeded();
    ctx.login_as(Profile::Admin);
    assert!(run_impl(&ctx.db, Table::Pacientes, &args(&["idade=3"])).is_err());
}

#[test]
fn test_list_requires_view_permission() {
    let ctx = seeded();
    ctx.login_as(Profile::Financeiro);
    let err = run_impl(&ctx.db, Table::Pacientes, &[]).unwrap_err();
    assert!(matches!(err, Error::PermissionDenied { .. }));
}
