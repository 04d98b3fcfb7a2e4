// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;
use common::*;
use yare::parameterized;

#[test]
fn add_creates_record() {
    let temp = init_as_admin();

    dete_in(&temp, &["add", "pacientes", "nome=Ana Souza", "cpf=123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created pacientes #1"));
}

#[test]
fn add_json_returns_record() {
    let temp = init_as_admin();
    let id = create_record(&temp, "pacientes", &["nome=Ana"]);
    assert_eq!(id, 1);
}

#[test]
fn add_requires_login() {
    let temp = init_temp();

    dete_in(&temp, &["add", "pacientes", "nome=Ana"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"));
}

#[test]
fn add_rejects_unknown_table() {
    let temp = init_as_admin();

    dete_in(&temp, &["add", "pets", "nome=Rex"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown table"));
}

#[parameterized(
    unknown_field = { "idade=3", "unknown field" },
    malformed = { "nome", "invalid assignment" },
    not_a_number = { "cuidadorResponsavel=abc", "not a number" },
)]
fn add_rejects_bad_assignment(assignment: &str, message: &str) {
    let temp = init_as_admin();

    dete_in(&temp, &["add", "pacientes", assignment])
        .assert()
        .failure()
        .stderr(predicate::str::contains(message));
}

#[test]
fn show_prints_fields() {
    let temp = init_as_admin();
    let id = create_record(&temp, "pacientes", &["nome=Ana", "cpf=123"]);

    dete_in(&temp, &["show", "pacientes", &id.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("pacientes #{id}")))
        .stdout(predicate::str::contains("Ana"))
        .stdout(predicate::str::contains("123"));
}

#[test]
fn show_missing_record_fails() {
    let temp = init_as_admin();

    dete_in(&temp, &["show", "pacientes", "99"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("record not found"));
}

#[test]
fn edit_changes_and_clears_fields() {
    let temp = init_as_admin();
    let id = create_record(&temp, "pacientes", &["nome=Ana", "cpf=123"]);
    let id = id.to_string();

    dete_in(&temp, &["edit", "pacientes", &id, "nome=Ana Maria", "cpf="])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated pacientes"));

    let output = dete_in(&temp, &["show", "pacientes", &id, "-o", "json"])
        .output()
        .unwrap();
    let record: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(record["nome"], "Ana Maria");
    assert!(record.get("cpf").map_or(true, |v| v.is_null()));
}

#[test]
fn rm_deletes_record() {
    let temp = init_as_admin();
    let id = create_record(&temp, "pacientes", &["nome=Ana"]).to_string();

    dete_in(&temp, &["rm", "pacientes", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted pacientes"));

    dete_in(&temp, &["show", "pacientes", &id])
        .assert()
        .failure();
}

#[test]
fn list_filters_records() {
    let temp = init_as_admin();
    create_record(&temp, "pacientes", &["nome=Ana", "status=ativo"]);
    create_record(&temp, "pacientes", &["nome=Bia", "status=inativo"]);

    dete_in(&temp, &["list", "pacientes", "-w", "status=ativo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nome=Ana"))
        .stdout(predicate::str::contains("Bia").not());
}

#[test]
fn list_empty_table() {
    let temp = init_as_admin();

    dete_in(&temp, &["list", "exames"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No exames records"));
}

#[test]
fn cuidador_cannot_create_patients() {
    let temp = init_as_admin();
    add_user(&temp, "cuidador");
    create_record(&temp, "pacientes", &["nome=Ana"]);
    login(&temp, "cuidador");

    dete_in(&temp, &["list", "pacientes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nome=Ana"));

    dete_in(&temp, &["add", "pacientes", "nome=Bia"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pacientes.create"));
}

#[test]
fn log_shows_pending_operations_newest_first() {
    let temp = init_as_admin();
    let id = create_record(&temp, "pacientes", &["nome=Ana"]).to_string();
    dete_in(&temp, &["edit", "pacientes", &id, "nome=Ana Maria"])
        .assert()
        .success();

    let output = dete_in(&temp, &["log", "--pending"]).output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("update"));
    assert!(lines[1].contains("create"));
}

#[test]
fn log_audit_records_mutations() {
    let temp = init_as_admin();
    create_record(&temp, "pacientes", &["nome=Ana"]);

    dete_in(&temp, &["log", "--audit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("pacientes"));
}

#[test]
fn log_pending_conflicts_with_audit() {
    let temp = init_as_admin();
    dete_in(&temp, &["log", "--pending", "--audit"])
        .assert()
        .failure();
}
