// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;
use common::*;

#[test]
fn export_writes_every_table() {
    let temp = init_as_admin();
    create_record(&temp, "pacientes", &["nome=Ana"]);
    create_record(&temp, "exames", &["pacienteId=1", "status=pendente"]);
    let path = temp.path().join("backup.json");

    dete_in(&temp, &["export", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 record(s)"));

    let data: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(data["pacientes"][0]["nome"], "Ana");
    assert_eq!(data["exames"].as_array().unwrap().len(), 1);
    assert!(data["agendamentos"].as_array().unwrap().is_empty());
}

#[test]
fn export_to_stdout() {
    let temp = init_as_admin();
    create_record(&temp, "pacientes", &["nome=Ana"]);

    dete_in(&temp, &["export", "-"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"pacientes\""))
        .stdout(predicate::str::contains("Exported").not());
}

#[test]
fn export_requires_permission() {
    let temp = init_as_admin();
    add_user(&temp, "cuidador");
    login(&temp, "cuidador");

    dete_in(&temp, &["export", "-"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("relatorios.export"));
}

#[test]
fn import_restores_export_without_queueing() {
    let source = init_as_admin();
    create_record(&source, "pacientes", &["nome=Ana"]);
    create_record(&source, "pacientes", &["nome=Bia"]);
    let path = source.path().join("backup.json");
    dete_in(&source, &["export", path.to_str().unwrap()])
        .assert()
        .success();

    let target = init_as_admin();
    dete_in(&target, &["import", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 record(s)"));

    dete_in(&target, &["list", "pacientes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nome=Ana"))
        .stdout(predicate::str::contains("nome=Bia"));

    dete_in(&target, &["log", "--pending"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No operations"));
}

#[test]
fn import_from_stdin() {
    let temp = init_as_admin();

    dete_in(&temp, &["import", "-"])
        .write_stdin(r#"{"pacientes": [{"id": 4, "nome": "Caio"}]}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 record(s)"));

    dete_in(&temp, &["show", "pacientes", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Caio"));
}

#[test]
fn import_rejects_non_object() {
    let temp = init_as_admin();

    dete_in(&temp, &["import", "-"])
        .write_stdin("[1, 2, 3]")
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected a JSON object"));
}

#[test]
fn import_rejects_unknown_field() {
    let temp = init_as_admin();

    dete_in(&temp, &["import", "-"])
        .write_stdin(r#"{"pacientes": [{"id": 4, "nome": "Caio", "telefone": "555"}]}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown field 'telefone'"));

    dete_in(&temp, &["list", "pacientes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Caio").not());
}
