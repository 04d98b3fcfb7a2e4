// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use super::*;
use yare::parameterized;

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(args)
}

#[test]
fn test_add_collects_assignments() {
    let cli = parse(&["dete", "add", "pacientes", "nome=Ana", "cpf=123"]).unwrap();
    match cli.command {
        Command::Add {
            table,
            assignments,
            output,
        } => {
            assert_eq!(table, "pacientes");
            assert_eq!(assignments, vec!["nome=Ana", "cpf=123"]);
            assert_eq!(output, OutputFormat::Text);
        }
        _ => panic!("Expected Add command"),
    }
}

#[test]
fn test_add_without_fields_is_allowed() {
    assert!(parse(&["dete", "add", "exames"]).is_ok());
}

#[test]
fn test_show_parses_record_address() {
    let cli = parse(&["dete", "show", "pacientes", "7", "-o", "json"]).unwrap();
    match cli.command {
        Command::Show { record, output } => {
            assert_eq!(record.table, "pacientes");
            assert_eq!(record.id, 7);
            assert_eq!(output, OutputFormat::Json);
        }
        _ => panic!("Expected Show command"),
    }
}

#[parameterized(
    not_a_number = { &["dete", "show", "pacientes", "abc"] },
    missing_id = { &["dete", "rm", "pacientes"] },
    edit_without_changes = { &["dete", "edit", "pacientes", "1"] },
    bad_output = { &["dete", "list", "pacientes", "-o", "xml"] },
)]
fn test_invalid_record_commands(args: &[&str]) {
    assert!(parse(args).is_err());
}

#[test]
fn test_list_repeated_where() {
    let cli = parse(&[
        "dete",
        "list",
        "agendamentos",
        "-w",
        "pacienteId=3",
        "--where",
        "status=confirmado",
    ])
    .unwrap();
    match cli.command {
        Command::List { table, filters, .. } => {
            assert_eq!(table, "agendamentos");
            assert_eq!(filters, vec!["pacienteId=3", "status=confirmado"]);
        }
        _ => panic!("Expected List command"),
    }
}

#[test]
fn test_log_flags() {
    let cli = parse(&["dete", "log", "--pending", "-n", "5"]).unwrap();
    match cli.command {
        Command::Log {
            pending,
            audit,
            limits,
            ..
        } => {
            assert!(pending);
            assert!(!audit);
            assert_eq!(limits.resolve(20), Some(5));
        }
        _ => panic!("Expected Log command"),
    }
}

#[test]
fn test_log_pending_conflicts_with_audit() {
    assert!(parse(&["dete", "log", "--pending", "--audit"]).is_err());
}

#[test]
fn test_limit_resolution() {
    let limits = LimitArgs::default();
    assert_eq!(limits.resolve(20), Some(20));
    let unlimited = LimitArgs {
        limit: None,
        no_limit: true,
    };
    assert_eq!(unlimited.resolve(20), None);
}
