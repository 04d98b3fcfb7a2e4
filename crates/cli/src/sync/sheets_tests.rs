// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::sync::mapping::ResourceMap;
use crate::sync::remote::RemoteAdapter;
use crate::sync::tabular::TabularAdapter;
use chrono::{TimeZone, Utc};
use dete_core::{Fields, Record, Table};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> SheetsClient {
    SheetsClient::new(SheetsConfig {
        api_base_url: server.uri(),
        spreadsheet_id: "sheet-1".into(),
        api_key: "api-key".into(),
        access_token: "token".into(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

fn paciente(id: i64, nome: &str) -> Record {
    let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let mut fields = Fields::new();
    fields.insert("nome".into(), json!(nome));
    Record {
        table: Table::Pacientes,
        id,
        fields,
        created_at: ts,
        updated_at: ts,
    }
}

#[test]
fn config_defaults_to_public_api() {
    let config = SheetsConfig::default();
    assert_eq!(config.api_base_url, "https://sheets.googleapis.com");
    assert!(config.spreadsheet_id.is_empty());
}

#[tokio::test]
async fn append_posts_row_with_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path_regex(r"^/v4/spreadsheets/sheet-1/values/Pacientes(!|%21)A(:|%3A)Z:append$"))
        .and(query_param("valueInputOption", "RAW"))
        .and(query_param("key", "api-key"))
        .and(header("authorization", "Bearer token"))
        .and(body_partial_json(json!({"values": [["7", "Ana"]]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .append_row("Pacientes", vec!["7".into(), "Ana".into()])
        .await
        .unwrap();
}

#[tokio::test]
async fn read_ids_takes_first_cell_of_each_row() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"/values/Pacientes(!|%21)A(:|%3A)A$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "range": "Pacientes!A1:A4",
            "values": [["id"], ["3"], [], [7]]
        })))
        .mount(&server)
        .await;

    let ids = client(&server).read_ids("Pacientes").await.unwrap();
    assert_eq!(ids, vec!["id", "3", "", "7"]);
}

#[tokio::test]
async fn empty_sheet_reads_as_no_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"range": "Timeline!A:Z"})))
        .mount(&server)
        .await;

    assert!(client(&server).read_rows("Timeline").await.unwrap().is_empty());
}

#[tokio::test]
async fn http_errors_carry_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string("backend down"))
        .mount(&server)
        .await;

    let err = client(&server).read_ids("Pacientes").await.unwrap_err();
    assert!(matches!(err, RemoteError::Status { status: 503, .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn update_of_located_row_writes_in_place() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"A(:|%3A)A$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [["id"], ["1"], ["7"]]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path_regex(r"/values/Pacientes(!|%21)A3(:|%3A)Z3$"))
        .and(query_param("valueInputOption", "RAW"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(2)
        .mount(&server)
        .await;

    let adapter = TabularAdapter::new(client(&server), ResourceMap::sheets_default());
    adapter.begin_drain();
    adapter.update("Pacientes", &paciente(7, "Ana")).await.unwrap();
    // Second update hits the cached index, not column A again
    adapter.update("Pacientes", &paciente(7, "Ana Maria")).await.unwrap();
}

#[tokio::test]
async fn delete_of_located_row_clears_it() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [["id"], ["7"]]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path_regex(r"/values/Pacientes(!|%21)A2(:|%3A)Z2:clear$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = TabularAdapter::new(client(&server), ResourceMap::sheets_default());
    adapter.delete("Pacientes", 7).await.unwrap();
    // Already cleared: nothing more to do
    adapter.delete("Pacientes", 7).await.unwrap();
}

#[tokio::test]
async fn pull_skips_header_and_cleared_rows() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"A(:|%3A)Z$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [
                ["id", "nome", "cpf"],
                ["1", "Ana", "111"],
                [],
                ["", ""],
                ["4", "Bia"]
            ]
        })))
        .mount(&server)
        .await;

    let adapter = TabularAdapter::new(client(&server), ResourceMap::sheets_default());
    let pulled = adapter.pull("Pacientes", Table::Pacientes).await.unwrap();
    let ids: Vec<i64> = pulled.records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 4]);
    assert_eq!(pulled.rejected, 0);
    assert_eq!(pulled.records[0].get("cpf"), Some(&json!("111")));
    assert_eq!(pulled.records[1].get("cpf"), None);
}
