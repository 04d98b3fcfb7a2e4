// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Google Sheets values API backend.
//!
//! Each sheet is addressed with A1 ranges (`{sheet}!A:Z`). Requests carry the
//! OAuth access token as a bearer token and the API key as the `key` query
//! parameter when one is configured.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::json;

use super::remote::{check_status, RemoteError, RemoteFuture, RemoteResult};
use super::tabular::TabularBackend;

/// Default Sheets API root.
pub const DEFAULT_SHEETS_URL: &str = "https://sheets.googleapis.com";

/// Last column written or read for a row.
const LAST_COLUMN: &str = "Z";

/// Connection settings for the Sheets backend.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    /// API root; overridable so tests can point at a mock server.
    pub api_base_url: String,
    pub spreadsheet_id: String,
    pub api_key: String,
    pub access_token: String,
    pub timeout: Duration,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        SheetsConfig {
            api_base_url: DEFAULT_SHEETS_URL.to_string(),
            spreadsheet_id: String::new(),
            api_key: String::new(),
            access_token: String::new(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

/// HTTP client for one spreadsheet.
pub struct SheetsClient {
    config: SheetsConfig,
    client: Client,
}

impl SheetsClient {
    pub fn new(config: SheetsConfig) -> RemoteResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RemoteError::Network(format!("failed to create HTTP client: {e}")))?;
        Ok(SheetsClient { config, client })
    }

    fn values_url(&self, range: &str, suffix: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}{suffix}",
            self.config.api_base_url.trim_end_matches('/'),
            urlencoding::encode(&self.config.spreadsheet_id),
            urlencoding::encode(range),
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let mut request = request;
        if !self.config.access_token.is_empty() {
            request = request.bearer_auth(&self.config.access_token);
        }
        if !self.config.api_key.is_empty() {
            request = request.query(&[("key", self.config.api_key.as_str())]);
        }
        request
    }

    async fn get_values(&self, range: &str) -> RemoteResult<Vec<Vec<String>>> {
        tracing::debug!(range, "GET values");
        let response = self
            .authorize(self.client.get(self.values_url(range, "")))
            .send()
            .await?;
        let body: ValueRange = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;
        Ok(body
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    async fn append(&self, sheet: &str, row: Vec<String>) -> RemoteResult<()> {
        let range = format!("{sheet}!A:{LAST_COLUMN}");
        tracing::debug!(range, "POST values:append");
        let response = self
            .authorize(self.client.post(self.values_url(&range, ":append")))
            .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
            .json(&json!({ "values": [row] }))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn write(&self, sheet: &str, row_number: usize, row: Vec<String>) -> RemoteResult<()> {
        let range = format!("{sheet}!A{row_number}:{LAST_COLUMN}{row_number}");
        tracing::debug!(range, "PUT values");
        let response = self
            .authorize(self.client.put(self.values_url(&range, "")))
            .query(&[("valueInputOption", "RAW")])
            .json(&json!({ "range": range, "values": [row] }))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn clear(&self, sheet: &str, row_number: usize) -> RemoteResult<()> {
        let range = format!("{sheet}!A{row_number}:{LAST_COLUMN}{row_number}");
        tracing::debug!(range, "POST values:clear");
        let response = self
            .authorize(self.client.post(self.values_url(&range, ":clear")))
            .json(&json!({}))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

fn cell_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl TabularBackend for SheetsClient {
    fn append_row<'a>(&'a self, sheet: &'a str, row: Vec<String>) -> RemoteFuture<'a, ()> {
        Box::pin(self.append(sheet, row))
    }

    fn read_ids<'a>(&'a self, sheet: &'a str) -> RemoteFuture<'a, Vec<String>> {
        Box::pin(async move {
            let rows = self.get_values(&format!("{sheet}!A:A")).await?;
            Ok(rows
                .into_iter()
                .map(|row| row.into_iter().next().unwrap_or_default())
                .collect())
        })
    }

    fn write_row<'a>(
        &'a self,
        sheet: &'a str,
        row_number: usize,
        row: Vec<String>,
    ) -> RemoteFuture<'a, ()> {
        Box::pin(self.write(sheet, row_number, row))
    }

    fn clear_row<'a>(&'a self, sheet: &'a str, row_number: usize) -> RemoteFuture<'a, ()> {
        Box::pin(self.clear(sheet, row_number))
    }

    fn read_rows<'a>(&'a self, sheet: &'a str) -> RemoteFuture<'a, Vec<Vec<String>>> {
        Box::pin(async move { self.get_values(&format!("{sheet}!A:{LAST_COLUMN}")).await })
    }
}

#[cfg(test)]
#[path = "sheets_tests.rs"]
mod tests;
