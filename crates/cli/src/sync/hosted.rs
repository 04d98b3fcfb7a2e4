// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Hosted row-store backend (PostgREST under `/rest/v1`).
//!
//! Unlike the spreadsheet backend, rows are addressed by key with an
//! `id=eq.N` filter, so no identity scan is needed. Every mutation payload
//! carries the signed-in remote user as `updated_by`.
//!
//! The hosted schema names columns in snake_case: the local field
//! `valorHora` lives in column `valor_hora`, `createdAt` in `created_at`.
//! Pulled rows must carry exactly the table's columns; anything else is
//! rejected rather than half-applied.

use std::time::Duration;

use dete_core::{Fields, Record, Table, CREATED_AT_FIELD, UPDATED_AT_FIELD};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::{json, Value};

use super::mapping::ResourceMap;
use super::remote::{check_status, Pulled, RemoteAdapter, RemoteError, RemoteFuture, RemoteResult};

/// Column the backend stamps with the remote user; not part of any table schema.
const UPDATED_BY_COLUMN: &str = "updated_by";

/// Hosted column name for a record key (`pacienteId` -> `paciente_id`).
pub(crate) fn column_name(key: &str) -> String {
    let mut column = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            column.push('_');
            column.push(c.to_ascii_lowercase());
        } else {
            column.push(c);
        }
    }
    column
}

/// Renames the keys of a record object to hosted columns.
fn to_columns(record: &Record) -> Fields {
    record
        .to_object()
        .into_iter()
        .map(|(key, value)| (column_name(&key), value))
        .collect()
}

/// Parses a hosted row, requiring exactly the table's columns.
///
/// `updated_by` is tolerated. Null values are fine for domain fields but
/// not for the timestamps.
fn from_columns(table: Table, row: &Fields) -> Result<Record, String> {
    let columns: Vec<(&'static str, String)> = table
        .columns()
        .into_iter()
        .map(|key| (key, column_name(key)))
        .collect();

    if let Some(unknown) = row
        .keys()
        .find(|k| k.as_str() != UPDATED_BY_COLUMN && !columns.iter().any(|(_, c)| c == *k))
    {
        return Err(format!("unknown column '{unknown}'"));
    }

    let mut object = Fields::new();
    for (key, column) in &columns {
        let value = row
            .get(column)
            .ok_or_else(|| format!("missing column '{column}'"))?;
        if (*key == CREATED_AT_FIELD || *key == UPDATED_AT_FIELD) && !value.is_string() {
            return Err(format!("column '{column}' has no timestamp"));
        }
        object.insert((*key).to_string(), value.clone());
    }
    Record::from_object(table, &object).map_err(|e| e.to_string())
}

/// Connection settings for the hosted backend.
#[derive(Debug, Clone)]
pub struct HostedConfig {
    pub api_url: String,
    /// Project key sent as the `apikey` header.
    pub anon_key: String,
    pub access_token: String,
    pub user_id: Option<String>,
    pub timeout: Duration,
}

/// Tokens returned by a password sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedSignIn {
    pub access_token: String,
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: TokenUser,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
    id: String,
}

fn build_client(timeout: Duration) -> RemoteResult<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| RemoteError::Network(format!("failed to create HTTP client: {e}")))
}

/// Exchange email and password for an access token.
pub async fn sign_in_with_password(
    api_url: &str,
    anon_key: &str,
    email: &str,
    password: &str,
    timeout: Duration,
) -> RemoteResult<HostedSignIn> {
    let client = build_client(timeout)?;
    let response = client
        .post(format!(
            "{}/auth/v1/token",
            api_url.trim_end_matches('/')
        ))
        .query(&[("grant_type", "password")])
        .header("apikey", anon_key)
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;

    let response = match check_status(response).await {
        Ok(r) => r,
        Err(RemoteError::Status { status, body }) if status == 400 || status == 401 => {
            return Err(RemoteError::Auth(body));
        }
        Err(e) => return Err(e),
    };
    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| RemoteError::Decode(e.to_string()))?;
    Ok(HostedSignIn {
        access_token: token.access_token,
        user_id: token.user.id,
    })
}

/// [`RemoteAdapter`] for the hosted row store.
pub struct HostedAdapter {
    config: HostedConfig,
    resources: ResourceMap,
    client: Client,
}

impl HostedAdapter {
    pub fn new(config: HostedConfig, resources: ResourceMap) -> RemoteResult<Self> {
        let client = build_client(config.timeout)?;
        Ok(HostedAdapter {
            config,
            resources,
            client,
        })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/rest/v1/{}",
            self.config.api_url.trim_end_matches('/'),
            urlencoding::encode(collection)
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let token = if self.config.access_token.is_empty() {
            &self.config.anon_key
        } else {
            &self.config.access_token
        };
        request
            .header("apikey", &self.config.anon_key)
            .bearer_auth(token)
    }

    fn payload(&self, record: &Record) -> Fields {
        let mut object = to_columns(record);
        if let Some(user_id) = &self.config.user_id {
            object.insert(UPDATED_BY_COLUMN.to_string(), Value::String(user_id.clone()));
        }
        object
    }

    async fn insert(&self, collection: &str, record: &Record) -> RemoteResult<()> {
        tracing::debug!(collection, id = record.id, "POST row");
        let response = self
            .authorize(self.client.post(self.collection_url(collection)))
            .header("Prefer", "return=minimal")
            .json(&self.payload(record))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn patch(&self, collection: &str, record: &Record) -> RemoteResult<()> {
        tracing::debug!(collection, id = record.id, "PATCH row");
        let response = self
            .authorize(self.client.patch(self.collection_url(collection)))
            .query(&[("id", format!("eq.{}", record.id))])
            .header("Prefer", "return=representation")
            .json(&self.payload(record))
            .send()
            .await?;
        let updated: Vec<Value> = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;
        if updated.is_empty() {
            tracing::debug!(collection, id = record.id, "no row updated, inserting");
            self.insert(collection, record).await?;
        }
        Ok(())
    }

    async fn remove(&self, collection: &str, record_id: i64) -> RemoteResult<()> {
        tracing::debug!(collection, id = record_id, "DELETE row");
        let response = self
            .authorize(self.client.delete(self.collection_url(collection)))
            .query(&[("id", format!("eq.{record_id}"))])
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn select_all(&self, collection: &str, table: Table) -> RemoteResult<Pulled> {
        tracing::debug!(collection, "GET rows");
        let response = self
            .authorize(self.client.get(self.collection_url(collection)))
            .query(&[("select", "*"), ("order", "id.asc")])
            .send()
            .await?;
        let rows: Vec<Fields> = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))?;

        let mut pulled = Pulled::default();
        for row in &rows {
            match from_columns(table, row) {
                Ok(record) => pulled.records.push(record),
                Err(reason) => {
                    tracing::warn!(collection, %reason, "rejected remote row");
                    pulled.rejected += 1;
                }
            }
        }
        Ok(pulled)
    }
}

impl RemoteAdapter for HostedAdapter {
    fn resource_for(&self, table: Table) -> Option<&str> {
        self.resources.get(table)
    }

    fn begin_drain(&self) {}

    fn append<'a>(&'a self, resource: &'a str, record: &'a Record) -> RemoteFuture<'a, ()> {
        Box::pin(self.insert(resource, record))
    }

    fn update<'a>(&'a self, resource: &'a str, record: &'a Record) -> RemoteFuture<'a, ()> {
        Box::pin(self.patch(resource, record))
    }

    fn delete<'a>(&'a self, resource: &'a str, record_id: i64) -> RemoteFuture<'a, ()> {
        Box::pin(self.remove(resource, record_id))
    }

    fn pull<'a>(&'a self, resource: &'a str, table: Table) -> RemoteFuture<'a, Pulled> {
        Box::pin(self.select_all(resource, table))
    }
}

#[cfg(test)]
#[path = "hosted_tests.rs"]
mod tests;
