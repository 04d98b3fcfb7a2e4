// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Domain records and their row serialization.
//!
//! A record is serialized to a remote row by walking its table's schema, never
//! by iterating the stored map. Fields absent from the record become empty
//! cells; fields outside the schema cannot be stored in the first place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::table::{is_reserved, FieldKind, Table, CREATED_AT_FIELD, ID_FIELD, UPDATED_AT_FIELD};

/// Domain field values keyed by field name.
pub type Fields = Map<String, Value>;

/// A stored domain record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub table: Table,
    pub id: i64,
    pub fields: Fields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record {
    /// Returns the value of a domain field, if set.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Serializes the record to a row in schema column order.
    pub fn to_row(&self) -> Vec<String> {
        let mut row = Vec::with_capacity(self.table.fields().len() + 3);
        row.push(self.id.to_string());
        for field in self.table.fields() {
            row.push(cell_text(self.fields.get(field.name)));
        }
        row.push(self.created_at.to_rfc3339());
        row.push(self.updated_at.to_rfc3339());
        row
    }

    /// Parses a remote row laid out in schema column order.
    ///
    /// Returns `Ok(None)` for rows whose identity cell is empty (cleared rows).
    /// Trailing cells may be missing; remote backends trim empty tails.
    pub fn from_row(table: Table, row: &[String]) -> Result<Option<Record>> {
        let id_cell = row.first().map(|s| s.trim()).unwrap_or_default();
        if id_cell.is_empty() {
            return Ok(None);
        }
        let id: i64 = id_cell.parse().map_err(|_| {
            Error::CorruptedData(format!("invalid record id '{id_cell}' in {table} row"))
        })?;

        let mut fields = Fields::new();
        for (i, field) in table.fields().iter().enumerate() {
            let cell = row.get(i + 1).map(String::as_str).unwrap_or_default();
            let value = parse_field_value(table, field.name, cell)?;
            if !value.is_null() {
                fields.insert(field.name.to_string(), value);
            }
        }

        let offset = table.fields().len() + 1;
        let created_at = parse_cell_timestamp(row.get(offset), CREATED_AT_FIELD)?;
        let updated_at = parse_cell_timestamp(row.get(offset + 1), UPDATED_AT_FIELD)?;

        Ok(Some(Record {
            table,
            id,
            fields,
            created_at,
            updated_at,
        }))
    }

    /// Serializes the record as a flat JSON object (id, fields, timestamps).
    pub fn to_object(&self) -> Fields {
        let mut object = Fields::new();
        object.insert(ID_FIELD.to_string(), Value::from(self.id));
        for field in self.table.fields() {
            let value = self.fields.get(field.name).cloned().unwrap_or(Value::Null);
            object.insert(field.name.to_string(), value);
        }
        object.insert(
            CREATED_AT_FIELD.to_string(),
            Value::String(self.created_at.to_rfc3339()),
        );
        object.insert(
            UPDATED_AT_FIELD.to_string(),
            Value::String(self.updated_at.to_rfc3339()),
        );
        object
    }

    /// Parses a flat JSON object produced by [`Record::to_object`].
    ///
    /// Every key must be `id`, a timestamp or a schema field; anything else
    /// is an [`Error::UnknownField`]. Missing timestamps default to now.
    pub fn from_object(table: Table, object: &Fields) -> Result<Record> {
        let id = object
            .get(ID_FIELD)
            .and_then(Value::as_i64)
            .ok_or_else(|| Error::CorruptedData(format!("{table} object without integer id")))?;

        let mut fields = Fields::new();
        for (key, value) in object {
            if is_reserved(key) {
                continue;
            }
            let field = table.field(key)?;
            if !value.is_null() {
                let value = coerce_value(table, field.name, value.clone())?;
                fields.insert(field.name.to_string(), value);
            }
        }

        let timestamp = |key: &str| -> Result<DateTime<Utc>> {
            match object.get(key).and_then(Value::as_str) {
                Some(s) => parse_timestamp(s, key),
                None => Ok(Utc::now()),
            }
        };

        Ok(Record {
            table,
            id,
            fields,
            created_at: timestamp(CREATED_AT_FIELD)?,
            updated_at: timestamp(UPDATED_AT_FIELD)?,
        })
    }
}

/// Checks every key against the table schema and coerces values to the field kind.
pub fn validate_fields(table: Table, fields: Fields) -> Result<Fields> {
    let mut validated = Fields::new();
    for (name, value) in fields {
        table.field(&name)?;
        let value = coerce_value(table, &name, value)?;
        validated.insert(name, value);
    }
    Ok(validated)
}

/// Parses a textual value (CLI argument or remote cell) for a field.
///
/// Empty input parses to `null`.
pub fn parse_field_value(table: Table, field: &str, raw: &str) -> Result<Value> {
    let kind = table.field(field)?.kind;
    if raw.is_empty() {
        return Ok(Value::Null);
    }
    match kind {
        FieldKind::Text => Ok(Value::String(raw.to_string())),
        FieldKind::Number => parse_number(raw).ok_or_else(|| Error::InvalidNumber {
            table: table.to_string(),
            field: field.to_string(),
            value: raw.to_string(),
        }),
    }
}

fn coerce_value(table: Table, field: &str, value: Value) -> Result<Value> {
    let kind = table.field(field)?.kind;
    match (kind, value) {
        (_, Value::Null) => Ok(Value::Null),
        (FieldKind::Number, Value::Number(n)) => Ok(Value::Number(n)),
        (FieldKind::Number, Value::String(s)) => parse_field_value(table, field, s.trim()),
        (FieldKind::Number, other) => Err(Error::InvalidNumber {
            table: table.to_string(),
            field: field.to_string(),
            value: other.to_string(),
        }),
        (FieldKind::Text, Value::String(s)) => Ok(Value::String(s)),
        (FieldKind::Text, other) => Ok(Value::String(cell_text(Some(&other)))),
    }
}

fn parse_number(raw: &str) -> Option<Value> {
    if let Ok(i) = raw.parse::<i64>() {
        return Some(Value::from(i));
    }
    raw.parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
}

/// Renders a field value as a single cell.
fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

fn parse_cell_timestamp(cell: Option<&String>, column: &str) -> Result<DateTime<Utc>> {
    match cell.map(|s| s.trim()) {
        None | Some("") => Ok(Utc::now()),
        Some(s) => parse_timestamp(s, column),
    }
}

/// Parses an RFC3339 timestamp.
pub fn parse_timestamp(value: &str, column: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| Error::CorruptedData(format!("invalid timestamp '{value}' in '{column}'")))
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
