// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Table to remote resource mapping.
//!
//! Built once at configuration time. A table without an entry is not synced;
//! its operations are skipped and marked delivered.

use std::collections::BTreeMap;

use dete_core::Table;

/// Sheets used by the spreadsheet backend out of the box.
const SHEET_DEFAULTS: &[(Table, &str)] = &[
    (Table::Pacientes, "Pacientes"),
    (Table::Cuidadores, "Cuidadores"),
    (Table::Agendamentos, "Agendamentos"),
    (Table::LancamentosFinanceiros, "Financeiro"),
    (Table::TimelineEventos, "Timeline"),
];

/// Maps domain tables to remote resource names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceMap {
    map: BTreeMap<Table, String>,
}

impl ResourceMap {
    /// The spreadsheet mapping: five tables, one sheet each.
    pub fn sheets_default() -> Self {
        ResourceMap {
            map: SHEET_DEFAULTS
                .iter()
                .map(|(table, sheet)| (*table, sheet.to_string()))
                .collect(),
        }
    }

    /// The hosted mapping: every table, under its snake_case name.
    pub fn hosted_default() -> Self {
        ResourceMap {
            map: Table::ALL
                .iter()
                .map(|table| (*table, snake_case(table.as_str())))
                .collect(),
        }
    }

    /// Apply `table = "resource"` overrides. An empty resource unmaps the table.
    pub fn with_overrides(
        mut self,
        overrides: &BTreeMap<String, String>,
    ) -> dete_core::Result<Self> {
        for (name, resource) in overrides {
            let table: Table = name.parse()?;
            if resource.is_empty() {
                self.map.remove(&table);
            } else {
                self.map.insert(table, resource.clone());
            }
        }
        Ok(self)
    }

    pub fn get(&self, table: Table) -> Option<&str> {
        self.map.get(&table).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Table, &str)> {
        self.map.iter().map(|(t, r)| (*t, r.as_str()))
    }
}

fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
#[path = "mapping_tests.rs"]
mod tests;
