// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Domain tables and their explicit field schemas.
//!
//! Every table carries an ordered list of named fields. The order is the
//! column order used when a record is written to a remote row, so local and
//! remote layouts cannot drift apart silently:
//!
//! ```text
//! | id | <domain fields in schema order> | createdAt | updatedAt |
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Column holding the local record identifier (always first).
pub const ID_FIELD: &str = "id";
/// Column holding the creation timestamp (second to last).
pub const CREATED_AT_FIELD: &str = "createdAt";
/// Column holding the last-update timestamp (last).
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// How a field value is stored and parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text (names, dates, statuses).
    Text,
    /// Integer or decimal number (foreign keys, money, hours).
    Number,
}

/// A named field in a table schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn text(name: &'static str) -> Field {
    Field {
        name,
        kind: FieldKind::Text,
    }
}

const fn num(name: &'static str) -> Field {
    Field {
        name,
        kind: FieldKind::Number,
    }
}

const PACIENTES: &[Field] = &[
    text("nome"),
    text("cpf"),
    text("status"),
    text("dataCadastro"),
    num("cuidadorResponsavel"),
];
const PROFISSIONAIS: &[Field] = &[
    text("nome"),
    text("especialidade"),
    text("registro"),
    text("status"),
];
const AGENDAMENTOS: &[Field] = &[
    num("pacienteId"),
    num("profissionalId"),
    text("data"),
    text("status"),
    text("tipo"),
];
const EVOLUCAO_CLINICA: &[Field] = &[
    num("pacienteId"),
    num("profissionalId"),
    text("dataHora"),
    text("tipo"),
    text("descricao"),
];
const PLANOS_CUIDADO: &[Field] = &[
    num("pacienteId"),
    text("status"),
    text("dataCriacao"),
    text("dataRevisao"),
];
const MEDICACOES: &[Field] = &[
    num("pacienteId"),
    num("profissionalId"),
    text("nome"),
    text("dataInicio"),
    text("dataFim"),
    text("status"),
];
const EXAMES: &[Field] = &[
    num("pacienteId"),
    num("profissionalId"),
    text("dataSolicitacao"),
    text("dataRealizacao"),
    text("status"),
];
const CUIDADORES: &[Field] = &[
    text("nome"),
    text("cpf"),
    text("especializacao"),
    text("status"),
    num("salarioBase"),
    num("valorHora"),
];
const ESCALAS: &[Field] = &[
    num("cuidadorId"),
    num("pacienteId"),
    text("dataInicio"),
    text("dataFim"),
    text("turno"),
];
const PONTOS_REGISTRADOS: &[Field] = &[
    num("cuidadorId"),
    text("data"),
    text("tipo"),
    text("timestamp"),
];
const FECHAMENTOS_MENSAIS: &[Field] = &[
    num("cuidadorId"),
    text("mesAno"),
    num("totalHoras"),
    num("valorTotal"),
    text("status"),
];
const LANCAMENTOS_FINANCEIROS: &[Field] = &[
    text("data"),
    text("tipo"),
    text("categoria"),
    num("valor"),
    text("status"),
    num("pacienteId"),
];
const ORCAMENTOS: &[Field] = &[
    text("mesAno"),
    text("categoria"),
    num("valorPrevisto"),
    num("valorRealizado"),
];
const TIMELINE_EVENTOS: &[Field] = &[
    num("pacienteId"),
    text("tipo"),
    text("data"),
    text("titulo"),
    text("descricao"),
];

/// A domain table in the local store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Table {
    #[serde(rename = "pacientes")]
    Pacientes,
    #[serde(rename = "profissionais")]
    Profissionais,
    #[serde(rename = "agendamentos")]
    Agendamentos,
    #[serde(rename = "evolucaoClinica")]
    EvolucaoClinica,
    #[serde(rename = "planosCuidado")]
    PlanosCuidado,
    #[serde(rename = "medicacoes")]
    Medicacoes,
    #[serde(rename = "exames")]
    Exames,
    #[serde(rename = "cuidadores")]
    Cuidadores,
    #[serde(rename = "escalas")]
    Escalas,
    #[serde(rename = "pontosRegistrados")]
    PontosRegistrados,
    #[serde(rename = "fechamentosMensais")]
    FechamentosMensais,
    #[serde(rename = "lancamentosFinanceiros")]
    LancamentosFinanceiros,
    #[serde(rename = "orcamentos")]
    Orcamentos,
    #[serde(rename = "timelineEventos")]
    TimelineEventos,
}

impl Table {
    /// All domain tables, in declaration order.
    pub const ALL: [Table; 14] = [
        Table::Pacientes,
        Table::Profissionais,
        Table::Agendamentos,
        Table::EvolucaoClinica,
        Table::PlanosCuidado,
        Table::Medicacoes,
        Table::Exames,
        Table::Cuidadores,
        Table::Escalas,
        Table::PontosRegistrados,
        Table::FechamentosMensais,
        Table::LancamentosFinanceiros,
        Table::Orcamentos,
        Table::TimelineEventos,
    ];

    /// Returns the table name used in storage, the operation log and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Pacientes => "pacientes",
            Table::Profissionais => "profissionais",
            Table::Agendamentos => "agendamentos",
            Table::EvolucaoClinica => "evolucaoClinica",
            Table::PlanosCuidado => "planosCuidado",
            Table::Medicacoes => "medicacoes",
            Table::Exames => "exames",
            Table::Cuidadores => "cuidadores",
            Table::Escalas => "escalas",
            Table::PontosRegistrados => "pontosRegistrados",
            Table::FechamentosMensais => "fechamentosMensais",
            Table::LancamentosFinanceiros => "lancamentosFinanceiros",
            Table::Orcamentos => "orcamentos",
            Table::TimelineEventos => "timelineEventos",
        }
    }

    /// Domain fields in column order (excluding id and timestamps).
    pub fn fields(&self) -> &'static [Field] {
        match self {
            Table::Pacientes => PACIENTES,
            Table::Profissionais => PROFISSIONAIS,
            Table::Agendamentos => AGENDAMENTOS,
            Table::EvolucaoClinica => EVOLUCAO_CLINICA,
            Table::PlanosCuidado => PLANOS_CUIDADO,
            Table::Medicacoes => MEDICACOES,
            Table::Exames => EXAMES,
            Table::Cuidadores => CUIDADORES,
            Table::Escalas => ESCALAS,
            Table::PontosRegistrados => PONTOS_REGISTRADOS,
            Table::FechamentosMensais => FECHAMENTOS_MENSAIS,
            Table::LancamentosFinanceiros => LANCAMENTOS_FINANCEIROS,
            Table::Orcamentos => ORCAMENTOS,
            Table::TimelineEventos => TIMELINE_EVENTOS,
        }
    }

    /// Looks up a domain field by name.
    pub fn field(&self, name: &str) -> Result<Field> {
        self.fields()
            .iter()
            .find(|f| f.name == name)
            .copied()
            .ok_or_else(|| {
                if is_reserved(name) {
                    Error::ReservedField(name.to_string())
                } else {
                    Error::UnknownField {
                        table: self.as_str().to_string(),
                        field: name.to_string(),
                        valid: self.field_names().join(", "),
                    }
                }
            })
    }

    /// Domain field names in column order.
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields().iter().map(|f| f.name).collect()
    }

    /// Full remote column layout: id, domain fields, createdAt, updatedAt.
    pub fn columns(&self) -> Vec<&'static str> {
        let mut columns = Vec::with_capacity(self.fields().len() + 3);
        columns.push(ID_FIELD);
        columns.extend(self.fields().iter().map(|f| f.name));
        columns.push(CREATED_AT_FIELD);
        columns.push(UPDATED_AT_FIELD);
        columns
    }

    /// Permission area guarding this table (e.g. `pacientes` in `pacientes.edit`).
    pub fn permission_area(&self) -> &'static str {
        match self {
            Table::Pacientes
            | Table::EvolucaoClinica
            | Table::PlanosCuidado
            | Table::Medicacoes
            | Table::Exames
            | Table::TimelineEventos => "pacientes",
            Table::Profissionais => "configuracoes",
            Table::Agendamentos => "agendamentos",
            Table::Cuidadores | Table::PontosRegistrados | Table::FechamentosMensais => {
                "cuidadores"
            }
            Table::Escalas => "escalas",
            Table::LancamentosFinanceiros | Table::Orcamentos => "financeiro",
        }
    }

    /// Comma-separated list of every table name (for hints).
    pub fn names() -> String {
        Table::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Returns true for columns the store manages itself.
pub fn is_reserved(name: &str) -> bool {
    matches!(name, ID_FIELD | CREATED_AT_FIELD | UPDATED_AT_FIELD)
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Table {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Table::ALL
            .iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| Error::UnknownTable(s.to_string()))
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
