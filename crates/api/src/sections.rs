// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The listable sections of the application and their grid layouts.

use accademia::{Catalog, EntityKind};
use accademia_domain::Stored;
use accademia_grid::{Column, ColumnFormat, RowAction};
use accademia_persistence::OperationLogRecord;
use serde::Serialize;
use serde_json::{Map, Value};
use std::str::FromStr;

use crate::error::ApiError;

/// Row action opening the edit form.
pub const ACTION_EDIT: &str = "edit";
/// Row action deleting the record.
pub const ACTION_DELETE: &str = "delete";
/// Row action opening a quote seeded from a member.
pub const ACTION_QUOTE: &str = "quote";
/// Row action opening a member's payments.
pub const ACTION_PAYMENTS: &str = "payments";

/// A section of the application, as addressed in URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Members,
    Courses,
    Teachers,
    Rooms,
    Categories,
    MembershipTypes,
    PricingTiers,
    Payments,
    OperationsLog,
}

impl Section {
    pub const ALL: [Self; 9] = [
        Self::Members,
        Self::Courses,
        Self::Teachers,
        Self::Rooms,
        Self::Categories,
        Self::MembershipTypes,
        Self::PricingTiers,
        Self::Payments,
        Self::OperationsLog,
    ];

    /// The URL segment of this section.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self.entity_kind() {
            Some(kind) => kind.section(),
            None => "log",
        }
    }

    /// The kind of record listed, or `None` for the operations log.
    #[must_use]
    pub const fn entity_kind(&self) -> Option<EntityKind> {
        match self {
            Self::Members => Some(EntityKind::Member),
            Self::Courses => Some(EntityKind::Course),
            Self::Teachers => Some(EntityKind::Teacher),
            Self::Rooms => Some(EntityKind::Room),
            Self::Categories => Some(EntityKind::Category),
            Self::MembershipTypes => Some(EntityKind::MembershipType),
            Self::PricingTiers => Some(EntityKind::PricingTier),
            Self::Payments => Some(EntityKind::Payment),
            Self::OperationsLog => None,
        }
    }

    /// The list name used in the operations log.
    #[must_use]
    pub const fn list_name(&self) -> &'static str {
        match self.entity_kind() {
            Some(kind) => kind.list_name(),
            None => "Registro operazioni",
        }
    }

    /// The grid columns of this section.
    #[must_use]
    pub fn columns(&self) -> Vec<Column> {
        match self {
            Self::Members => vec![
                Column::new("last_name", "Cognome"),
                Column::new("first_name", "Nome"),
                Column::new("fiscal_code", "Codice fiscale"),
                Column::new("base_course", "Corso base"),
                Column::new("courses", "Altri corsi"),
                Column::new("enrollment_fee", "Iscrizione").with_format(ColumnFormat::Currency),
                Column::new("monthly_fee", "Quota mensile").with_format(ColumnFormat::Currency),
                Column::new("updated_at", "Ultima modifica").with_format(ColumnFormat::DateTime),
            ],
            Self::Courses => vec![
                Column::new("name", "Corso"),
                Column::new("category", "Categoria"),
                Column::new("base_price", "Prezzo base").with_format(ColumnFormat::Currency),
                Column::new("additional_price", "Prezzo aggiuntivo")
                    .with_format(ColumnFormat::Currency),
                Column::new("weekly_hours", "Ore settimanali"),
                Column::new("lessons", "Lezioni"),
            ],
            Self::Teachers => vec![
                Column::new("last_name", "Cognome"),
                Column::new("first_name", "Nome"),
                Column::new("email", "Email"),
                Column::new("phone", "Telefono"),
                Column::new("disciplines", "Discipline"),
            ],
            Self::Rooms => vec![
                Column::new("name", "Sala"),
                Column::new("capacity", "Capienza"),
            ],
            Self::Categories => vec![
                Column::new("name", "Categoria"),
                Column::new("color_hex", "Colore"),
            ],
            Self::MembershipTypes => vec![
                Column::new("name", "Tipologia"),
                Column::new("value", "Quota iscrizione").with_format(ColumnFormat::Currency),
            ],
            Self::PricingTiers => vec![
                Column::new("position", "Posizione"),
                Column::new("description", "Descrizione"),
                Column::new("value", "Valore"),
            ],
            Self::Payments => vec![
                Column::new("paid_on", "Data").with_format(ColumnFormat::Date),
                Column::new("member", "Socio"),
                Column::new("kind", "Tipo"),
                Column::new("period_label", "Periodo"),
                Column::new("amount", "Importo").with_format(ColumnFormat::Currency),
                Column::new("method", "Metodo"),
            ],
            Self::OperationsLog => vec![
                Column::new("created_at", "Data").with_format(ColumnFormat::DateTime),
                Column::new("operator_name", "Operatore"),
                Column::new("operator_role", "Ruolo"),
                Column::new("operation", "Operazione"),
                Column::new("list_name", "Lista"),
                Column::new("element_description", "Elemento"),
            ],
        }
    }

    /// The actions offered on each row, before role filtering.
    #[must_use]
    pub fn row_actions(&self) -> Vec<RowAction> {
        let edit: RowAction = RowAction::new(ACTION_EDIT, "Modifica");
        let delete: RowAction = RowAction::new(ACTION_DELETE, "Elimina");
        match self {
            Self::Members => vec![
                edit,
                RowAction::new(ACTION_QUOTE, "Preventivo"),
                RowAction::new(ACTION_PAYMENTS, "Pagamenti"),
                delete,
            ],
            Self::PricingTiers => vec![edit],
            Self::Payments => vec![delete],
            Self::OperationsLog => Vec::new(),
            _ => vec![edit, delete],
        }
    }

    /// Placeholder shown when no row matches.
    #[must_use]
    pub const fn empty_message(&self) -> &'static str {
        match self {
            Self::Members => "Nessun socio trovato",
            Self::Courses => "Nessun corso trovato",
            Self::Teachers => "Nessun insegnante trovato",
            Self::Payments => "Nessun pagamento registrato",
            Self::OperationsLog => "Nessuna operazione registrata",
            _ => accademia_grid::DEFAULT_EMPTY_MESSAGE,
        }
    }
}

impl FromStr for Section {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| ApiError::ResourceNotFound {
                resource_type: String::from("Section"),
                message: format!("Unknown section '{s}'"),
            })
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn stored_row<T: Serialize>(stored: &Stored<T>) -> Result<Map<String, Value>, ApiError> {
    match serde_json::to_value(stored) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ApiError::Internal {
            message: format!("Record serialized to a non-object value: {other}"),
        }),
        Err(e) => Err(ApiError::Internal {
            message: format!("Failed to serialize record: {e}"),
        }),
    }
}

fn rows_of<T: Serialize>(records: &[Stored<T>]) -> Result<Vec<Value>, ApiError> {
    records
        .iter()
        .map(|stored| stored_row(stored).map(Value::Object))
        .collect()
}

/// Grid rows of a catalog section.
///
/// Each row carries the record's fields plus `id`, `created_at` and
/// `updated_at`. Lessons are shown in their `weekday | room | time`
/// form and payments carry the member's name.
///
/// # Errors
///
/// Returns an error if a record cannot be serialized.
pub fn catalog_rows(section: Section, catalog: &Catalog) -> Result<Vec<Value>, ApiError> {
    match section {
        Section::Members => rows_of(&catalog.members),
        Section::Teachers => rows_of(&catalog.teachers),
        Section::Rooms => rows_of(&catalog.rooms),
        Section::Categories => rows_of(&catalog.categories),
        Section::MembershipTypes => rows_of(&catalog.membership_types),
        Section::PricingTiers => rows_of(&catalog.pricing_tiers),
        Section::Courses => catalog
            .courses
            .iter()
            .map(|stored| {
                let mut row: Map<String, Value> = stored_row(stored)?;
                let lessons: Vec<Value> = stored
                    .record
                    .lessons
                    .iter()
                    .map(|lesson| Value::String(lesson.to_display_string()))
                    .collect();
                row.insert(String::from("lessons"), Value::Array(lessons));
                Ok(Value::Object(row))
            })
            .collect(),
        Section::Payments => catalog
            .payments
            .iter()
            .map(|stored| {
                let mut row: Map<String, Value> = stored_row(stored)?;
                let member: Value = catalog
                    .member(stored.record.member_id)
                    .map_or(Value::Null, |m| Value::String(m.record.full_name()));
                row.insert(String::from("member"), member);
                Ok(Value::Object(row))
            })
            .collect(),
        Section::OperationsLog => Ok(Vec::new()),
    }
}

/// Grid rows of the operations log.
#[must_use]
pub fn log_rows(entries: &[OperationLogRecord]) -> Vec<Value> {
    entries
        .iter()
        .map(|entry| {
            serde_json::json!({
                "id": entry.entry_id,
                "created_at": entry.created_at,
                "operator_name": entry.operator_name,
                "operator_role": entry.operator_role,
                "operation": entry.operation.label(),
                "list_name": entry.list_name,
                "element_description": entry.element_description,
            })
        })
        .collect()
}
