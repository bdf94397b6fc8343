// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::warn;

/// The operator an operation is attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Display name of the operator, as shown in the log.
    pub name: String,
    /// The operator's role at the time (e.g. "Admin").
    pub role: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `name` - The operator's display name
    /// * `role` - The operator's role
    #[must_use]
    pub const fn new(name: String, role: String) -> Self {
        Self { name, role }
    }
}

/// The kind of operation recorded in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationType {
    Insert,
    Update,
    Delete,
    Login,
    Logout,
    Export,
}

impl OperationType {
    /// Converts this operation type to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "Insert",
            Self::Update => "Update",
            Self::Delete => "Delete",
            Self::Login => "Login",
            Self::Logout => "Logout",
            Self::Export => "Export",
        }
    }

    /// Label shown to operators.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Insert => "Inserimento",
            Self::Update => "Modifica",
            Self::Delete => "Eliminazione",
            Self::Login => "Accesso",
            Self::Logout => "Uscita",
            Self::Export => "Esportazione",
        }
    }
}

impl FromStr for OperationType {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Insert" => Ok(Self::Insert),
            "Update" => Ok(Self::Update),
            "Delete" => Ok(Self::Delete),
            "Login" => Ok(Self::Login),
            "Logout" => Ok(Self::Logout),
            "Export" => Ok(Self::Export),
            _ => Err(AuditError::UnknownOperation(s.to_string())),
        }
    }
}

impl std::fmt::Display for OperationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One line of the operations log.
///
/// Entries describe completed operations and are never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationLogEntry {
    /// Who performed the operation.
    pub actor: Actor,
    pub operation: OperationType,
    /// The list (section) the element belongs to, e.g. "Soci".
    pub list_name: String,
    /// Human readable description of the element.
    pub element_description: String,
}

impl OperationLogEntry {
    /// Creates a new `OperationLogEntry`.
    ///
    /// # Arguments
    ///
    /// * `actor` - The operator who performed the operation
    /// * `operation` - What was done
    /// * `list_name` - The section the element belongs to
    /// * `element_description` - Which element was affected
    #[must_use]
    pub const fn new(
        actor: Actor,
        operation: OperationType,
        list_name: String,
        element_description: String,
    ) -> Self {
        Self {
            actor,
            operation,
            list_name,
            element_description,
        }
    }
}

/// Errors raised by an audit sink.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuditError {
    #[error("failed to append to operations log: {0}")]
    Sink(String),
    #[error("unknown operation type: {0}")]
    UnknownOperation(String),
}

/// Destination of operations log entries.
pub trait AuditSink {
    /// Appends one entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry could not be stored.
    fn append(&mut self, entry: &OperationLogEntry) -> Result<(), AuditError>;
}

impl AuditSink for Vec<OperationLogEntry> {
    fn append(&mut self, entry: &OperationLogEntry) -> Result<(), AuditError> {
        self.push(entry.clone());
        Ok(())
    }
}

/// Appends an entry without letting a logging failure affect the caller.
///
/// Failures are reported through `tracing` and otherwise dropped.
/// Returns whether the entry was stored.
pub fn record<S: AuditSink + ?Sized>(sink: &mut S, entry: &OperationLogEntry) -> bool {
    match sink.append(entry) {
        Ok(()) => true,
        Err(e) => {
            warn!(
                operator = %entry.actor.name,
                operation = %entry.operation,
                list = %entry.list_name,
                error = %e,
                "Failed to record operation"
            );
            false
        }
    }
}
