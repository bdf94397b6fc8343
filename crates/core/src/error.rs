// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::state::EntityKind;
use accademia_domain::DomainError;

/// Errors that can occur during state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A field-level rule was violated.
    DomainViolation(DomainError),
    /// The command targets a record the catalog does not hold.
    RecordNotFound { kind: EntityKind, id: i64 },
    /// The record cannot be deleted while other records refer to it.
    StillReferenced {
        kind: EntityKind,
        /// Display name of the record being deleted.
        name: String,
        /// One description per dependent record, e.g. `member Giulia Bianchi`.
        dependents: Vec<String>,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "{err}"),
            Self::RecordNotFound { kind, id } => write!(f, "No {kind} with id {id}"),
            Self::StillReferenced {
                kind,
                name,
                dependents,
            } => write!(
                f,
                "Cannot delete {kind} '{name}': still referenced by {}",
                dependents.join(", ")
            ),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::DomainViolation(err) => Some(err),
            Self::RecordNotFound { .. } | Self::StillReferenced { .. } => None,
        }
    }
}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
