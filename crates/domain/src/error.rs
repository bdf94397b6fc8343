// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required field is empty.
    MissingField {
        /// The kind of record being validated (e.g. "course").
        entity: &'static str,
        /// The field that is missing.
        field: &'static str,
    },
    /// A field has an invalid value.
    InvalidField {
        /// The field that failed validation.
        field: &'static str,
        /// Description of the problem.
        message: String,
    },
    /// Another record of the same kind already uses this name.
    DuplicateName {
        /// The kind of record (e.g. "room").
        entity: &'static str,
        /// The conflicting name.
        name: String,
    },
    /// A lesson string could not be parsed.
    InvalidLesson(String),
    /// A payment kind string is not recognised.
    InvalidPaymentKind(String),
    /// Failed to parse date from string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { entity, field } => {
                write!(f, "The {entity} field '{field}' is required")
            }
            Self::InvalidField { field, message } => {
                write!(f, "Invalid value for '{field}': {message}")
            }
            Self::DuplicateName { entity, name } => {
                write!(f, "A {entity} named '{name}' already exists")
            }
            Self::InvalidLesson(value) => write!(f, "Invalid lesson: {value}"),
            Self::InvalidPaymentKind(value) => write!(f, "Invalid payment kind: {value}"),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
