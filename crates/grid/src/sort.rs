// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Heterogeneous cell ordering.
//!
//! Cells are normalised to a number or a lowercase string. Numbers compare
//! numerically and strings by UTF-16 code units; a blank string counts as
//! zero against a number. A number and a non-blank string have no loose
//! order, so numbers are placed first to keep the ordering total. Nulls
//! always sort last, in either direction.

use crate::value::CellValue;
use accademia_domain::format::parse_date_loose;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Sort direction of the active column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// The opposite direction.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Converts this direction to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("Invalid sort direction: {other}")),
        }
    }
}

/// The active sort column and direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub key: String,
    pub direction: SortDirection,
}

/// A cell reduced to something orderable.
#[derive(Debug, Clone, PartialEq)]
pub enum SortKey {
    Number(f64),
    Text(String),
}

/// Normalises a non-null cell for comparison. Returns `None` for null.
///
/// Booleans become `1` / `0`. Strings are tried as a date (compared by
/// instant in milliseconds), then as a finite number, and otherwise
/// compared lowercased. Blank strings become `""`.
#[must_use]
pub fn normalize(value: &CellValue) -> Option<SortKey> {
    match value {
        CellValue::Null => None,
        CellValue::Number(n) => Some(SortKey::Number(*n)),
        CellValue::Bool(b) => Some(SortKey::Number(if *b { 1.0 } else { 0.0 })),
        CellValue::Text(text) => Some(normalize_text(text)),
    }
}

fn normalize_text(text: &str) -> SortKey {
    let trimmed: &str = text.trim();
    if trimmed.is_empty() {
        return SortKey::Text(String::new());
    }
    if let Some(instant) = parse_date_loose(trimmed)
        .and_then(|dt| (dt.assume_utc().unix_timestamp_nanos() / 1_000_000).to_f64())
    {
        return SortKey::Number(instant);
    }
    if let Some(number) = trimmed.parse::<f64>().ok().filter(|n| n.is_finite()) {
        return SortKey::Number(number);
    }
    SortKey::Text(trimmed.to_lowercase())
}

/// Compares two normalised keys.
#[must_use]
pub fn compare_keys(a: &SortKey, b: &SortKey) -> Ordering {
    match (numeric_value(a), numeric_value(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => match (a, b) {
            (SortKey::Text(x), SortKey::Text(y)) => x.encode_utf16().cmp(y.encode_utf16()),
            _ => Ordering::Equal,
        },
    }
}

/// Numbers, and blank strings as zero.
fn numeric_value(key: &SortKey) -> Option<f64> {
    match key {
        SortKey::Number(n) => Some(*n),
        SortKey::Text(t) if t.is_empty() => Some(0.0),
        SortKey::Text(_) => None,
    }
}

/// Orders two cells for the given direction, keeping nulls last.
#[must_use]
pub fn compare_cells(a: &CellValue, b: &CellValue, direction: SortDirection) -> Ordering {
    match (normalize(a), normalize(b)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => {
            let ordering: Ordering = compare_keys(&x, &y);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        }
    }
}
