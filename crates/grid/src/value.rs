// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use accademia_domain::token_list::join_tokens;
use serde_json::{Map, Value};

/// A single cell as seen by the grid.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Missing or null.
    Null,
    Number(f64),
    Bool(bool),
    Text(String),
}

impl CellValue {
    /// The text filters match against. Null renders as the empty string.
    #[must_use]
    pub fn display_string(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Number(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Text(t) => t.clone(),
        }
    }

    /// Returns `true` for [`CellValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<&Value> for CellValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            Value::String(s) => Self::Text(s.clone()),
            Value::Array(items) => {
                let parts: Vec<String> = items
                    .iter()
                    .map(|item| Self::from(item).display_string())
                    .collect();
                Self::Text(join_tokens(&parts))
            }
            Value::Object(_) => Self::Text(value.to_string()),
        }
    }
}

/// A row the grid can read cells from by column key.
pub trait TableRow {
    /// Returns the cell for `key`, or [`CellValue::Null`] when absent.
    fn cell(&self, key: &str) -> CellValue;
}

impl TableRow for Map<String, Value> {
    fn cell(&self, key: &str) -> CellValue {
        self.get(key).map_or(CellValue::Null, CellValue::from)
    }
}

impl TableRow for Value {
    fn cell(&self, key: &str) -> CellValue {
        self.get(key).map_or(CellValue::Null, CellValue::from)
    }
}
