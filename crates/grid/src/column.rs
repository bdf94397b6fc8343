// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::value::CellValue;
use accademia_domain::format::{display_date, display_datetime, format_currency, parse_amount};
use serde::{Deserialize, Serialize};

/// How a column's cells are shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnFormat {
    #[default]
    Text,
    /// Euro amount, e.g. `€ 1.234,50`.
    Currency,
    /// `dd/mm/yyyy`.
    Date,
    /// `dd/mm/yyyy - hh:mm`.
    DateTime,
    /// "Sì" / "No".
    Boolean,
}

/// A column of the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Row field the column reads.
    pub key: String,
    /// Header text.
    pub label: String,
    pub format: ColumnFormat,
}

impl Column {
    /// Creates a plain text column.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            format: ColumnFormat::Text,
        }
    }

    /// Sets the display format.
    #[must_use]
    pub const fn with_format(mut self, format: ColumnFormat) -> Self {
        self.format = format;
        self
    }

    /// Formats a cell of this column for display.
    #[must_use]
    pub fn render(&self, value: &CellValue) -> String {
        match (self.format, value) {
            (_, CellValue::Null) => String::new(),
            (ColumnFormat::Currency, CellValue::Number(n)) => format_currency(*n),
            (ColumnFormat::Currency, CellValue::Text(t)) => {
                parse_amount(t).map_or_else(|| t.clone(), format_currency)
            }
            (ColumnFormat::Date, CellValue::Text(t)) => display_date(t),
            (ColumnFormat::DateTime, CellValue::Text(t)) => display_datetime(t),
            (ColumnFormat::Boolean, CellValue::Bool(b)) => yes_no(*b),
            (ColumnFormat::Boolean, CellValue::Number(n)) => yes_no(*n != 0.0),
            _ => value.display_string(),
        }
    }
}

fn yes_no(value: bool) -> String {
    String::from(if value { "Sì" } else { "No" })
}
