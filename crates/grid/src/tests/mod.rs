// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod table_tests;

use serde_json::Value;

/// Builds rows from a JSON array literal.
pub fn rows(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        other => vec![other],
    }
}

/// Reads one field of each row as display text, in order.
pub fn column_of(rows: &[&Value], key: &str) -> Vec<String> {
    rows.iter()
        .map(|row| match row.get(key) {
            None | Some(Value::Null) => String::from("null"),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        })
        .collect()
}
