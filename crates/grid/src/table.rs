// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::column::Column;
use crate::sort::{SortDirection, SortState, compare_cells};
use crate::value::TableRow;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Message shown when there is nothing to display.
pub const DEFAULT_EMPTY_MESSAGE: &str = "Nessun dato disponibile";

/// An action offered on each data row (e.g. edit, delete).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowAction {
    /// Stable identifier the client dispatches on.
    pub id: String,
    pub label: String,
}

impl RowAction {
    /// Creates a row action.
    #[must_use]
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
        }
    }
}

/// A rendered table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderedRow {
    Data {
        cells: Vec<String>,
        actions: Vec<RowAction>,
    },
    /// Stands in for the data when nothing matches.
    Placeholder { message: String, colspan: usize },
}

/// Header and rows ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<RenderedRow>,
    pub sort: Option<SortState>,
}

/// Column schema plus the user's filter and sort choices.
///
/// The visible rows are always recomputed from the full row list, so the
/// same `DataTable` can be applied to freshly loaded data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTable {
    columns: Vec<Column>,
    filters: BTreeMap<String, String>,
    sort: Option<SortState>,
    empty_message: String,
}

impl DataTable {
    /// Creates a table with no filters and no sort.
    #[must_use]
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            filters: BTreeMap::new(),
            sort: None,
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
        }
    }

    /// Replaces the placeholder message.
    #[must_use]
    pub fn with_empty_message(mut self, message: &str) -> Self {
        self.empty_message = message.to_string();
        self
    }

    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    #[must_use]
    pub const fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    #[must_use]
    pub const fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    /// Sets the filter text of a column. An empty value removes the filter.
    pub fn set_filter(&mut self, key: &str, value: &str) {
        if value.is_empty() {
            self.filters.remove(key);
        } else {
            self.filters.insert(key.to_string(), value.to_string());
        }
    }

    /// Removes every filter.
    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    /// Sets the sort explicitly.
    pub fn set_sort(&mut self, key: &str, direction: SortDirection) {
        self.sort = Some(SortState {
            key: key.to_string(),
            direction,
        });
    }

    /// Handles a click on a column header.
    ///
    /// The same column flips between ascending and descending; a
    /// different column starts ascending.
    pub fn toggle_sort(&mut self, key: &str) {
        let direction: SortDirection = match &self.sort {
            Some(current) if current.key == key => current.direction.toggled(),
            _ => SortDirection::Asc,
        };
        self.set_sort(key, direction);
    }

    /// Returns whether a row passes every active filter.
    ///
    /// A filter keeps the row when the lowercased cell text contains the
    /// lowercased filter text; filters on different columns must all match.
    #[must_use]
    pub fn matches<R: TableRow>(&self, row: &R) -> bool {
        self.filters.iter().all(|(key, needle)| {
            needle.is_empty()
                || row
                    .cell(key)
                    .display_string()
                    .to_lowercase()
                    .contains(&needle.to_lowercase())
        })
    }

    /// The filtered and sorted rows, in display order.
    #[must_use]
    pub fn view<'a, R: TableRow>(&self, rows: &'a [R]) -> Vec<&'a R> {
        let mut visible: Vec<&'a R> = rows.iter().filter(|row| self.matches(*row)).collect();
        if let Some(sort) = &self.sort {
            visible.sort_by(|a, b| {
                compare_cells(&a.cell(&sort.key), &b.cell(&sort.key), sort.direction)
            });
        }
        visible
    }

    /// Renders the visible rows.
    ///
    /// Each data row carries the actions for which `visible` returns
    /// `true`. With nothing to show, a single placeholder row spanning
    /// every column is produced instead.
    #[must_use]
    pub fn render<R, F>(&self, rows: &[R], actions: &[RowAction], visible: F) -> TableView
    where
        R: TableRow,
        F: Fn(&R, &RowAction) -> bool,
    {
        let headers: Vec<String> = self.columns.iter().map(|c| c.label.clone()).collect();
        let mut rendered: Vec<RenderedRow> = self
            .view(rows)
            .into_iter()
            .map(|row| RenderedRow::Data {
                cells: self
                    .columns
                    .iter()
                    .map(|column| column.render(&row.cell(&column.key)))
                    .collect(),
                actions: actions
                    .iter()
                    .filter(|action| visible(row, action))
                    .cloned()
                    .collect(),
            })
            .collect();

        if rendered.is_empty() {
            rendered.push(RenderedRow::Placeholder {
                message: self.empty_message.clone(),
                colspan: self.columns.len(),
            });
        }

        TableView {
            headers,
            rows: rendered,
            sort: self.sort.clone(),
        }
    }
}
