// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Filterable, sortable data grid.
//!
//! Rows are any type implementing [`TableRow`]; JSON objects work out of
//! the box. A [`DataTable`] holds the column schema together with the
//! user's per-column filters and single-column sort, and derives the
//! visible rows from scratch on every call.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod column;
mod export;
mod sort;
mod table;
mod value;

#[cfg(test)]
mod tests;

pub use column::{Column, ColumnFormat};
pub use export::{ExportError, export_csv};
pub use sort::{SortDirection, SortKey, SortState, compare_cells, compare_keys, normalize};
pub use table::{DEFAULT_EMPTY_MESSAGE, DataTable, RenderedRow, RowAction, TableView};
pub use value::{CellValue, TableRow};
