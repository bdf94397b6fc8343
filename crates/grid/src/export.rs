// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::column::Column;
use crate::table::DataTable;
use crate::value::TableRow;
use csv::WriterBuilder;

/// Errors raised while writing a spreadsheet export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write CSV record: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV output: {0}")]
    Flush(String),
}

/// Writes the table's visible rows as CSV, one column per grid column.
///
/// Cells use the same formatting as the grid. Values that a spreadsheet
/// would evaluate as a formula are prefixed with `'`.
///
/// # Errors
///
/// Returns an error if a record cannot be written.
pub fn export_csv<R: TableRow>(table: &DataTable, rows: &[R]) -> Result<Vec<u8>, ExportError> {
    let mut writer = WriterBuilder::new().delimiter(b';').from_writer(Vec::new());

    writer.write_record(table.columns().iter().map(|c| c.label.as_str()))?;
    for row in table.view(rows) {
        let record: Vec<String> = table
            .columns()
            .iter()
            .map(|column: &Column| harden(column.render(&row.cell(&column.key))))
            .collect();
        writer.write_record(&record)?;
    }

    writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))
}

fn harden(cell: String) -> String {
    let risky: bool = match cell.chars().next() {
        Some('=' | '+' | '@' | '\t' | '\r') => true,
        Some('-') => !cell[1..].starts_with(|c: char| c.is_ascii_digit()),
        _ => false,
    };
    if risky { format!("'{cell}") } else { cell }
}
