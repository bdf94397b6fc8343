// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use accademia_audit::OperationType;
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::data_models::OperationLogRecord;
use crate::diesel_schema::operation_log;
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = operation_log)]
struct OperationLogRow {
    entry_id: i64,
    operator_name: String,
    operator_role: String,
    operation: String,
    list_name: String,
    element_description: String,
    created_at: String,
}

/// Lists the operations log, newest entry first.
///
/// # Errors
///
/// Returns an error if the query fails or a stored operation is unknown.
pub fn list_operation_log(
    conn: &mut SqliteConnection,
) -> Result<Vec<OperationLogRecord>, PersistenceError> {
    debug!("Listing operations log");

    let rows: Vec<OperationLogRow> = operation_log::table
        .order(operation_log::entry_id.desc())
        .select(OperationLogRow::as_select())
        .load(conn)?;

    rows.into_iter()
        .map(|row| -> Result<OperationLogRecord, PersistenceError> {
            let operation: OperationType = row
                .operation
                .parse()
                .map_err(|e| PersistenceError::SerializationError(format!("{e}")))?;
            Ok(OperationLogRecord {
                entry_id: row.entry_id,
                operator_name: row.operator_name,
                operator_role: row.operator_role,
                operation,
                list_name: row.list_name,
                element_description: row.element_description,
                created_at: row.created_at,
            })
        })
        .collect()
}
