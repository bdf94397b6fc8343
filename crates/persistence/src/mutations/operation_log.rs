// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use accademia_audit::OperationLogEntry;
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::backend::get_last_insert_rowid;
use crate::diesel_schema::operation_log;
use crate::error::PersistenceError;
use crate::timestamps::now_timestamp;

/// Appends one entry to the operations log.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn append_operation_log(
    conn: &mut SqliteConnection,
    entry: &OperationLogEntry,
) -> Result<i64, PersistenceError> {
    let now: String = now_timestamp()?;
    diesel::insert_into(operation_log::table)
        .values((
            operation_log::operator_name.eq(&entry.actor.name),
            operation_log::operator_role.eq(&entry.actor.role),
            operation_log::operation.eq(entry.operation.as_str()),
            operation_log::list_name.eq(&entry.list_name),
            operation_log::element_description.eq(&entry.element_description),
            operation_log::created_at.eq(&now),
        ))
        .execute(conn)?;

    let entry_id: i64 = get_last_insert_rowid(conn)?;
    debug!(
        entry_id,
        operation = entry.operation.as_str(),
        list = %entry.list_name,
        "Recorded operation"
    );
    Ok(entry_id)
}
