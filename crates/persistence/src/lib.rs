// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Record store for the Accademia administration backend.
//!
//! The store is a single `SQLite` database accessed through Diesel.
//! Migrations are embedded and run when the store is opened, and foreign
//! key enforcement is verified at startup.
//!
//! ## Records
//!
//! Catalog records (courses, categories, rooms, teachers, members,
//! membership types, pricing tiers, payments) are read together as a
//! [`Catalog`] snapshot and written as change sets produced by
//! `accademia::apply`. Each change set is one transaction.
//!
//! Collection-valued fields (course lessons, member courses, teacher
//! disciplines) are stored as JSON text columns.
//!
//! ## Constraint errors
//!
//! Uniqueness and foreign key violations surface as
//! [`PersistenceError::UniqueViolation`] and
//! [`PersistenceError::ForeignKeyViolation`], whose [`PersistenceError::code`]
//! is `"23505"` and `"23503"` respectively.
//!
//! ## Testing
//!
//! Every call to [`Persistence::new_in_memory`] gets its own shared
//! in-memory database, so tests never see each other's rows.

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

use accademia::{Catalog, Change};
use accademia_audit::{AuditError, AuditSink, OperationLogEntry};
use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod timestamps;

#[cfg(test)]
mod tests;

pub use data_models::{OperationLogRecord, OperatorData, SessionData};
pub use error::{FOREIGN_KEY_VIOLATION_CODE, PersistenceError, UNIQUE_VIOLATION_CODE};
pub use timestamps::{format_timestamp, parse_timestamp};

/// Persistence adapter over one `SQLite` connection.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::initialize_database(&shared_memory_url)?;
        backend::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::initialize_database(path_str)?;
        backend::enable_wal_mode(&mut conn)?;
        backend::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Catalog
    // ========================================================================

    /// Loads every catalog record.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails or a stored row cannot be decoded.
    pub fn load_catalog(&mut self) -> Result<Catalog, PersistenceError> {
        queries::catalog::load_catalog(&mut self.conn)
    }

    /// Applies a change set atomically.
    ///
    /// Returns the id each change touched, in order.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the store untouched, if any change fails.
    pub fn apply_changes(&mut self, changes: &[Change]) -> Result<Vec<i64>, PersistenceError> {
        mutations::records::apply_changes(&mut self.conn, changes)
    }

    // ========================================================================
    // Operations log
    // ========================================================================

    /// Appends an entry to the operations log.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn append_operation_log(
        &mut self,
        entry: &OperationLogEntry,
    ) -> Result<i64, PersistenceError> {
        mutations::operation_log::append_operation_log(&mut self.conn, entry)
    }

    /// Lists the operations log, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_operation_log(&mut self) -> Result<Vec<OperationLogRecord>, PersistenceError> {
        queries::operation_log::list_operation_log(&mut self.conn)
    }

    // ========================================================================
    // Operators
    // ========================================================================

    /// Creates a new operator with a bcrypt-hashed password.
    ///
    /// # Errors
    ///
    /// Returns an error if the operator cannot be created.
    pub fn create_operator(
        &mut self,
        login_name: &str,
        display_name: &str,
        password: &str,
        role: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::operators::create_operator(
            &mut self.conn,
            login_name,
            display_name,
            password,
            role,
        )
    }

    /// Retrieves an operator by login name, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_operator_by_login(
        &mut self,
        login_name: &str,
    ) -> Result<Option<OperatorData>, PersistenceError> {
        queries::operators::get_operator_by_login(&mut self.conn, login_name)
    }

    /// Retrieves an operator by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_operator_by_id(
        &mut self,
        operator_id: i64,
    ) -> Result<Option<OperatorData>, PersistenceError> {
        queries::operators::get_operator_by_id(&mut self.conn, operator_id)
    }

    /// Lists all operators.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_operators(&mut self) -> Result<Vec<OperatorData>, PersistenceError> {
        queries::operators::list_operators(&mut self.conn)
    }

    /// Counts the total number of operators.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_operators(&mut self) -> Result<i64, PersistenceError> {
        queries::operators::count_operators(&mut self.conn)
    }

    /// Counts the enabled operators with the Admin role.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_active_admin_operators(&mut self) -> Result<i64, PersistenceError> {
        queries::operators::count_active_admin_operators(&mut self.conn)
    }

    /// Records a successful login.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn update_last_login(&mut self, operator_id: i64) -> Result<(), PersistenceError> {
        mutations::operators::update_last_login(&mut self.conn, operator_id)
    }

    /// Disables or re-enables an operator. Disabling ends their sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the operator does not exist or the update fails.
    pub fn set_operator_disabled(
        &mut self,
        operator_id: i64,
        disabled: bool,
    ) -> Result<(), PersistenceError> {
        mutations::operators::set_operator_disabled(&mut self.conn, operator_id, disabled)
    }

    /// Deletes an operator and their sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the operator does not exist or the delete fails.
    pub fn delete_operator(&mut self, operator_id: i64) -> Result<(), PersistenceError> {
        mutations::operators::delete_operator(&mut self.conn, operator_id)
    }

    /// Verifies a password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the hash cannot be read.
    pub fn verify_password(
        &self,
        password: &str,
        password_hash: &str,
    ) -> Result<bool, PersistenceError> {
        queries::operators::verify_password(password, password_hash)
    }

    /// Replaces an operator's password and ends their sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_password(
        &mut self,
        operator_id: i64,
        new_password: &str,
    ) -> Result<(), PersistenceError> {
        mutations::operators::update_password(&mut self.conn, operator_id, new_password)
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Creates a new session for an operator.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be created.
    pub fn create_session(
        &mut self,
        session_token: &str,
        operator_id: i64,
        expires_at: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        mutations::operators::create_session(&mut self.conn, session_token, operator_id, expires_at)
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::operators::get_session_by_token(&mut self.conn, session_token)
    }

    /// Updates the last activity timestamp for a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub fn update_session_activity(&mut self, session_id: i64) -> Result<(), PersistenceError> {
        mutations::operators::update_session_activity(&mut self.conn, session_id)
    }

    /// Deletes a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::operators::delete_session(&mut self.conn, session_token)
    }

    /// Deletes all expired sessions, returning how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_expired_sessions(&mut self) -> Result<usize, PersistenceError> {
        mutations::operators::delete_expired_sessions(&mut self.conn)
    }
}

impl AuditSink for Persistence {
    fn append(&mut self, entry: &OperationLogEntry) -> Result<(), AuditError> {
        self.append_operation_log(entry)
            .map(|_| ())
            .map_err(|e| AuditError::Sink(e.to_string()))
    }
}
