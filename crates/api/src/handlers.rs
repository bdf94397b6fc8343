// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Every handler takes the store and the authenticated actor, checks the
//! actor's permissions first and then does its work. Successful writes
//! append an entry to the operations log; a failure to do so is logged
//! and otherwise ignored.

use accademia::{Catalog, Command, QuoteSelection, Transition, apply};
use accademia_audit::{OperationLogEntry, OperationType, record};
use accademia_domain::{Payment, QuoteBreakdown, Stored, summarize_ledger};
use accademia_grid::{DataTable, TableView, export_csv};
use accademia_persistence::{OperatorData, Persistence, PersistenceError, SessionData};
use serde::de::DeserializeOwned;
use serde_json::Value;
use time::Duration;
use tracing::{debug, info};

use crate::auth::{
    AuthenticatedActor, AuthenticationService, AuthorizationService, Role, WriteAction,
};
use crate::capabilities::{
    compute_global_capabilities, compute_operator_capabilities, row_action_visible,
};
use crate::error::{ApiError, translate_core_error, translate_persistence_error};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    BootstrapAdminRequest, ChangePasswordRequest, CreateOperatorRequest, CreateOperatorResponse,
    ExportResponse, GridQuery, LedgerResponse, ListOperatorsResponse, ListRecordsResponse,
    LoginRequest, LoginResponse, MessageResponse, MutationResponse, OperatorInfo,
    PromoteQuoteRequest, PromoteQuoteResponse, QuoteRequest, QuoteResponse, RecordPaymentRequest,
    SetOperatorDisabledRequest, UpdatePricingTierRequest, WhoAmIResponse,
};
use crate::sections::{Section, catalog_rows, log_rows};

/// List name of operator accounts in the operations log.
const OPERATORS_LIST: &str = "Operatori";

fn load_catalog(persistence: &mut Persistence) -> Result<Catalog, ApiError> {
    persistence.load_catalog().map_err(translate_persistence_error)
}

fn parse_payload<T: DeserializeOwned>(payload: Value) -> Result<T, ApiError> {
    serde_json::from_value(payload).map_err(|e| ApiError::InvalidInput {
        field: String::from("body"),
        message: e.to_string(),
    })
}

fn member_not_found(member_id: i64) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: String::from("Member"),
        message: format!("No member with id {member_id}"),
    }
}

fn operator_not_found(operator_id: i64) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: String::from("Operator"),
        message: format!("Operator with ID {operator_id} not found"),
    }
}

fn log_operator_event(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    operation: OperationType,
    description: String,
) {
    let entry: OperationLogEntry = OperationLogEntry::new(
        actor.to_audit_actor(),
        operation,
        String::from(OPERATORS_LIST),
        description,
    );
    record(persistence, &entry);
}

/// Applies a command against an already loaded catalog and writes the
/// resulting changes in one transaction.
fn commit(
    persistence: &mut Persistence,
    catalog: &Catalog,
    actor: &AuthenticatedActor,
    command: Command,
) -> Result<MutationResponse, ApiError> {
    let transition: Transition =
        apply(catalog, command, actor.to_audit_actor()).map_err(translate_core_error)?;
    let ids: Vec<i64> = persistence
        .apply_changes(&transition.changes)
        .map_err(translate_persistence_error)?;
    let id: i64 = ids.first().copied().ok_or_else(|| ApiError::Internal {
        message: String::from("The command produced no change"),
    })?;

    record(persistence, &transition.log_entry);

    let entry: &OperationLogEntry = &transition.log_entry;
    let cascaded: usize = ids.len().saturating_sub(1);
    info!(
        operator = %entry.actor.name,
        operation = %entry.operation,
        list = %entry.list_name,
        element = %entry.element_description,
        id,
        cascaded,
        "Applied change"
    );

    Ok(MutationResponse {
        id,
        cascaded,
        message: format!(
            "{} - {}: {}",
            entry.operation.label(),
            entry.list_name,
            entry.element_description
        ),
    })
}

fn execute(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    command: Command,
) -> Result<MutationResponse, ApiError> {
    let catalog: Catalog = load_catalog(persistence)?;
    commit(persistence, &catalog, actor, command)
}

// ========================================================================
// Grids
// ========================================================================

fn load_rows(persistence: &mut Persistence, section: Section) -> Result<Vec<Value>, ApiError> {
    if section == Section::OperationsLog {
        let entries = persistence
            .list_operation_log()
            .map_err(translate_persistence_error)?;
        return Ok(log_rows(&entries));
    }
    let catalog: Catalog = load_catalog(persistence)?;
    catalog_rows(section, &catalog)
}

fn require_column(table: &DataTable, key: &str, field: &str) -> Result<(), ApiError> {
    if table.columns().iter().any(|column| column.key == key) {
        Ok(())
    } else {
        Err(ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("Unknown column '{key}'"),
        })
    }
}

/// Builds the grid of a section with the requested filters and sort.
///
/// # Errors
///
/// Returns an error if a filter or the sort names a column the section
/// does not have.
pub fn build_table(section: Section, query: &GridQuery) -> Result<DataTable, ApiError> {
    let mut table: DataTable =
        DataTable::new(section.columns()).with_empty_message(section.empty_message());
    for (key, text) in &query.filters {
        require_column(&table, key, "filter")?;
        table.set_filter(key, text);
    }
    if let Some(key) = &query.sort {
        require_column(&table, key, "sort")?;
        table.set_sort(key, query.direction.unwrap_or_default());
    }
    Ok(table)
}

/// Lists the rows of a section after filtering and sorting.
///
/// Every role may read every section.
///
/// # Errors
///
/// Returns an error if the query names an unknown column or the store
/// cannot be read.
pub fn list_records(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    section: Section,
    query: &GridQuery,
) -> Result<ListRecordsResponse, ApiError> {
    let table: DataTable = build_table(section, query)?;
    let rows: Vec<Value> = load_rows(persistence, section)?;
    let visible: Vec<Value> = table.view(&rows).into_iter().cloned().collect();
    debug!(
        operator = %actor.login_name,
        section = %section,
        total = rows.len(),
        visible = visible.len(),
        "Listed records"
    );
    Ok(ListRecordsResponse {
        section: section.as_str().to_string(),
        total: rows.len(),
        rows: visible,
    })
}

/// Renders the grid of a section for display.
///
/// Cells are formatted per column. Row actions are limited to those the
/// actor's role may use. An empty result renders a single placeholder row.
///
/// # Errors
///
/// Returns an error if the query names an unknown column or the store
/// cannot be read.
pub fn render_grid(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    section: Section,
    query: &GridQuery,
) -> Result<TableView, ApiError> {
    let table: DataTable = build_table(section, query)?;
    let rows: Vec<Value> = load_rows(persistence, section)?;
    let role: Role = actor.role;
    Ok(table.render(&rows, &section.row_actions(), |_, action| {
        row_action_visible(role, section, &action.id)
    }))
}

/// Exports the filtered and sorted grid of a section as CSV.
///
/// The export is recorded in the operations log.
///
/// # Errors
///
/// Returns an error if the query names an unknown column, the store
/// cannot be read or the CSV cannot be written.
pub fn export_section(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    section: Section,
    query: &GridQuery,
) -> Result<ExportResponse, ApiError> {
    let table: DataTable = build_table(section, query)?;
    let rows: Vec<Value> = load_rows(persistence, section)?;
    let content: Vec<u8> = export_csv(&table, &rows).map_err(|e| ApiError::Internal {
        message: format!("Failed to export {section}: {e}"),
    })?;
    let exported: usize = table.view(&rows).len();

    let entry: OperationLogEntry = OperationLogEntry::new(
        actor.to_audit_actor(),
        OperationType::Export,
        section.list_name().to_string(),
        format!("{exported} righe"),
    );
    record(persistence, &entry);
    info!(operator = %actor.login_name, section = %section, rows = exported, "Exported section");

    Ok(ExportResponse {
        file_name: format!("{}.csv", section.as_str()),
        content,
    })
}

// ========================================================================
// Records
// ========================================================================

fn unsupported(section: Section, action: WriteAction) -> ApiError {
    ApiError::InvalidInput {
        field: String::from("section"),
        message: format!("Section '{section}' does not support {action:?}"),
    }
}

/// Creates a record in a catalog section from its JSON representation.
///
/// # Errors
///
/// Returns an error if:
/// - The actor may not create records in this section
/// - The section does not accept new records here
/// - The payload does not describe a valid record
/// - The name is already in use or a referenced record does not exist
pub fn create_record(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    section: Section,
    payload: Value,
) -> Result<MutationResponse, ApiError> {
    AuthorizationService::authorize_write(actor, section, WriteAction::Create)?;
    let command: Command = match section {
        Section::Courses => Command::CreateCourse {
            course: parse_payload(payload)?,
        },
        Section::Categories => Command::CreateCategory {
            category: parse_payload(payload)?,
        },
        Section::Rooms => Command::CreateRoom {
            room: parse_payload(payload)?,
        },
        Section::Teachers => Command::CreateTeacher {
            teacher: parse_payload(payload)?,
        },
        Section::Members => Command::CreateMember {
            member: parse_payload(payload)?,
        },
        Section::MembershipTypes => Command::CreateMembershipType {
            membership_type: parse_payload(payload)?,
        },
        Section::PricingTiers | Section::Payments | Section::OperationsLog => {
            return Err(unsupported(section, WriteAction::Create));
        }
    };
    execute(persistence, actor, command)
}

/// Replaces a record in a catalog section.
///
/// Renames of courses, rooms and categories are carried over to every
/// record referring to the old name, in the same transaction.
///
/// # Errors
///
/// Returns an error if:
/// - The actor may not edit records in this section
/// - The record does not exist
/// - The payload does not describe a valid record
/// - The new name is already in use or a referenced record does not exist
pub fn update_record(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    section: Section,
    id: i64,
    payload: Value,
) -> Result<MutationResponse, ApiError> {
    AuthorizationService::authorize_write(actor, section, WriteAction::Update)?;
    let command: Command = match section {
        Section::Courses => Command::UpdateCourse {
            id,
            course: parse_payload(payload)?,
        },
        Section::Categories => Command::UpdateCategory {
            id,
            category: parse_payload(payload)?,
        },
        Section::Rooms => Command::UpdateRoom {
            id,
            room: parse_payload(payload)?,
        },
        Section::Teachers => Command::UpdateTeacher {
            id,
            teacher: parse_payload(payload)?,
        },
        Section::Members => Command::UpdateMember {
            id,
            member: parse_payload(payload)?,
        },
        Section::MembershipTypes => Command::UpdateMembershipType {
            id,
            membership_type: parse_payload(payload)?,
        },
        Section::PricingTiers => {
            let request: UpdatePricingTierRequest = parse_payload(payload)?;
            return update_pricing_tier(persistence, actor, id, request);
        }
        Section::Payments | Section::OperationsLog => {
            return Err(unsupported(section, WriteAction::Update));
        }
    };
    execute(persistence, actor, command)
}

/// Deletes a record.
///
/// # Errors
///
/// Returns an error if:
/// - The actor may not delete records in this section
/// - The record does not exist
/// - Other records still refer to it; the error lists them
pub fn delete_record(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    section: Section,
    id: i64,
) -> Result<MutationResponse, ApiError> {
    AuthorizationService::authorize_write(actor, section, WriteAction::Delete)?;
    let command: Command = match section {
        Section::Courses => Command::DeleteCourse { id },
        Section::Categories => Command::DeleteCategory { id },
        Section::Rooms => Command::DeleteRoom { id },
        Section::Teachers => Command::DeleteTeacher { id },
        Section::Members => Command::DeleteMember { id },
        Section::MembershipTypes => Command::DeleteMembershipType { id },
        Section::Payments => Command::DeletePayment { id },
        Section::PricingTiers | Section::OperationsLog => {
            return Err(unsupported(section, WriteAction::Delete));
        }
    };
    execute(persistence, actor, command)
}

/// Changes the label and value of a pricing entry.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the entry does not
/// exist, or the value does not suit the entry's key.
pub fn update_pricing_tier(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    id: i64,
    request: UpdatePricingTierRequest,
) -> Result<MutationResponse, ApiError> {
    AuthorizationService::authorize_write(actor, Section::PricingTiers, WriteAction::Update)?;
    execute(
        persistence,
        actor,
        Command::UpdatePricingTier {
            id,
            description: request.description,
            value: request.value,
        },
    )
}

// ========================================================================
// Payments
// ========================================================================

/// Returns a member's payments with their season totals.
///
/// # Errors
///
/// Returns an error if the member does not exist or the store cannot be read.
pub fn get_ledger(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    member_id: i64,
) -> Result<LedgerResponse, ApiError> {
    let catalog: Catalog = load_catalog(persistence)?;
    let member = catalog
        .member(member_id)
        .ok_or_else(|| member_not_found(member_id))?;
    let payments: Vec<Stored<Payment>> = catalog
        .payments_of(member_id)
        .into_iter()
        .cloned()
        .collect();
    let records: Vec<Payment> = payments.iter().map(|p| p.record.clone()).collect();

    debug!(operator = %actor.login_name, member_id, payments = payments.len(), "Loaded ledger");
    Ok(LedgerResponse {
        member_id,
        member_name: member.record.full_name(),
        summary: summarize_ledger(&member.record, &records),
        payments,
    })
}

/// Records a payment for a member.
///
/// # Errors
///
/// Returns an error if the actor is not an admin, the member does not
/// exist, or the payment is invalid.
pub fn record_payment(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    member_id: i64,
    request: RecordPaymentRequest,
) -> Result<MutationResponse, ApiError> {
    AuthorizationService::authorize_write(actor, Section::Payments, WriteAction::Create)?;
    execute(
        persistence,
        actor,
        Command::RecordPayment {
            payment: request.into_payment(member_id),
        },
    )
}

// ========================================================================
// Quotes
// ========================================================================

/// Prices a selection of courses and offers.
///
/// Courses and membership types that do not exist contribute nothing.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn compute_quote(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &QuoteRequest,
) -> Result<QuoteResponse, ApiError> {
    let catalog: Catalog = load_catalog(persistence)?;
    let selection: QuoteSelection = request.to_selection();
    let breakdown: QuoteBreakdown = selection.compute(&catalog);
    debug!(
        operator = %actor.login_name,
        final_amount = breakdown.final_course_amount_rounded,
        "Computed quote"
    );
    Ok(QuoteResponse {
        selection,
        breakdown,
    })
}

/// Rebuilds the quote a member is currently paying.
///
/// # Errors
///
/// Returns an error if the member does not exist or the store cannot be read.
pub fn quote_from_member(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    member_id: i64,
) -> Result<QuoteResponse, ApiError> {
    let catalog: Catalog = load_catalog(persistence)?;
    let member = catalog
        .member(member_id)
        .ok_or_else(|| member_not_found(member_id))?;
    let selection: QuoteSelection = QuoteSelection::from_member(&member.record, &catalog);
    let breakdown: QuoteBreakdown = selection.compute(&catalog);
    debug!(operator = %actor.login_name, member_id, "Rebuilt quote from member");
    Ok(QuoteResponse {
        selection,
        breakdown,
    })
}

/// Writes a quote's courses and fees into a member.
///
/// With `member_id` the existing member is updated; otherwise a new
/// member is created from `member`.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is a Viewer
/// - Neither a member id nor member data is given
/// - The member does not exist
/// - The resulting member fails validation
pub fn promote_quote(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: PromoteQuoteRequest,
) -> Result<PromoteQuoteResponse, ApiError> {
    AuthorizationService::authorize_promote_quote(actor)?;
    let catalog: Catalog = load_catalog(persistence)?;
    let selection: QuoteSelection = request.quote.to_selection();
    let breakdown: QuoteBreakdown = selection.compute(&catalog);

    let command: Command = match (request.member_id, request.member) {
        (Some(id), _) => {
            let mut member = catalog
                .member(id)
                .ok_or_else(|| member_not_found(id))?
                .record
                .clone();
            selection.promote_into(&breakdown, &mut member);
            Command::UpdateMember { id, member }
        }
        (None, Some(mut member)) => {
            selection.promote_into(&breakdown, &mut member);
            Command::CreateMember { member }
        }
        (None, None) => {
            return Err(ApiError::InvalidInput {
                field: String::from("member"),
                message: String::from("Either member_id or member is required"),
            });
        }
    };

    let response: MutationResponse = commit(persistence, &catalog, actor, command)?;
    Ok(PromoteQuoteResponse {
        member_id: response.id,
        breakdown,
        message: response.message,
    })
}

// ========================================================================
// Authentication and operators
// ========================================================================

/// Creates the first admin of an empty installation.
///
/// # Errors
///
/// Returns an error if any operator already exists or the password does
/// not meet the policy.
pub fn bootstrap_first_admin(
    persistence: &mut Persistence,
    request: &BootstrapAdminRequest,
) -> Result<CreateOperatorResponse, ApiError> {
    let existing: i64 = persistence
        .count_operators()
        .map_err(translate_persistence_error)?;
    if existing > 0 {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("bootstrap_complete"),
            message: String::from("Operators already exist; log in as an admin instead"),
        });
    }

    PasswordPolicy::default().validate(
        &request.password,
        &request.password_confirmation,
        &request.login_name,
        &request.display_name,
    )?;

    let role: Role = Role::Admin;
    let operator_id: i64 = persistence
        .create_operator(
            &request.login_name,
            &request.display_name,
            &request.password,
            role.as_str(),
        )
        .map_err(translate_persistence_error)?;
    let operator: OperatorData = persistence
        .get_operator_by_id(operator_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| operator_not_found(operator_id))?;

    let actor: AuthenticatedActor = AuthenticatedActor::new(
        operator.operator_id,
        operator.login_name.clone(),
        operator.display_name.clone(),
        role,
    );
    log_operator_event(
        persistence,
        &actor,
        OperationType::Insert,
        format!("{} ({})", operator.login_name, role),
    );
    info!(login_name = %operator.login_name, "Created first admin");

    Ok(CreateOperatorResponse {
        operator_id,
        login_name: operator.login_name,
        display_name: operator.display_name,
        role: operator.role,
    })
}

/// Authenticates an operator and opens a session.
///
/// # Errors
///
/// Returns an error if the credentials are wrong or the operator is disabled.
pub fn login(
    persistence: &mut Persistence,
    request: &LoginRequest,
    session_duration: Duration,
) -> Result<LoginResponse, ApiError> {
    let (session_token, actor, operator): (String, AuthenticatedActor, OperatorData) =
        AuthenticationService::login(
            persistence,
            &request.login_name,
            &request.password,
            session_duration,
        )?;

    let session: SessionData = persistence
        .get_session_by_token(&session_token)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::Internal {
            message: String::from("Session not found after creation"),
        })?;

    log_operator_event(
        persistence,
        &actor,
        OperationType::Login,
        operator.login_name.clone(),
    );

    Ok(LoginResponse {
        session_token,
        login_name: operator.login_name,
        display_name: operator.display_name,
        role: operator.role,
        expires_at: session.expires_at,
    })
}

/// Ends the caller's session.
///
/// # Errors
///
/// Returns an error if the session cannot be deleted.
pub fn logout(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    session_token: &str,
) -> Result<MessageResponse, ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    log_operator_event(
        persistence,
        actor,
        OperationType::Logout,
        actor.login_name.clone(),
    );
    Ok(MessageResponse {
        message: String::from("Logged out"),
    })
}

/// Describes the caller and what they may do.
#[must_use]
pub fn whoami(actor: &AuthenticatedActor, operator: &OperatorData) -> WhoAmIResponse {
    WhoAmIResponse {
        login_name: operator.login_name.clone(),
        display_name: operator.display_name.clone(),
        role: operator.role.clone(),
        is_disabled: operator.is_disabled,
        capabilities: compute_global_capabilities(actor, operator),
    }
}

/// Removes sessions past their expiry, returning how many were removed.
///
/// # Errors
///
/// Returns an error if the store cannot be written.
pub fn purge_expired_sessions(persistence: &mut Persistence) -> Result<usize, ApiError> {
    let removed: usize = persistence
        .delete_expired_sessions()
        .map_err(translate_persistence_error)?;
    info!(removed, "Purged expired sessions");
    Ok(removed)
}

/// Creates an operator account.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an admin
/// - The role is not one of `Admin`, `Contributor`, `Viewer`
/// - The password does not meet the policy
/// - The login name is taken
pub fn create_operator(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: CreateOperatorRequest,
) -> Result<CreateOperatorResponse, ApiError> {
    AuthorizationService::authorize_manage_operators(actor)?;

    let role: Role = request
        .role
        .parse()
        .map_err(|_| ApiError::InvalidInput {
            field: String::from("role"),
            message: format!(
                "Invalid role: {}. Must be 'Admin', 'Contributor' or 'Viewer'",
                request.role
            ),
        })?;

    PasswordPolicy::default().validate(
        &request.password,
        &request.password_confirmation,
        &request.login_name,
        &request.display_name,
    )?;

    let operator_id: i64 = persistence
        .create_operator(
            &request.login_name,
            &request.display_name,
            &request.password,
            role.as_str(),
        )
        .map_err(|e| match e {
            PersistenceError::UniqueViolation(_) => ApiError::Conflict {
                field: String::from("login_name"),
                message: format!("Login name '{}' is already in use", request.login_name),
                dependents: Vec::new(),
            },
            other => translate_persistence_error(other),
        })?;

    let login_name: String = request.login_name.trim().to_uppercase();
    log_operator_event(
        persistence,
        actor,
        OperationType::Insert,
        format!("{login_name} ({role})"),
    );
    info!(operator = %actor.login_name, created = %login_name, %role, "Created operator");

    Ok(CreateOperatorResponse {
        operator_id,
        login_name,
        display_name: request.display_name,
        role: role.as_str().to_string(),
    })
}

/// Lists operator accounts with what the caller may do to each.
///
/// # Errors
///
/// Returns an error if the actor is not an admin or the store cannot be read.
pub fn list_operators(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    actor_operator: &OperatorData,
) -> Result<ListOperatorsResponse, ApiError> {
    AuthorizationService::authorize_manage_operators(actor)?;

    let operators: Vec<OperatorData> = persistence
        .list_operators()
        .map_err(translate_persistence_error)?;

    let infos: Result<Vec<OperatorInfo>, ApiError> = operators
        .into_iter()
        .map(|op| {
            let capabilities =
                compute_operator_capabilities(actor, actor_operator, &op, persistence)?;
            Ok(OperatorInfo {
                operator_id: op.operator_id,
                login_name: op.login_name,
                display_name: op.display_name,
                role: op.role,
                is_disabled: op.is_disabled,
                created_at: op.created_at,
                last_login_at: op.last_login_at,
                capabilities,
            })
        })
        .collect();

    Ok(ListOperatorsResponse { operators: infos? })
}

/// Fails when acting on `target` would leave no enabled admin, or when
/// the actor targets their own account.
fn guard_operator_change(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    target: &OperatorData,
) -> Result<(), ApiError> {
    if target.operator_id == actor.operator_id {
        return Err(ApiError::DomainRuleViolation {
            rule: String::from("not_self"),
            message: String::from("Operators cannot disable or delete their own account"),
        });
    }
    if target.role == Role::Admin.as_str() && !target.is_disabled {
        let active_admins: i64 = persistence
            .count_active_admin_operators()
            .map_err(translate_persistence_error)?;
        if active_admins <= 1 {
            return Err(ApiError::DomainRuleViolation {
                rule: String::from("last_active_admin"),
                message: String::from("Operation would leave the system without an active admin"),
            });
        }
    }
    Ok(())
}

/// Disables or re-enables an operator account.
///
/// Disabling ends the operator's sessions.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an admin
/// - The operator does not exist
/// - The actor targets their own account
/// - Disabling would leave no enabled admin
pub fn set_operator_disabled(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    operator_id: i64,
    request: SetOperatorDisabledRequest,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::authorize_manage_operators(actor)?;

    let target: OperatorData = persistence
        .get_operator_by_id(operator_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| operator_not_found(operator_id))?;
    if request.disabled {
        guard_operator_change(persistence, actor, &target)?;
    }

    persistence
        .set_operator_disabled(operator_id, request.disabled)
        .map_err(translate_persistence_error)?;

    let state: &str = if request.disabled {
        "disabilitato"
    } else {
        "riabilitato"
    };
    log_operator_event(
        persistence,
        actor,
        OperationType::Update,
        format!("{} {state}", target.login_name),
    );
    info!(operator = %actor.login_name, target = %target.login_name, disabled = request.disabled, "Changed operator state");

    Ok(MessageResponse {
        message: format!("Operator {} has been {state}", target.login_name),
    })
}

/// Deletes an operator account and its sessions.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an admin
/// - The operator does not exist
/// - The actor targets their own account
/// - The operator is the last enabled admin
pub fn delete_operator(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    operator_id: i64,
) -> Result<MessageResponse, ApiError> {
    AuthorizationService::authorize_manage_operators(actor)?;

    let target: OperatorData = persistence
        .get_operator_by_id(operator_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| operator_not_found(operator_id))?;
    guard_operator_change(persistence, actor, &target)?;

    persistence
        .delete_operator(operator_id)
        .map_err(translate_persistence_error)?;

    log_operator_event(
        persistence,
        actor,
        OperationType::Delete,
        target.login_name.clone(),
    );
    info!(operator = %actor.login_name, target = %target.login_name, "Deleted operator");

    Ok(MessageResponse {
        message: format!("Operator {} has been deleted", target.login_name),
    })
}

/// Changes the caller's own password and ends all of their sessions.
///
/// # Errors
///
/// Returns an error if the current password is wrong or the new one does
/// not meet the policy.
pub fn change_password(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    operator: &OperatorData,
    request: &ChangePasswordRequest,
) -> Result<MessageResponse, ApiError> {
    let current_valid: bool = persistence
        .verify_password(&request.current_password, &operator.password_hash)
        .map_err(translate_persistence_error)?;
    if !current_valid {
        return Err(ApiError::AuthenticationFailed {
            reason: String::from("Current password is incorrect"),
        });
    }

    PasswordPolicy::default().validate(
        &request.new_password,
        &request.new_password_confirmation,
        &operator.login_name,
        &operator.display_name,
    )?;

    persistence
        .update_password(operator.operator_id, &request.new_password)
        .map_err(translate_persistence_error)?;

    log_operator_event(
        persistence,
        actor,
        OperationType::Update,
        format!("{} password", operator.login_name),
    );

    Ok(MessageResponse {
        message: String::from("Password changed; please log in again"),
    })
}
