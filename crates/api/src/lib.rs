// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary of the Accademia administration backend.
//!
//! Handlers here are transport-agnostic: they take the store, the
//! authenticated actor and typed requests, and return typed responses or
//! an [`ApiError`]. The HTTP server maps both onto the wire.

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

mod auth;
mod capabilities;
mod error;
mod handlers;
mod password_policy;
mod request_response;
mod sections;

#[cfg(test)]
mod tests;

pub use auth::{
    AuthenticatedActor, AuthenticationService, AuthorizationService, Role, WriteAction,
};
pub use capabilities::{
    compute_global_capabilities, compute_operator_capabilities, row_action_visible,
};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{
    bootstrap_first_admin, build_table, change_password, compute_quote, create_operator,
    create_record, delete_operator, delete_record, export_section, get_ledger, list_operators,
    list_records, login, logout, promote_quote, purge_expired_sessions, quote_from_member,
    record_payment, render_grid, set_operator_disabled, update_pricing_tier, update_record,
    whoami,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    BootstrapAdminRequest, Capability, ChangePasswordRequest, CreateOperatorRequest,
    CreateOperatorResponse, ExportResponse, GlobalCapabilities, GridQuery, LedgerResponse,
    ListOperatorsResponse, ListRecordsResponse, LoginRequest, LoginResponse, MessageResponse,
    MutationResponse, OperatorCapabilities, OperatorInfo, PromoteQuoteRequest,
    PromoteQuoteResponse, QuoteRequest, QuoteResponse, RecordPaymentRequest,
    SetOperatorDisabledRequest, UpdatePricingTierRequest, WhoAmIResponse,
};
pub use sections::{
    ACTION_DELETE, ACTION_EDIT, ACTION_PAYMENTS, ACTION_QUOTE, Section, catalog_rows, log_rows,
};
