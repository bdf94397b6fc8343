// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

use accademia_api::{
    ApiError, BootstrapAdminRequest, ChangePasswordRequest, CreateOperatorRequest,
    CreateOperatorResponse, ExportResponse, GridQuery, LedgerResponse, ListOperatorsResponse,
    ListRecordsResponse, LoginRequest, LoginResponse, MessageResponse, MutationResponse,
    PromoteQuoteRequest, PromoteQuoteResponse, QuoteRequest, QuoteResponse, RecordPaymentRequest,
    Section, SetOperatorDisabledRequest, WhoAmIResponse, bootstrap_first_admin, change_password,
    compute_quote, create_operator, create_record, delete_operator, delete_record, export_section,
    get_ledger, list_operators, list_records, login, logout, promote_quote,
    purge_expired_sessions, quote_from_member, record_payment, render_grid,
    set_operator_disabled, update_record, whoami,
};
use accademia_grid::{SortDirection, TableView};
use accademia_persistence::Persistence;
use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::{
        HeaderMap, StatusCode,
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::session::{SessionOperator, bearer_token};

/// Accademia Server - HTTP server for the dance academy administration backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// How many days a login session stays valid
    #[arg(long, default_value_t = 30)]
    session_days: i64,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The single store connection.
    persistence: Arc<Mutex<Persistence>>,
    /// Lifetime of new sessions.
    session_duration: time::Duration,
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    message: String,
    /// The offending field, for validation errors and conflicts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    field: Option<String>,
    /// Records still referring to the target of a refused delete.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    dependents: Vec<String>,
}

impl ErrorResponse {
    const fn new(message: String) -> Self {
        Self {
            error: true,
            message,
            field: None,
            dependents: Vec::new(),
        }
    }
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    status: StatusCode,
    body: ErrorResponse,
}

impl HttpError {
    const fn new(status: StatusCode, message: String) -> Self {
        Self {
            status,
            body: ErrorResponse::new(message),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let message: String = err.to_string();
        match err {
            ApiError::AuthenticationFailed { .. } => Self::new(StatusCode::UNAUTHORIZED, message),
            ApiError::Unauthorized { .. } => Self::new(StatusCode::FORBIDDEN, message),
            ApiError::InvalidInput { field, .. } => Self {
                status: StatusCode::BAD_REQUEST,
                body: ErrorResponse {
                    field: Some(field),
                    ..ErrorResponse::new(message)
                },
            },
            ApiError::PasswordPolicyViolation { .. } => Self::new(StatusCode::BAD_REQUEST, message),
            ApiError::ResourceNotFound { .. } => Self::new(StatusCode::NOT_FOUND, message),
            ApiError::Conflict {
                field, dependents, ..
            } => Self {
                status: StatusCode::CONFLICT,
                body: ErrorResponse {
                    error: true,
                    message,
                    field: Some(field),
                    dependents,
                },
            },
            ApiError::DomainRuleViolation { .. } => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
            }
            ApiError::Internal { .. } => {
                error!(error = %message, "Internal error");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        }
    }
}

/// Builds a grid query from `sort`, `direction` and `filter.<key>` parameters.
fn grid_query(params: &HashMap<String, String>) -> Result<GridQuery, HttpError> {
    let direction: Option<SortDirection> = params
        .get("direction")
        .map(|raw| raw.parse::<SortDirection>())
        .transpose()
        .map_err(|message| HttpError {
            status: StatusCode::BAD_REQUEST,
            body: ErrorResponse {
                field: Some(String::from("direction")),
                ..ErrorResponse::new(message)
            },
        })?;
    let filters: BTreeMap<String, String> = params
        .iter()
        .filter_map(|(name, text)| {
            name.strip_prefix("filter.")
                .map(|key| (key.to_string(), text.clone()))
        })
        .collect();
    Ok(GridQuery {
        sort: params.get("sort").cloned(),
        direction,
        filters,
    })
}

fn parse_section(raw: &str) -> Result<Section, HttpError> {
    raw.parse::<Section>().map_err(HttpError::from)
}

// ========================================================================
// Authentication and operators
// ========================================================================

/// Handler for POST `/auth/bootstrap`.
async fn handle_bootstrap(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<BootstrapAdminRequest>,
) -> Result<Json<CreateOperatorResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(bootstrap_first_admin(&mut persistence, &req)?))
}

/// Handler for POST `/auth/login`.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    info!(login_name = %req.login_name, "Handling login request");
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(login(
        &mut persistence,
        &req,
        app_state.session_duration,
    )?))
}

/// Handler for POST `/auth/logout`.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    SessionOperator(actor, _): SessionOperator,
) -> Result<Json<MessageResponse>, Response> {
    let token: &str = bearer_token(&headers).map_err(IntoResponse::into_response)?;
    let mut persistence = app_state.persistence.lock().await;
    logout(&mut persistence, &actor, token)
        .map(Json)
        .map_err(|e| HttpError::from(e).into_response())
}

/// Handler for GET `/auth/whoami`.
async fn handle_whoami(SessionOperator(actor, operator): SessionOperator) -> Json<WhoAmIResponse> {
    Json(whoami(&actor, &operator))
}

/// Handler for POST `/auth/password`.
async fn handle_change_password(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(change_password(
        &mut persistence,
        &actor,
        &operator,
        &req,
    )?))
}

/// Handler for GET `/operators`.
async fn handle_list_operators(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, operator): SessionOperator,
) -> Result<Json<ListOperatorsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_operators(&mut persistence, &actor, &operator)?))
}

/// Handler for POST `/operators`.
async fn handle_create_operator(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _): SessionOperator,
    Json(req): Json<CreateOperatorRequest>,
) -> Result<Json<CreateOperatorResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(create_operator(&mut persistence, &actor, req)?))
}

/// Handler for DELETE `/operators/{id}`.
async fn handle_delete_operator(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _): SessionOperator,
    Path(operator_id): Path<i64>,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(delete_operator(&mut persistence, &actor, operator_id)?))
}

/// Handler for PUT `/operators/{id}/disabled`.
async fn handle_set_operator_disabled(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _): SessionOperator,
    Path(operator_id): Path<i64>,
    Json(req): Json<SetOperatorDisabledRequest>,
) -> Result<Json<MessageResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(set_operator_disabled(
        &mut persistence,
        &actor,
        operator_id,
        req,
    )?))
}

// ========================================================================
// Sections
// ========================================================================

/// Handler for GET `/{section}`.
async fn handle_list_records(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _): SessionOperator,
    Path(section): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ListRecordsResponse>, HttpError> {
    let section: Section = parse_section(&section)?;
    let query: GridQuery = grid_query(&params)?;
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_records(&mut persistence, &actor, section, &query)?))
}

/// Handler for GET `/log`.
async fn handle_list_log(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _): SessionOperator,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ListRecordsResponse>, HttpError> {
    let query: GridQuery = grid_query(&params)?;
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_records(
        &mut persistence,
        &actor,
        Section::OperationsLog,
        &query,
    )?))
}

/// Handler for POST `/{section}`.
async fn handle_create_record(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _): SessionOperator,
    Path(section): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<MutationResponse>, HttpError> {
    let section: Section = parse_section(&section)?;
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(create_record(
        &mut persistence,
        &actor,
        section,
        payload,
    )?))
}

/// Handler for PUT `/{section}/{id}`.
async fn handle_update_record(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _): SessionOperator,
    Path((section, id)): Path<(String, i64)>,
    Json(payload): Json<Value>,
) -> Result<Json<MutationResponse>, HttpError> {
    let section: Section = parse_section(&section)?;
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(update_record(
        &mut persistence,
        &actor,
        section,
        id,
        payload,
    )?))
}

/// Handler for DELETE `/{section}/{id}`.
async fn handle_delete_record(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _): SessionOperator,
    Path((section, id)): Path<(String, i64)>,
) -> Result<Json<MutationResponse>, HttpError> {
    let section: Section = parse_section(&section)?;
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(delete_record(&mut persistence, &actor, section, id)?))
}

/// Handler for GET `/grid/{section}`.
async fn handle_render_grid(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _): SessionOperator,
    Path(section): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<TableView>, HttpError> {
    let section: Section = parse_section(&section)?;
    let query: GridQuery = grid_query(&params)?;
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(render_grid(&mut persistence, &actor, section, &query)?))
}

/// Handler for GET `/export/{section}`.
async fn handle_export(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _): SessionOperator,
    Path(section): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, HttpError> {
    let section: Section = parse_section(&section)?;
    let query: GridQuery = grid_query(&params)?;
    let mut persistence = app_state.persistence.lock().await;
    let export: ExportResponse = export_section(&mut persistence, &actor, section, &query)?;
    Ok((
        [
            (CONTENT_TYPE, String::from("text/csv; charset=utf-8")),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.file_name),
            ),
        ],
        export.content,
    )
        .into_response())
}

// ========================================================================
// Payments
// ========================================================================

/// Only the members section has a payments ledger.
fn require_members(section: &str) -> Result<(), HttpError> {
    if parse_section(section)? == Section::Members {
        Ok(())
    } else {
        Err(HttpError::new(
            StatusCode::NOT_FOUND,
            format!("Section '{section}' has no payments"),
        ))
    }
}

/// Handler for GET `/members/{id}/payments`.
async fn handle_get_ledger(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _): SessionOperator,
    Path((section, member_id)): Path<(String, i64)>,
) -> Result<Json<LedgerResponse>, HttpError> {
    require_members(&section)?;
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(get_ledger(&mut persistence, &actor, member_id)?))
}

/// Handler for POST `/members/{id}/payments`.
async fn handle_record_payment(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _): SessionOperator,
    Path((section, member_id)): Path<(String, i64)>,
    Json(req): Json<RecordPaymentRequest>,
) -> Result<Json<MutationResponse>, HttpError> {
    require_members(&section)?;
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(record_payment(
        &mut persistence,
        &actor,
        member_id,
        req,
    )?))
}

// ========================================================================
// Quotes
// ========================================================================

/// Handler for POST `/quote`.
async fn handle_compute_quote(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _): SessionOperator,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(compute_quote(&mut persistence, &actor, &req)?))
}

/// Handler for GET `/quote/member/{id}`.
async fn handle_quote_from_member(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _): SessionOperator,
    Path(member_id): Path<i64>,
) -> Result<Json<QuoteResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(quote_from_member(&mut persistence, &actor, member_id)?))
}

/// Handler for POST `/quote/promote`.
async fn handle_promote_quote(
    AxumState(app_state): AxumState<AppState>,
    SessionOperator(actor, _): SessionOperator,
    Json(req): Json<PromoteQuoteRequest>,
) -> Result<Json<PromoteQuoteResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(promote_quote(&mut persistence, &actor, req)?))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/auth/bootstrap", post(handle_bootstrap))
        .route("/auth/login", post(handle_login))
        .route("/auth/logout", post(handle_logout))
        .route("/auth/whoami", get(handle_whoami))
        .route("/auth/password", post(handle_change_password))
        .route(
            "/operators",
            get(handle_list_operators).post(handle_create_operator),
        )
        .route("/operators/{id}", delete(handle_delete_operator))
        .route(
            "/operators/{id}/disabled",
            put(handle_set_operator_disabled),
        )
        .route("/quote", post(handle_compute_quote))
        .route("/quote/member/{id}", get(handle_quote_from_member))
        .route("/quote/promote", post(handle_promote_quote))
        .route("/log", get(handle_list_log))
        .route("/export/{section}", get(handle_export))
        .route("/grid/{section}", get(handle_render_grid))
        .route(
            "/{section}",
            get(handle_list_records).post(handle_create_record),
        )
        .route(
            "/{section}/{id}",
            put(handle_update_record).delete(handle_delete_record),
        )
        .route(
            "/{section}/{id}/payments",
            get(handle_get_ledger).post(handle_record_payment),
        )
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Accademia Server");

    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };
    purge_expired_sessions(&mut persistence)?;

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        session_duration: time::Duration::days(args.session_days),
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
