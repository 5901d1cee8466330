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

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use escala_api::{
    ApiError, AvailabilityOverviewResponse, DeleteScheduleResponse, GenerateScheduleRequest,
    GenerateScheduleResponse, MemberSearchResponse, PeriodParseError, PublishScheduleRequest,
    PublishScheduleResponse, RecordAvailabilityRequest, RecordAvailabilityResponse,
    ScheduleByPeriodResponse, ScheduleRosterResponse, SetAssignmentLockRequest,
    SetAssignmentLockResponse, WarningInfo,
    delete_schedule_by_period, generate_schedule, get_availability_overview,
    get_schedule_by_period, get_schedule_roster, parse_force_flag, parse_period_param,
    publish_schedule, record_availability, regenerate_schedule, search_member_assignments,
    set_assignment_lock,
};
use escala_domain::SchedulePeriod;
use escala_persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Escala Server - HTTP server for the volunteer roster generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// IP address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: IpAddr,
}

/// Application state shared across handlers.
///
/// The single `SQLite` connection sits behind a Mutex, so requests that
/// touch the database are handled one at a time.
#[derive(Clone)]
struct AppState {
    persistence: Arc<Mutex<Persistence>>,
}

/// Query parameters for the period-scoped routes.
#[derive(Debug, Default, Deserialize)]
struct PeriodQuery {
    /// The period as `YYYY-MM`.
    month: Option<String>,
    /// `1` or `true` allows incomplete rosters.
    force: Option<String>,
}

impl PeriodQuery {
    fn period(&self) -> Result<SchedulePeriod, HttpError> {
        parse_period_param(self.month.as_deref()).map_err(HttpError::from)
    }
}

/// Query parameters for the member search.
#[derive(Debug, Default, Deserialize)]
struct SearchQuery {
    term: Option<String>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
    /// Unfilled slots, present only on incomplete-availability rejections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<WarningInfo>>,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    status: StatusCode,
    message: String,
    warnings: Option<Vec<WarningInfo>>,
}

impl HttpError {
    const fn new(status: StatusCode, message: String) -> Self {
        Self {
            status,
            message,
            warnings: None,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
            warnings: self.warnings,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::DuplicateSchedule { .. } => Self::new(StatusCode::CONFLICT, err.to_string()),
            ApiError::IncompleteAvailability { message, warnings } => Self {
                status: StatusCode::CONFLICT,
                message,
                warnings: Some(warnings),
            },
            ApiError::InvalidInput { .. } => Self::new(StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::ResourceNotFound { .. } => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            ApiError::DomainRuleViolation { .. } => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
            ApiError::LoadFailed { .. } | ApiError::Internal { .. } => {
                error!(error = %err, "Request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        }
    }
}

impl From<PeriodParseError> for HttpError {
    fn from(err: PeriodParseError) -> Self {
        Self::from(ApiError::from(err))
    }
}

/// Reads an optional generation body; an empty body means all defaults.
///
/// The `force` query flag overrides an absent or false `force` in the body.
fn generation_request(body: &Bytes, query: &PeriodQuery) -> Result<GenerateScheduleRequest, HttpError> {
    let mut request: GenerateScheduleRequest = if body.iter().all(u8::is_ascii_whitespace) {
        GenerateScheduleRequest::default()
    } else {
        serde_json::from_slice(body).map_err(|e| {
            HttpError::new(StatusCode::BAD_REQUEST, format!("Invalid request body: {e}"))
        })?
    };
    if parse_force_flag(query.force.as_deref()) {
        request.allow_incomplete = true;
    }
    Ok(request)
}

/// Handler for POST `/schedules/generate` endpoint.
///
/// Creates the roster for a month that has none yet.
async fn handle_generate(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<PeriodQuery>,
    body: Bytes,
) -> Result<Json<GenerateScheduleResponse>, HttpError> {
    let period: SchedulePeriod = query.period()?;
    let request: GenerateScheduleRequest = generation_request(&body, &query)?;
    info!(
        month = period.month(),
        year = period.year(),
        ministry = ?request.ministry,
        force = request.allow_incomplete,
        "Handling generate_schedule request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: GenerateScheduleResponse = generate_schedule(
        &mut persistence,
        &period,
        &request,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/schedules/regenerate` endpoint.
async fn handle_regenerate(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<PeriodQuery>,
    body: Bytes,
) -> Result<Json<GenerateScheduleResponse>, HttpError> {
    let period: SchedulePeriod = query.period()?;
    let request: GenerateScheduleRequest = generation_request(&body, &query)?;
    info!(
        month = period.month(),
        year = period.year(),
        ministry = ?request.ministry,
        preserve_locked = request.preserve_locked,
        "Handling regenerate_schedule request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: GenerateScheduleResponse =
        regenerate_schedule(&mut persistence, &period, &request)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/schedules/by-period` endpoint.
async fn handle_get_by_period(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<ScheduleByPeriodResponse>, HttpError> {
    let period: SchedulePeriod = query.period()?;
    info!(period = %period, "Handling get_schedule_by_period request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ScheduleByPeriodResponse = get_schedule_by_period(&mut persistence, &period)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for DELETE `/schedules/by-period` endpoint.
async fn handle_delete_by_period(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<DeleteScheduleResponse>, HttpError> {
    let period: SchedulePeriod = query.period()?;
    info!(period = %period, "Handling delete_schedule request");

    let mut persistence = app_state.persistence.lock().await;
    let response: DeleteScheduleResponse = delete_schedule_by_period(&mut persistence, &period)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/schedules/publish` endpoint.
async fn handle_publish(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<PublishScheduleRequest>,
) -> Result<Json<PublishScheduleResponse>, HttpError> {
    info!(schedule_run_id = req.id, "Handling publish_schedule request");

    let mut persistence = app_state.persistence.lock().await;
    let response: PublishScheduleResponse =
        publish_schedule(&mut persistence, req.id, OffsetDateTime::now_utc())?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/schedules/{id}` endpoint.
///
/// Returns the run summary and its roster rows.
async fn handle_get_roster(
    AxumState(app_state): AxumState<AppState>,
    Path(schedule_run_id): Path<i64>,
) -> Result<Json<ScheduleRosterResponse>, HttpError> {
    info!(schedule_run_id, "Handling get_schedule_roster request");

    let mut persistence = app_state.persistence.lock().await;
    let response: ScheduleRosterResponse = get_schedule_roster(&mut persistence, schedule_run_id)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/assignments/{id}/lock` endpoint.
async fn handle_set_lock(
    AxumState(app_state): AxumState<AppState>,
    Path(assignment_id): Path<i64>,
    Json(req): Json<SetAssignmentLockRequest>,
) -> Result<Json<SetAssignmentLockResponse>, HttpError> {
    info!(
        assignment_id,
        locked = req.locked,
        "Handling set_assignment_lock request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: SetAssignmentLockResponse =
        set_assignment_lock(&mut persistence, assignment_id, req.locked)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for POST `/availabilities` endpoint.
async fn handle_record_availability(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<RecordAvailabilityRequest>,
) -> Result<Json<RecordAvailabilityResponse>, HttpError> {
    info!(
        member_id = req.member_id,
        celebration_id = req.celebration_id,
        available = req.available,
        "Handling record_availability request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: RecordAvailabilityResponse =
        record_availability(&mut persistence, &req, OffsetDateTime::now_utc())?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/availabilities/overview` endpoint.
async fn handle_availability_overview(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<AvailabilityOverviewResponse>, HttpError> {
    let period: SchedulePeriod = query.period()?;
    info!(period = %period, "Handling availability_overview request");

    let mut persistence = app_state.persistence.lock().await;
    let response: AvailabilityOverviewResponse =
        get_availability_overview(&mut persistence, &period)?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/members/search` endpoint.
///
/// Lists members whose name contains the term with their upcoming
/// assignments.
async fn handle_member_search(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<MemberSearchResponse>, HttpError> {
    info!(term = ?query.term, "Handling member_search request");

    let mut persistence = app_state.persistence.lock().await;
    let response: MemberSearchResponse = search_member_assignments(
        &mut persistence,
        query.term.as_deref(),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    Ok(Json(response))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/schedules/generate", post(handle_generate))
        .route("/schedules/regenerate", post(handle_regenerate))
        .route(
            "/schedules/by-period",
            get(handle_get_by_period).delete(handle_delete_by_period),
        )
        .route("/schedules/publish", post(handle_publish))
        .route("/schedules/{id}", get(handle_get_roster))
        .route("/assignments/{id}/lock", post(handle_set_lock))
        .route("/availabilities", post(handle_record_availability))
        .route("/availabilities/overview", get(handle_availability_overview))
        .route("/members/search", get(handle_member_search))
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

    info!("Initializing Escala Server");

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
    };

    let app: Router = build_router(app_state);

    let addr: SocketAddr = SocketAddr::new(args.bind, args.port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
