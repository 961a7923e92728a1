//! # API REST
//!
//! REST API for the triage relay.
//!
//! Handles:
//! - HTTP endpoints with axum (`/diagnostico`, `/seguimiento`, `/health`)
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON errors, CORS, client allow-listing)
//!
//! Uses `api-shared` for wire types and `triage-core` for the pipeline.

#![warn(rust_2018_idioms)]

pub mod error;
pub mod middleware;

use std::net::IpAddr;

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tracing::Instrument;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use api_shared::{
    DiagnosisRes, ErrorDetail, ErrorRes, FollowUpRes, HealthRes, HealthService, SymptomsReq,
};
use triage_core::{SymptomReport, TriageService};

pub use error::ApiError;

/// Application state shared across REST API handlers.
///
/// Built once at startup. Holds no mutable state, so requests never contend.
#[derive(Clone)]
pub struct AppState {
    pub triage: TriageService,
    /// When set, only this client address may call the triage endpoints.
    pub allowed_ip: Option<IpAddr>,
}

impl AppState {
    pub fn new(triage: TriageService, allowed_ip: Option<IpAddr>) -> Self {
        Self { triage, allowed_ip }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, diagnostico, seguimiento),
    components(schemas(
        HealthRes,
        SymptomsReq,
        DiagnosisRes,
        FollowUpRes,
        ErrorRes,
        ErrorDetail
    ))
)]
pub struct ApiDoc;

/// Build the REST router.
///
/// Triage routes sit behind the client allow-list; `/health` and the API docs do not.
pub fn router(state: AppState) -> Router {
    let triage_routes = Router::new()
        .route("/diagnostico", post(diagnostico))
        .route("/seguimiento", post(seguimiento))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_allowed_ip,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(triage_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Returns the current health status of the triage service. It does not contact the upstream
/// model.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/diagnostico",
    request_body = SymptomsReq,
    responses(
        (status = 200, description = "Priority label", body = DiagnosisRes),
        (status = 400, description = "Bad request", body = ErrorRes),
        (status = 415, description = "Body is not JSON", body = ErrorRes),
        (status = 422, description = "Body does not match the schema", body = ErrorRes),
        (status = 403, description = "Client not allowed", body = ErrorRes),
        (status = 502, description = "Upstream unavailable (propagate policy only)", body = ErrorRes)
    )
)]
/// Classify symptoms into a triage priority
///
/// Sends the symptoms to the language model and extracts a `PRIORIDAD <n>` label from its
/// answer. Under the default fallback policy an upstream failure yields `PRIORIDAD I`.
///
/// # Errors
/// Returns `400 Bad Request` for an empty symptom list or invalid JSON, `415`/`422` for a body
/// axum cannot extract, and `502 Bad Gateway` when the upstream fails and the failure policy is
/// `propagate`.
#[axum::debug_handler]
async fn diagnostico(
    State(state): State<AppState>,
    payload: Result<Json<SymptomsReq>, JsonRejection>,
) -> Result<Json<DiagnosisRes>, ApiError> {
    let span = tracing::info_span!("diagnostico", request_id = %Uuid::new_v4());
    run_diagnosis(state, payload).instrument(span).await
}

async fn run_diagnosis(
    state: AppState,
    payload: Result<Json<SymptomsReq>, JsonRejection>,
) -> Result<Json<DiagnosisRes>, ApiError> {
    let Json(req) = payload?;
    let report = SymptomReport::new(req.sintomas, req.operacion)?;
    tracing::info!(
        symptoms = report.symptoms().len(),
        with_procedure = report.procedure().is_some(),
        "diagnosis requested"
    );

    let label = state.triage.diagnose(&report).await?;
    tracing::info!(diagnostico = %label, "diagnosis served");

    Ok(Json(DiagnosisRes {
        diagnostico: label.into_string(),
    }))
}

#[utoipa::path(
    post,
    path = "/seguimiento",
    request_body = SymptomsReq,
    responses(
        (status = 200, description = "Post-operative recommendations", body = FollowUpRes),
        (status = 400, description = "Bad request", body = ErrorRes),
        (status = 415, description = "Body is not JSON", body = ErrorRes),
        (status = 422, description = "Body does not match the schema", body = ErrorRes),
        (status = 403, description = "Client not allowed", body = ErrorRes),
        (status = 502, description = "Upstream unavailable", body = ErrorRes)
    )
)]
/// Request post-operative recommendations
///
/// Returns the language model's text unparsed.
///
/// # Errors
/// Returns `400 Bad Request` for invalid input, `415`/`422` for a body axum cannot extract, and
/// `502 Bad Gateway` when the upstream call fails or its answer has no text.
#[axum::debug_handler]
async fn seguimiento(
    State(state): State<AppState>,
    payload: Result<Json<SymptomsReq>, JsonRejection>,
) -> Result<Json<FollowUpRes>, ApiError> {
    let span = tracing::info_span!("seguimiento", request_id = %Uuid::new_v4());
    run_follow_up(state, payload).instrument(span).await
}

async fn run_follow_up(
    state: AppState,
    payload: Result<Json<SymptomsReq>, JsonRejection>,
) -> Result<Json<FollowUpRes>, ApiError> {
    let Json(req) = payload?;
    let report = SymptomReport::new(req.sintomas, req.operacion)?;
    tracing::info!(
        symptoms = report.symptoms().len(),
        with_procedure = report.procedure().is_some(),
        "follow-up requested"
    );

    let recomendaciones = state.triage.follow_up(&report).await?;
    tracing::info!(chars = recomendaciones.chars().count(), "follow-up served");

    Ok(Json(FollowUpRes { recomendaciones }))
}
