//! HTTP server
//!
//! Routes:
//! - `GET  /health` - liveness check
//! - `GET  /team-data` - stored document, verbatim
//! - `POST /generate-sprint-plan` - remote plan, or fallback plan on failure
//! - `POST /update-team-data` - replace the stored document
//!
//! CORS is open to any origin.

use crate::config::AppConfig;
use crate::error::PlannerError;
use crate::planner::{generate_plan, DeepSeekClient, PlanRequestor, PlanSource};
use crate::store::TeamDataStore;
use crate::Result;
use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// Response Models
// =============================================================================

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
}

/// Body of a successful `/generate-sprint-plan` call
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    pub success: bool,
    pub data: Value,
    pub generated_at: String,
    pub source: PlanSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

// =============================================================================
// Application State
// =============================================================================

/// State shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: TeamDataStore,
    pub requestor: Arc<dyn PlanRequestor>,
}

impl AppState {
    pub fn new(store: TeamDataStore, requestor: Arc<dyn PlanRequestor>) -> Self {
        Self { store, requestor }
    }

    /// Build the production state: file store plus DeepSeek client
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = DeepSeekClient::new(config.deepseek.clone(), config.ai.clone())
            .context("Failed to build DeepSeek client")?;
        Ok(Self::new(
            TeamDataStore::new(&config.server.data_file),
            Arc::new(client),
        ))
    }
}

// =============================================================================
// Server Startup
// =============================================================================

/// Build the router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/team-data", get(get_team_data))
        .route("/generate-sprint-plan", post(generate_sprint_plan))
        .route("/update-team-data", post(update_team_data))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Bind the configured address and serve until the process exits
pub async fn start_server(config: &AppConfig) -> Result<()> {
    let state = AppState::from_config(config)?;
    let app = build_router(state);

    let addr = (config.server.host.as_str(), config.server.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.server.host, config.server.port))?;
    let local = listener.local_addr()?;

    tracing::info!(
        addr = %local,
        data_file = %config.server.data_file.display(),
        model = %config.deepseek.model,
        "sprint planner listening"
    );
    if config.deepseek.api_key.is_empty() {
        tracing::warn!("no DeepSeek API key configured; every plan will use the fallback planner");
    }

    axum::serve(listener, app).await?;
    Ok(())
}

// =============================================================================
// Handlers
// =============================================================================

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

async fn get_team_data(State(state): State<AppState>) -> Response {
    match state.store.load_document().await {
        Ok(document) => Json(document).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
            .into_response(),
    }
}

async fn generate_sprint_plan(State(state): State<AppState>) -> Response {
    let document = match state.store.load_document().await {
        Ok(document) => document,
        Err(e) => return failure(StatusCode::INTERNAL_SERVER_ERROR, &e),
    };

    match generate_plan(state.requestor.as_ref(), &document).await {
        Ok(outcome) => Json(PlanResponse {
            success: true,
            data: outcome.plan,
            generated_at: chrono::Utc::now().to_rfc3339(),
            source: outcome.source,
            note: outcome.note,
        })
        .into_response(),
        Err(e @ PlannerError::InvalidInput(_)) => failure(StatusCode::BAD_REQUEST, &e),
        Err(e) => failure(StatusCode::INTERNAL_SERVER_ERROR, &e),
    }
}

async fn update_team_data(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Response {
    let Json(document) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return failure(rejection.status(), rejection.body_text()),
    };

    match state.store.replace(&document).await {
        Ok(()) => Json(json!({
            "success": true,
            "message": "Team data updated successfully"
        }))
        .into_response(),
        Err(e) => failure(StatusCode::INTERNAL_SERVER_ERROR, &e),
    }
}

/// `{success: false, error}` with the given status
fn failure(status: StatusCode, err: impl std::fmt::Display) -> Response {
    tracing::error!(status = status.as_u16(), error = %err, "request failed");
    (
        status,
        Json(json!({ "success": false, "error": err.to_string() })),
    )
        .into_response()
}
