//! HTTP API for hotspotd
//!
//! - `GET /`            single-page UI
//! - `GET /api/status`  current [`StatusSnapshot`]
//! - `POST /api/run`    `{"action": "start"|"stop"}`
//! - `GET /healthz`     liveness

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use hotspot_core::state::StatusSnapshot;
use hotspot_core::{ControlService, StatusService};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::error;

const INDEX_HTML: &str = include_str!("../static/index.html");

const INVALID_ACTION: &str = "action must be 'start' or 'stop'";

/// Application state shared across handlers
pub struct AppState {
    pub status: Arc<StatusService>,
    pub control: Arc<ControlService>,
}

type AppStateArc = Arc<AppState>;

#[derive(Debug, Deserialize)]
struct RunRequest {
    action: Option<String>,
}

#[derive(Debug, Serialize)]
struct RunResponse {
    ok: bool,
    action: String,
    exit_code: i32,
    stdout: String,
    stderr: String,
    status: StatusSnapshot,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    ok: bool,
    error: String,
}

fn error_response(code: StatusCode, message: impl Into<String>) -> Response {
    (
        code,
        Json(ErrorResponse {
            ok: false,
            error: message.into(),
        }),
    )
        .into_response()
}

/// Build the router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/status", get(api_status))
        .route("/api/run", post(api_run))
        .route("/healthz", get(healthz))
        .with_state(Arc::new(state))
        .layer(TraceLayer::new_for_http())
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn api_status(State(state): State<AppStateArc>) -> Json<StatusSnapshot> {
    Json(state.status.snapshot().await)
}

/// The body is parsed leniently: malformed JSON is treated as a missing
/// action so every bad request gets the same 400 payload.
async fn api_run(State(state): State<AppStateArc>, body: Bytes) -> Response {
    let Some(action) = serde_json::from_slice::<RunRequest>(&body)
        .ok()
        .and_then(|req| req.action)
    else {
        return error_response(StatusCode::BAD_REQUEST, INVALID_ACTION);
    };

    match state.control.run(&action).await {
        Ok(outcome) => Json(RunResponse {
            ok: outcome.accepted,
            action: outcome.action.to_string(),
            exit_code: outcome.output.exit_code,
            stdout: outcome.output.stdout,
            stderr: outcome.output.stderr,
            status: outcome.snapshot,
        })
        .into_response(),
        Err(e) if e.is_invalid_input() => error_response(StatusCode::BAD_REQUEST, INVALID_ACTION),
        Err(e) => {
            error!("Control request failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
