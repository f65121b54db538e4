//! HTTP gateway (Axum) for the prediction engine.
//!
//! This module is primarily used by the `clinicast` server binary.

pub mod error;
pub mod handler;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::GatewayError;
pub use handler::{classification_predict_handler, cost_predict_handler};
pub use state::HandlerState;

/// Response header carrying the engine's view of the request outcome.
pub const CLINICAST_STATUS_HEADER: &str = "x-clinicast-status";
pub const STATUS_OK: &str = "ok";
pub const STATUS_PARTIAL: &str = "partial";
pub const STATUS_READY: &str = "ready";

pub fn create_router_with_state(state: HandlerState) -> Router {
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler))
        .route("/api/cost/predict", post(cost_predict_handler))
        .route(
            "/api/classification/predict",
            post(classification_predict_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub engine: &'static str,
    pub artifact_mode: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(CLINICAST_STATUS_HEADER, HeaderValue::from_static(STATUS_OK));

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

/// Readiness is unconditional once the process serves traffic: every table
/// and artifact loaded eagerly at boot, or the process never started. The
/// payload still reports whether artifacts are real or stubs.
#[tracing::instrument(skip(state))]
pub async fn ready_handler(State(state): State<HandlerState>) -> Response {
    let components = ComponentStatus {
        http: STATUS_READY,
        engine: STATUS_READY,
        artifact_mode: state.artifact_mode.as_str(),
    };

    let mut headers = HeaderMap::new();
    headers.insert(CLINICAST_STATUS_HEADER, HeaderValue::from_static(STATUS_OK));

    (
        StatusCode::OK,
        headers,
        Json(ReadyResponse {
            status: "ok",
            components,
        }),
    )
        .into_response()
}
