//! HTTP surface for the threading engine.

pub mod auth;
pub mod handlers;

use std::sync::Arc;

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use secrecy::SecretString;
use tower_http::cors::CorsLayer;

use crate::error::InputError;
use crate::threading::ThreadingEngine;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ThreadingEngine>,
    /// Bearer token for `/api/*` routes (None disables the check).
    pub api_key: Option<SecretString>,
}

/// Build the Axum router with health and conversation routes.
pub fn api_routes(engine: Arc<ThreadingEngine>, api_key: Option<SecretString>) -> Router {
    let state = AppState { engine, api_key };

    let protected = Router::new()
        .route("/api/conversations/classify", post(handlers::classify))
        .route("/api/conversations/needs-reply", post(handlers::needs_reply))
        .route("/api/conversations/needs-nudging", post(handlers::needs_nudging))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(protected)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── Errors ──────────────────────────────────────────────────────────────

/// Error body: `{"error", "detail", "status_code"}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: &'static str,
    detail: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: &'static str, detail: impl Into<String>) -> Self {
        Self {
            status,
            error,
            detail: Some(detail.into()),
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            error: "unauthorized",
            detail: Some("Invalid API key".into()),
        }
    }
}

impl From<InputError> for ApiError {
    fn from(err: InputError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_input", err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({
                "error": self.error,
                "detail": self.detail,
                "status_code": self.status.as_u16(),
            })),
        )
            .into_response()
    }
}
