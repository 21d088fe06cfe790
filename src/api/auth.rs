//! Bearer API key check.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use secrecy::ExposeSecret;
use tracing::warn;

use super::{ApiError, AppState};

/// Reject requests whose `Authorization: Bearer` token does not match the
/// configured key. Passes everything through when no key is configured.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.api_key.as_ref() else {
        return Ok(next.run(request).await);
    };

    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| token.trim() == expected.expose_secret());

    match authorized {
        Some(true) => Ok(next.run(request).await),
        Some(false) => {
            warn!(path = %request.uri().path(), "Rejected request with invalid API key");
            Err(ApiError::unauthorized())
        }
        None => {
            warn!(path = %request.uri().path(), "Rejected request without API key");
            Err(ApiError::unauthorized())
        }
    }
}
