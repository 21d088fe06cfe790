//! Route handlers.

use axum::{Json, extract::State, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use super::{ApiError, AppState};
use crate::error::InputError;
use crate::mail::MailMessage;
use crate::threading::{ClassificationContext, MergePolicy, Thread, ThreadCollection};

// ── Health ──────────────────────────────────────────────────────────────

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "app_name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now(),
    }))
}

// ── Classification ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    /// Single-source messages, or the inbox half of a two-source request.
    #[serde(default)]
    pub messages: Option<Vec<MailMessage>>,
    /// Sent items. When present they act as the anchor set.
    #[serde(default)]
    pub sent_messages: Option<Vec<MailMessage>>,
    #[serde(default)]
    pub current_user: Vec<String>,
    /// Keep only conversations seen among `sent_messages`.
    #[serde(default)]
    pub anchor_only: bool,
}

pub async fn classify(
    State(state): State<AppState>,
    Json(body): Json<ClassifyRequest>,
) -> Result<Json<ThreadCollection>, ApiError> {
    let ctx = ClassificationContext::now(&body.current_user)?;

    let collection = match (body.messages, body.sent_messages) {
        (None, None) => return Err(InputError::MissingMessages.into()),
        (Some(messages), None) => state.engine.classify_messages(messages, &ctx),
        (inbox, Some(sent)) => state.engine.classify_sources(
            sent,
            inbox.unwrap_or_default(),
            MergePolicy::from_anchor_only(body.anchor_only),
            &ctx,
        ),
    };

    Ok(Json(collection))
}

// ── Worklists ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    pub conversations: Vec<Thread>,
    /// Owner of the worklist. Required by the nudging filter.
    #[serde(default)]
    pub current_user: Vec<String>,
    /// Instant the nudging window is measured from. Defaults to now.
    #[serde(default)]
    pub evaluation_time: Option<DateTime<Utc>>,
}

pub async fn needs_reply(
    State(state): State<AppState>,
    Json(body): Json<FilterRequest>,
) -> Json<ThreadCollection> {
    let filtered = state.engine.needs_reply(&body.conversations);
    debug!(
        input = body.conversations.len(),
        kept = filtered.total_conversations(),
        "Needs-reply filter applied"
    );
    Json(filtered)
}

pub async fn needs_nudging(
    State(state): State<AppState>,
    Json(body): Json<FilterRequest>,
) -> Result<Json<ThreadCollection>, ApiError> {
    let ctx = ClassificationContext::new(
        &body.current_user,
        body.evaluation_time.unwrap_or_else(Utc::now),
    )?;
    let filtered = state.engine.needs_nudging(&body.conversations, &ctx);
    debug!(
        input = body.conversations.len(),
        kept = filtered.total_conversations(),
        "Needs-nudging filter applied"
    );
    Ok(Json(filtered))
}
