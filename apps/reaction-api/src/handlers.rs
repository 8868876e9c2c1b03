//! HTTP handlers for the reaction-time API

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Response},
    Json,
};
use reaction_core::{Error, GlobalStats, SubmissionResult};
use std::sync::Arc;

use crate::error::ApiError;
use crate::identity;
use crate::models::SubmitRequest;
use crate::state::AppState;

const INDEX_HTML: &str = include_str!("index.html");

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Serve the test page, issuing a user identifier on first visit
pub async fn index(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let user_id = match identity::user_id_from_headers(&headers) {
        Some(id) => id,
        None => {
            let id = identity::new_user_id();
            tracing::info!("Issuing identifier to new visitor: {}", id);
            id
        }
    };

    // Also covers a known cookie whose user row was lost, e.g. a fresh database
    state.engine.ensure_user(&user_id).await?;

    let cookie = identity::session_cookie(&user_id, state.cookie_max_age_secs);
    Ok(([(header::SET_COOKIE, cookie)], Html(INDEX_HTML)).into_response())
}

/// Population statistics over per-user means
pub async fn global_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GlobalStats>, ApiError> {
    Ok(Json(state.engine.global_stats().await?))
}

/// Record one reaction time and return the caller's updated standing
pub async fn submit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Json<SubmissionResult>, ApiError> {
    let Json(req) = body.map_err(|e| Error::InvalidInput(e.body_text()))?;
    let time = req.time()?;
    let user_id = identity::user_id_from_headers(&headers);

    let result = state.engine.submit(user_id.as_deref(), time).await?;

    tracing::info!(
        "Recorded sample for {}: {} trials, percentile {:.1}",
        user_id.as_deref().unwrap_or_default(),
        result.count,
        result.percentile
    );

    Ok(Json(result))
}
