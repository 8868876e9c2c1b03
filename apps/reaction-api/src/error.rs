//! Error types for the reaction-time API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reaction_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let ApiError::Core(e) = &self;

        let message = match e {
            CoreError::MissingUser => {
                tracing::warn!("Rejected submission without user identifier");
                "No user".to_string()
            }
            CoreError::InvalidInput(msg) => {
                tracing::warn!("Rejected submission: {}", msg);
                format!("Invalid data: {}", msg)
            }
            CoreError::Referential(user_id) => {
                tracing::error!("Sample written for unknown user: {}", user_id);
                "Internal error".to_string()
            }
            CoreError::Storage(e) => {
                tracing::error!("Database error: {}", e);
                "Database error".to_string()
            }
        };

        let body = Json(json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
