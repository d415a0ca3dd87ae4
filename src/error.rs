// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.
//!
//! Every error renders as a JSON notification body that the page shows as a
//! transient toast; none of them is fatal to the process.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Session token was rejected by the auth API")]
    TokenRejected,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Validation failed")]
    Validation(#[from] validator::ValidationErrors),

    #[error("{0} already in progress")]
    InFlight(&'static str),

    #[error("Auth API error: {0}")]
    AuthApi(String),

    #[error("Story API error: {0}")]
    StoryApi(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Message shown to the user when the session cookies are unusable.
    pub const RELOGIN_MESSAGE: &'static str = "Please log in again";

    /// Whether the error means the user has to log in again.
    pub fn requires_login(&self) -> bool {
        matches!(self, AppError::Unauthorized | AppError::TokenRejected)
    }

    /// Per-field validation messages, if this is a validation failure.
    pub fn field_errors(&self) -> Option<BTreeMap<String, Vec<String>>> {
        let AppError::Validation(errors) = self else {
            return None;
        };

        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("Invalid {}", field))
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();

        Some(fields)
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<BTreeMap<String, Vec<String>>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let fields = self.field_errors();
        let (status, error, details) = match &self {
            AppError::Unauthorized | AppError::TokenRejected => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                Some(Self::RELOGIN_MESSAGE.to_string()),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                Some("Invalid email/username or password".to_string()),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_failed", None),
            AppError::InFlight(_) => (StatusCode::CONFLICT, "in_progress", Some(self.to_string())),
            AppError::AuthApi(msg) => {
                tracing::warn!(error = %msg, "Auth API call failed");
                (StatusCode::BAD_GATEWAY, "auth_api_error", Some(msg.clone()))
            }
            AppError::StoryApi(msg) => {
                tracing::warn!(error = %msg, "Story API call failed");
                (StatusCode::BAD_GATEWAY, "story_api_error", Some(msg.clone()))
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
            fields,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
