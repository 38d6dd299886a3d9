// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::ErrorBody;

/// Authentication error type.
///
/// Every variant maps to the same opaque `401 Unauthorized` response; the
/// variant is only used for server-side logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No secret was loaded at startup
    SecretUnavailable,
    /// No `x-api-key` header present
    MissingApiKey,
    /// Header value is not visible ASCII
    MalformedApiKey,
    /// Header value does not match the secret
    InvalidApiKey,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::SecretUnavailable => "secret_unavailable",
            AuthError::MissingApiKey => "missing_api_key",
            AuthError::MalformedApiKey => "malformed_api_key",
            AuthError::InvalidApiKey => "invalid_api_key",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::SecretUnavailable => write!(f, "No API secret is configured"),
            AuthError::MissingApiKey => write!(f, "x-api-key header is required"),
            AuthError::MalformedApiKey => write!(f, "x-api-key header is not valid text"),
            AuthError::InvalidApiKey => write!(f, "x-api-key does not match"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::debug!(error_code = self.error_code(), "Rejected edit request: {self}");
        let body = Json(ErrorBody {
            error: "Unauthorized".to_string(),
        });
        (self.status_code(), body).into_response()
    }
}
