// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the shared API key.
//!
//! Place `ApiKey` before any body extractor so the credential is checked
//! before the request body is read:
//!
//! ```rust,ignore
//! async fn my_handler(_key: ApiKey, body: Json<Value>) -> impl IntoResponse {
//!     // only reached with a valid x-api-key
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, Secret};
use crate::state::AppState;

/// Request header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Proof that the request presented the configured API key.
#[derive(Debug)]
pub struct ApiKey;

impl FromRequestParts<AppState> for ApiKey {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(API_KEY_HEADER)
            .ok_or(AuthError::MissingApiKey)?
            .to_str()
            .map_err(|_| AuthError::MalformedApiKey)?;

        verify_api_key(state.secret.as_deref(), presented)?;
        Ok(ApiKey)
    }
}

/// Check a presented key against the loaded secret.
pub fn verify_api_key(secret: Option<&Secret>, presented: &str) -> Result<(), AuthError> {
    let secret = secret.ok_or(AuthError::SecretUnavailable)?;
    if secret.matches(presented) {
        Ok(())
    } else {
        Err(AuthError::InvalidApiKey)
    }
}
