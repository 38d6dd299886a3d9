// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Origin-gated CORS headers for the edit endpoint.
//!
//! Allowed origins get their own value echoed back on every response,
//! including errors. Anything else gets no access-control headers at all, and
//! its preflight is answered with 403.
//!
//! ```rust,ignore
//! Router::new()
//!     .route("/edit-file", post(edit_file).options(preflight))
//!     .route_layer(axum::middleware::from_fn_with_state(state.clone(), cors_middleware));
//! ```

use axum::{
    extract::{Request, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, ORIGIN, VARY,
        },
        HeaderMap, HeaderValue, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::state::AppState;

/// Request headers an allowed origin may send.
pub const ALLOWED_HEADERS: &str = "Content-Type, x-api-key";

/// Methods advertised in preflight responses.
pub const ALLOWED_METHODS: &str = "POST, OPTIONS";

/// The request's `Origin`, if present, valid UTF-8 and allowed.
fn allowed_origin(state: &AppState, headers: &HeaderMap) -> Option<HeaderValue> {
    let origin = headers.get(ORIGIN)?;
    state
        .origins
        .is_allowed(origin.to_str().ok())
        .then(|| origin.clone())
}

/// Attach CORS headers to every response for an allowed origin.
pub async fn cors_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let origin = allowed_origin(&state, request.headers());
    let mut response = next.run(request).await;

    if let Some(origin) = origin {
        let headers = response.headers_mut();
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );
        headers.append(VARY, HeaderValue::from_static("Origin"));
    }
    response
}

/// `OPTIONS /edit-file` preflight handler.
#[utoipa::path(
    options,
    path = "/edit-file",
    tag = "Edit",
    params(
        ("Origin" = String, Header, description = "Requesting origin")
    ),
    responses(
        (status = 200, description = "Origin allowed"),
        (status = 403, description = "Origin not allowed")
    )
)]
pub async fn preflight(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match allowed_origin(&state, &headers) {
        Some(_) => (
            StatusCode::OK,
            [(
                ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ALLOWED_METHODS),
            )],
        )
            .into_response(),
        None => {
            tracing::debug!(
                origin = ?headers.get(ORIGIN),
                "Rejected preflight from disallowed origin"
            );
            StatusCode::FORBIDDEN.into_response()
        }
    }
}
