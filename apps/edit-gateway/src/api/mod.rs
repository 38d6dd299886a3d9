// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use crate::{
    error::ErrorBody,
    models::{
        ChangeRecord, EditOutcome, EditRequest, EditResponse, EditStatus, PingResponse,
        RejectedChange, RejectionReason,
    },
    state::AppState,
    transform::EditPayload,
    workspace::{CommitRecord, CommitStatus},
};

pub mod cors;
pub mod edit;
pub mod health;

pub fn router(state: AppState) -> Router {
    let edit_routes = Router::new()
        .route(
            "/edit-file",
            post(edit::edit_file).options(cors::preflight),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            cors::cors_middleware,
        ));

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        tracing::info_span!(
            "request",
            id = %Uuid::new_v4(),
            method = %request.method(),
            uri = %request.uri(),
        )
    });

    Router::new()
        .merge(edit_routes)
        .route("/ping", get(health::ping))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(ServiceBuilder::new().layer(trace))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::ping,
        edit::edit_file,
        cors::preflight
    ),
    components(
        schemas(
            EditRequest,
            ChangeRecord,
            EditPayload,
            EditResponse,
            EditStatus,
            EditOutcome,
            RejectedChange,
            RejectionReason,
            CommitRecord,
            CommitStatus,
            PingResponse,
            ErrorBody
        )
    ),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Edit", description = "Source file editing")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::test_state;
    use axum::{body::to_bytes, http::StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    #[tokio::test]
    async fn ping_needs_no_key() {
        let temp = TempDir::new().unwrap();
        let response = router(test_state(temp.path()))
            .oneshot(Request::get("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn openapi_document_lists_routes() {
        let temp = TempDir::new().unwrap();
        let response = router(test_state(temp.path()))
            .oneshot(
                Request::get("/api-doc/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(doc["paths"]["/edit-file"].is_object());
        assert!(doc["paths"]["/ping"]["get"].is_object());
    }
}
