// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! `POST /edit-file`: apply visual edits to project source files.
//!
//! The API key is checked before the body is read. Each logical file is then
//! processed on its own: a rejected file never blocks the others, and a file
//! is either fully rewritten or not touched at all.
//!
//! Per file: validate name, resolve, sandbox, lock, read, transform,
//! backup/write, audit commit.

use std::fs;
use std::path::PathBuf;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde_json::Value;
use thiserror::Error;

use crate::{
    auth::ApiKey,
    error::{ApiError, ErrorBody},
    models::{
        group_changes, ChangeGroup, ChangeRecord, EditOutcome, EditRequest, EditResponse,
        RejectedChange, RejectionReason,
    },
    state::AppState,
    transform::{transform, SourceLanguage, TransformError},
    workspace::{
        self, resolver::target_exists, validate_file_name, validate_target, ReplaceOutcome,
        WorkspaceError,
    },
};

/// Failure of a single file group.
#[derive(Debug, Error)]
enum FileError {
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    /// A blocking task panicked or was cancelled.
    #[error("file task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[utoipa::path(
    post,
    path = "/edit-file",
    tag = "Edit",
    request_body = EditRequest,
    params(
        ("x-api-key" = String, Header, description = "Shared API key")
    ),
    responses(
        (status = 200, description = "Per-file results", body = EditResponse),
        (status = 400, description = "No changes or malformed change", body = ErrorBody),
        (status = 401, description = "Missing or wrong API key", body = ErrorBody),
        (status = 500, description = "Unexpected internal failure", body = ErrorBody)
    )
)]
pub async fn edit_file(
    _key: ApiKey,
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<EditResponse>, ApiError> {
    let changes = parse_changes(body)?;
    let groups = group_changes(changes);
    tracing::info!(files = groups.len(), "Processing edit request");

    let mut edits = Vec::new();
    let mut rejected = Vec::new();

    for group in groups {
        let file_name = group.file_name.clone();
        match process_group(&state, group).await {
            Ok(outcome) => edits.push(outcome),
            Err(FileError::Task(e)) => {
                tracing::error!(file_name = %file_name, error = %e, "File task failed");
                return Err(ApiError::internal(format!(
                    "Internal error while processing {file_name}"
                )));
            }
            Err(e) => {
                let reason = match &e {
                    FileError::Workspace(e) => RejectionReason::from(e),
                    FileError::Transform(e) => RejectionReason::from(e),
                    FileError::Task(_) => RejectionReason::IoError,
                };
                tracing::warn!(file_name = %file_name, ?reason, error = %e, "Change rejected");
                rejected.push(RejectedChange::new(file_name, reason, &e));
            }
        }
    }

    let response = EditResponse::new(edits, rejected);
    tracing::info!(
        status = ?response.status,
        applied = response.edits.len(),
        rejected = response.rejected_changes.len(),
        "Edit request finished"
    );
    Ok(Json(response))
}

/// Validate the request body shape and decode each change.
fn parse_changes(body: Result<Json<Value>, JsonRejection>) -> Result<Vec<ChangeRecord>, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Unreadable edit request body");
        ApiError::no_changes()
    })?;

    let items = match body.get("changes").and_then(Value::as_array) {
        Some(items) if !items.is_empty() => items,
        _ => return Err(ApiError::no_changes()),
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<ChangeRecord>(item.clone())
                .map_err(|e| ApiError::bad_request(format!("Invalid change at index {index}: {e}")))
        })
        .collect()
}

async fn process_group(state: &AppState, group: ChangeGroup) -> Result<EditOutcome, FileError> {
    let file_name = group.file_name.clone();
    validate_file_name(&file_name)?;

    let paths = state.paths.clone();
    let name = file_name.clone();
    let resolved = tokio::task::spawn_blocking(move || workspace::resolve(&paths, &name)).await?;

    let mut warnings = Vec::new();
    if resolved.is_ambiguous() {
        if state.config.strict_resolution {
            return Err(WorkspaceError::Conflict {
                file_name,
                candidates: resolved.candidates,
            }
            .into());
        }
        warnings.push(format!(
            "{} files are named {file_name}; edited {}",
            resolved.candidates,
            state.paths.display_path(&resolved.path)
        ));
    }

    let target = validate_target(state.paths.root(), &resolved.path, &file_name)?;
    let language = SourceLanguage::from_path(&target).ok_or_else(|| {
        TransformError::UnsupportedLanguage {
            path: target.clone(),
        }
    })?;
    let shown_path = state.paths.display_path(&target);

    let _guard = state.locks.acquire(&target).await;

    let write_target = target.clone();
    let missing = shown_path.clone();
    let (applied, written) = tokio::task::spawn_blocking(move || {
        rewrite_file(write_target, language, &group, missing)
    })
    .await??;

    tracing::info!(
        file_name = %file_name,
        path = %shown_path,
        applied,
        bytes = written.bytes_written,
        backed_up = written.backed_up,
        "File rewritten"
    );
    let commit = state.committer.commit(&target).await;

    Ok(EditOutcome {
        file_name,
        path: shown_path,
        changes_applied: applied,
        warnings,
        commit,
    })
}

/// Read, transform and replace one file. Returns the number of edits applied
/// and what the replacement did.
fn rewrite_file(
    target: PathBuf,
    language: SourceLanguage,
    group: &ChangeGroup,
    shown_path: String,
) -> Result<(usize, ReplaceOutcome), FileError> {
    if !target_exists(&target) {
        return Err(WorkspaceError::NotFound { path: shown_path }.into());
    }
    let source =
        fs::read_to_string(&target).map_err(|e| WorkspaceError::io("read", &target, e))?;

    let transformed = transform(language, &source, &group.edit_refs())?;
    let written = workspace::replace(&target, &transformed.output)?;
    Ok((transformed.applied, written))
}
