// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies for the edit gateway. All types derive
//! `Serialize`/`Deserialize` and `ToSchema` for JSON handling and OpenAPI
//! documentation. Field names are camelCase on the wire.
//!
//! ## Model Categories
//!
//! - **Requests**: [`EditRequest`] carrying [`ChangeRecord`]s
//! - **Per-file results**: [`EditOutcome`] and [`RejectedChange`]
//! - **Health**: [`PingResponse`]

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::transform::{EditPayload, TransformError};
use crate::workspace::{CommitRecord, WorkspaceError};

// =============================================================================
// Requests
// =============================================================================

/// One requested change to a logical file.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRecord {
    /// Logical file name, usually a component name such as `Navbar`.
    pub file_name: String,
    /// Edit to apply. Absent means parse, validate and write back unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit: Option<EditPayload>,
}

/// Body of `POST /edit-file`.
///
/// Only used for documentation; the handler validates the raw JSON itself so
/// it can report which element is malformed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EditRequest {
    /// Non-empty list of changes.
    pub changes: Vec<ChangeRecord>,
}

/// Changes for one logical file, in request order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeGroup {
    pub file_name: String,
    pub edits: Vec<EditPayload>,
}

impl ChangeGroup {
    pub fn edit_refs(&self) -> Vec<&EditPayload> {
        self.edits.iter().collect()
    }
}

/// Partition records by file name, ordered by first appearance.
pub fn group_changes(changes: Vec<ChangeRecord>) -> Vec<ChangeGroup> {
    let mut groups: Vec<ChangeGroup> = Vec::new();
    for change in changes {
        let index = match groups.iter().position(|g| g.file_name == change.file_name) {
            Some(index) => index,
            None => {
                groups.push(ChangeGroup {
                    file_name: change.file_name,
                    edits: Vec::new(),
                });
                groups.len() - 1
            }
        };
        if let Some(edit) = change.edit {
            groups[index].edits.push(edit);
        }
    }
    groups
}

// =============================================================================
// Per-file Results
// =============================================================================

/// A file that was rewritten.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EditOutcome {
    pub file_name: String,
    /// Path relative to the project root, prefixed with `/`.
    pub path: String,
    /// Number of edits spliced into the file.
    pub changes_applied: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub commit: CommitRecord,
}

/// Why a file's changes were not applied.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    InvalidFileName,
    ForbiddenPath,
    NotFound,
    Conflict,
    UnsupportedFileType,
    TransformFailed,
    InvalidEdit,
    IoError,
}

impl From<&WorkspaceError> for RejectionReason {
    fn from(err: &WorkspaceError) -> Self {
        match err {
            WorkspaceError::InvalidFileName { .. } => RejectionReason::InvalidFileName,
            WorkspaceError::ForbiddenPath { .. } => RejectionReason::ForbiddenPath,
            WorkspaceError::NotFound { .. } => RejectionReason::NotFound,
            WorkspaceError::Conflict { .. } => RejectionReason::Conflict,
            WorkspaceError::Io { .. } => RejectionReason::IoError,
        }
    }
}

impl From<&TransformError> for RejectionReason {
    fn from(err: &TransformError) -> Self {
        match err {
            TransformError::UnsupportedLanguage { .. } => RejectionReason::UnsupportedFileType,
            TransformError::ParserInit { .. }
            | TransformError::Syntax { .. }
            | TransformError::InvalidOutput { .. } => RejectionReason::TransformFailed,
            TransformError::InvalidEdit { .. } | TransformError::OverlappingEdits { .. } => {
                RejectionReason::InvalidEdit
            }
            TransformError::StaleEdit { .. } => RejectionReason::Conflict,
        }
    }
}

/// A file whose changes were rejected. Nothing was written for it.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RejectedChange {
    pub file_name: String,
    pub reason: RejectionReason,
    pub error: String,
}

impl RejectedChange {
    pub fn new(file_name: impl Into<String>, reason: RejectionReason, error: impl ToString) -> Self {
        Self {
            file_name: file_name.into(),
            reason,
            error: error.to_string(),
        }
    }
}

/// Overall request status.
#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EditStatus {
    /// Every file was applied.
    Ok,
    /// Some files were applied, some rejected.
    Partial,
    /// Nothing was applied.
    Rejected,
}

/// Response of `POST /edit-file`.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EditResponse {
    pub status: EditStatus,
    pub edits: Vec<EditOutcome>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rejected_changes: Vec<RejectedChange>,
}

impl EditResponse {
    pub fn new(edits: Vec<EditOutcome>, rejected_changes: Vec<RejectedChange>) -> Self {
        let status = match (edits.is_empty(), rejected_changes.is_empty()) {
            (_, true) => EditStatus::Ok,
            (false, false) => EditStatus::Partial,
            (true, false) => EditStatus::Rejected,
        };
        Self {
            status,
            edits,
            rejected_changes,
        }
    }
}

// =============================================================================
// Health
// =============================================================================

/// Response of `GET /ping`.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct PingResponse {
    pub status: String,
    /// RFC 3339 UTC timestamp with millisecond precision.
    pub time: String,
}
