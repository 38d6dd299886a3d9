// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Errors for project-tree operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for resolving, validating and writing project files.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// Logical file name failed validation before resolution.
    #[error("Invalid file name '{name}': {reason}")]
    InvalidFileName { name: String, reason: &'static str },

    /// Resolved path escapes the sandbox.
    #[error("Forbidden path for file {file_name}: {reason}")]
    ForbiddenPath {
        file_name: String,
        reason: &'static str,
    },

    /// Target does not exist after resolution and fallback.
    #[error("File not found: {path}")]
    NotFound { path: String },

    /// More than one file carries the logical name.
    #[error("File name {file_name} is ambiguous ({candidates} candidates)")]
    Conflict { file_name: String, candidates: usize },

    /// I/O failure while reading or writing a target.
    #[error("Failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl WorkspaceError {
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        WorkspaceError::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

/// Result type for workspace operations.
pub type WorkspaceResult<T> = Result<T, WorkspaceError>;
