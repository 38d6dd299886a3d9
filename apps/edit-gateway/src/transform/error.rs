// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Errors from the parse-edit-regenerate pipeline.

use std::path::PathBuf;

use thiserror::Error;

use super::SourceLanguage;

/// Transform failures. All are scoped to a single file.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Unsupported file type: {}", path.display())]
    UnsupportedLanguage { path: PathBuf },

    #[error("Failed to initialise {language} parser: {message}")]
    ParserInit {
        language: SourceLanguage,
        message: String,
    },

    #[error("Failed to parse {language} source at line {line}, column {column}: {context}")]
    Syntax {
        language: SourceLanguage,
        line: u32,
        column: u32,
        context: String,
    },

    #[error("Edit {index} is invalid: {reason}")]
    InvalidEdit { index: usize, reason: String },

    #[error("Edit {index} is stale: expected {expected:?}, found {found:?}")]
    StaleEdit {
        index: usize,
        expected: String,
        found: String,
    },

    #[error("Edits {first} and {second} overlap")]
    OverlappingEdits { first: usize, second: usize },

    #[error("Edited source no longer parses at line {line}, column {column}")]
    InvalidOutput { line: u32, column: u32 },
}

impl TransformError {
    pub(crate) fn invalid_edit(index: usize, reason: impl Into<String>) -> Self {
        TransformError::InvalidEdit {
            index,
            reason: reason.into(),
        }
    }
}
