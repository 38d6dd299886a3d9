// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Source Transform Engine
//!
//! Parse a JavaScript/TypeScript source file with tree-sitter, apply a set of
//! span edits, and verify the result still parses.
//!
//! Edits are spliced into the original text rather than regenerated from the
//! tree, so formatting, comments and line numbers outside the edited spans
//! are preserved byte-for-byte. A change record without edits is a pure
//! round trip: the file is parsed, validated and written back unchanged.
//!
//! | Extension | Grammar |
//! |-----------|---------|
//! | `.js`, `.jsx`, `.tsx` | tree-sitter TSX |
//! | `.ts` | tree-sitter TypeScript |

pub mod edit;
pub mod error;
pub mod language;
pub mod parser;

pub use edit::EditPayload;
pub use error::TransformError;
pub use language::SourceLanguage;
pub use parser::{parse, ParsedSource};

use edit::{apply_planned, plan_edits};

/// Result of a successful transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformed {
    pub output: String,
    /// Number of edits spliced into the output.
    pub applied: usize,
}

/// Parse `source`, apply `edits`, and re-parse the output.
pub fn transform(
    language: SourceLanguage,
    source: &str,
    edits: &[&EditPayload],
) -> Result<Transformed, TransformError> {
    let parsed = parse(language, source)?;
    if edits.is_empty() {
        return Ok(Transformed {
            output: source.to_string(),
            applied: 0,
        });
    }

    let planned = plan_edits(&parsed, source, edits)?;
    let output = apply_planned(source, &planned);

    let (_, error) = parser::parse_tolerant(language, &output)?;
    if let Some(loc) = error {
        return Err(TransformError::InvalidOutput {
            line: loc.line,
            column: loc.column,
        });
    }

    Ok(Transformed {
        output,
        applied: planned.len(),
    })
}
