// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Edit payloads and their mapping onto the parsed source.
//!
//! An edit names a span of the current file, either directly as a byte range
//! or indirectly as the syntax node under a line/column position, and the
//! text that replaces it. All spans are resolved against the same parse of
//! the original text, checked for overlap, then spliced in from the end of
//! the file backwards so earlier offsets stay valid.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::parser::ParsedSource;
use super::TransformError;

/// A single edit carried by a change record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EditPayload {
    /// Replace the bytes `[start, end)` of the current source.
    Range {
        start: usize,
        end: usize,
        text: String,
        /// Text the span must currently hold.
        #[serde(default)]
        expected: Option<String>,
    },
    /// Replace the smallest named syntax node at a one-based line and
    /// character column.
    Node {
        line: usize,
        column: usize,
        /// Required node kind (e.g. `jsx_text`, `string_fragment`). The
        /// nearest enclosing node of that kind is used.
        #[serde(default)]
        kind: Option<String>,
        text: String,
        /// Text the node must currently hold.
        #[serde(default)]
        expected: Option<String>,
    },
}

impl EditPayload {
    fn text(&self) -> &str {
        match self {
            EditPayload::Range { text, .. } | EditPayload::Node { text, .. } => text,
        }
    }

    fn expected(&self) -> Option<&str> {
        match self {
            EditPayload::Range { expected, .. } | EditPayload::Node { expected, .. } => {
                expected.as_deref()
            }
        }
    }
}

/// An edit resolved to a concrete byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedEdit<'e> {
    /// Position of the edit in the change group.
    pub index: usize,
    pub span: Range<usize>,
    pub text: &'e str,
}

/// Resolve every edit to a byte span, check expectations and overlaps.
///
/// The result is ordered by span start (then end), ties keeping request
/// order.
pub fn plan_edits<'e>(
    parsed: &ParsedSource,
    source: &str,
    edits: &[&'e EditPayload],
) -> Result<Vec<PlannedEdit<'e>>, TransformError> {
    let mut planned = Vec::with_capacity(edits.len());

    for (index, edit) in edits.iter().enumerate() {
        let span = match edit {
            EditPayload::Range { start, end, .. } => range_span(source, index, *start, *end)?,
            EditPayload::Node {
                line, column, kind, ..
            } => node_span(parsed, source, index, *line, *column, kind.as_deref())?,
        };

        if let Some(expected) = edit.expected() {
            let found = &source[span.clone()];
            if found != expected {
                return Err(TransformError::StaleEdit {
                    index,
                    expected: expected.to_string(),
                    found: found.to_string(),
                });
            }
        }

        planned.push(PlannedEdit {
            index,
            span,
            text: edit.text(),
        });
    }

    planned.sort_by_key(|p| (p.span.start, p.span.end));
    for pair in planned.windows(2) {
        if pair[0].span.end > pair[1].span.start {
            return Err(TransformError::OverlappingEdits {
                first: pair[0].index.min(pair[1].index),
                second: pair[0].index.max(pair[1].index),
            });
        }
    }

    Ok(planned)
}

/// Splice planned edits into the source, last span first.
pub fn apply_planned(source: &str, planned: &[PlannedEdit<'_>]) -> String {
    let mut output = source.to_string();
    for edit in planned.iter().rev() {
        output.replace_range(edit.span.clone(), edit.text);
    }
    output
}

fn range_span(
    source: &str,
    index: usize,
    start: usize,
    end: usize,
) -> Result<Range<usize>, TransformError> {
    if start > end {
        return Err(TransformError::invalid_edit(index, "range start is after its end"));
    }
    if end > source.len() {
        return Err(TransformError::invalid_edit(
            index,
            format!("range end {end} is past the end of the file ({} bytes)", source.len()),
        ));
    }
    if !source.is_char_boundary(start) || !source.is_char_boundary(end) {
        return Err(TransformError::invalid_edit(
            index,
            "range is not on a UTF-8 character boundary",
        ));
    }
    Ok(start..end)
}

fn node_span(
    parsed: &ParsedSource,
    source: &str,
    index: usize,
    line: usize,
    column: usize,
    kind: Option<&str>,
) -> Result<Range<usize>, TransformError> {
    let offset = byte_offset(source, line, column).ok_or_else(|| {
        TransformError::invalid_edit(index, format!("no character at line {line}, column {column}"))
    })?;

    let root = parsed.root_node();
    let mut node = root
        .named_descendant_for_byte_range(offset, offset)
        .ok_or_else(|| {
            TransformError::invalid_edit(index, format!("no syntax node at line {line}, column {column}"))
        })?;

    if let Some(kind) = kind {
        while node.kind() != kind {
            node = node.parent().ok_or_else(|| {
                TransformError::invalid_edit(
                    index,
                    format!("no {kind} node encloses line {line}, column {column}"),
                )
            })?;
        }
    } else if node.id() == root.id() {
        return Err(TransformError::invalid_edit(
            index,
            format!("no syntax node at line {line}, column {column}"),
        ));
    }

    Ok(node.byte_range())
}

/// Byte offset of a one-based line and character column.
fn byte_offset(source: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 || column == 0 {
        return None;
    }

    let mut line_start = 0;
    for (i, text) in source.split_inclusive('\n').enumerate() {
        if i + 1 == line {
            let content = text.strip_suffix('\n').unwrap_or(text);
            let content = content.strip_suffix('\r').unwrap_or(content);
            return content
                .char_indices()
                .nth(column - 1)
                .map(|(byte, _)| line_start + byte);
        }
        line_start += text.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{parser::parse, SourceLanguage};

    const NAVBAR: &str = "import React from \"react\";\n\n// Top navigation\nexport default function Navbar() {\n  return <nav className=\"nav\">Dashboard</nav>;\n}\n";

    fn plan(source: &str, edits: &[EditPayload]) -> Result<String, TransformError> {
        let parsed = parse(SourceLanguage::Jsx, source).unwrap();
        let refs: Vec<&EditPayload> = edits.iter().collect();
        let planned = plan_edits(&parsed, source, &refs)?;
        Ok(apply_planned(source, &planned))
    }

    #[test]
    fn byte_offset_counts_characters() {
        let source = "ab\nçd\r\nef";
        assert_eq!(byte_offset(source, 1, 1), Some(0));
        assert_eq!(byte_offset(source, 2, 2), Some(5));
        assert_eq!(byte_offset(source, 3, 2), Some(9));
        assert_eq!(byte_offset(source, 2, 3), None);
        assert_eq!(byte_offset(source, 4, 1), None);
        assert_eq!(byte_offset(source, 0, 1), None);
    }

    #[test]
    fn range_edit_replaces_span() {
        let start = NAVBAR.find("Dashboard").unwrap();
        let out = plan(
            NAVBAR,
            &[EditPayload::Range {
                start,
                end: start + "Dashboard".len(),
                text: "Home".into(),
                expected: Some("Dashboard".into()),
            }],
        )
        .unwrap();

        assert!(out.contains("<nav className=\"nav\">Home</nav>"));
        assert!(out.contains("// Top navigation"));
    }

    #[test]
    fn node_edit_replaces_jsx_text() {
        let out = plan(
            NAVBAR,
            &[EditPayload::Node {
                line: 5,
                column: 31,
                kind: Some("jsx_text".into()),
                text: "Overview".into(),
                expected: Some("Dashboard".into()),
            }],
        )
        .unwrap();

        assert_eq!(out, NAVBAR.replace(">Dashboard<", ">Overview<"));
    }

    #[test]
    fn node_edit_walks_up_to_requested_kind() {
        // Column 26 is inside the "nav" attribute string.
        let out = plan(
            NAVBAR,
            &[EditPayload::Node {
                line: 5,
                column: 26,
                kind: Some("string".into()),
                text: "\"menu\"".into(),
                expected: None,
            }],
        )
        .unwrap();

        assert!(out.contains("<nav className=\"menu\">"));
    }

    #[test]
    fn missing_kind_is_invalid() {
        let err = plan(
            NAVBAR,
            &[EditPayload::Node {
                line: 5,
                column: 31,
                kind: Some("class_declaration".into()),
                text: "x".into(),
                expected: None,
            }],
        )
        .unwrap_err();
        assert!(matches!(err, TransformError::InvalidEdit { index: 0, .. }));
    }

    #[test]
    fn stale_expectation_is_rejected() {
        let start = NAVBAR.find("Dashboard").unwrap();
        let err = plan(
            NAVBAR,
            &[EditPayload::Range {
                start,
                end: start + 9,
                text: "Home".into(),
                expected: Some("Wallet".into()),
            }],
        )
        .unwrap_err();
        assert!(matches!(err, TransformError::StaleEdit { index: 0, .. }));
    }

    #[test]
    fn out_of_bounds_range_is_invalid() {
        let err = plan(
            NAVBAR,
            &[EditPayload::Range {
                start: 0,
                end: NAVBAR.len() + 1,
                text: String::new(),
                expected: None,
            }],
        )
        .unwrap_err();
        assert!(matches!(err, TransformError::InvalidEdit { .. }));
    }

    #[test]
    fn reversed_range_is_invalid() {
        let err = plan(
            NAVBAR,
            &[EditPayload::Range {
                start: 10,
                end: 5,
                text: String::new(),
                expected: None,
            }],
        )
        .unwrap_err();
        assert!(matches!(err, TransformError::InvalidEdit { .. }));
    }

    #[test]
    fn overlapping_edits_are_rejected() {
        let err = plan(
            NAVBAR,
            &[
                EditPayload::Range {
                    start: 10,
                    end: 20,
                    text: "a".into(),
                    expected: None,
                },
                EditPayload::Range {
                    start: 15,
                    end: 25,
                    text: "b".into(),
                    expected: None,
                },
            ],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            TransformError::OverlappingEdits { first: 0, second: 1 }
        ));
    }

    #[test]
    fn multiple_edits_apply_independently_of_order() {
        let import = NAVBAR.find("react\"").unwrap();
        let text = NAVBAR.find("Dashboard").unwrap();
        let out = plan(
            NAVBAR,
            &[
                EditPayload::Range {
                    start: text,
                    end: text + 9,
                    text: "Home".into(),
                    expected: None,
                },
                EditPayload::Range {
                    start: import,
                    end: import + 5,
                    text: "preact".into(),
                    expected: None,
                },
            ],
        )
        .unwrap();

        assert!(out.starts_with("import React from \"preact\";"));
        assert!(out.contains(">Home<"));
    }

    #[test]
    fn insertions_at_same_offset_keep_request_order() {
        let out = plan(
            "const a = 1;\n",
            &[
                EditPayload::Range {
                    start: 0,
                    end: 0,
                    text: "// first\n".into(),
                    expected: None,
                },
                EditPayload::Range {
                    start: 0,
                    end: 0,
                    text: "// second\n".into(),
                    expected: None,
                },
            ],
        )
        .unwrap();
        assert_eq!(out, "// first\n// second\nconst a = 1;\n");
    }

    #[test]
    fn payload_deserializes_from_camel_case_json() {
        let edit: EditPayload = serde_json::from_value(serde_json::json!({
            "type": "node",
            "line": 3,
            "column": 7,
            "kind": "jsx_text",
            "text": "Hello"
        }))
        .unwrap();
        assert_eq!(
            edit,
            EditPayload::Node {
                line: 3,
                column: 7,
                kind: Some("jsx_text".into()),
                text: "Hello".into(),
                expected: None,
            }
        );

        let unknown = serde_json::from_value::<EditPayload>(serde_json::json!({
            "type": "regex",
            "text": "x"
        }));
        assert!(unknown.is_err());
    }
}
