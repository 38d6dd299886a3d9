// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Tree-sitter parsing with strict error reporting.
//!
//! Tree-sitter is error tolerant and always produces a tree. The gateway is
//! not: any ERROR or MISSING node means the file is treated as unparseable
//! and nothing is written.

use super::{SourceLanguage, TransformError};

/// Location of the first syntax error in a tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxLocation {
    /// One-based line.
    pub line: u32,
    /// One-based byte column.
    pub column: u32,
    /// Short excerpt of the offending source.
    pub context: String,
}

/// A successfully parsed, error-free source file.
#[derive(Debug)]
pub struct ParsedSource {
    tree: tree_sitter::Tree,
    language: SourceLanguage,
}

impl ParsedSource {
    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    pub fn language(&self) -> SourceLanguage {
        self.language
    }
}

/// Parse source text, returning the tree and its first error (if any).
pub fn parse_tolerant(
    language: SourceLanguage,
    source: &str,
) -> Result<(tree_sitter::Tree, Option<SyntaxLocation>), TransformError> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&language.tree_sitter_language())
        .map_err(|e| TransformError::ParserInit {
            language,
            message: e.to_string(),
        })?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| TransformError::ParserInit {
            language,
            message: "parser produced no tree".to_string(),
        })?;

    let error = first_error(tree.root_node(), source);
    Ok((tree, error))
}

/// Parse source text and require a tree without syntax errors.
pub fn parse(language: SourceLanguage, source: &str) -> Result<ParsedSource, TransformError> {
    let (tree, error) = parse_tolerant(language, source)?;
    match error {
        Some(loc) => Err(TransformError::Syntax {
            language,
            line: loc.line,
            column: loc.column,
            context: loc.context,
        }),
        None => Ok(ParsedSource { tree, language }),
    }
}

/// Depth-first search for the first ERROR or MISSING node.
fn first_error(root: tree_sitter::Node<'_>, source: &str) -> Option<SyntaxLocation> {
    if !root.has_error() {
        return None;
    }

    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(location_of(node, source));
        }
        if !node.has_error() {
            continue;
        }
        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }

    // has_error() was set but no node carried it; report the root.
    Some(location_of(root, source))
}

fn location_of(node: tree_sitter::Node<'_>, source: &str) -> SyntaxLocation {
    let (line, column) = point_to_one_based(node.start_position());
    let context = source
        .get(node.byte_range())
        .map(|s| {
            if s.chars().count() > 40 {
                let truncated: String = s.chars().take(37).collect();
                format!("{truncated}...")
            } else {
                s.to_string()
            }
        })
        .unwrap_or_default();
    let context = if node.is_missing() {
        format!("missing {}", node.kind())
    } else {
        context
    };

    SyntaxLocation {
        line,
        column,
        context,
    }
}

/// Convert a zero-based tree-sitter point to one-based display coordinates.
pub(crate) fn point_to_one_based(pos: tree_sitter::Point) -> (u32, u32) {
    let line = u32::try_from(pos.row.saturating_add(1)).unwrap_or(u32::MAX);
    let column = u32::try_from(pos.column.saturating_add(1)).unwrap_or(u32::MAX);
    (line, column)
}
