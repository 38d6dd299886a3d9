// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Source language detection and tree-sitter grammar selection.

use std::fmt;
use std::path::Path;

/// Languages the transform engine can parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceLanguage {
    /// `.js` (JSX allowed, as in most React projects).
    JavaScript,
    /// `.jsx`
    Jsx,
    /// `.ts`
    TypeScript,
    /// `.tsx`
    Tsx,
}

impl SourceLanguage {
    /// Detect the language from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "js" => Some(Self::JavaScript),
            "jsx" => Some(Self::Jsx),
            "ts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            _ => None,
        }
    }

    /// Detect the language from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Grammar used to parse this language.
    ///
    /// Everything except plain `.ts` goes through the TSX grammar, which
    /// understands both JSX and type annotations. Plain TypeScript keeps
    /// the non-JSX grammar so `<T>value` casts still parse.
    pub fn tree_sitter_language(self) -> tree_sitter::Language {
        match self {
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::JavaScript | Self::Jsx | Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::Jsx => "jsx",
            Self::TypeScript => "typescript",
            Self::Tsx => "tsx",
        }
    }
}

impl fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
