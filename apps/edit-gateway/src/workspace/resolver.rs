// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Logical file name resolution.
//!
//! The editing client names files without directory or extension
//! (`"Navbar"`). Resolution walks the project tree depth-first in
//! directory-listing order and picks the first source file whose stem matches.
//! Listing order is filesystem dependent, so when several files share a stem
//! the choice is arbitrary; the walk therefore counts every candidate and
//! reports the ambiguity instead of hiding it.

use std::fs::{self, ReadDir};
use std::path::{Path, PathBuf};

use super::{ProjectPaths, WorkspaceError, WorkspaceResult};

/// Longest accepted logical file name, in bytes.
pub const MAX_FILE_NAME_LEN: usize = 255;

/// Outcome of resolving a logical file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Absolute path chosen for the name.
    pub path: PathBuf,
    /// Number of matching files found (0 when the fallback was used).
    pub candidates: usize,
    /// True when no file matched and the default location was chosen.
    pub fell_back: bool,
}

impl ResolvedTarget {
    /// Whether more than one file matched the name.
    pub fn is_ambiguous(&self) -> bool {
        self.candidates > 1
    }
}

/// Reject names that could traverse directories or smuggle control bytes
/// into later subprocess arguments.
pub fn validate_file_name(name: &str) -> WorkspaceResult<()> {
    let reason = if name.is_empty() {
        Some("name is empty")
    } else if name.len() > MAX_FILE_NAME_LEN {
        Some("name is too long")
    } else if name.chars().any(char::is_control) {
        Some("name contains control characters")
    } else if name.contains('/') || name.contains('\\') {
        Some("name contains a path separator")
    } else if name.contains("..") {
        Some("name contains '..'")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(WorkspaceError::InvalidFileName {
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Resolve a logical file name under the project root.
///
/// Uses an explicit stack of directory iterators, so the visiting order is
/// the same as a recursive pre-order walk. Excluded directories and symlinks
/// are skipped; unreadable directories are ignored. When nothing matches, the
/// fallback location is returned even if it does not exist.
pub fn resolve(paths: &ProjectPaths, file_name: &str) -> ResolvedTarget {
    let mut first: Option<PathBuf> = None;
    let mut candidates = 0usize;

    let mut stack: Vec<ReadDir> = Vec::new();
    if let Ok(entries) = fs::read_dir(paths.root()) {
        stack.push(entries);
    }

    while let Some(entries) = stack.last_mut() {
        let Some(entry) = entries.next() else {
            stack.pop();
            continue;
        };
        let Ok(entry) = entry else {
            continue;
        };
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };

        if file_type.is_dir() {
            if ProjectPaths::is_excluded_dir(name) {
                continue;
            }
            match fs::read_dir(entry.path()) {
                Ok(child) => stack.push(child),
                Err(e) => {
                    tracing::debug!(path = %entry.path().display(), error = %e, "Skipping unreadable directory");
                }
            }
        } else if file_type.is_file() && ProjectPaths::source_stem(name) == Some(file_name) {
            candidates += 1;
            if first.is_none() {
                first = Some(entry.path());
            }
        }
    }

    match first {
        Some(path) => ResolvedTarget {
            path,
            candidates,
            fell_back: false,
        },
        None => ResolvedTarget {
            path: paths.fallback_target(file_name),
            candidates: 0,
            fell_back: true,
        },
    }
}

/// Whether `path` names an existing regular file.
pub fn target_exists(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "export default 1;\n").unwrap();
        path
    }

    #[test]
    fn finds_nested_source_file() {
        let temp = TempDir::new().unwrap();
        let expected = touch(temp.path(), "src/pages/Wallet.js");
        touch(temp.path(), "src/pages/Referrals.js");

        let resolved = resolve(&ProjectPaths::new(temp.path()), "Wallet");

        assert_eq!(resolved.path, expected);
        assert_eq!(resolved.candidates, 1);
        assert!(!resolved.fell_back);
        assert!(!resolved.is_ambiguous());
    }

    #[rstest]
    #[case("src/components/Foo.jsx")]
    #[case("src/components/Foo.ts")]
    #[case("src/Foo.tsx")]
    fn matches_every_recognised_extension(#[case] rel: &str) {
        let temp = TempDir::new().unwrap();
        let expected = touch(temp.path(), rel);

        let resolved = resolve(&ProjectPaths::new(temp.path()), "Foo");
        assert_eq!(resolved.path, expected);
    }

    #[test]
    fn matching_is_case_sensitive() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "src/navbar.js");

        let resolved = resolve(&ProjectPaths::new(temp.path()), "Navbar");
        assert!(resolved.fell_back);
    }

    #[test]
    fn excluded_directories_are_not_searched() {
        let temp = TempDir::new().unwrap();
        for dir in ["node_modules/lib", "public", ".git", "build", "dist", "coverage"] {
            touch(temp.path(), &format!("{dir}/Hidden.js"));
        }

        let resolved = resolve(&ProjectPaths::new(temp.path()), "Hidden");

        assert!(resolved.fell_back);
        assert_eq!(resolved.candidates, 0);
        assert_eq!(
            resolved.path,
            temp.path().join("src/components/Hidden.js")
        );
    }

    #[test]
    fn non_source_files_are_ignored() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "src/App.css");

        let resolved = resolve(&ProjectPaths::new(temp.path()), "App");
        assert!(resolved.fell_back);
    }

    #[test]
    fn duplicate_names_are_reported_as_ambiguous() {
        let temp = TempDir::new().unwrap();
        let a = touch(temp.path(), "src/pages/Admin.js");
        let b = touch(temp.path(), "src/legacy/Admin.jsx");

        let resolved = resolve(&ProjectPaths::new(temp.path()), "Admin");

        assert_eq!(resolved.candidates, 2);
        assert!(resolved.is_ambiguous());
        assert!(resolved.path == a || resolved.path == b);
    }

    #[test]
    fn missing_root_falls_back() {
        let paths = ProjectPaths::new("/definitely/not/a/project");
        let resolved = resolve(&paths, "Foo");
        assert!(resolved.fell_back);
        assert!(!target_exists(&resolved.path));
    }

    #[rstest]
    #[case("")]
    #[case("../../etc/passwd")]
    #[case("..")]
    #[case("src/App")]
    #[case("src\\App")]
    #[case("App\n")]
    #[case("App\0")]
    #[case("Foo\u{1b}[0m")]
    fn invalid_names_are_rejected(#[case] name: &str) {
        assert!(matches!(
            validate_file_name(name),
            Err(WorkspaceError::InvalidFileName { .. })
        ));
    }

    #[test]
    fn overlong_name_is_rejected() {
        let name = "A".repeat(MAX_FILE_NAME_LEN + 1);
        assert!(validate_file_name(&name).is_err());
    }

    #[rstest]
    #[case("App")]
    #[case("Navbar")]
    #[case("user-profile")]
    #[case("App.test")]
    #[case("$weird name")]
    fn ordinary_names_are_accepted(#[case] name: &str) {
        assert!(validate_file_name(name).is_ok());
    }
}
