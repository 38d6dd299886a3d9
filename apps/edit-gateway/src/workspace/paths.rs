// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Path constants and utilities for the editable project tree.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Directory names never descended into and never written under.
pub const EXCLUDED_DIRS: &[&str] = &["node_modules", "public", ".git", "build", "dist", "coverage"];

/// Dependency cache directory; forbidden anywhere in a target path.
pub const DEPENDENCY_DIR: &str = "node_modules";

/// Static asset directory; forbidden anywhere in a target path.
pub const PUBLIC_DIR: &str = "public";

/// Source extensions recognised when matching logical file names.
pub const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx"];

/// Extension used for the fallback location of unresolved names.
pub const DEFAULT_EXTENSION: &str = "js";

/// Suffix appended to a target path for its recovery copy.
pub const BACKUP_SUFFIX: &str = ".backup";

/// Path utilities for the project tree.
#[derive(Debug, Clone)]
pub struct ProjectPaths {
    root: PathBuf,
}

impl ProjectPaths {
    /// Create project paths for an absolute root.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Project root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding shared components.
    pub fn components_dir(&self) -> PathBuf {
        self.root.join("src").join("components")
    }

    /// Location used when a logical name matches no existing file.
    pub fn fallback_target(&self, file_name: &str) -> PathBuf {
        self.components_dir()
            .join(format!("{file_name}.{DEFAULT_EXTENSION}"))
    }

    /// Path of the recovery copy for a target.
    pub fn backup_path(target: &Path) -> PathBuf {
        let mut name = OsString::from(target.as_os_str());
        name.push(BACKUP_SUFFIX);
        PathBuf::from(name)
    }

    /// Root-relative path with a leading `/`, for responses and logs.
    pub fn display_path(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(rel) => format!("/{}", rel.display()),
            Err(_) => path.display().to_string(),
        }
    }

    /// Whether a directory entry name is excluded from traversal.
    pub fn is_excluded_dir(name: &str) -> bool {
        EXCLUDED_DIRS.contains(&name)
    }

    /// Strip one recognised source extension from a file name.
    pub fn source_stem(file_name: &str) -> Option<&str> {
        let (stem, ext) = file_name.rsplit_once('.')?;
        SOURCE_EXTENSIONS.contains(&ext).then_some(stem)
    }
}
