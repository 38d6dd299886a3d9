// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Containment checks for resolved targets.
//!
//! Every path the gateway is about to read or write passes through
//! [`validate_target`] first. A rejected path is never touched.

use std::fs;
use std::path::{Component, Path, PathBuf};

use super::paths::{DEPENDENCY_DIR, PUBLIC_DIR};
use super::{WorkspaceError, WorkspaceResult};

/// Lexically normalise a path: drop `.` segments and fold `..` into its
/// parent. Does not touch the filesystem or follow symlinks.
///
/// A `..` that would climb above the first component is kept, so callers
/// can still detect it.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out.iter().collect()
}

/// Confirm `target` is a legal edit location under `root`.
///
/// Checks, in order:
/// 1. the normalised path lies strictly inside the normalised root and has
///    no `..` left in it;
/// 2. no `node_modules` component appears anywhere;
/// 3. no `public` component appears anywhere;
/// 4. the canonical form of the path (through its nearest existing
///    ancestor when it does not exist yet) is still inside the canonical
///    root and passes checks 2 and 3 relative to it;
/// 5. the target itself is not a symlink.
///
/// Returns the normalised path on success.
pub fn validate_target(root: &Path, target: &Path, file_name: &str) -> WorkspaceResult<PathBuf> {
    let forbidden = |reason: &'static str| WorkspaceError::ForbiddenPath {
        file_name: file_name.to_string(),
        reason,
    };

    let root = normalize(root);
    let normalized = normalize(target);

    if normalized == root || !normalized.starts_with(&root) {
        return Err(forbidden("outside the project root"));
    }
    if normalized
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return Err(forbidden("parent directory traversal"));
    }

    if has_component(&normalized, DEPENDENCY_DIR) {
        return Err(forbidden("inside a dependency directory"));
    }
    if has_component(&normalized, PUBLIC_DIR) {
        return Err(forbidden("inside the public asset directory"));
    }

    if let Some(real_target) = canonicalize_existing(&normalized) {
        let real_root = root.canonicalize().unwrap_or_else(|_| root.clone());
        let inside = match real_target.strip_prefix(&real_root) {
            Ok(relative) if !relative.as_os_str().is_empty() => relative,
            _ => return Err(forbidden("symlink leaves the project root")),
        };
        if has_component(inside, DEPENDENCY_DIR) {
            return Err(forbidden("symlink into a dependency directory"));
        }
        if has_component(inside, PUBLIC_DIR) {
            return Err(forbidden("symlink into the public asset directory"));
        }
    }

    let is_symlink = fs::symlink_metadata(&normalized)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false);
    if is_symlink {
        return Err(forbidden("target is a symlink"));
    }

    Ok(normalized)
}

fn has_component(path: &Path, name: &str) -> bool {
    path.components().any(|c| c.as_os_str() == name)
}

/// Canonical form of `path`, resolving symlinks through its nearest existing
/// ancestor. Components below that ancestor are appended unchanged.
fn canonicalize_existing(path: &Path) -> Option<PathBuf> {
    path.ancestors().find_map(|ancestor| {
        let real = ancestor.canonicalize().ok()?;
        let rest = path.strip_prefix(ancestor).ok()?;
        Some(real.join(rest))
    })
}
