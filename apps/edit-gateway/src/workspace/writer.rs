// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Crash-safe replacement of project files.
//!
//! ## Sequence
//!
//! 1. Copy the current content to `<target>.backup` (if the target exists)
//! 2. Write the new content to a temp file in the target's directory
//! 3. Atomically rename the temp file over the target
//! 4. Delete the backup
//!
//! If step 2 or 3 fails the backup stays on disk with the exact pre-edit
//! content. Restoring from it is an operator action; the gateway never
//! restores automatically.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::{ProjectPaths, WorkspaceError, WorkspaceResult};

/// What a successful replacement did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceOutcome {
    pub path: PathBuf,
    /// Whether a backup was taken (i.e. the target existed).
    pub backed_up: bool,
    pub bytes_written: usize,
}

/// Replace `target` with `content`, keeping a recovery copy until the
/// write has succeeded.
pub fn replace(target: &Path, content: &str) -> WorkspaceResult<ReplaceOutcome> {
    replace_with(target, content, write_atomic)
}

fn replace_with<W>(target: &Path, content: &str, write: W) -> WorkspaceResult<ReplaceOutcome>
where
    W: FnOnce(&Path, &str) -> io::Result<()>,
{
    let backup = ProjectPaths::backup_path(target);

    let backed_up = match fs::read(target) {
        Ok(original) => {
            fs::write(&backup, &original)
                .map_err(|e| WorkspaceError::io("write backup", &backup, e))?;
            true
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => return Err(WorkspaceError::io("read", target, e)),
    };

    if let Err(e) = write(target, content) {
        if backed_up {
            tracing::error!(
                target = %target.display(),
                backup = %backup.display(),
                error = %e,
                "Write failed, backup left in place"
            );
        }
        return Err(WorkspaceError::io("write", target, e));
    }

    if backed_up {
        if let Err(e) = fs::remove_file(&backup) {
            tracing::warn!(backup = %backup.display(), error = %e, "Failed to remove backup");
        }
    }

    Ok(ReplaceOutcome {
        path: target.to_path_buf(),
        backed_up,
        bytes_written: content.len(),
    })
}

/// Write via a same-directory temp file and rename, so readers see either
/// the old or the new content, never a partial file.
fn write_atomic(target: &Path, content: &str) -> io::Result<()> {
    let parent = target.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(content.as_bytes())?;
    temp.as_file().sync_all()?;

    // Keep the original permissions on the replaced file.
    if let Ok(metadata) = fs::metadata(target) {
        fs::set_permissions(temp.path(), metadata.permissions())?;
    }

    temp.persist(target).map_err(|e| e.error)?;
    Ok(())
}
