// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Version-control audit trail for applied edits.
//!
//! Every successful write is staged and committed under a synthetic author so
//! the change history shows exactly what the editing client touched. The trail
//! is best effort: a failing or hanging git never turns a completed write into
//! an error response.
//!
//! Git is always invoked with an argument vector. No shell ever sees a path.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tokio::process::Command;
use tokio::sync::Mutex;
use utoipa::ToSchema;

/// Author name recorded on audit commits.
pub const AUDIT_AUTHOR_NAME: &str = "visual-edit";

/// Author email recorded on audit commits.
pub const AUDIT_AUTHOR_EMAIL: &str = "support@emergent.sh";

/// Prefix of every audit commit message.
pub const COMMIT_MESSAGE_PREFIX: &str = "visual_edit_";

/// Outcome class of an audit commit attempt.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CommitStatus {
    /// A commit was created.
    Committed,
    /// Audit commits are disabled.
    Skipped,
    /// Git failed or timed out; the write itself stands.
    Failed,
}

/// Audit record returned for each written file.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommitRecord {
    pub status: CommitStatus,
    /// Commit message used (absent when skipped).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Abbreviated commit id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
    /// Failure description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommitRecord {
    fn skipped() -> Self {
        Self {
            status: CommitStatus::Skipped,
            message: None,
            commit: None,
            error: None,
        }
    }
}

/// Git invocation failures.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("git {command} timed out after {}s", timeout.as_secs())]
    Timeout { command: String, timeout: Duration },

    #[error("git {command} exited with {code}: {stderr}")]
    Failed {
        command: String,
        code: i32,
        stderr: String,
    },
}

/// Runs git to record audit commits in the project repository.
#[derive(Debug)]
pub struct AuditCommitter {
    repo_root: PathBuf,
    timeout: Duration,
    enabled: bool,
    /// One git index per repository; concurrent commands would race on it.
    git_lock: Mutex<()>,
    last_token: AtomicI64,
}

impl AuditCommitter {
    pub fn new(repo_root: impl Into<PathBuf>, timeout: Duration, enabled: bool) -> Self {
        Self {
            repo_root: repo_root.into(),
            timeout,
            enabled,
            git_lock: Mutex::new(()),
            last_token: AtomicI64::new(0),
        }
    }

    /// Stage and commit a single written file.
    ///
    /// A write that left the file byte-identical still gets an (empty) audit
    /// commit, so every accepted request shows up in the history.
    ///
    /// Never fails: every git problem is logged and folded into the record.
    pub async fn commit(&self, path: &Path) -> CommitRecord {
        if !self.enabled {
            return CommitRecord::skipped();
        }

        let _git = self.git_lock.lock().await;
        let message = format!("{COMMIT_MESSAGE_PREFIX}{}", self.next_token());

        match self.commit_path(path, &message).await {
            Ok(commit) => {
                tracing::info!(path = %path.display(), commit = %commit, %message, "Audit commit created");
                CommitRecord {
                    status: CommitStatus::Committed,
                    message: Some(message),
                    commit: Some(commit),
                    error: None,
                }
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Git commit failed");
                CommitRecord {
                    status: CommitStatus::Failed,
                    message: Some(message),
                    commit: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    async fn commit_path(&self, path: &Path, message: &str) -> Result<String, AuditError> {
        let path = path.as_os_str();

        self.git_checked(&[OsStr::new("add"), OsStr::new("--"), path])
            .await?;

        // The pathspec keeps anything else staged in the index out of the
        // audit commit.
        self.git_checked(&[
            OsStr::new("commit"),
            OsStr::new("--allow-empty"),
            OsStr::new("-m"),
            OsStr::new(message),
            OsStr::new("--"),
            path,
        ])
        .await?;

        let head = self
            .git_checked(&[
                OsStr::new("rev-parse"),
                OsStr::new("--short"),
                OsStr::new("HEAD"),
            ])
            .await?;
        Ok(head.trim().to_string())
    }

    /// Run git and require a zero exit status; returns stdout.
    async fn git_checked(&self, args: &[&OsStr]) -> Result<String, AuditError> {
        let output = self.git(args).await?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(AuditError::Failed {
                command: command_name(args),
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }

    /// Run git with the synthetic identity, bounded by the configured timeout.
    async fn git(&self, args: &[&OsStr]) -> Result<Output, AuditError> {
        let mut command = Command::new("git");
        command
            .arg("-c")
            .arg(format!("user.name={AUDIT_AUTHOR_NAME}"))
            .arg("-c")
            .arg(format!("user.email={AUDIT_AUTHOR_EMAIL}"))
            .args(args)
            .current_dir(&self.repo_root)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(output) => Ok(output?),
            Err(_) => Err(AuditError::Timeout {
                command: command_name(args),
                timeout: self.timeout,
            }),
        }
    }

    /// Millisecond timestamp, strictly increasing within this process.
    fn next_token(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last_token
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |prev| {
                Some(now.max(prev + 1))
            })
            .unwrap_or(now);
        now.max(previous + 1)
    }
}

fn command_name(args: &[&OsStr]) -> String {
    args.first()
        .map(|a| a.to_string_lossy().into_owned())
        .unwrap_or_default()
}
