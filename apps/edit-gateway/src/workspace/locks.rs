// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-path write serialisation.
//!
//! Two edit requests for the same file would otherwise interleave their
//! read-modify-write sequences and lose an update. The gateway holds the
//! guard for a resolved path from the read through the audit commit.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of one async mutex per resolved path.
#[derive(Debug, Clone, Default)]
pub struct PathLocks {
    inner: Arc<Mutex<HashMap<PathBuf, Arc<AsyncMutex<()>>>>>,
}

impl PathLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `path`.
    pub async fn acquire(&self, path: &Path) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            // Drop entries nobody holds or waits on.
            map.retain(|_, lock| Arc::strong_count(lock) > 1);
            map.entry(path.to_path_buf()).or_default().clone()
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_path_is_serialised() {
        let locks = PathLocks::new();
        let path = PathBuf::from("/app/src/App.js");

        let guard = locks.acquire(&path).await;

        let contender = {
            let locks = locks.clone();
            let path = path.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(&path).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!contender.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .expect("contender acquires after release")
            .unwrap();
    }

    #[tokio::test]
    async fn different_paths_do_not_block() {
        let locks = PathLocks::new();
        let _a = locks.acquire(Path::new("/app/src/A.js")).await;

        let b = tokio::time::timeout(Duration::from_secs(1), locks.acquire(Path::new("/app/src/B.js"))).await;
        assert!(b.is_ok());
    }

    #[tokio::test]
    async fn released_entries_are_pruned() {
        let locks = PathLocks::new();
        for name in ["A", "B", "C"] {
            let _guard = locks.acquire(&PathBuf::from(format!("/app/{name}.js"))).await;
        }

        let _last = locks.acquire(Path::new("/app/D.js")).await;
        assert_eq!(locks.inner.lock().unwrap().len(), 1);
    }
}
