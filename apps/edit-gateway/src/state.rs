// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{OriginPolicy, Secret};
use crate::config::GatewayConfig;
use crate::workspace::{AuditCommitter, PathLocks, ProjectPaths};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    /// Shared API key; `None` rejects every edit request.
    pub secret: Option<Arc<Secret>>,
    pub origins: Arc<OriginPolicy>,
    pub paths: ProjectPaths,
    pub locks: PathLocks,
    pub committer: Arc<AuditCommitter>,
}

impl AppState {
    pub fn new(config: GatewayConfig, secret: Option<Secret>) -> Self {
        let paths = ProjectPaths::new(&config.project_root);
        let committer = AuditCommitter::new(
            &config.project_root,
            config.git_timeout,
            config.audit_commits,
        );
        Self {
            config: Arc::new(config),
            secret: secret.map(Arc::new),
            origins: Arc::new(OriginPolicy::default()),
            paths,
            locks: PathLocks::new(),
            committer: Arc::new(committer),
        }
    }
}
