// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Project Workspace Module
//!
//! Everything the gateway does to the project tree goes through this module:
//! finding the file a logical name refers to, proving the file is inside the
//! sandbox, replacing its content safely, and recording the audit commit.
//!
//! ## Sandbox
//!
//! - Targets must be strictly inside the project root
//! - Nothing under `node_modules` or `public` is ever written
//! - Symlinks that point outside the root are rejected
//! - Logical names cannot contain separators, `..`, or control characters
//!
//! ## Layout
//!
//! ```text
//! <root>/
//!   src/
//!     components/{name}.js   # fallback location for unknown names
//!     **/{name}.{js,jsx,ts,tsx}
//!   node_modules/            # excluded
//!   public/                  # excluded
//!   .git/ build/ dist/ coverage/   # excluded
//! ```

pub mod audit;
pub mod error;
pub mod locks;
pub mod paths;
pub mod resolver;
pub mod sandbox;
pub mod writer;

pub use audit::{AuditCommitter, CommitRecord, CommitStatus};
pub use error::{WorkspaceError, WorkspaceResult};
pub use locks::PathLocks;
pub use paths::ProjectPaths;
pub use resolver::{resolve, validate_file_name, ResolvedTarget};
pub use sandbox::validate_target;
pub use writer::{replace, ReplaceOutcome};
