// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Visual Edit Gateway - Sandboxed Source Editing Service
//!
//! This crate accepts authenticated edit requests from a visual-editing
//! client and applies them to JavaScript/TypeScript source files inside a
//! project tree. Each write goes through a syntax-tree round trip, a
//! backup-protected atomic replace, and an audit commit.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Shared API key and origin policy
//! - `shutdown` - Ctrl-C and SIGTERM handling
//! - `transform` - tree-sitter parsing and span edits
//! - `workspace` - File resolution, sandboxing, writing and audit commits

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod shutdown;
pub mod state;
pub mod transform;
pub mod workspace;
