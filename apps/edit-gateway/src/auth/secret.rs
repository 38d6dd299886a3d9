// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Operator-managed API secret.
//!
//! The secret lives in the supervisor program configuration of the
//! code-server (`environment=PASSWORD="..."`). It is read once at startup
//! and never refreshed; a missing secret locks the edit endpoint until the
//! process restarts.

use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use sha2::{Digest, Sha256};

static PASSWORD_ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"PASSWORD="([^"]+)""#).expect("valid password regex"));

/// The shared API secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Compare a presented credential against the secret.
    ///
    /// Both sides are hashed to fixed-length digests first, then compared
    /// without early exit, so timing depends on neither length nor content.
    pub fn matches(&self, candidate: &str) -> bool {
        let expected = Sha256::digest(self.0.as_bytes());
        let presented = Sha256::digest(candidate.as_bytes());

        expected
            .iter()
            .zip(presented.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

/// Extract the secret from supervisor configuration text.
pub fn parse_secret(conf: &str) -> Option<Secret> {
    PASSWORD_ASSIGNMENT
        .captures(conf)
        .and_then(|caps| caps.get(1))
        .map(|m| Secret::new(m.as_str()))
}

/// Read the secret file once.
///
/// Returns `None` when the file cannot be read or holds no password; the
/// caller keeps running and rejects every authenticated request.
pub fn load_secret(path: &Path) -> Option<Secret> {
    let conf = match fs::read_to_string(path) {
        Ok(conf) => conf,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Secret file unreadable, edits disabled");
            return None;
        }
    };

    let secret = parse_secret(&conf);
    if secret.is_none() {
        tracing::warn!(path = %path.display(), "No PASSWORD entry in secret file, edits disabled");
    }
    secret
}
