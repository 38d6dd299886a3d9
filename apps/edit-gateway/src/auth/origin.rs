// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Origin allow-list for cross-origin editing clients.
//!
//! The policy only decides whether CORS headers are echoed back. It never
//! authorizes a request; that is the job of the API key.

use regex::Regex;

/// Anchored patterns for allowed `Origin` values.
const ALLOWED_ORIGIN_PATTERNS: &[&str] = &[
    // Local development on any port
    r"^https?://(localhost|127\.0\.0\.1)(:\d+)?$",
    // Production frontend and backend
    r"^https://ai-money-agent-frontend\.onrender\.com$",
    r"^https://ai-money-agent-backend\.onrender\.com$",
    // Editing platform
    r"^https://([a-zA-Z0-9-]+\.)*emergent\.sh$",
    r"^https://([a-zA-Z0-9-]+\.)*emergentagent\.com$",
    // Cloud hosting
    r"^https://([a-zA-Z0-9-]+\.)*appspot\.com$",
];

/// Fixed origin allow-list.
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    patterns: Vec<Regex>,
}

impl Default for OriginPolicy {
    fn default() -> Self {
        let patterns = ALLOWED_ORIGIN_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("origin patterns are valid"))
            .collect();
        Self { patterns }
    }
}

impl OriginPolicy {
    /// Whether an `Origin` header value may receive CORS headers.
    ///
    /// An absent origin is always denied.
    pub fn is_allowed(&self, origin: Option<&str>) -> bool {
        match origin {
            Some(origin) => self.patterns.iter().any(|p| p.is_match(origin)),
            None => false,
        }
    }
}
