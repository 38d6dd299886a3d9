// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Access control for the edit endpoint.
//!
//! ## Auth Flow
//!
//! 1. At startup the operator secret is read once from the supervisor
//!    configuration of the code-server
//! 2. The visual-editing client sends `x-api-key: <secret>`
//! 3. The gateway:
//!    - rejects every request if no secret was loaded
//!    - compares the header to the secret in constant time
//!    - echoes CORS headers only for allow-listed origins
//!
//! ## Security
//!
//! - `/ping` and the API docs are the only unauthenticated routes
//! - The credential is checked before the request body is read
//! - `Origin` never grants access, it only gates CORS response headers

pub mod error;
pub mod extractor;
pub mod origin;
pub mod secret;

pub use error::AuthError;
pub use extractor::{ApiKey, API_KEY_HEADER};
pub use origin::OriginPolicy;
pub use secret::{load_secret, Secret};
