// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values, and the
//! [`GatewayConfig`] built from them. Configuration is loaded from the
//! environment once at startup and handed to [`crate::state::AppState`];
//! nothing reads the environment after that.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `3001` |
//! | `PROJECT_ROOT` | Project tree the gateway may edit | current directory |
//! | `EDIT_SECRET_FILE` | Operator-managed file holding the API secret | `/etc/supervisor/conf.d/supervisord_code_server.conf` |
//! | `GIT_TIMEOUT_SECS` | Upper bound for each git subprocess | `10` |
//! | `AUDIT_COMMITS` | Set to `false` to disable audit commits | `true` |
//! | `STRICT_RESOLUTION` | Set to `true` to reject ambiguous file names | `false` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Environment variable name for the bind host.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the editable project root.
pub const PROJECT_ROOT_ENV: &str = "PROJECT_ROOT";

/// Environment variable name for the secret file path.
///
/// The file is read exactly once at startup. If it is missing or holds no
/// secret, every edit request is rejected until the process restarts.
pub const SECRET_FILE_ENV: &str = "EDIT_SECRET_FILE";

/// Environment variable name for the git subprocess timeout (seconds).
pub const GIT_TIMEOUT_ENV: &str = "GIT_TIMEOUT_SECS";

/// Environment variable name toggling audit commits.
pub const AUDIT_COMMITS_ENV: &str = "AUDIT_COMMITS";

/// Environment variable name toggling strict (conflict-on-ambiguity) resolution.
pub const STRICT_RESOLUTION_ENV: &str = "STRICT_RESOLUTION";

/// Environment variable name for the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Supervisor program configuration that carries the code-server password.
pub const DEFAULT_SECRET_FILE: &str = "/etc/supervisor/conf.d/supervisord_code_server.conf";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_GIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default tracing filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Errors raised while reading configuration at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got '{value}'")]
    InvalidValue {
        name: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("project root {path} is not usable: {source}")]
    ProjectRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Gateway configuration, constructed once at startup.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    /// Canonical absolute project root.
    pub project_root: PathBuf,
    pub secret_file: PathBuf,
    pub git_timeout: Duration,
    pub audit_commits: bool,
    pub strict_resolution: bool,
    pub log_format: LogFormat,
}

impl GatewayConfig {
    /// Build the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup(PORT_ENV) {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: PORT_ENV,
                expected: "a port number",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let git_timeout = match lookup(GIT_TIMEOUT_ENV) {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidValue {
                    name: GIT_TIMEOUT_ENV,
                    expected: "a whole number of seconds",
                    value,
                })?,
            None => DEFAULT_GIT_TIMEOUT,
        };

        let audit_commits = parse_flag(AUDIT_COMMITS_ENV, lookup(AUDIT_COMMITS_ENV), true)?;
        let strict_resolution =
            parse_flag(STRICT_RESOLUTION_ENV, lookup(STRICT_RESOLUTION_ENV), false)?;

        let raw_root = lookup(PROJECT_ROOT_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let project_root = raw_root
            .canonicalize()
            .map_err(|source| ConfigError::ProjectRoot {
                path: raw_root.clone(),
                source,
            })?;

        let secret_file = lookup(SECRET_FILE_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SECRET_FILE));

        let log_format = lookup(LOG_FORMAT_ENV)
            .map(|v| LogFormat::parse(&v))
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            project_root,
            secret_file,
            git_timeout,
            audit_commits,
            strict_resolution,
            log_format,
        })
    }

    /// `host:port` string for binding the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(name: &'static str, value: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name,
            expected: "a boolean",
            value,
        }),
    }
}
