// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults, and the [`AppConfig`] value built
//! from them once at startup. Nothing reads the environment after that.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `TOKEN_SECRET` | HMAC secret used to sign and verify tokens | Required |
//! | `TOKEN_TTL_SECS` | Token lifetime in seconds (at most one year) | `7200` |
//! | `DATA_DIR` | Directory holding the redb database | `./data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::path::PathBuf;
use std::time::Duration;

use crate::auth::{TokenConfig, MAX_TOKEN_LIFETIME_SECS};
use crate::logging::LogFormat;

/// Environment variable name for the token signing secret.
pub const TOKEN_SECRET_ENV: &str = "TOKEN_SECRET";

/// Environment variable name for the token lifetime in seconds.
pub const TOKEN_TTL_ENV: &str = "TOKEN_TTL_SECS";

/// Environment variable name for the data directory path.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Two hours.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 7200;
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Complete server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub log_format: LogFormat,
    pub token: TokenConfig,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let secret = lookup(TOKEN_SECRET_ENV)
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing(TOKEN_SECRET_ENV))?;

        let ttl_secs = match lookup(TOKEN_TTL_ENV) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 && secs <= MAX_TOKEN_LIFETIME_SECS => secs,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: TOKEN_TTL_ENV,
                        value: raw,
                        reason: "expected between 1 second and one year",
                    })
                }
            },
            None => DEFAULT_TOKEN_TTL_SECS,
        };

        let port = match lookup(PORT_ENV) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::Invalid {
                var: PORT_ENV,
                value: raw.clone(),
                reason: "expected a port number",
            })?,
            None => DEFAULT_PORT,
        };

        let log_format = match lookup(LOG_FORMAT_ENV) {
            Some(raw) => raw.parse::<LogFormat>().map_err(|_| ConfigError::Invalid {
                var: LOG_FORMAT_ENV,
                value: raw.clone(),
                reason: "expected 'json' or 'pretty'",
            })?,
            None => LogFormat::default(),
        };

        Ok(Self {
            host: lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            data_dir: PathBuf::from(
                lookup(DATA_DIR_ENV).unwrap_or_else(|| DEFAULT_DATA_DIR.to_string()),
            ),
            log_format,
            token: TokenConfig::new(secret, Duration::from_secs(ttl_secs)),
        })
    }

    /// `host:port` string for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
