//! Runtime configuration, read from the environment.

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use thiserror::Error;
use tracing::{info, warn};

const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_POLL_TIMEOUT_MS: &str = "250";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmsConfig {
    /// Bind address of the admin HTTP transport (`CMS_HTTP_ADDR`).
    pub http_addr: String,
    /// Default timeout for `ReorderSession::wait` (`CMS_POLL_TIMEOUT_MS`).
    pub poll_timeout_ms: u64,
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            poll_timeout_ms: 250,
        }
    }
}

impl CmsConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            http_addr: try_load(&lookup, "CMS_HTTP_ADDR", DEFAULT_HTTP_ADDR)?,
            poll_timeout_ms: try_load(&lookup, "CMS_POLL_TIMEOUT_MS", DEFAULT_POLL_TIMEOUT_MS)?,
        })
    }
}

fn try_load<T, F>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }
    })
}
