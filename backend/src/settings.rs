//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `MATCHMAKING_*` environment variables and an
//! optional configuration file, in that order of precedence.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::matching::MATCH_CACHE_CAPACITY;
use crate::outbound::persistence::DEFAULT_POOL_MAX_SIZE;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Settings that failed validation after loading.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// `bind_addr` is not a socket address.
    #[error("invalid bind address {value:?}: {message}")]
    InvalidBindAddr {
        /// Configured value.
        value: String,
        /// Parser message.
        message: String,
    },
    /// A size setting was zero.
    #[error("{field} must be greater than zero")]
    ZeroSize {
        /// Offending setting.
        field: &'static str,
    },
}

/// Configuration for the matchmaking server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "MATCHMAKING")]
pub struct Settings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without it the in-process store is used.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Number of matches kept in each user's cache.
    pub cache_capacity: Option<usize>,
    /// File holding the session cookie signing key.
    pub session_key_file: Option<PathBuf>,
    /// Mark session cookies `Secure`. Defaults to `true`.
    pub session_cookie_secure: Option<bool>,
    /// Fall back to a generated session key when the key file is missing.
    pub session_allow_ephemeral: Option<bool>,
}

fn non_zero<T: PartialEq + Default + Copy>(
    value: Option<T>,
    default: T,
    field: &'static str,
) -> Result<T, SettingsError> {
    match value {
        Some(v) if v == T::default() => Err(SettingsError::ZeroSize { field }),
        Some(v) => Ok(v),
        None => Ok(default),
    }
}

impl Settings {
    /// Parsed listen address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::InvalidBindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Configured database URL, if any.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref()
    }

    /// Pool size, defaulting to [`DEFAULT_POOL_MAX_SIZE`].
    pub fn pool_max_size(&self) -> Result<u32, SettingsError> {
        non_zero(self.pool_max_size, DEFAULT_POOL_MAX_SIZE, "pool_max_size")
    }

    /// Match cache capacity, defaulting to [`MATCH_CACHE_CAPACITY`].
    pub fn cache_capacity(&self) -> Result<usize, SettingsError> {
        non_zero(self.cache_capacity, MATCH_CACHE_CAPACITY, "cache_capacity")
    }

    /// Session key path, defaulting to the mounted secret.
    pub fn session_key_file(&self) -> &Path {
        self.session_key_file
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_SESSION_KEY_FILE))
    }

    /// Whether session cookies carry `Secure`; on unless disabled.
    pub fn session_cookie_secure(&self) -> bool {
        self.session_cookie_secure.unwrap_or(true)
    }

    /// Whether a missing key file may fall back to a generated key.
    pub fn session_allow_ephemeral(&self) -> bool {
        self.session_allow_ephemeral.unwrap_or(false)
    }
}
