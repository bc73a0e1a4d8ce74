//! Server settings loaded via OrthoConfig and the resolved server config.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;

use social_backend::outbound::memory::InMemoryStore;
use social_backend::outbound::persistence::DbPool;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;

/// Process settings, from `SOCIAL_*` variables, config files, or flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SOCIAL")]
pub struct ServerSettings {
    /// Listen address.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; falls back to `DATABASE_URL`. Without one the
    /// in-memory store serves requests.
    pub database_url: Option<String>,
    /// Session signing key file.
    pub session_key_file: Option<PathBuf>,
    /// Accept a generated key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Mark session cookies `Secure`.
    #[ortho_config(default = true)]
    pub cookie_secure: bool,
    /// Upper bound on pooled connections.
    pub pool_max_size: Option<u32>,
}

/// Errors raised while resolving settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {SESSION_KEY_MIN_LEN} bytes, got {length}")]
    KeyTooShort { path: PathBuf, length: usize },
}

impl ServerSettings {
    /// Parsed listen address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|source| SettingsError::BindAddr {
            value: raw.to_owned(),
            source,
        })
    }

    /// Configured database URL, if any.
    pub fn database_url(&self) -> Option<String> {
        self.database_url
            .clone()
            .or_else(|| std::env::var("DATABASE_URL").ok())
            .filter(|url| !url.trim().is_empty())
    }

    /// Load the session key, generating one when permitted.
    ///
    /// Debug builds always tolerate a missing key file.
    pub fn session_key(&self) -> Result<Key, SettingsError> {
        let path = self
            .session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE));
        match read_key(&path) {
            Ok(key) => Ok(key),
            Err(err) if cfg!(debug_assertions) || self.session_allow_ephemeral => {
                warn!(path = %path.display(), error = %err, "using temporary session key");
                Ok(Key::generate())
            }
            Err(err) => Err(err),
        }
    }
}

fn read_key(path: &Path) -> Result<Key, SettingsError> {
    let bytes = std::fs::read(path).map_err(|source| SettingsError::KeyRead {
        path: path.to_path_buf(),
        source,
    })?;
    if bytes.len() < SESSION_KEY_MIN_LEN {
        return Err(SettingsError::KeyTooShort {
            path: path.to_path_buf(),
            length: bytes.len(),
        });
    }
    Ok(Key::derive_from(&bytes))
}

/// Backing storage chosen at startup.
#[derive(Clone)]
pub enum Storage {
    /// PostgreSQL through a connection pool.
    Postgres(DbPool),
    /// Process-local store.
    Memory(Arc<InMemoryStore>),
}

/// Resolved configuration for [`super::create_server`].
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) storage: Storage,
}

impl ServerConfig {
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        storage: Storage,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            storage,
        }
    }
}
