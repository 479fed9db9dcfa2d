//! Application configuration module
//!
//! [`AppConfig`] is assembled from three layers, later layers winning:
//!
//! 1. built-in defaults,
//! 2. an optional TOML file (`OASIS_CONFIG`, else `oasis.toml` when present),
//! 3. environment variables (`SERVER_PORT`, `DATABASE_URL`, `JWT_SECRET`, ...).
//!
//! The environment is read through a lookup closure so tests can feed a map
//! instead of mutating process state.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Secret used when `JWT_SECRET` is missing in debug builds.
pub const DEVELOPMENT_JWT_SECRET: &str = "oasis-development-secret-change-me";

const DEFAULT_CONFIG_FILE: &str = "oasis.toml";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// TCP port the HTTP server binds on all interfaces
    pub server_port: u16,
    /// sqlx connection string, e.g. `sqlite://oasis.db?mode=rwc`
    pub database_url: String,
    /// HMAC secret for session tokens
    pub jwt_secret: String,
    /// Session token lifetime in days
    pub token_ttl_days: u32,
    /// How many recent chat posts a chat listing returns
    pub chat_history_limit: u32,
    /// Directory served at `/static`
    pub static_dir: PathBuf,
    /// Upper bound for uploaded profile photos (data URLs), in bytes
    pub max_photo_bytes: usize,
    /// bcrypt work factor for new password hashes (4..=31)
    pub password_hash_cost: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_port: 3000,
            database_url: "sqlite://oasis.db?mode=rwc".to_string(),
            jwt_secret: String::new(),
            token_ttl_days: 30,
            chat_history_limit: 50,
            static_dir: PathBuf::from("public"),
            max_photo_bytes: 1024 * 1024,
            password_hash_cost: 12,
        }
    }
}

/// Subset of keys accepted in the TOML file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    server_port: Option<u16>,
    database_url: Option<String>,
    jwt_secret: Option<String>,
    token_ttl_days: Option<u32>,
    chat_history_limit: Option<u32>,
    static_dir: Option<PathBuf>,
    max_photo_bytes: Option<usize>,
    password_hash_cost: Option<u32>,
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load from the process environment and the optional config file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_sources(|key| std::env::var(key).ok())
    }

    /// Load using `env` as the environment. The config file is located with
    /// the same lookup (`OASIS_CONFIG`).
    pub fn from_sources<F>(env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = AppConfigBuilder::default();

        let file = match env("OASIS_CONFIG") {
            Some(path) => Some(PathBuf::from(path)),
            None => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
        };
        if let Some(path) = file {
            builder = builder.merge_file(&path)?;
        }

        if let Some(port) = env("SERVER_PORT") {
            builder.server_port = Some(parse_value("SERVER_PORT", &port)?);
        }
        if let Some(url) = env("DATABASE_URL") {
            builder.database_url = Some(url);
        }
        if let Some(secret) = env("JWT_SECRET") {
            builder.jwt_secret = Some(secret);
        }
        if let Some(days) = env("TOKEN_TTL_DAYS") {
            builder.token_ttl_days = Some(parse_value("TOKEN_TTL_DAYS", &days)?);
        }
        if let Some(limit) = env("CHAT_HISTORY_LIMIT") {
            builder.chat_history_limit = Some(parse_value("CHAT_HISTORY_LIMIT", &limit)?);
        }
        if let Some(dir) = env("STATIC_DIR") {
            builder.static_dir = Some(PathBuf::from(dir));
        }
        if let Some(bytes) = env("MAX_PHOTO_BYTES") {
            builder.max_photo_bytes = Some(parse_value("MAX_PHOTO_BYTES", &bytes)?);
        }
        if let Some(cost) = env("PASSWORD_HASH_COST") {
            builder.password_hash_cost = Some(parse_value("PASSWORD_HASH_COST", &cost)?);
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::MissingValue("database_url"));
        }
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingValue("jwt_secret"));
        }
        if self.token_ttl_days == 0 {
            return Err(ConfigError::InvalidValue {
                key: "token_ttl_days",
                value: "0".to_string(),
            });
        }
        if self.chat_history_limit == 0 {
            return Err(ConfigError::InvalidValue {
                key: "chat_history_limit",
                value: "0".to_string(),
            });
        }
        if !(4..=31).contains(&self.password_hash_cost) {
            return Err(ConfigError::InvalidValue {
                key: "password_hash_cost",
                value: self.password_hash_cost.to_string(),
            });
        }
        Ok(())
    }

    /// Token lifetime in seconds.
    pub fn token_ttl_secs(&self) -> u64 {
        u64::from(self.token_ttl_days) * 24 * 60 * 60
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    server_port: Option<u16>,
    database_url: Option<String>,
    jwt_secret: Option<String>,
    token_ttl_days: Option<u32>,
    chat_history_limit: Option<u32>,
    static_dir: Option<PathBuf>,
    max_photo_bytes: Option<usize>,
    password_hash_cost: Option<u32>,
}

impl AppConfigBuilder {
    pub fn server_port(mut self, port: u16) -> Self {
        self.server_port = Some(port);
        self
    }

    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = Some(secret.into());
        self
    }

    pub fn token_ttl_days(mut self, days: u32) -> Self {
        self.token_ttl_days = Some(days);
        self
    }

    pub fn chat_history_limit(mut self, limit: u32) -> Self {
        self.chat_history_limit = Some(limit);
        self
    }

    pub fn static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }

    pub fn max_photo_bytes(mut self, bytes: usize) -> Self {
        self.max_photo_bytes = Some(bytes);
        self
    }

    pub fn password_hash_cost(mut self, cost: u32) -> Self {
        self.password_hash_cost = Some(cost);
        self
    }

    /// Fill unset values from a TOML file. Values already set on the
    /// builder are kept.
    pub fn merge_file(mut self, path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: FileConfig = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        self.server_port = self.server_port.or(file.server_port);
        self.database_url = self.database_url.or(file.database_url);
        self.jwt_secret = self.jwt_secret.or(file.jwt_secret);
        self.token_ttl_days = self.token_ttl_days.or(file.token_ttl_days);
        self.chat_history_limit = self.chat_history_limit.or(file.chat_history_limit);
        self.static_dir = self.static_dir.or(file.static_dir);
        self.max_photo_bytes = self.max_photo_bytes.or(file.max_photo_bytes);
        self.password_hash_cost = self.password_hash_cost.or(file.password_hash_cost);
        Ok(self)
    }

    /// Build the configuration
    ///
    /// A missing JWT secret falls back to [`DEVELOPMENT_JWT_SECRET`] in debug
    /// builds and is an error in release builds.
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let defaults = AppConfig::default();

        let jwt_secret = match self.jwt_secret.filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None if cfg!(debug_assertions) => {
                tracing::warn!("[Config] JWT_SECRET not set, using the development secret");
                DEVELOPMENT_JWT_SECRET.to_string()
            }
            None => return Err(ConfigError::MissingValue("jwt_secret")),
        };

        let config = AppConfig {
            server_port: self.server_port.unwrap_or(defaults.server_port),
            database_url: self.database_url.unwrap_or(defaults.database_url),
            jwt_secret,
            token_ttl_days: self.token_ttl_days.unwrap_or(defaults.token_ttl_days),
            chat_history_limit: self.chat_history_limit.unwrap_or(defaults.chat_history_limit),
            static_dir: self.static_dir.unwrap_or(defaults.static_dir),
            max_photo_bytes: self.max_photo_bytes.unwrap_or(defaults.max_photo_bytes),
            password_hash_cost: self.password_hash_cost.unwrap_or(defaults.password_hash_cost),
        };
        config.validate()?;
        Ok(config)
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
