//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub database_max_connections: u32,
    pub log_level: Level,
    pub upload_dir: PathBuf,
    pub views_dir: PathBuf,
    pub public_dir: PathBuf,
    pub session_ttl_secs: i64,
    pub session_cookie_name: String,
    pub cookie_secure: bool,
    pub max_upload_bytes: usize,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Server and Database Settings ---
        let bind_address = parse_or(&lookup, "BIND_ADDRESS", "0.0.0.0:3000")?;

        let database_url =
            lookup("DATABASE_URL").ok_or_else(|| ConfigError::MissingVar("DATABASE_URL".to_string()))?;
        let database_max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", "5")?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Filesystem Layout ---
        let path_or = |key: &str, default: &str| {
            lookup(key)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default))
        };
        let upload_dir = path_or("UPLOAD_DIR", "./uploads");
        let views_dir = path_or("VIEWS_DIR", "./views");
        let public_dir = path_or("PUBLIC_DIR", "./public");

        // --- Sessions and Uploads ---
        let session_ttl_secs: i64 = parse_or(&lookup, "SESSION_TTL_SECS", "3600")?;
        if session_ttl_secs <= 0 {
            return Err(ConfigError::InvalidValue(
                "SESSION_TTL_SECS".to_string(),
                "must be greater than 0".to_string(),
            ));
        }
        let session_cookie_name =
            lookup("SESSION_COOKIE_NAME").unwrap_or_else(|| "session".to_string());
        let cookie_secure = parse_or(&lookup, "COOKIE_SECURE", "false")?;
        let max_upload_bytes = parse_or(&lookup, "MAX_UPLOAD_BYTES", "10485760")?;

        Ok(Self {
            bind_address,
            database_url,
            database_max_connections,
            log_level,
            upload_dir,
            views_dir,
            public_dir,
            session_ttl_secs,
            session_cookie_name,
            cookie_secure,
            max_upload_bytes,
        })
    }

    /// Whether the process should keep its records in memory instead of PostgreSQL.
    pub fn uses_memory_store(&self) -> bool {
        self.database_url.starts_with("memory://")
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    raw.parse::<T>()
        .map_err(|e| ConfigError::InvalidValue(key.to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config = Config::from_lookup(lookup_from(&[("DATABASE_URL", "memory://")])).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.upload_dir, PathBuf::from("./uploads"));
        assert_eq!(config.views_dir, PathBuf::from("./views"));
        assert_eq!(config.session_ttl_secs, 3600);
        assert_eq!(config.session_cookie_name, "session");
        assert!(!config.cookie_secure);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert!(config.uses_memory_store());
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(var) if var == "DATABASE_URL"));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/doubtnlearn"),
            ("BIND_ADDRESS", "127.0.0.1:8080"),
            ("SESSION_TTL_SECS", "60"),
            ("COOKIE_SECURE", "true"),
            ("UPLOAD_DIR", "/srv/uploads"),
        ]))
        .unwrap();
        assert_eq!(config.bind_address.port(), 8080);
        assert_eq!(config.session_ttl_secs, 60);
        assert!(config.cookie_secure);
        assert_eq!(config.upload_dir, PathBuf::from("/srv/uploads"));
        assert!(!config.uses_memory_store());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let bad_port = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "memory://"),
            ("BIND_ADDRESS", "nowhere"),
        ]));
        assert!(matches!(bad_port, Err(ConfigError::InvalidValue(key, _)) if key == "BIND_ADDRESS"));

        let zero_ttl = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "memory://"),
            ("SESSION_TTL_SECS", "0"),
        ]));
        assert!(matches!(zero_ttl, Err(ConfigError::InvalidValue(key, _)) if key == "SESSION_TTL_SECS"));

        let bad_level = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "memory://"),
            ("RUST_LOG", "chatty"),
        ]));
        assert!(bad_level.is_err());
    }
}
