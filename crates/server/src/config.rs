//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required (when `MAPA_STORE=postgres`, the default)
//! - `MAPA_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! ## Optional
//! - `MAPA_STORE` - `postgres` (default) or `memory`
//! - `MAPA_HOST` - Bind address (default: 127.0.0.1)
//! - `MAPA_PORT` - Listen port (default: 3000)
//! - `MAPA_DB_MAX_CONNECTIONS` - Pool size (default: 10)
//! - `MAPA_LOG_JSON` - Emit JSON logs when set (also enabled by `FLY_APP_NAME`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0-1.0 (default: 0.1)

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Which [`UserMapStore`](crate::db::UserMapStore) backs the API.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    /// `PostgreSQL` at the given URL.
    Postgres {
        database_url: SecretString,
        max_connections: u32,
    },
    /// In-process map; data is lost on restart.
    Memory,
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct MapaConfig {
    /// Store backend and its connection settings
    pub store: StoreBackend,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Emit JSON-formatted logs
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

impl MapaConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let store = match get_env_or_default("MAPA_STORE", "postgres").as_str() {
            "postgres" => StoreBackend::Postgres {
                database_url: get_database_url("MAPA_DATABASE_URL")?,
                max_connections: parse_env_or_default(
                    "MAPA_DB_MAX_CONNECTIONS",
                    DEFAULT_MAX_CONNECTIONS,
                )?,
            },
            "memory" => StoreBackend::Memory,
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "MAPA_STORE".to_string(),
                    format!("expected 'postgres' or 'memory', got '{other}'"),
                ));
            }
        };

        let host = parse_env_or_default("MAPA_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let port = parse_env_or_default("MAPA_PORT", 3000_u16)?;
        let log_json =
            get_optional_env("MAPA_LOG_JSON").is_some() || get_optional_env("FLY_APP_NAME").is_some();

        let sentry_sample_rate = parse_rate("SENTRY_SAMPLE_RATE", 1.0)?;
        let sentry_traces_sample_rate = parse_rate("SENTRY_TRACES_SAMPLE_RATE", 0.1)?;

        Ok(Self {
            store,
            host,
            port,
            log_json,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get database URL with fallback to generic `DATABASE_URL` (used by Fly.io postgres attach).
pub fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional_env(key).map_or(Ok(default), |raw| parse_value(key, &raw))
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Parse a sample rate and check it lies in 0.0..=1.0.
fn parse_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let rate = parse_env_or_default(key, default)?;
    check_rate(key, rate)
}

fn check_rate(key: &str, rate: f32) -> Result<f32, ConfigError> {
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_port() {
        assert_eq!(parse_value::<u16>("MAPA_PORT", "8080").unwrap(), 8080);
        let err = parse_value::<u16>("MAPA_PORT", "eighty").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref k, _) if k == "MAPA_PORT"));
    }

    #[test]
    fn test_parse_value_host() {
        let host = parse_value::<IpAddr>("MAPA_HOST", "0.0.0.0").unwrap();
        assert_eq!(host.to_string(), "0.0.0.0");
        assert!(parse_value::<IpAddr>("MAPA_HOST", "localhost:3000").is_err());
    }

    #[test]
    fn test_check_rate_bounds() {
        assert!(check_rate("SENTRY_SAMPLE_RATE", 0.0).is_ok());
        assert!(check_rate("SENTRY_SAMPLE_RATE", 1.0).is_ok());
        assert!(check_rate("SENTRY_SAMPLE_RATE", 1.5).is_err());
        assert!(check_rate("SENTRY_SAMPLE_RATE", -0.1).is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = MapaConfig {
            store: StoreBackend::Memory,
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.1,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_debug_redacts_database_url() {
        let store = StoreBackend::Postgres {
            database_url: SecretString::from("postgres://mapa:hunter2@db/mapa"),
            max_connections: 10,
        };

        let debug_output = format!("{store:?}");

        assert!(debug_output.contains("max_connections"));
        assert!(!debug_output.contains("hunter2"));
    }
}
