//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Connection pool and startup retry settings.
#[derive(Clone, Debug)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub connect_max_attempts: u32,
    pub connect_base_delay: Duration,
    pub run_migrations: bool,
}

/// Periods for the database keep-alive timers.
#[derive(Clone, Debug)]
pub struct KeepAliveSettings {
    pub ping_interval: Duration,
    pub health_check_interval: Duration,
    pub retry_attempts: u32,
    pub retry_wait: Duration,
}

/// Target and timing for the outbound self-ping.
#[derive(Clone, Debug)]
pub struct SelfPingSettings {
    /// `None` disables the self-ping.
    pub url: Option<String>,
    pub interval: Duration,
    pub timeout: Duration,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub app_version: String,
    pub default_api_version: String,
    pub database: DatabaseSettings,
    pub keep_alive: KeepAliveSettings,
    pub self_ping: SelfPingSettings,
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
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        // --- Server ---
        let host = var("BIND_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = parse_or(&var, "PORT", 3002)?;
        let bind_address = format!("{}:{}", host, port)
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_HOST".to_string(), e.to_string()))?;

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let app_version = var("APP_VERSION").unwrap_or_else(|| "unknown".to_string());
        let default_api_version = var("DEFAULT_API_VERSION")
            .map(|v| v.trim().to_string())
            .unwrap_or_else(|| "2".to_string());
        // Version 1 is the raw shape and is only served on explicit request.
        if default_api_version == "1" {
            return Err(ConfigError::InvalidValue(
                "DEFAULT_API_VERSION".to_string(),
                "version 1 cannot be the default".to_string(),
            ));
        }
        if default_api_version.is_empty()
            || !default_api_version.bytes().all(|b| b.is_ascii_graphic())
        {
            return Err(ConfigError::InvalidValue(
                "DEFAULT_API_VERSION".to_string(),
                format!("'{}' is not a valid version token", default_api_version),
            ));
        }

        // --- Database ---
        let database = DatabaseSettings {
            url: var("DATABASE_URL")
                .ok_or_else(|| ConfigError::MissingVar("DATABASE_URL".to_string()))?,
            max_connections: parse_or(&var, "DB_MAX_CONNECTIONS", 5)?,
            connect_max_attempts: parse_or(&var, "DB_CONNECT_MAX_ATTEMPTS", 5)?,
            connect_base_delay: Duration::from_millis(parse_or(
                &var,
                "DB_CONNECT_BASE_DELAY_MS",
                1000,
            )?),
            run_migrations: parse_or(&var, "RUN_MIGRATIONS", false)?,
        };

        // --- Background tasks ---
        let keep_alive = KeepAliveSettings {
            ping_interval: secs(parse_or(&var, "KEEP_ALIVE_INTERVAL_SECS", 300)?),
            health_check_interval: secs(parse_or(&var, "HEALTH_CHECK_INTERVAL_SECS", 86_400)?),
            retry_attempts: parse_or(&var, "HEALTH_CHECK_RETRY_ATTEMPTS", 10)?,
            retry_wait: secs(parse_or(&var, "HEALTH_CHECK_RETRY_WAIT_SECS", 30)?),
        };

        let self_ping = SelfPingSettings {
            url: var("SELF_PING_URL"),
            interval: secs(parse_or(&var, "SELF_PING_INTERVAL_SECS", 600)?),
            timeout: secs(parse_or(&var, "SELF_PING_TIMEOUT_SECS", 30)?),
        };

        for (name, period) in [
            ("KEEP_ALIVE_INTERVAL_SECS", keep_alive.ping_interval),
            ("HEALTH_CHECK_INTERVAL_SECS", keep_alive.health_check_interval),
            ("SELF_PING_INTERVAL_SECS", self_ping.interval),
        ] {
            if period.is_zero() {
                return Err(ConfigError::InvalidValue(
                    name.to_string(),
                    "interval must be greater than zero".to_string(),
                ));
            }
        }

        Ok(Self {
            bind_address,
            log_level,
            app_version,
            default_api_version,
            database,
            keep_alive,
            self_ping,
        })
    }
}

fn secs(value: u64) -> Duration {
    Duration::from_secs(value)
}

fn parse_or<T, F>(var: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_set() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/p")]))
            .expect("config should load");

        assert_eq!(config.bind_address, "0.0.0.0:3002".parse().unwrap());
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.app_version, "unknown");
        assert_eq!(config.default_api_version, "2");
        assert_eq!(config.database.connect_max_attempts, 5);
        assert_eq!(config.database.connect_base_delay, Duration::from_secs(1));
        assert!(!config.database.run_migrations);
        assert_eq!(config.keep_alive.ping_interval, Duration::from_secs(300));
        assert_eq!(config.keep_alive.health_check_interval, Duration::from_secs(86_400));
        assert_eq!(config.keep_alive.retry_attempts, 10);
        assert_eq!(config.keep_alive.retry_wait, Duration::from_secs(30));
        assert_eq!(config.self_ping.url, None);
        assert_eq!(config.self_ping.interval, Duration::from_secs(600));
        assert_eq!(config.self_ping.timeout, Duration::from_secs(30));
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVar(name) if name == "DATABASE_URL"));
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/p"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(name, _) if name == "PORT"));
    }

    #[test]
    fn zero_intervals_are_rejected() {
        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/p"),
            ("SELF_PING_INTERVAL_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidValue(name, _) if name == "SELF_PING_INTERVAL_SECS")
        );
    }

    #[test]
    fn raw_version_cannot_be_the_default() {
        for token in ["1", " 1 ", "", "v 2"] {
            let err = Config::from_lookup(lookup(&[
                ("DATABASE_URL", "postgres://localhost/p"),
                ("DEFAULT_API_VERSION", token),
            ]))
            .unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidValue(ref name, _) if name == "DEFAULT_API_VERSION"),
                "{:?} accepted",
                token
            );
        }

        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/p"),
            ("DEFAULT_API_VERSION", "3"),
        ]))
        .unwrap();
        assert_eq!(config.default_api_version, "3");
    }

    #[test]
    fn empty_self_ping_url_disables_the_feature() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/p"),
            ("SELF_PING_URL", "  "),
            ("APP_VERSION", "1.4.0"),
        ]))
        .unwrap();
        assert_eq!(config.self_ping.url, None);
        assert_eq!(config.app_version, "1.4.0");
    }

    #[test]
    #[serial]
    fn from_env_reads_process_environment() {
        std::env::set_var("DATABASE_URL", "postgres://env-host/portfolio");
        std::env::set_var("PORT", "4000");
        let config = Config::from_env();
        std::env::remove_var("DATABASE_URL");
        std::env::remove_var("PORT");

        let config = config.expect("config should load");
        assert_eq!(config.database.url, "postgres://env-host/portfolio");
        assert_eq!(config.bind_address.port(), 4000);
    }
}
