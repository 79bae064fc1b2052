//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use shuttle_tourney::db::DatabaseConfig;
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;

/// Default HTTP bind address
pub const DEFAULT_BIND: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
    6969,
);

/// Where tournaments are stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process memory, lost on restart
    #[default]
    Memory,
    /// PostgreSQL via `DATABASE_URL`
    Postgres,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "mem" => Ok(StorageBackend::Memory),
            "postgres" | "postgresql" | "pg" => Ok(StorageBackend::Postgres),
            other => Err(ConfigError::Invalid {
                var: "STORAGE_BACKEND".to_string(),
                reason: format!("Unknown backend '{other}', expected 'memory' or 'postgres'"),
            }),
        }
    }
}

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Storage backend
    pub storage: StorageBackend,
    /// Database configuration, used by the postgres backend
    pub database: DatabaseConfig,
    /// Prometheus exporter address, disabled when unset
    pub metrics_bind: Option<SocketAddr>,
    /// Load the demo tournament on startup
    pub seed_demo_data: bool,
}

/// Values given on the command line, taking priority over the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind: Option<SocketAddr>,
    pub database_url: Option<String>,
    pub storage: Option<StorageBackend>,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but cannot be parsed
    pub fn from_env(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        Self::from_lookup(overrides, |key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(overrides: ConfigOverrides, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind = match overrides.bind {
            Some(bind) => bind,
            None => parse_required_or(&lookup, "SERVER_BIND", DEFAULT_BIND)?,
        };

        let storage = match overrides.storage {
            Some(storage) => storage,
            None => lookup("STORAGE_BACKEND")
                .map(|v| v.parse())
                .transpose()?
                .unwrap_or_default(),
        };

        let defaults = DatabaseConfig::development();
        let database = DatabaseConfig {
            database_url: overrides
                .database_url
                .or_else(|| lookup("DATABASE_URL"))
                .unwrap_or_default(),
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.max_connections),
            min_connections: parse_or(&lookup, "DB_MIN_CONNECTIONS", defaults.min_connections),
            connection_timeout_secs: parse_or(
                &lookup,
                "DB_CONNECTION_TIMEOUT_SECS",
                defaults.connection_timeout_secs,
            ),
            idle_timeout_secs: parse_or(
                &lookup,
                "DB_IDLE_TIMEOUT_SECS",
                defaults.idle_timeout_secs,
            ),
            max_lifetime_secs: parse_or(
                &lookup,
                "DB_MAX_LIFETIME_SECS",
                defaults.max_lifetime_secs,
            ),
            query_timeout_secs: parse_or(
                &lookup,
                "DB_QUERY_TIMEOUT_SECS",
                defaults.query_timeout_secs,
            ),
        };

        let metrics_bind = lookup("METRICS_BIND")
            .filter(|v| !v.trim().is_empty())
            .map(|v| {
                v.parse().map_err(|_| ConfigError::Invalid {
                    var: "METRICS_BIND".to_string(),
                    reason: format!("'{v}' is not a socket address"),
                })
            })
            .transpose()?;

        Ok(ServerConfig {
            bind,
            storage,
            database,
            metrics_bind,
            seed_demo_data: parse_or(&lookup, "SEED_DEMO_DATA", false),
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage == StorageBackend::Postgres
            && self.database.database_url.trim().is_empty()
        {
            return Err(ConfigError::MissingRequired {
                var: "DATABASE_URL".to_string(),
                hint: "Set DATABASE_URL or pass --db-url when STORAGE_BACKEND=postgres".to_string(),
            });
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid {
                var: "DB_MAX_CONNECTIONS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Invalid {
                var: "DB_MIN_CONNECTIONS".to_string(),
                reason: format!(
                    "Cannot exceed max connections ({})",
                    self.database.max_connections
                ),
            });
        }

        if self.database.query_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "DB_QUERY_TIMEOUT_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Parse a variable, falling back to the default when unset or malformed
fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

/// Parse a variable, falling back to the default only when unset
fn parse_required_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
            var: key.to_string(),
            reason: format!("Cannot parse '{v}'"),
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(ConfigOverrides::default(), |key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind, DEFAULT_BIND);
        assert_eq!(config.storage, StorageBackend::Memory);
        assert!(config.metrics_bind.is_none());
        assert!(!config.seed_demo_data);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_values() {
        let config = load(&[
            ("SERVER_BIND", "0.0.0.0:8080"),
            ("STORAGE_BACKEND", "Postgres"),
            ("DATABASE_URL", "postgres://localhost/tourney"),
            ("DB_MAX_CONNECTIONS", "25"),
            ("METRICS_BIND", "127.0.0.1:9090"),
            ("SEED_DEMO_DATA", "true"),
        ])
        .unwrap();

        assert_eq!(config.bind, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert_eq!(config.database.max_connections, 25);
        assert_eq!(config.metrics_bind, Some("127.0.0.1:9090".parse().unwrap()));
        assert!(config.seed_demo_data);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides_win() {
        let env: HashMap<String, String> =
            HashMap::from([("SERVER_BIND".to_string(), "0.0.0.0:8080".to_string())]);
        let overrides = ConfigOverrides {
            bind: Some("127.0.0.1:7000".parse().unwrap()),
            database_url: Some("postgres://cli/db".to_string()),
            storage: Some(StorageBackend::Postgres),
        };

        let config = ServerConfig::from_lookup(overrides, |key| env.get(key).cloned()).unwrap();
        assert_eq!(config.bind.port(), 7000);
        assert_eq!(config.database.database_url, "postgres://cli/db");
        assert_eq!(config.storage, StorageBackend::Postgres);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            load(&[("SERVER_BIND", "not-an-address")]),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            load(&[("STORAGE_BACKEND", "redis")]),
            Err(ConfigError::Invalid { .. })
        ));
        assert!(matches!(
            load(&[("METRICS_BIND", "9090")]),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn test_postgres_requires_url() {
        let config = load(&[("STORAGE_BACKEND", "postgres")]).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingRequired { ref var, .. } if var == "DATABASE_URL"
        ));
    }

    #[test]
    fn test_zero_pool_rejected() {
        let config = load(&[("DB_MAX_CONNECTIONS", "0"), ("DB_MIN_CONNECTIONS", "0")]).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref var, .. } if var == "DB_MAX_CONNECTIONS"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingRequired {
            var: "DATABASE_URL".to_string(),
            hint: "Use --db-url".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("DATABASE_URL"));
        assert!(msg.contains("Use --db-url"));
    }
}
