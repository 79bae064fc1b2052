//! Database configuration module.
//!
//! Holds the PostgreSQL pool settings. Reading them from the environment is
//! left to the binary that owns the process.

use std::time::Duration;

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub database_url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,

    /// Connection acquire timeout in seconds
    pub connection_timeout_secs: u64,

    /// Idle connection timeout in seconds
    pub idle_timeout_secs: u64,

    /// Maximum connection lifetime in seconds
    pub max_lifetime_secs: u64,

    /// Deadline for a single repository operation in seconds
    pub query_timeout_secs: u64,
}

impl DatabaseConfig {
    /// Default configuration for a local development database
    pub fn development() -> Self {
        Self {
            database_url: "postgres://postgres@localhost/shuttle_tourney".to_string(),
            max_connections: 10,
            min_connections: 1,
            connection_timeout_secs: 10,
            idle_timeout_secs: 600,
            max_lifetime_secs: 1800,
            query_timeout_secs: 5,
        }
    }

    /// Same settings against another database URL
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            database_url: url.into(),
            ..Self::development()
        }
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::development()
    }
}
