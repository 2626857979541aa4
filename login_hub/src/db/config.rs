//! Connection settings for the account store.

use std::env;
use std::time::Duration;

/// Pool settings for the accounts database.
///
/// The login workload is short point queries on a single table, so the only
/// knobs exposed are the pool size and how long a request may wait for a
/// connection.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub database_url: String,

    /// Upper bound on pooled connections
    pub max_connections: u32,

    /// How long a request may wait for a free connection
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `DATABASE_URL`: PostgreSQL connection string
    /// - `DB_MAX_CONNECTIONS`: Maximum pool size (default: 20)
    /// - `DB_ACQUIRE_TIMEOUT`: Acquire timeout in seconds (default: 10)
    ///
    /// # Panics
    ///
    /// Panics if `DATABASE_URL` is not set
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .expect("DB_MAX_CONNECTIONS must be a valid u32"),
            acquire_timeout: Duration::from_secs(
                env::var("DB_ACQUIRE_TIMEOUT")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .expect("DB_ACQUIRE_TIMEOUT must be a valid u64"),
            ),
        }
    }

    /// Create a default configuration for development
    ///
    /// Uses `postgres://postgres@localhost/login_hub` as the database URL
    pub fn development() -> Self {
        Self {
            database_url: "postgres://postgres@localhost/login_hub".to_string(),
            max_connections: 20,
            acquire_timeout: Duration::from_secs(10),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::development()
    }
}
