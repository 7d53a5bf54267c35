//! Database connection pool construction
//!
//! Uses sqlx PgPool with explicit connection limits. The pool is built
//! lazily: construction only validates the URL, the first query opens a
//! connection.

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use wirestack_core::Environment;

use crate::error::DbError;

/// Default maximum connections for the pool.
/// Kept low for a single-process scaffold.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// How long a query waits for a free connection before failing
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Environment variable holding the connection string
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Pool settings
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    /// Decides whether the pool is cached in the process-global slot
    pub environment: Environment,
}

impl DbConfig {
    /// Config for `database_url` with default limits and the detected environment
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
            environment: Environment::from_env(),
        }
    }

    /// Config from `DATABASE_URL`
    pub fn from_env() -> Result<Self, DbError> {
        let url = std::env::var(DATABASE_URL_VAR)
            .map_err(|_| DbError::Config(format!("{} is not set", DATABASE_URL_VAR)))?;
        Ok(Self::new(url))
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }
}

/// Create a PostgreSQL connection pool.
///
/// Must be called from within a Tokio runtime (sqlx spawns its
/// maintenance task here).
///
/// # Errors
///
/// Returns an error if the connection string cannot be parsed or the
/// connection limit is zero. No connection is attempted.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&DbConfig::new("postgres://localhost/wirestack"))?;
/// ```
pub fn create_pool(config: &DbConfig) -> Result<PgPool, DbError> {
    if config.max_connections == 0 {
        return Err(DbError::Config("max_connections must be at least 1".into()));
    }

    let options: PgConnectOptions = config.database_url.parse()?;

    Ok(PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_lazy_with(options))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = DbConfig::new("postgres://localhost/wirestack")
            .with_max_connections(2)
            .with_acquire_timeout(Duration::from_secs(1))
            .with_environment(Environment::Production);

        assert_eq!(config.max_connections, 2);
        assert_eq!(config.acquire_timeout, Duration::from_secs(1));
        assert!(config.environment.is_production());
    }

    #[tokio::test]
    async fn lazy_pool_does_not_connect() {
        // Nothing listens on port 1; construction must still succeed.
        let config = DbConfig::new("postgres://nobody@127.0.0.1:1/none");
        let pool = create_pool(&config).expect("lazy pool");
        assert_eq!(pool.size(), 0);
    }

    #[tokio::test]
    async fn rejects_zero_connections() {
        let config = DbConfig::new("postgres://localhost/wirestack").with_max_connections(0);
        assert!(matches!(create_pool(&config), Err(DbError::Config(_))));
    }

    #[tokio::test]
    async fn rejects_malformed_url() {
        let config = DbConfig::new("definitely not a url");
        assert!(create_pool(&config).is_err());
    }

    // Integration tests require a real database
    // Run with: DATABASE_URL=postgres://... cargo test -p wirestack-db -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn pool_acquires_connection() {
        let config = DbConfig::from_env().expect("DATABASE_URL required");
        let pool = create_pool(&config).expect("pool creation failed");

        let result: (i32,) = sqlx::query_as("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("query failed");

        assert_eq!(result.0, 1);
    }
}
