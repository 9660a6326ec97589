//! Connection pool and schema setup for the claims database

use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tracing::info;

use crate::error::DatabaseError;

/// Type alias for the PostgreSQL connection pool
pub type DatabasePool = PgPool;

/// Application name reported to PostgreSQL in `pg_stat_activity`
pub const DEFAULT_APPLICATION_NAME: &str = "travel-delay-claims";

/// Pool settings for the claims database
///
/// # Example
///
/// ```rust
/// use infra_db::DatabaseConfig;
/// use std::time::Duration;
///
/// let config = DatabaseConfig::new("postgres://localhost/claims")
///     .max_connections(20)
///     .acquire_timeout(Duration::from_secs(5));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub application_name: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// How long a caller waits for a free connection
    pub acquire_timeout: Duration,
    pub max_lifetime: Duration,
    pub idle_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            application_name: DEFAULT_APPLICATION_NAME.to_string(),
            max_connections: 10,
            min_connections: 2,
            acquire_timeout: Duration::from_secs(30),
            max_lifetime: Duration::from_secs(30 * 60),
            idle_timeout: Duration::from_secs(10 * 60),
        }
    }

    pub fn application_name(mut self, name: impl Into<String>) -> Self {
        self.application_name = name.into();
        self
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn max_lifetime(mut self, lifetime: Duration) -> Self {
        self.max_lifetime = lifetime;
        self
    }

    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Checks the pool bounds before any connection is attempted
    pub fn validate(&self) -> Result<(), DatabaseError> {
        if self.max_connections == 0 {
            return Err(DatabaseError::InvalidConfig("max_connections must be at least 1".to_string()));
        }
        if self.min_connections > self.max_connections {
            return Err(DatabaseError::InvalidConfig(format!(
                "min_connections ({}) exceeds max_connections ({})",
                self.min_connections, self.max_connections
            )));
        }
        Ok(())
    }

    fn connect_options(&self) -> Result<PgConnectOptions, DatabaseError> {
        let options = PgConnectOptions::from_str(&self.url)
            .map_err(|e| DatabaseError::InvalidConfig(format!("invalid database url: {}", e)))?;
        Ok(options.application_name(&self.application_name))
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::new("postgres://localhost/claims")
    }
}

/// Creates a connection pool for the claims database
///
/// # Errors
///
/// `DatabaseError::InvalidConfig` for bad bounds or an unparsable URL,
/// `DatabaseError::ConnectionFailed` if the database cannot be reached
///
/// # Example
///
/// ```rust,ignore
/// use infra_db::{DatabaseConfig, create_pool};
///
/// let pool = create_pool(DatabaseConfig::new("postgres://localhost/claims")).await?;
/// ```
pub async fn create_pool(config: DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    config.validate()?;
    let options = config.connect_options()?;

    info!(
        application_name = %config.application_name,
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        "creating database pool"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .max_lifetime(config.max_lifetime)
        .idle_timeout(config.idle_timeout)
        .connect_with(options)
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!("database pool created");
    Ok(pool)
}

/// Creates a pool from a URL with default settings
pub async fn create_pool_from_url(url: &str) -> Result<DatabasePool, DatabaseError> {
    create_pool(DatabaseConfig::new(url)).await
}

/// Applies the SQL migrations embedded from the workspace `migrations/` directory
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), DatabaseError> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    info!("database migrations applied");
    Ok(())
}
