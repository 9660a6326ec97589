//! Database Test Utilities
//!
//! Starts a throwaway PostgreSQL container with the claims schema applied.
//! Tests using it need a running Docker daemon and are marked `#[ignore]`.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage, ImageExt,
};

const POSTGRES_IMAGE: &str = "postgres";
const POSTGRES_TAG: &str = "16-alpine";
const POSTGRES_USER: &str = "claims";
const POSTGRES_PASSWORD: &str = "claims";
const POSTGRES_DB: &str = "claims_test";
const POSTGRES_PORT: u16 = 5432;

/// Schema applied to every test database
const CLAIMS_SCHEMA: &str = include_str!("../../../migrations/20250626000000_create_travel_delay_claims.sql");

pub type TestDbResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// A PostgreSQL container holding an empty `travel_delay_claims` table
///
/// The container is removed when this value is dropped.
pub struct TestDatabase {
    _container: ContainerAsync<GenericImage>,
    url: String,
    pool: PgPool,
}

impl TestDatabase {
    /// Starts the container and applies the claims schema
    pub async fn start() -> TestDbResult<Self> {
        let container = GenericImage::new(POSTGRES_IMAGE, POSTGRES_TAG)
            .with_exposed_port(POSTGRES_PORT.tcp())
            .with_wait_for(WaitFor::message_on_stderr("database system is ready to accept connections"))
            .with_env_var("POSTGRES_USER", POSTGRES_USER)
            .with_env_var("POSTGRES_PASSWORD", POSTGRES_PASSWORD)
            .with_env_var("POSTGRES_DB", POSTGRES_DB)
            .start()
            .await?;

        let host = container.get_host().await?;
        let port = container.get_host_port_ipv4(POSTGRES_PORT).await?;
        let url = connection_url(&host.to_string(), port);

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&url)
            .await?;
        sqlx::raw_sql(CLAIMS_SCHEMA).execute(&pool).await?;

        Ok(Self {
            _container: container,
            url,
            pool,
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Number of stored claim rows
    pub async fn claim_count(&self) -> TestDbResult<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM travel_delay_claims")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Removes all claims while preserving the schema
    pub async fn truncate_claims(&self) -> TestDbResult<()> {
        sqlx::query("TRUNCATE TABLE travel_delay_claims")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Creates a database owned by a single test
pub async fn create_isolated_test_database() -> TestDbResult<TestDatabase> {
    TestDatabase::start().await
}

fn connection_url(host: &str, port: u16) -> String {
    format!(
        "postgres://{}:{}@{}:{}/{}",
        POSTGRES_USER, POSTGRES_PASSWORD, host, port, POSTGRES_DB
    )
}
