//! Infrastructure Database Layer
//!
//! PostgreSQL storage for travel delay claims using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern. `ClaimsRepository` owns the SQL
//! and works with row types; `PostgresClaimAdapter` implements the domain's
//! `ClaimRepository` port on top of it and translates rows and errors.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresClaimAdapter};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/claims")).await?;
//! run_migrations(&pool).await?;
//! let adapter = PostgresClaimAdapter::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, create_pool, create_pool_from_url, run_migrations, DatabaseConfig};
pub use error::DatabaseError;
pub use repositories::ClaimsRepository;
pub use adapters::PostgresClaimAdapter;
