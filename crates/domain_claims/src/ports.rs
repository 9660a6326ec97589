//! Claims Domain Ports
//!
//! The `ClaimRepository` trait is everything the claims service needs from
//! storage. Two adapters implement it:
//!
//! - **In-memory**: [`crate::adapters::InMemoryClaimRepository`], for tests
//!   and single-process runs
//! - **PostgreSQL**: `infra_db::PostgresClaimAdapter`
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_claims::ports::ClaimRepository;
//! use std::sync::Arc;
//!
//! let repository: Arc<dyn ClaimRepository> = match config.storage {
//!     StorageBackend::Postgres => Arc::new(PostgresClaimAdapter::new(pool)),
//!     StorageBackend::Memory => Arc::new(InMemoryClaimRepository::new()),
//! };
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use core_kernel::{DomainPort, HealthCheckable, PortError};

use crate::claim::{ClaimRecord, ClaimStatus};

/// Number of claims in one status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: ClaimStatus,
    pub count: i64,
}

/// Storage for claim records keyed by claim number
#[async_trait]
pub trait ClaimRepository: DomainPort + HealthCheckable {
    /// Stores a new claim
    ///
    /// # Returns
    ///
    /// `PortError::Conflict` if the claim number is already taken
    async fn insert(&self, claim: &ClaimRecord) -> Result<(), PortError>;

    /// Replaces a stored claim
    ///
    /// # Returns
    ///
    /// `PortError::NotFound` if no claim has this claim number
    async fn update(&self, claim: &ClaimRecord) -> Result<(), PortError>;

    async fn find_by_claim_number(&self, claim_number: &str) -> Result<Option<ClaimRecord>, PortError>;

    async fn exists_by_claim_number(&self, claim_number: &str) -> Result<bool, PortError>;

    async fn find_by_policy_number(&self, policy_number: &str) -> Result<Vec<ClaimRecord>, PortError>;

    async fn find_by_policyholder_name(&self, name: &str) -> Result<Vec<ClaimRecord>, PortError>;

    async fn find_by_flight_number(&self, flight_number: &str) -> Result<Vec<ClaimRecord>, PortError>;

    async fn find_by_status(&self, status: ClaimStatus) -> Result<Vec<ClaimRecord>, PortError>;

    /// Claims submitted between `start` and `end`, both inclusive
    async fn find_by_claim_date_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ClaimRecord>, PortError>;

    async fn find_by_delay_hours_at_least(&self, hours: i64) -> Result<Vec<ClaimRecord>, PortError>;

    /// Claims with a delay above 24 hours or still pending
    async fn find_requiring_review(&self) -> Result<Vec<ClaimRecord>, PortError>;

    async fn count_by_status(&self) -> Result<Vec<StatusCount>, PortError>;

    /// Claims for one policy submitted between `start` and `end`, both inclusive
    async fn count_by_policy_in_range(
        &self,
        policy_number: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, PortError>;
}
