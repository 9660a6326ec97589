//! In-memory claim repository

use std::collections::HashMap;
use std::time::Instant;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError};

use crate::claim::{ClaimRecord, ClaimStatus};
use crate::ports::{ClaimRepository, StatusCount};

/// Claim storage held in process memory
///
/// Results are ordered newest claim first, matching the PostgreSQL adapter.
#[derive(Debug, Default)]
pub struct InMemoryClaimRepository {
    claims: RwLock<HashMap<String, ClaimRecord>>,
}

impl InMemoryClaimRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn filter<P>(&self, predicate: P) -> Vec<ClaimRecord>
    where
        P: Fn(&ClaimRecord) -> bool,
    {
        let claims = self.claims.read().await;
        let mut matching: Vec<ClaimRecord> = claims
            .values()
            .filter(|claim| predicate(claim))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            b.claim_date
                .cmp(&a.claim_date)
                .then_with(|| b.claim_number.cmp(&a.claim_number))
        });
        matching
    }
}

impl DomainPort for InMemoryClaimRepository {}

#[async_trait]
impl HealthCheckable for InMemoryClaimRepository {
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let _ = self.claims.read().await.len();
        HealthCheckResult::healthy("memory", start.elapsed().as_millis() as u64)
    }
}

#[async_trait]
impl ClaimRepository for InMemoryClaimRepository {
    #[instrument(skip(self, claim), fields(claim_number = %claim.claim_number))]
    async fn insert(&self, claim: &ClaimRecord) -> Result<(), PortError> {
        let mut claims = self.claims.write().await;
        if claims.contains_key(&claim.claim_number) {
            return Err(PortError::conflict(format!(
                "claim number {} already exists",
                claim.claim_number
            )));
        }
        claims.insert(claim.claim_number.clone(), claim.clone());
        debug!("claim stored");
        Ok(())
    }

    #[instrument(skip(self, claim), fields(claim_number = %claim.claim_number))]
    async fn update(&self, claim: &ClaimRecord) -> Result<(), PortError> {
        let mut claims = self.claims.write().await;
        match claims.get_mut(&claim.claim_number) {
            Some(existing) => {
                *existing = claim.clone();
                debug!("claim updated");
                Ok(())
            }
            None => Err(PortError::not_found("Claim", &claim.claim_number)),
        }
    }

    #[instrument(skip(self))]
    async fn find_by_claim_number(&self, claim_number: &str) -> Result<Option<ClaimRecord>, PortError> {
        Ok(self.claims.read().await.get(claim_number).cloned())
    }

    #[instrument(skip(self))]
    async fn exists_by_claim_number(&self, claim_number: &str) -> Result<bool, PortError> {
        Ok(self.claims.read().await.contains_key(claim_number))
    }

    #[instrument(skip(self))]
    async fn find_by_policy_number(&self, policy_number: &str) -> Result<Vec<ClaimRecord>, PortError> {
        Ok(self.filter(|c| c.input.policy_number == policy_number).await)
    }

    #[instrument(skip(self))]
    async fn find_by_policyholder_name(&self, name: &str) -> Result<Vec<ClaimRecord>, PortError> {
        Ok(self.filter(|c| c.input.policyholder_name == name).await)
    }

    #[instrument(skip(self))]
    async fn find_by_flight_number(&self, flight_number: &str) -> Result<Vec<ClaimRecord>, PortError> {
        Ok(self.filter(|c| c.input.flight_number == flight_number).await)
    }

    #[instrument(skip(self))]
    async fn find_by_status(&self, status: ClaimStatus) -> Result<Vec<ClaimRecord>, PortError> {
        Ok(self.filter(|c| c.status == status).await)
    }

    #[instrument(skip(self))]
    async fn find_by_claim_date_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ClaimRecord>, PortError> {
        Ok(self.filter(|c| c.claim_date >= start && c.claim_date <= end).await)
    }

    #[instrument(skip(self))]
    async fn find_by_delay_hours_at_least(&self, hours: i64) -> Result<Vec<ClaimRecord>, PortError> {
        Ok(self.filter(|c| c.delay_hours >= hours).await)
    }

    #[instrument(skip(self))]
    async fn find_requiring_review(&self) -> Result<Vec<ClaimRecord>, PortError> {
        Ok(self.filter(ClaimRecord::requires_review).await)
    }

    #[instrument(skip(self))]
    async fn count_by_status(&self) -> Result<Vec<StatusCount>, PortError> {
        let claims = self.claims.read().await;
        Ok(ClaimStatus::ALL
            .iter()
            .map(|status| StatusCount {
                status: *status,
                count: claims.values().filter(|c| c.status == *status).count() as i64,
            })
            .filter(|count| count.count > 0)
            .collect())
    }

    #[instrument(skip(self))]
    async fn count_by_policy_in_range(
        &self,
        policy_number: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, PortError> {
        let claims = self.claims.read().await;
        Ok(claims
            .values()
            .filter(|c| {
                c.input.policy_number == policy_number && c.claim_date >= start && c.claim_date <= end
            })
            .count() as i64)
    }
}
