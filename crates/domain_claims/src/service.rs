//! Claims application service
//!
//! Ties the decision engine to a [`ClaimRepository`]: allocates claim
//! numbers, decides, persists, and handles reviewer actions.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use core_kernel::{HealthCheckResult, PortError, Timezone};

use crate::claim::{generate_claim_number, ClaimInput, ClaimRecord, ClaimStatus};
use crate::decision::Decision;
use crate::engine::DecisionEngine;
use crate::error::ClaimError;
use crate::ports::ClaimRepository;

/// Highest `-N` suffix tried when the timestamped claim number is taken
const MAX_CLAIM_NUMBER_SUFFIX: u32 = 999;

/// A stored claim together with the decision made on submission
#[derive(Debug, Clone, Serialize)]
pub struct SubmittedClaim {
    pub record: ClaimRecord,
    pub decision: Decision,
}

/// Claim counts per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
    pub paid: i64,
    pub total: i64,
}

/// Application service for travel delay claims
pub struct ClaimService {
    repository: Arc<dyn ClaimRepository>,
    engine: DecisionEngine,
    timezone: Timezone,
}

impl ClaimService {
    pub fn new(repository: Arc<dyn ClaimRepository>, engine: DecisionEngine, timezone: Timezone) -> Self {
        Self {
            repository,
            engine,
            timezone,
        }
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    pub fn timezone(&self) -> Timezone {
        self.timezone
    }

    /// Creates, decides and stores a new claim
    #[instrument(skip(self, input), fields(policy_number = %input.policy_number, flight_number = %input.flight_number))]
    pub async fn submit_claim(&self, input: ClaimInput) -> Result<SubmittedClaim, ClaimError> {
        let now = Utc::now();
        let base = generate_claim_number(now.with_timezone(&self.timezone.0).naive_local());

        let mut record = ClaimRecord::new(base, input, now);
        let decision = self.engine.decide(&record.input);
        record.apply_decision(&decision)?;
        self.insert_with_unique_number(&mut record).await?;

        info!(
            claim_number = %record.claim_number,
            delay_hours = record.delay_hours,
            status = %record.status,
            manual_review = record.requires_manual_review,
            "claim submitted"
        );
        Ok(SubmittedClaim { record, decision })
    }

    pub async fn get_claim(&self, claim_number: &str) -> Result<ClaimRecord, ClaimError> {
        self.repository
            .find_by_claim_number(claim_number)
            .await?
            .ok_or_else(|| ClaimError::ClaimNotFound(claim_number.to_string()))
    }

    pub async fn claims_for_policy(&self, policy_number: &str) -> Result<Vec<ClaimRecord>, ClaimError> {
        Ok(self.repository.find_by_policy_number(policy_number).await?)
    }

    pub async fn claims_for_flight(&self, flight_number: &str) -> Result<Vec<ClaimRecord>, ClaimError> {
        Ok(self.repository.find_by_flight_number(flight_number).await?)
    }

    pub async fn claims_requiring_review(&self) -> Result<Vec<ClaimRecord>, ClaimError> {
        Ok(self.repository.find_requiring_review().await?)
    }

    /// Claims submitted on the current calendar day in the service timezone
    pub async fn todays_claims(&self) -> Result<Vec<ClaimRecord>, ClaimError> {
        let today = self.timezone.today()?;
        Ok(self
            .repository
            .find_by_claim_date_between(today.start, today.end)
            .await?)
    }

    /// Records a reviewer's verdict on a pending claim
    #[instrument(skip(self, notes))]
    pub async fn manual_review(
        &self,
        claim_number: &str,
        approved: bool,
        notes: Option<String>,
    ) -> Result<ClaimRecord, ClaimError> {
        let mut record = self.get_claim(claim_number).await?;
        record.manual_review(approved, notes)?;
        self.repository.update(&record).await?;

        info!(claim_number, status = %record.status, "manual review recorded");
        Ok(record)
    }

    #[instrument(skip(self))]
    pub async fn mark_paid(&self, claim_number: &str) -> Result<ClaimRecord, ClaimError> {
        let mut record = self.get_claim(claim_number).await?;
        record.mark_paid()?;
        self.repository.update(&record).await?;

        info!(claim_number, amount = %record.calculated_amount, "claim paid");
        Ok(record)
    }

    pub async fn status_summary(&self) -> Result<StatusSummary, ClaimError> {
        let counts = self.repository.count_by_status().await?;
        let mut summary = StatusSummary::default();
        for entry in counts {
            match entry.status {
                ClaimStatus::Pending => summary.pending += entry.count,
                ClaimStatus::Approved => summary.approved += entry.count,
                ClaimStatus::Rejected => summary.rejected += entry.count,
                ClaimStatus::Paid => summary.paid += entry.count,
            }
            summary.total += entry.count;
        }
        Ok(summary)
    }

    pub async fn health_check(&self) -> HealthCheckResult {
        self.repository.health_check().await
    }

    /// Stores the record, moving to the next `-N` suffix while its number is taken
    ///
    /// The repository's duplicate check decides which number wins, so
    /// concurrent submissions in the same second never share a number.
    async fn insert_with_unique_number(&self, record: &mut ClaimRecord) -> Result<(), ClaimError> {
        let base = record.claim_number.clone();

        for suffix in 1..=MAX_CLAIM_NUMBER_SUFFIX {
            if suffix > 1 {
                record.claim_number = format!("{}-{}", base, suffix);
            }
            match self.repository.insert(record).await {
                Ok(()) => return Ok(()),
                Err(PortError::Conflict { .. }) => {
                    debug!(claim_number = %record.claim_number, "claim number taken, trying next suffix");
                }
                Err(e) => return Err(e.into()),
            }
        }

        warn!(base = %base, "claim number suffixes exhausted");
        Err(ClaimError::ClaimNumberExhausted(base))
    }
}
