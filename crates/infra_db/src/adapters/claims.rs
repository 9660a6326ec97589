//! PostgreSQL Claim Adapter
//!
//! Implements the claims domain's `ClaimRepository` port using the
//! `ClaimsRepository`. It:
//!
//! - Translates domain records into row types and back
//! - Handles error translation between database and port errors
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresClaimAdapter;
//! use domain_claims::ClaimRepository;
//! use std::sync::Arc;
//!
//! let repository: Arc<dyn ClaimRepository> = Arc::new(PostgresClaimAdapter::new(pool));
//! let claim = repository.find_by_claim_number("CLAIM20250626143000").await?;
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use core_kernel::{
    ClaimId, Currency, DomainPort, HealthCheckResult, HealthCheckable, Money, PortError,
};
use domain_claims::{ClaimInput, ClaimRecord, ClaimRepository, ClaimStatus, RiskLevel, StatusCount};

use crate::error::DatabaseError;
use crate::repositories::claims::{
    ClaimRow, ClaimsRepository, LookupColumn,
    ClaimStatus as DbClaimStatus, RiskLevel as DbRiskLevel,
};

const ADAPTER_ID: &str = "postgres-claim-adapter";

/// PostgreSQL-backed implementation of the ClaimRepository port
#[derive(Debug, Clone)]
pub struct PostgresClaimAdapter {
    repository: ClaimsRepository,
    pool: PgPool,
}

impl PostgresClaimAdapter {
    /// Creates a new adapter over the given pool
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ClaimsRepository::new(pool.clone()),
            pool,
        }
    }

    fn rows_to_records(rows: Vec<ClaimRow>) -> Result<Vec<ClaimRecord>, PortError> {
        rows.into_iter().map(row_to_record).collect()
    }
}

impl DomainPort for PostgresClaimAdapter {}

#[async_trait]
impl HealthCheckable for PostgresClaimAdapter {
    /// Checks database connectivity with `SELECT 1`
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult::healthy(ADAPTER_ID, latency_ms),
            Err(e) => HealthCheckResult::unhealthy(ADAPTER_ID, latency_ms, format!("Database error: {}", e)),
        }
    }
}

#[async_trait]
impl ClaimRepository for PostgresClaimAdapter {
    #[instrument(skip(self, claim), fields(claim_number = %claim.claim_number))]
    async fn insert(&self, claim: &ClaimRecord) -> Result<(), PortError> {
        self.repository
            .insert(&record_to_row(claim))
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self, claim), fields(claim_number = %claim.claim_number))]
    async fn update(&self, claim: &ClaimRecord) -> Result<(), PortError> {
        self.repository
            .update(&record_to_row(claim))
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self))]
    async fn find_by_claim_number(&self, claim_number: &str) -> Result<Option<ClaimRecord>, PortError> {
        self.repository
            .find_by_claim_number(claim_number)
            .await
            .map_err(db_to_port_error)?
            .map(row_to_record)
            .transpose()
    }

    #[instrument(skip(self))]
    async fn exists_by_claim_number(&self, claim_number: &str) -> Result<bool, PortError> {
        self.repository
            .exists_by_claim_number(claim_number)
            .await
            .map_err(db_to_port_error)
    }

    #[instrument(skip(self))]
    async fn find_by_policy_number(&self, policy_number: &str) -> Result<Vec<ClaimRecord>, PortError> {
        let rows = self
            .repository
            .find_by_column(LookupColumn::PolicyNumber, policy_number)
            .await
            .map_err(db_to_port_error)?;
        Self::rows_to_records(rows)
    }

    #[instrument(skip(self))]
    async fn find_by_policyholder_name(&self, name: &str) -> Result<Vec<ClaimRecord>, PortError> {
        let rows = self
            .repository
            .find_by_column(LookupColumn::PolicyholderName, name)
            .await
            .map_err(db_to_port_error)?;
        Self::rows_to_records(rows)
    }

    #[instrument(skip(self))]
    async fn find_by_flight_number(&self, flight_number: &str) -> Result<Vec<ClaimRecord>, PortError> {
        let rows = self
            .repository
            .find_by_column(LookupColumn::FlightNumber, flight_number)
            .await
            .map_err(db_to_port_error)?;
        Self::rows_to_records(rows)
    }

    #[instrument(skip(self))]
    async fn find_by_status(&self, status: ClaimStatus) -> Result<Vec<ClaimRecord>, PortError> {
        let rows = self
            .repository
            .find_by_status(domain_to_db_status(status))
            .await
            .map_err(db_to_port_error)?;
        Self::rows_to_records(rows)
    }

    #[instrument(skip(self))]
    async fn find_by_claim_date_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ClaimRecord>, PortError> {
        let rows = self
            .repository
            .find_by_claim_date_between(start, end)
            .await
            .map_err(db_to_port_error)?;
        Self::rows_to_records(rows)
    }

    #[instrument(skip(self))]
    async fn find_by_delay_hours_at_least(&self, hours: i64) -> Result<Vec<ClaimRecord>, PortError> {
        let rows = self
            .repository
            .find_by_delay_hours_at_least(hours)
            .await
            .map_err(db_to_port_error)?;
        Self::rows_to_records(rows)
    }

    #[instrument(skip(self))]
    async fn find_requiring_review(&self) -> Result<Vec<ClaimRecord>, PortError> {
        let rows = self
            .repository
            .find_requiring_review()
            .await
            .map_err(db_to_port_error)?;
        Self::rows_to_records(rows)
    }

    #[instrument(skip(self))]
    async fn count_by_status(&self) -> Result<Vec<StatusCount>, PortError> {
        let counts = self
            .repository
            .count_by_status()
            .await
            .map_err(db_to_port_error)?;
        Ok(counts
            .into_iter()
            .map(|(status, count)| StatusCount {
                status: db_to_domain_status(status),
                count,
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn count_by_policy_in_range(
        &self,
        policy_number: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, PortError> {
        self.repository
            .count_by_policy_in_range(policy_number, start, end)
            .await
            .map_err(db_to_port_error)
    }
}

/// Converts DatabaseError to PortError
fn db_to_port_error(e: DatabaseError) -> PortError {
    match e {
        DatabaseError::NotFound(message) => PortError::NotFound {
            entity_type: "Claim".to_string(),
            id: message,
        },
        DatabaseError::DuplicateEntry(message) => PortError::conflict(message),
        DatabaseError::ConnectionFailed(message) => PortError::connection(message),
        DatabaseError::PoolExhausted => PortError::connection("connection pool exhausted"),
        DatabaseError::SerializationError(message) => PortError::transformation(message),
        DatabaseError::ConstraintViolation(message) => PortError::validation(message),
        other => PortError::Internal {
            message: other.to_string(),
            source: Some(Box::new(other)),
        },
    }
}

fn record_to_row(record: &ClaimRecord) -> ClaimRow {
    let input = &record.input;
    ClaimRow {
        id: *record.id.as_uuid(),
        claim_number: record.claim_number.clone(),
        policyholder_name: input.policyholder_name.clone(),
        policy_number: input.policy_number.clone(),
        flight_number: input.flight_number.clone(),
        scheduled_departure: input.scheduled_departure,
        actual_departure: input.actual_departure,
        delay_reason: input.delay_reason.clone(),
        claimed_amount: input.claimed_amount.map(|m| m.amount()),
        claimed_currency: input.claimed_amount.map(|m| m.currency().code().to_string()),
        delay_hours: record.delay_hours,
        calculated_amount: record.calculated_amount.amount(),
        currency: record.calculated_amount.currency().code().to_string(),
        status: domain_to_db_status(record.status),
        approval_result: record.approval_result.clone(),
        approval_notes: record.approval_notes.clone(),
        eligible: record.eligible,
        rule_name: record.rule_name.clone(),
        risk_level: record.risk_level.map(domain_to_db_risk),
        requires_manual_review: record.requires_manual_review,
        review_suggestion: record.review_suggestion.clone(),
        claim_date: record.claim_date,
        process_date: record.process_date,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

fn row_to_record(row: ClaimRow) -> Result<ClaimRecord, PortError> {
    let currency = parse_currency(&row.currency)?;
    let claimed_amount = match (row.claimed_amount, row.claimed_currency.as_deref()) {
        (Some(amount), Some(code)) => Some(Money::new(amount, parse_currency(code)?)),
        (Some(amount), None) => Some(Money::new(amount, currency)),
        (None, _) => None,
    };

    Ok(ClaimRecord {
        id: ClaimId::from(row.id),
        claim_number: row.claim_number,
        input: ClaimInput {
            policyholder_name: row.policyholder_name,
            policy_number: row.policy_number,
            flight_number: row.flight_number,
            scheduled_departure: row.scheduled_departure,
            actual_departure: row.actual_departure,
            delay_reason: row.delay_reason,
            claimed_amount,
        },
        delay_hours: row.delay_hours,
        calculated_amount: Money::non_negative(row.calculated_amount, currency)
            .map_err(|e| PortError::transformation(e.to_string()))?,
        status: db_to_domain_status(row.status),
        approval_result: row.approval_result,
        approval_notes: row.approval_notes,
        eligible: row.eligible,
        rule_name: row.rule_name,
        risk_level: row.risk_level.map(db_to_domain_risk),
        requires_manual_review: row.requires_manual_review,
        review_suggestion: row.review_suggestion,
        claim_date: row.claim_date,
        process_date: row.process_date,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn parse_currency(code: &str) -> Result<Currency, PortError> {
    code.parse::<Currency>()
        .map_err(|e| PortError::transformation(e.to_string()))
}

fn domain_to_db_status(status: ClaimStatus) -> DbClaimStatus {
    match status {
        ClaimStatus::Pending => DbClaimStatus::Pending,
        ClaimStatus::Approved => DbClaimStatus::Approved,
        ClaimStatus::Rejected => DbClaimStatus::Rejected,
        ClaimStatus::Paid => DbClaimStatus::Paid,
    }
}

fn db_to_domain_status(status: DbClaimStatus) -> ClaimStatus {
    match status {
        DbClaimStatus::Pending => ClaimStatus::Pending,
        DbClaimStatus::Approved => ClaimStatus::Approved,
        DbClaimStatus::Rejected => ClaimStatus::Rejected,
        DbClaimStatus::Paid => ClaimStatus::Paid,
    }
}

fn domain_to_db_risk(risk: RiskLevel) -> DbRiskLevel {
    match risk {
        RiskLevel::Low => DbRiskLevel::Low,
        RiskLevel::Medium => DbRiskLevel::Medium,
        RiskLevel::High => DbRiskLevel::High,
    }
}

fn db_to_domain_risk(risk: DbRiskLevel) -> RiskLevel {
    match risk {
        DbRiskLevel::Low => RiskLevel::Low,
        DbRiskLevel::Medium => RiskLevel::Medium,
        DbRiskLevel::High => RiskLevel::High,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn record() -> ClaimRecord {
        let day = NaiveDate::from_ymd_opt(2025, 6, 26).unwrap();
        let input = ClaimInput {
            policyholder_name: "Liu Yang".to_string(),
            policy_number: "POL555666777".to_string(),
            flight_number: "FM9301".to_string(),
            scheduled_departure: day.and_hms_opt(9, 0, 0),
            actual_departure: day.and_hms_opt(18, 20, 0),
            delay_reason: Some("ATC".to_string()),
            claimed_amount: Some(Money::new(dec!(600.00), Currency::CNY)),
        };
        let mut record = ClaimRecord::new("CLAIM20250626182000", input, Utc::now());
        record.risk_level = Some(RiskLevel::Low);
        record
    }

    #[test]
    fn test_row_conversion_preserves_record() {
        let original = record();
        let restored = row_to_record(record_to_row(&original)).unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn test_unknown_currency_is_transformation_error() {
        let mut row = record_to_row(&record());
        row.currency = "XXX".to_string();
        assert!(matches!(row_to_record(row), Err(PortError::Transformation { .. })));
    }

    #[test]
    fn test_negative_compensation_is_rejected_on_read() {
        let mut row = record_to_row(&record());
        row.calculated_amount = dec!(-300.00);
        assert!(matches!(row_to_record(row), Err(PortError::Transformation { .. })));
    }

    #[test]
    fn test_database_errors_map_to_port_errors() {
        assert!(db_to_port_error(DatabaseError::duplicate("Claim", "claim_number", "C1")).is_conflict());
        assert!(db_to_port_error(DatabaseError::not_found("Claim", "C1")).is_not_found());
        assert!(db_to_port_error(DatabaseError::PoolExhausted).is_transient());
    }
}
