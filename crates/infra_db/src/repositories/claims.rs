//! Claims repository implementation
//!
//! Database access for the `travel_delay_claims` table.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DatabaseError;

const SELECT_CLAIMS: &str = r#"
    SELECT
        id,
        claim_number,
        policyholder_name,
        policy_number,
        flight_number,
        scheduled_departure,
        actual_departure,
        delay_reason,
        claimed_amount,
        claimed_currency,
        delay_hours,
        calculated_amount,
        currency,
        status,
        approval_result,
        approval_notes,
        eligible,
        rule_name,
        risk_level,
        requires_manual_review,
        review_suggestion,
        claim_date,
        process_date,
        created_at,
        updated_at
    FROM travel_delay_claims
"#;

const NEWEST_FIRST: &str = "ORDER BY claim_date DESC, claim_number DESC";

/// Repository for managing claims data
#[derive(Debug, Clone)]
pub struct ClaimsRepository {
    pool: PgPool,
}

impl ClaimsRepository {
    /// Creates a new ClaimsRepository with the given connection pool
    ///
    /// # Arguments
    ///
    /// * `pool` - The PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Inserts a new claim
    ///
    /// # Returns
    ///
    /// `DatabaseError::DuplicateEntry` if the claim number already exists
    pub async fn insert(&self, claim: &ClaimRow) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO travel_delay_claims (
                id, claim_number, policyholder_name, policy_number, flight_number,
                scheduled_departure, actual_departure, delay_reason,
                claimed_amount, claimed_currency, delay_hours, calculated_amount, currency,
                status, approval_result, approval_notes, eligible, rule_name, risk_level,
                requires_manual_review, review_suggestion,
                claim_date, process_date, created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25
            )
            "#,
        )
        .bind(claim.id)
        .bind(&claim.claim_number)
        .bind(&claim.policyholder_name)
        .bind(&claim.policy_number)
        .bind(&claim.flight_number)
        .bind(claim.scheduled_departure)
        .bind(claim.actual_departure)
        .bind(&claim.delay_reason)
        .bind(claim.claimed_amount)
        .bind(&claim.claimed_currency)
        .bind(claim.delay_hours)
        .bind(claim.calculated_amount)
        .bind(&claim.currency)
        .bind(claim.status)
        .bind(&claim.approval_result)
        .bind(&claim.approval_notes)
        .bind(claim.eligible)
        .bind(&claim.rule_name)
        .bind(claim.risk_level)
        .bind(claim.requires_manual_review)
        .bind(&claim.review_suggestion)
        .bind(claim.claim_date)
        .bind(claim.process_date)
        .bind(claim.created_at)
        .bind(claim.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        debug!(claim_number = %claim.claim_number, "inserted claim row");
        Ok(())
    }

    /// Updates the decision and lifecycle columns of an existing claim
    ///
    /// # Returns
    ///
    /// `DatabaseError::NotFound` if no row has the claim number
    pub async fn update(&self, claim: &ClaimRow) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE travel_delay_claims SET
                delay_hours = $2,
                calculated_amount = $3,
                currency = $4,
                status = $5,
                approval_result = $6,
                approval_notes = $7,
                eligible = $8,
                rule_name = $9,
                risk_level = $10,
                requires_manual_review = $11,
                review_suggestion = $12,
                process_date = $13,
                updated_at = $14
            WHERE claim_number = $1
            "#,
        )
        .bind(&claim.claim_number)
        .bind(claim.delay_hours)
        .bind(claim.calculated_amount)
        .bind(&claim.currency)
        .bind(claim.status)
        .bind(&claim.approval_result)
        .bind(&claim.approval_notes)
        .bind(claim.eligible)
        .bind(&claim.rule_name)
        .bind(claim.risk_level)
        .bind(claim.requires_manual_review)
        .bind(&claim.review_suggestion)
        .bind(claim.process_date)
        .bind(claim.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Claim", &claim.claim_number));
        }
        debug!(claim_number = %claim.claim_number, "updated claim row");
        Ok(())
    }

    /// Retrieves a claim by claim number
    pub async fn find_by_claim_number(&self, claim_number: &str) -> Result<Option<ClaimRow>, DatabaseError> {
        let sql = format!("{} WHERE claim_number = $1", SELECT_CLAIMS);
        sqlx::query_as::<_, ClaimRow>(&sql)
            .bind(claim_number)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::from(&e))
    }

    /// Checks whether a claim number is taken
    pub async fn exists_by_claim_number(&self, claim_number: &str) -> Result<bool, DatabaseError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM travel_delay_claims WHERE claim_number = $1)",
        )
        .bind(claim_number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))
    }

    /// Retrieves claims where a text column equals `value`
    ///
    /// # Arguments
    ///
    /// * `column` - One of the indexed lookup columns
    /// * `value` - The value to match
    pub async fn find_by_column(&self, column: LookupColumn, value: &str) -> Result<Vec<ClaimRow>, DatabaseError> {
        let sql = format!("{} WHERE {} = $1 {}", SELECT_CLAIMS, column.as_sql(), NEWEST_FIRST);
        self.fetch_all(sqlx::query_as::<_, ClaimRow>(&sql).bind(value)).await
    }

    /// Retrieves claims in a status
    pub async fn find_by_status(&self, status: ClaimStatus) -> Result<Vec<ClaimRow>, DatabaseError> {
        let sql = format!("{} WHERE status = $1 {}", SELECT_CLAIMS, NEWEST_FIRST);
        self.fetch_all(sqlx::query_as::<_, ClaimRow>(&sql).bind(status)).await
    }

    /// Retrieves claims submitted within an inclusive range
    pub async fn find_by_claim_date_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<ClaimRow>, DatabaseError> {
        let sql = format!(
            "{} WHERE claim_date BETWEEN $1 AND $2 {}",
            SELECT_CLAIMS, NEWEST_FIRST
        );
        self.fetch_all(sqlx::query_as::<_, ClaimRow>(&sql).bind(start).bind(end)).await
    }

    /// Retrieves claims with a delay of at least `hours`
    pub async fn find_by_delay_hours_at_least(&self, hours: i64) -> Result<Vec<ClaimRow>, DatabaseError> {
        let sql = format!("{} WHERE delay_hours >= $1 {}", SELECT_CLAIMS, NEWEST_FIRST);
        self.fetch_all(sqlx::query_as::<_, ClaimRow>(&sql).bind(hours)).await
    }

    /// Retrieves claims with a delay above 24 hours or still pending
    pub async fn find_requiring_review(&self) -> Result<Vec<ClaimRow>, DatabaseError> {
        let sql = format!(
            "{} WHERE delay_hours > 24 OR status = 'pending' {}",
            SELECT_CLAIMS, NEWEST_FIRST
        );
        self.fetch_all(sqlx::query_as::<_, ClaimRow>(&sql)).await
    }

    /// Counts claims per status, omitting statuses with no claims
    pub async fn count_by_status(&self) -> Result<Vec<(ClaimStatus, i64)>, DatabaseError> {
        sqlx::query_as::<_, (ClaimStatus, i64)>(
            "SELECT status, COUNT(*) FROM travel_delay_claims GROUP BY status ORDER BY status",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))
    }

    /// Counts claims for one policy submitted within an inclusive range
    pub async fn count_by_policy_in_range(
        &self,
        policy_number: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<i64, DatabaseError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM travel_delay_claims
            WHERE policy_number = $1 AND claim_date BETWEEN $2 AND $3
            "#,
        )
        .bind(policy_number)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from(&e))
    }

    async fn fetch_all<'q>(
        &self,
        query: sqlx::query::QueryAs<'q, sqlx::Postgres, ClaimRow, sqlx::postgres::PgArguments>,
    ) -> Result<Vec<ClaimRow>, DatabaseError> {
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DatabaseError::from(&e))?;
        debug!(rows = rows.len(), "fetched claim rows");
        Ok(rows)
    }
}

/// Text columns claims can be looked up by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupColumn {
    PolicyNumber,
    PolicyholderName,
    FlightNumber,
}

impl LookupColumn {
    fn as_sql(&self) -> &'static str {
        match self {
            LookupColumn::PolicyNumber => "policy_number",
            LookupColumn::PolicyholderName => "policyholder_name",
            LookupColumn::FlightNumber => "flight_number",
        }
    }
}

/// Database row for a travel delay claim
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ClaimRow {
    pub id: Uuid,
    pub claim_number: String,
    pub policyholder_name: String,
    pub policy_number: String,
    pub flight_number: String,
    pub scheduled_departure: Option<NaiveDateTime>,
    pub actual_departure: Option<NaiveDateTime>,
    pub delay_reason: Option<String>,
    pub claimed_amount: Option<Decimal>,
    pub claimed_currency: Option<String>,
    pub delay_hours: i64,
    pub calculated_amount: Decimal,
    pub currency: String,
    pub status: ClaimStatus,
    pub approval_result: Option<String>,
    pub approval_notes: Option<String>,
    pub eligible: bool,
    pub rule_name: Option<String>,
    pub risk_level: Option<RiskLevel>,
    pub requires_manual_review: bool,
    pub review_suggestion: Option<String>,
    pub claim_date: DateTime<Utc>,
    pub process_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Claim status enum matching database type
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "claim_status", rename_all = "snake_case")]
pub enum ClaimStatus {
    Pending,
    Approved,
    Rejected,
    Paid,
}

/// Risk level enum matching database type
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "claim_risk_level", rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}
