//! Claim input and the persisted claim record

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{ClaimId, Currency, Money};
use crate::decision::RiskLevel;
use crate::delay::compute_delay_hours;
use crate::error::ClaimError;

/// Prefix of every generated claim number
pub const CLAIM_NUMBER_PREFIX: &str = "CLAIM";

/// Raw claim fields supplied by the claimant
///
/// Text fields are kept as submitted; a blank string counts as missing when
/// the claim is checked for completeness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimInput {
    /// Name of the policyholder
    pub policyholder_name: String,
    /// Policy number
    pub policy_number: String,
    /// Flight identifier, e.g. `CZ3251`
    pub flight_number: String,
    /// Scheduled departure, local wall-clock time
    pub scheduled_departure: Option<NaiveDateTime>,
    /// Actual departure, local wall-clock time
    pub actual_departure: Option<NaiveDateTime>,
    /// Free-text reason for the delay
    pub delay_reason: Option<String>,
    /// Amount the claimant asks for
    pub claimed_amount: Option<Money>,
}

impl ClaimInput {
    /// Delay in whole hours, derived from the two departure times
    pub fn delay_hours(&self) -> i64 {
        compute_delay_hours(self.scheduled_departure, self.actual_departure)
    }
}

/// Claim lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClaimStatus {
    /// Awaiting a final decision
    Pending,
    /// Approved for payment
    Approved,
    /// Rejected
    Rejected,
    /// Compensation paid
    Paid,
}

impl ClaimStatus {
    pub const ALL: [ClaimStatus; 4] = [
        ClaimStatus::Pending,
        ClaimStatus::Approved,
        ClaimStatus::Rejected,
        ClaimStatus::Paid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Pending => "PENDING",
            ClaimStatus::Approved => "APPROVED",
            ClaimStatus::Rejected => "REJECTED",
            ClaimStatus::Paid => "PAID",
        }
    }

    /// Checks if transition is valid
    pub fn can_transition_to(&self, target: ClaimStatus) -> bool {
        use ClaimStatus::*;
        matches!(
            (self, target),
            (Pending, Approved) |
            (Pending, Rejected) |
            (Approved, Paid)
        )
    }

    /// Returns true once no further transition is possible
    pub fn is_final(&self) -> bool {
        matches!(self, ClaimStatus::Rejected | ClaimStatus::Paid)
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(ClaimStatus::Pending),
            "APPROVED" => Ok(ClaimStatus::Approved),
            "REJECTED" => Ok(ClaimStatus::Rejected),
            "PAID" => Ok(ClaimStatus::Paid),
            other => Err(format!("unknown claim status: {}", other)),
        }
    }
}

/// A travel delay claim as stored by the surrounding system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimRecord {
    /// Unique identifier
    pub id: ClaimId,
    /// Human-facing claim number, unique
    pub claim_number: String,
    /// Submitted claim fields
    pub input: ClaimInput,
    /// Delay hours computed at submission
    pub delay_hours: i64,
    /// Compensation computed by the engine
    pub calculated_amount: Money,
    /// Lifecycle status
    pub status: ClaimStatus,
    /// Decision reason or manual review verdict
    pub approval_result: Option<String>,
    /// Notes for reviewers
    pub approval_notes: Option<String>,
    /// Last decision: eligibility
    pub eligible: bool,
    /// Last decision: tier or check name
    pub rule_name: Option<String>,
    /// Last decision: risk
    pub risk_level: Option<RiskLevel>,
    /// Last decision: review flag
    pub requires_manual_review: bool,
    /// Last decision: review suggestion
    pub review_suggestion: Option<String>,
    /// Submission time
    pub claim_date: DateTime<Utc>,
    /// Time of the last decision or review
    pub process_date: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl ClaimRecord {
    /// Creates a pending record for freshly submitted input
    pub fn new(claim_number: impl Into<String>, input: ClaimInput, claim_date: DateTime<Utc>) -> Self {
        let delay_hours = input.delay_hours();
        Self {
            id: ClaimId::new_v7(),
            claim_number: claim_number.into(),
            input,
            delay_hours,
            calculated_amount: Money::zero(Currency::CNY),
            status: ClaimStatus::Pending,
            approval_result: None,
            approval_notes: None,
            eligible: false,
            rule_name: None,
            risk_level: None,
            requires_manual_review: false,
            review_suggestion: None,
            claim_date,
            process_date: None,
            created_at: claim_date,
            updated_at: claim_date,
        }
    }

    /// Updates the status
    pub fn update_status(&mut self, status: ClaimStatus) -> Result<(), ClaimError> {
        if !self.status.can_transition_to(status) {
            return Err(ClaimError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: status.to_string(),
            });
        }
        self.status = status;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// A claim needs attention while it is pending or its delay looks anomalous
    pub fn requires_review(&self) -> bool {
        self.delay_hours > 24 || self.status == ClaimStatus::Pending
    }
}

/// Builds a claim number from a local timestamp: `CLAIM` + `yyyyMMddHHmmss`
pub fn generate_claim_number(local: NaiveDateTime) -> String {
    format!("{}{}", CLAIM_NUMBER_PREFIX, local.format("%Y%m%d%H%M%S"))
}
