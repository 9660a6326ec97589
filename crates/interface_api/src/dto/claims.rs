//! Claims DTOs

use std::borrow::Cow;

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use core_kernel::{Currency, Money};
use domain_claims::{ClaimInput, ClaimRecord, ClaimStatus, RiskLevel, SubmittedClaim};

use crate::error::ApiError;

/// Wall-clock format accepted alongside ISO-8601
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct SubmitClaimRequest {
    #[validate(length(min = 1, max = 50, message = "must be 1 to 50 characters"))]
    pub policyholder_name: String,

    #[validate(custom(function = "validate_policy_number"))]
    pub policy_number: String,

    #[validate(custom(function = "validate_flight_number"))]
    pub flight_number: String,

    #[validate(required(message = "is required"), custom(function = "validate_timestamp"))]
    pub scheduled_departure: Option<String>,

    #[validate(required(message = "is required"), custom(function = "validate_timestamp"))]
    pub actual_departure: Option<String>,

    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub delay_reason: Option<String>,

    #[validate(custom(function = "validate_claimed_amount"))]
    pub claimed_amount: Option<Decimal>,
}

impl SubmitClaimRequest {
    /// Validates the request and converts it into engine input
    pub fn into_input(self) -> Result<ClaimInput, ApiError> {
        self.validate()?;

        let scheduled = parse_optional(self.scheduled_departure.as_deref(), "scheduled_departure")?;
        let actual = parse_optional(self.actual_departure.as_deref(), "actual_departure")?;

        Ok(ClaimInput {
            policyholder_name: self.policyholder_name.trim().to_string(),
            policy_number: self.policy_number,
            flight_number: self.flight_number,
            scheduled_departure: scheduled,
            actual_departure: actual,
            delay_reason: self.delay_reason.filter(|r| !r.trim().is_empty()),
            claimed_amount: self.claimed_amount.map(|amount| Money::new(amount, Currency::CNY)),
        })
    }
}

fn parse_optional(value: Option<&str>, field: &str) -> Result<Option<NaiveDateTime>, ApiError> {
    value
        .map(|raw| {
            parse_timestamp(raw).ok_or_else(|| ApiError::BadRequest(format!("{} is not a valid timestamp", field)))
        })
        .transpose()
}

/// Parses `yyyy-MM-dd HH:mm:ss` or ISO-8601 local date-times
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .ok()
        .or_else(|| raw.parse::<NaiveDateTime>().ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_local()))
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn validate_policy_number(value: &str) -> Result<(), ValidationError> {
    let digits = value.strip_prefix("POL").unwrap_or_default();
    if digits.len() == 9 && digits.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(invalid("policy_number", "must be POL followed by 9 digits"))
    }
}

fn validate_flight_number(value: &str) -> Result<(), ValidationError> {
    let bytes = value.as_bytes();
    let valid = (5..=6).contains(&bytes.len())
        && bytes[..2].iter().all(|b| b.is_ascii_uppercase())
        && bytes[2..].iter().all(|b| b.is_ascii_digit());
    if valid {
        Ok(())
    } else {
        Err(invalid("flight_number", "must be 2 uppercase letters followed by 3 or 4 digits"))
    }
}

fn validate_timestamp(value: &str) -> Result<(), ValidationError> {
    parse_timestamp(value)
        .map(|_| ())
        .ok_or_else(|| invalid("timestamp", "must be yyyy-MM-dd HH:mm:ss or ISO-8601"))
}

fn validate_claimed_amount(value: &Decimal) -> Result<(), ValidationError> {
    let in_range = *value >= Decimal::new(1, 2) && *value <= Decimal::new(999_999, 2);
    if !in_range {
        return Err(invalid("amount_range", "must be between 0.01 and 9999.99"));
    }
    if value.normalize().scale() > 2 {
        return Err(invalid("amount_scale", "must have at most 2 decimal places"));
    }
    Ok(())
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(default)]
pub struct ReviewRequest {
    pub approved: bool,
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClaimResponse {
    pub claim_number: String,
    pub policyholder_name: String,
    pub policy_number: String,
    pub flight_number: String,
    pub scheduled_departure: Option<NaiveDateTime>,
    pub actual_departure: Option<NaiveDateTime>,
    pub delay_reason: Option<String>,
    pub claimed_amount: Option<Decimal>,
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
}

impl From<ClaimRecord> for ClaimResponse {
    fn from(record: ClaimRecord) -> Self {
        Self {
            claim_number: record.claim_number,
            policyholder_name: record.input.policyholder_name,
            policy_number: record.input.policy_number,
            flight_number: record.input.flight_number,
            scheduled_departure: record.input.scheduled_departure,
            actual_departure: record.input.actual_departure,
            delay_reason: record.input.delay_reason,
            claimed_amount: record.input.claimed_amount.map(|m| m.amount()),
            delay_hours: record.delay_hours,
            calculated_amount: record.calculated_amount.amount(),
            currency: record.calculated_amount.currency().code().to_string(),
            status: record.status,
            approval_result: record.approval_result,
            approval_notes: record.approval_notes,
            eligible: record.eligible,
            rule_name: record.rule_name,
            risk_level: record.risk_level,
            requires_manual_review: record.requires_manual_review,
            review_suggestion: record.review_suggestion,
            claim_date: record.claim_date,
            process_date: record.process_date,
        }
    }
}

/// Result of submitting a claim
#[derive(Debug, Serialize)]
pub struct SubmitClaimResponse {
    pub claim_number: String,
    pub status: ClaimStatus,
    pub eligible: bool,
    pub calculated_amount: Decimal,
    pub currency: String,
    pub reason: String,
    pub rule_name: String,
    pub rule_details: Vec<String>,
    pub requires_manual_review: bool,
    pub review_suggestion: Option<String>,
    pub risk_level: RiskLevel,
    pub process_time: DateTime<Utc>,
    pub claim: ClaimResponse,
}

impl From<SubmittedClaim> for SubmitClaimResponse {
    fn from(submitted: SubmittedClaim) -> Self {
        let decision = submitted.decision;
        let amount = decision.compensation_amount();
        Self {
            claim_number: submitted.record.claim_number.clone(),
            status: submitted.record.status,
            eligible: decision.eligible(),
            calculated_amount: amount.amount(),
            currency: amount.currency().code().to_string(),
            reason: decision.reason().to_string(),
            rule_name: decision.rule_name().to_string(),
            rule_details: decision.rule_details().to_vec(),
            requires_manual_review: decision.requires_manual_review(),
            review_suggestion: decision.review_suggestion().map(str::to_string),
            risk_level: decision.risk_level(),
            process_time: decision.decision_time(),
            claim: submitted.record.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn valid_request() -> SubmitClaimRequest {
        SubmitClaimRequest {
            policyholder_name: "张三".to_string(),
            policy_number: "POL123456789".to_string(),
            flight_number: "CZ3251".to_string(),
            scheduled_departure: Some("2025-06-26 08:30:00".to_string()),
            actual_departure: Some("2025-06-26T12:30:00".to_string()),
            delay_reason: Some("Weather".to_string()),
            claimed_amount: Some(dec!(300.00)),
        }
    }

    #[test]
    fn test_valid_request_converts() {
        let input = valid_request().into_input().unwrap();
        assert_eq!(input.delay_hours(), 4);
        assert_eq!(input.claimed_amount.unwrap().amount(), dec!(300.00));
    }

    #[test]
    fn test_bad_policy_and_flight_numbers() {
        let request = SubmitClaimRequest {
            policy_number: "POL12".to_string(),
            flight_number: "cz3251".to_string(),
            ..valid_request()
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("policy_number"));
        assert!(fields.contains_key("flight_number"));
    }

    #[test]
    fn test_missing_timestamp_is_reported() {
        let request = SubmitClaimRequest {
            actual_departure: None,
            ..valid_request()
        };
        assert!(request.validate().unwrap_err().field_errors().contains_key("actual_departure"));
    }

    #[test]
    fn test_amount_bounds_and_scale() {
        assert!(validate_claimed_amount(&dec!(0.01)).is_ok());
        assert!(validate_claimed_amount(&dec!(9999.99)).is_ok());
        assert!(validate_claimed_amount(&dec!(300.500)).is_ok());
        assert!(validate_claimed_amount(&dec!(0)).is_err());
        assert!(validate_claimed_amount(&dec!(10000)).is_err());
        assert!(validate_claimed_amount(&dec!(12.345)).is_err());
    }

    #[test]
    fn test_timestamp_formats() {
        assert!(parse_timestamp("2025-06-26 08:30:00").is_some());
        assert!(parse_timestamp("2025-06-26T08:30:00").is_some());
        assert!(parse_timestamp("2025-06-26T08:30:00+08:00").is_some());
        assert!(parse_timestamp("26/06/2025 08:30").is_none());
    }
}
