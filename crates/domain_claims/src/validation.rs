//! Completeness checks for claim input
//!
//! Only presence is checked here. Format rules (policy number pattern,
//! flight number pattern, amount ranges) are enforced where requests are
//! accepted, before a claim ever reaches the engine.

use crate::claim::ClaimInput;

/// Result of claim validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Whether the claim is complete
    pub is_valid: bool,
    /// One entry per missing field
    pub errors: Vec<String>,
    /// Non-fatal observations
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Creates a successful validation result
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds an error to the result
    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.is_valid = false;
    }

    /// Adds a warning to the result
    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// All errors joined into one diagnostic
    pub fn summary(&self) -> String {
        self.errors.join("; ")
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

/// Validator for claim completeness
pub struct ClaimValidator;

impl ClaimValidator {
    /// Checks every required field and reports all that are missing
    pub fn validate(claim: &ClaimInput) -> ValidationResult {
        let mut result = ValidationResult::ok();

        if is_blank(&claim.policyholder_name) {
            result.add_error("policyholder name is missing");
        }
        if is_blank(&claim.policy_number) {
            result.add_error("policy number is missing");
        }
        if is_blank(&claim.flight_number) {
            result.add_error("flight number is missing");
        }
        if claim.scheduled_departure.is_none() {
            result.add_error("scheduled departure time is missing");
        }
        if claim.actual_departure.is_none() {
            result.add_error("actual departure time is missing");
        }

        if claim.delay_reason.as_deref().map_or(true, is_blank) {
            result.add_warning("no delay reason given");
        }

        result
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn complete_claim() -> ClaimInput {
        let day = NaiveDate::from_ymd_opt(2025, 6, 26).unwrap();
        ClaimInput {
            policyholder_name: "Wang Fang".to_string(),
            policy_number: "POL987654321".to_string(),
            flight_number: "CA1234".to_string(),
            scheduled_departure: day.and_hms_opt(8, 30, 0),
            actual_departure: day.and_hms_opt(13, 0, 0),
            delay_reason: Some("Weather".to_string()),
            claimed_amount: None,
        }
    }

    #[test]
    fn test_complete_claim_is_valid() {
        let result = ClaimValidator::validate(&complete_claim());
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_blank_text_counts_as_missing() {
        let mut claim = complete_claim();
        claim.policy_number = "   ".to_string();
        let result = ClaimValidator::validate(&claim);
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec!["policy number is missing".to_string()]);
    }

    #[test]
    fn test_all_missing_fields_are_reported() {
        let claim = ClaimInput {
            policyholder_name: String::new(),
            policy_number: String::new(),
            flight_number: String::new(),
            scheduled_departure: None,
            actual_departure: None,
            delay_reason: None,
            claimed_amount: None,
        };
        let result = ClaimValidator::validate(&claim);
        assert_eq!(result.errors.len(), 5);
        assert!(result.summary().contains("flight number"));
        assert!(result.summary().contains("actual departure"));
    }

    #[test]
    fn test_missing_reason_is_only_a_warning() {
        let mut claim = complete_claim();
        claim.delay_reason = None;
        let result = ClaimValidator::validate(&claim);
        assert!(result.is_valid);
        assert_eq!(result.warnings.len(), 1);
    }
}
