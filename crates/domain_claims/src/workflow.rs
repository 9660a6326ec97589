//! Claim lifecycle management
//!
//! Applies engine decisions and reviewer verdicts to a [`ClaimRecord`].

use chrono::Utc;

use crate::claim::{ClaimRecord, ClaimStatus};
use crate::decision::Decision;
use crate::error::ClaimError;

pub const MANUAL_REVIEW_PREFIX: &str = "Manual review required: ";
pub const APPROVED_BY_REVIEW: &str = "Approved by manual review";
pub const REJECTED_BY_REVIEW: &str = "Rejected by manual review";

impl ClaimRecord {
    /// Records an engine decision and moves the claim to its next status
    ///
    /// Decisions flagged for review leave the claim `Pending`.
    pub fn apply_decision(&mut self, decision: &Decision) -> Result<(), ClaimError> {
        let target = if decision.requires_manual_review() {
            ClaimStatus::Pending
        } else if decision.eligible() {
            ClaimStatus::Approved
        } else {
            ClaimStatus::Rejected
        };

        if target == ClaimStatus::Pending {
            if self.status != ClaimStatus::Pending {
                return Err(ClaimError::InvalidStatusTransition {
                    from: self.status.to_string(),
                    to: target.to_string(),
                });
            }
            self.approval_notes = Some(format!(
                "{}{}",
                MANUAL_REVIEW_PREFIX,
                decision.review_suggestion().unwrap_or_default()
            ));
        } else {
            self.update_status(target)?;
        }

        self.calculated_amount = decision.compensation_amount();
        self.approval_result = Some(decision.reason().to_string());
        self.eligible = decision.eligible();
        self.rule_name = Some(decision.rule_name().to_string());
        self.risk_level = Some(decision.risk_level());
        self.requires_manual_review = decision.requires_manual_review();
        self.review_suggestion = decision.review_suggestion().map(str::to_string);
        self.process_date = Some(decision.decision_time());
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Records a reviewer's verdict on a pending claim
    pub fn manual_review(&mut self, approved: bool, notes: Option<String>) -> Result<(), ClaimError> {
        let (target, verdict) = if approved {
            (ClaimStatus::Approved, APPROVED_BY_REVIEW)
        } else {
            (ClaimStatus::Rejected, REJECTED_BY_REVIEW)
        };
        self.update_status(target)?;

        let now = Utc::now();
        self.approval_result = Some(verdict.to_string());
        self.approval_notes = notes;
        self.requires_manual_review = false;
        self.process_date = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Marks an approved claim as paid
    pub fn mark_paid(&mut self) -> Result<(), ClaimError> {
        self.update_status(ClaimStatus::Paid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_kernel::{Currency, Money};
    use rust_decimal_macros::dec;

    use crate::claim::ClaimInput;
    use crate::decision::RiskLevel;

    fn pending_record() -> ClaimRecord {
        let day = NaiveDate::from_ymd_opt(2025, 6, 26).unwrap();
        let input = ClaimInput {
            policyholder_name: "Chen Jing".to_string(),
            policy_number: "POL222333444".to_string(),
            flight_number: "ZH9101".to_string(),
            scheduled_departure: day.and_hms_opt(8, 0, 0),
            actual_departure: day.and_hms_opt(13, 0, 0),
            delay_reason: None,
            claimed_amount: None,
        };
        ClaimRecord::new("CLAIM20250626130000", input, Utc::now())
    }

    fn tier_a() -> Decision {
        Decision::approved("Standard tier A", "ok", Money::new(dec!(300), Currency::CNY), RiskLevel::Low)
            .unwrap()
    }

    #[test]
    fn test_eligible_decision_approves() {
        let mut record = pending_record();
        record.apply_decision(&tier_a()).unwrap();
        assert_eq!(record.status, ClaimStatus::Approved);
        assert_eq!(record.calculated_amount.amount(), dec!(300));
        assert_eq!(record.rule_name.as_deref(), Some("Standard tier A"));
        assert!(record.process_date.is_some());
    }

    #[test]
    fn test_ineligible_decision_rejects() {
        let mut record = pending_record();
        record
            .apply_decision(&Decision::rejected("Insufficient delay", "short", RiskLevel::Low))
            .unwrap();
        assert_eq!(record.status, ClaimStatus::Rejected);
    }

    #[test]
    fn test_review_decision_stays_pending_with_notes() {
        let mut record = pending_record();
        let decision = tier_a().with_amount_mismatch(Money::new(dec!(250), Currency::CNY));
        record.apply_decision(&decision).unwrap();

        assert_eq!(record.status, ClaimStatus::Pending);
        assert!(record.requires_manual_review);
        assert!(record.eligible);
        let notes = record.approval_notes.unwrap();
        assert!(notes.starts_with(MANUAL_REVIEW_PREFIX));
    }

    #[test]
    fn test_manual_review_only_from_pending() {
        let mut record = pending_record();
        record.manual_review(false, Some("duplicate".to_string())).unwrap();
        assert_eq!(record.status, ClaimStatus::Rejected);
        assert_eq!(record.approval_result.as_deref(), Some(REJECTED_BY_REVIEW));

        let again = record.manual_review(true, None);
        assert!(matches!(again, Err(ClaimError::InvalidStatusTransition { .. })));
    }

    #[test]
    fn test_paid_only_after_approval() {
        let mut record = pending_record();
        assert!(record.mark_paid().is_err());
        record.manual_review(true, None).unwrap();
        record.mark_paid().unwrap();
        assert_eq!(record.status, ClaimStatus::Paid);
        assert!(record.status.is_final());
    }
}
