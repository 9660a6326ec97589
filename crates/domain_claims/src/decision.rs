//! The decision value produced for every claim
//!
//! A [`Decision`] can only be built through its outcome constructors, each
//! of which upholds the cross-field rules:
//! - eligible decisions pay a positive amount
//! - ineligible decisions pay nothing
//! - a decision flagged for manual review always carries a suggestion

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{Currency, Money};
use crate::error::EvaluationFault;

/// Rule name recorded when required claim data is missing
pub const COMPLETENESS_CHECK: &str = "completeness-check";

/// Rule name recorded when evaluation failed internally
pub const EXCEPTION_HANDLING: &str = "exception-handling";

/// Risk assessment attached to a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LOW" => Ok(RiskLevel::Low),
            "MEDIUM" => Ok(RiskLevel::Medium),
            "HIGH" => Ok(RiskLevel::High),
            other => Err(format!("unknown risk level: {}", other)),
        }
    }
}

/// Outcome of evaluating one claim
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    eligible: bool,
    compensation_amount: Money,
    reason: String,
    rule_name: String,
    rule_details: Vec<String>,
    risk_level: RiskLevel,
    requires_manual_review: bool,
    review_suggestion: Option<String>,
    decision_time: DateTime<Utc>,
}

impl Decision {
    /// An eligible decision paying `amount`
    ///
    /// Fails if the amount is not strictly positive.
    pub fn approved(
        rule_name: impl Into<String>,
        reason: impl Into<String>,
        amount: Money,
        risk_level: RiskLevel,
    ) -> Result<Self, EvaluationFault> {
        let rule_name = rule_name.into();
        if !amount.is_positive() {
            return Err(EvaluationFault::InvalidOutcome {
                tier: rule_name,
                detail: format!("eligible decision must pay a positive amount, got {}", amount),
            });
        }
        Ok(Self::build(rule_name, reason.into(), true, amount, risk_level, None))
    }

    /// A final ineligible decision
    pub fn rejected(
        rule_name: impl Into<String>,
        reason: impl Into<String>,
        risk_level: RiskLevel,
    ) -> Self {
        Self::build(
            rule_name.into(),
            reason.into(),
            false,
            Money::zero(Currency::CNY),
            risk_level,
            None,
        )
    }

    /// An ineligible decision that a human must confirm
    pub fn needs_review(
        rule_name: impl Into<String>,
        reason: impl Into<String>,
        risk_level: RiskLevel,
        suggestion: impl Into<String>,
    ) -> Self {
        let suggestion = non_blank(suggestion.into(), "Manual review required");
        Self::build(
            rule_name.into(),
            reason.into(),
            false,
            Money::zero(Currency::CNY),
            risk_level,
            Some(suggestion),
        )
    }

    /// Terminal decision for a claim with missing required fields
    pub fn incomplete(missing: &str) -> Self {
        Self::needs_review(
            COMPLETENESS_CHECK,
            format!("Claim information is incomplete: {}", missing),
            RiskLevel::High,
            format!("Ask the submitter to resupply the missing data: {}", missing),
        )
    }

    /// Terminal decision for a claim whose evaluation failed
    pub fn from_fault(fault: &EvaluationFault) -> Self {
        Self::needs_review(
            EXCEPTION_HANDLING,
            "The claim could not be evaluated automatically",
            RiskLevel::High,
            format!("Evaluation failed ({}); review the claim manually", fault),
        )
    }

    fn build(
        rule_name: String,
        reason: String,
        eligible: bool,
        compensation_amount: Money,
        risk_level: RiskLevel,
        review_suggestion: Option<String>,
    ) -> Self {
        let reason = non_blank(reason, &rule_name);
        Self {
            eligible,
            compensation_amount,
            reason,
            rule_name,
            rule_details: Vec::new(),
            risk_level,
            requires_manual_review: review_suggestion.is_some(),
            review_suggestion,
            decision_time: Utc::now(),
        }
    }

    /// Appends a line to the diagnostic trail
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.rule_details.push(detail.into());
        self
    }

    /// Flags an eligible decision whose requested amount differs from the computed one
    ///
    /// Eligibility and the computed amount stay as they are.
    pub fn with_amount_mismatch(mut self, claimed: Money) -> Self {
        let note = format!(
            "Requested amount {} differs from the calculated {}; verify the amount manually",
            claimed, self.compensation_amount
        );
        self.review_suggestion = Some(match self.review_suggestion.take() {
            Some(existing) => format!("{}; {}", existing, note),
            None => note,
        });
        self.requires_manual_review = true;
        self.risk_level = RiskLevel::Medium;
        self.rule_details.push(format!(
            "amount mismatch: requested {}, calculated {}",
            claimed, self.compensation_amount
        ));
        self
    }

    pub fn eligible(&self) -> bool {
        self.eligible
    }

    pub fn compensation_amount(&self) -> Money {
        self.compensation_amount
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn rule_name(&self) -> &str {
        &self.rule_name
    }

    pub fn rule_details(&self) -> &[String] {
        &self.rule_details
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    pub fn requires_manual_review(&self) -> bool {
        self.requires_manual_review
    }

    pub fn review_suggestion(&self) -> Option<&str> {
        self.review_suggestion.as_deref()
    }

    pub fn decision_time(&self) -> DateTime<Utc> {
        self.decision_time
    }
}

fn non_blank(text: String, fallback: &str) -> String {
    if text.trim().is_empty() {
        fallback.to_string()
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_approved_requires_positive_amount() {
        let zero = Money::zero(Currency::CNY);
        let result = Decision::approved("Standard tier A", "ok", zero, RiskLevel::Low);
        assert!(matches!(result, Err(EvaluationFault::InvalidOutcome { .. })));
    }

    #[test]
    fn test_rejected_pays_nothing() {
        let decision = Decision::rejected("Insufficient delay", "too short", RiskLevel::Low);
        assert!(!decision.eligible());
        assert!(decision.compensation_amount().is_zero());
        assert!(!decision.requires_manual_review());
        assert_eq!(decision.review_suggestion(), None);
    }

    #[test]
    fn test_needs_review_always_has_suggestion() {
        let decision = Decision::needs_review("Anomalous delay", "odd", RiskLevel::High, "  ");
        assert!(decision.requires_manual_review());
        assert_eq!(decision.review_suggestion(), Some("Manual review required"));
    }

    #[test]
    fn test_incomplete_decision() {
        let decision = Decision::incomplete("policy number is missing");
        assert_eq!(decision.rule_name(), COMPLETENESS_CHECK);
        assert_eq!(decision.risk_level(), RiskLevel::High);
        assert!(decision.compensation_amount().is_zero());
        assert!(decision.review_suggestion().unwrap().contains("policy number"));
    }

    #[test]
    fn test_amount_mismatch_keeps_amount_and_eligibility() {
        let amount = Money::new(dec!(300.00), Currency::CNY);
        let decision = Decision::approved("Standard tier A", "ok", amount, RiskLevel::Low)
            .unwrap()
            .with_amount_mismatch(Money::new(dec!(250.00), Currency::CNY));

        assert!(decision.eligible());
        assert_eq!(decision.compensation_amount(), amount);
        assert!(decision.requires_manual_review());
        assert_eq!(decision.risk_level(), RiskLevel::Medium);
        assert_eq!(decision.rule_name(), "Standard tier A");
        assert_eq!(decision.rule_details().len(), 1);
    }

    #[test]
    fn test_risk_level_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&RiskLevel::Medium).unwrap(), "\"MEDIUM\"");
        assert_eq!("high".parse::<RiskLevel>().unwrap(), RiskLevel::High);
    }
}
