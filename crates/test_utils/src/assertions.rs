//! Custom Test Assertions
//!
//! Assertion helpers for decisions and claim records that give more
//! meaningful failure messages than plain `assert!`.

use core_kernel::Money;
use domain_claims::{ClaimRecord, ClaimStatus, Decision, RiskLevel};
use rust_decimal::Decimal;

/// Asserts the cross-field rules every decision must satisfy
///
/// # Panics
///
/// Panics if eligibility and amount disagree, if a review flag has no
/// suggestion, or if reason or rule name are empty
pub fn assert_decision_invariants(decision: &Decision) {
    let amount = decision.compensation_amount();
    if decision.eligible() {
        assert!(
            amount.is_positive(),
            "Eligible decision '{}' pays {}",
            decision.rule_name(),
            amount
        );
    } else {
        assert!(
            amount.is_zero(),
            "Ineligible decision '{}' pays {}",
            decision.rule_name(),
            amount
        );
    }

    if decision.requires_manual_review() {
        assert!(
            decision.review_suggestion().is_some_and(|s| !s.trim().is_empty()),
            "Decision '{}' requires review but has no suggestion",
            decision.rule_name()
        );
    } else {
        assert!(
            decision.review_suggestion().is_none(),
            "Decision '{}' has a suggestion without requiring review",
            decision.rule_name()
        );
    }

    assert!(!decision.reason().trim().is_empty(), "Decision has an empty reason");
    assert!(!decision.rule_name().trim().is_empty(), "Decision has an empty rule name");
}

/// Asserts the decision's outcome fields
pub fn assert_decision(
    decision: &Decision,
    eligible: bool,
    amount: Decimal,
    risk_level: RiskLevel,
    requires_manual_review: bool,
) {
    assert_decision_invariants(decision);
    assert_eq!(decision.eligible(), eligible, "eligible for rule '{}'", decision.rule_name());
    assert_eq!(
        decision.compensation_amount().amount(),
        amount,
        "amount for rule '{}'",
        decision.rule_name()
    );
    assert_eq!(decision.risk_level(), risk_level, "risk for rule '{}'", decision.rule_name());
    assert_eq!(
        decision.requires_manual_review(),
        requires_manual_review,
        "review flag for rule '{}'",
        decision.rule_name()
    );
}

/// Asserts that two Money values are equal in currency and amount
pub fn assert_money_eq(actual: &Money, expected: &Money) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual.currency(),
        expected.currency()
    );
    assert_eq!(
        actual.amount(),
        expected.amount(),
        "Amount mismatch: actual={}, expected={}",
        actual,
        expected
    );
}

/// Asserts a record's status
pub fn assert_claim_status(record: &ClaimRecord, expected: ClaimStatus) {
    assert_eq!(
        record.status, expected,
        "Claim {} is {}, expected {}",
        record.claim_number, record.status, expected
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Currency;
    use rust_decimal_macros::dec;

    #[test]
    fn test_invariants_hold_for_rejection() {
        let decision = Decision::rejected("Insufficient delay", "short", RiskLevel::Low);
        assert_decision(&decision, false, dec!(0), RiskLevel::Low, false);
    }

    #[test]
    #[should_panic(expected = "Amount mismatch")]
    fn test_money_eq_detects_difference() {
        assert_money_eq(
            &Money::new(dec!(300), Currency::CNY),
            &Money::new(dec!(600), Currency::CNY),
        );
    }
}
