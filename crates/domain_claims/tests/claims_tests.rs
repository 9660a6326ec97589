//! Comprehensive tests for domain_claims

use std::sync::Arc;

use chrono::{Duration, Utc};
use proptest::prelude::*;
use rust_decimal_macros::dec;

use core_kernel::{Currency, Money, Timezone};
use domain_claims::decision::{COMPLETENESS_CHECK, EXCEPTION_HANDLING};
use domain_claims::workflow::MANUAL_REVIEW_PREFIX;
use domain_claims::{
    AssessedClaim, ClaimError, ClaimRepository, ClaimService, ClaimStatus, DecisionEngine,
    InMemoryClaimRepository, RiskLevel, StatusSummary,
};
use test_utils::{
    assert_claim_status, assert_decision, assert_decision_invariants, assert_money_eq,
    claim_input_strategy, claim_with_delay_strategy, ClaimFixtures, ClaimInputBuilder,
    MoneyFixtures, TimeFixtures,
};

// ============================================================================
// Decision Engine Tests
// ============================================================================

mod engine_tests {
    use super::*;

    #[test]
    fn test_canonical_scenario() {
        let claim = ClaimFixtures::zhang_san();
        assert_eq!(claim.delay_hours(), 4);

        let decision = DecisionEngine::default().decide(&claim);
        assert_decision(&decision, true, dec!(300.00), RiskLevel::Low, false);
        assert_eq!(decision.rule_name(), "Standard tier A");
        assert!(decision.reason().contains('4'));
    }

    #[test]
    fn test_delay_examples() {
        let at = TimeFixtures::at;
        let claim = ClaimInputBuilder::new().with_departures(at(8, 30), at(16, 30)).build();
        assert_eq!(claim.delay_hours(), 8);

        let claim = ClaimInputBuilder::new().with_departures(at(8, 30), at(8, 31)).build();
        assert_eq!(claim.delay_hours(), 1);
    }

    #[test]
    fn test_tier_b_boundaries() {
        let engine = DecisionEngine::default();
        for hours in [8, 24] {
            let decision = engine.decide(&ClaimInputBuilder::new().delayed_by_hours(hours).build());
            assert_decision(&decision, true, dec!(600.00), RiskLevel::Low, false);
            assert_eq!(decision.rule_name(), "Standard tier B");
        }
    }

    #[test]
    fn test_partial_hour_pushes_into_next_tier() {
        // 7h01m rounds up to 8 hours
        let claim = ClaimInputBuilder::new().delayed_by_minutes(7 * 60 + 1).build();
        let decision = DecisionEngine::default().decide(&claim);
        assert_eq!(decision.rule_name(), "Standard tier B");
    }

    #[test]
    fn test_anomalous_delay_requires_review() {
        let claim = ClaimInputBuilder::new().delayed_by_hours(25).build();
        let decision = DecisionEngine::default().decide(&claim);

        assert_decision(&decision, false, dec!(0), RiskLevel::High, true);
        assert_eq!(decision.rule_name(), "Anomalous delay");
        assert!(decision.review_suggestion().unwrap().contains("flight data"));
    }

    #[test]
    fn test_amount_mismatch_overlay() {
        let claim = ClaimInputBuilder::new()
            .delayed_by_hours(5)
            .with_claimed_amount(dec!(250.00))
            .build();
        let decision = DecisionEngine::default().decide(&claim);

        assert_decision(&decision, true, dec!(300.00), RiskLevel::Medium, true);
        assert_money_eq(&decision.compensation_amount(), &MoneyFixtures::tier_a());
        assert_eq!(decision.rule_name(), "Standard tier A");
        assert!(decision.review_suggestion().unwrap().contains("250.00"));
    }

    #[test]
    fn test_sub_fen_difference_is_still_a_mismatch() {
        let claim = ClaimInputBuilder::new()
            .delayed_by_hours(5)
            .with_claimed_amount(dec!(300.00004))
            .build();
        let decision = DecisionEngine::default().decide(&claim);

        assert_decision(&decision, true, dec!(300.00), RiskLevel::Medium, true);
        assert!(decision.review_suggestion().unwrap().contains("300.00004"));
    }

    #[test]
    fn test_missing_delay_reason_is_noted_in_rule_details() {
        let claim = ClaimInputBuilder::new().delayed_by_hours(5).without_delay_reason().build();
        let decision = DecisionEngine::default().decide(&claim);

        assert_decision(&decision, true, dec!(300.00), RiskLevel::Low, false);
        assert!(decision.rule_details().iter().any(|d| d == "no delay reason given"));

        let explained = ClaimInputBuilder::new().delayed_by_hours(5).build();
        assert!(DecisionEngine::default().decide(&explained).rule_details().is_empty());
    }

    #[test]
    fn test_missing_policy_number_never_reaches_tiers() {
        let claim = ClaimInputBuilder::new().with_policy_number("").build();
        let decision = DecisionEngine::default().decide(&claim);

        assert_decision(&decision, false, dec!(0), RiskLevel::High, true);
        assert_eq!(decision.rule_name(), COMPLETENESS_CHECK);
        assert!(decision.reason().contains("policy number"));
        assert!(decision.rule_details().is_empty());
    }

    #[test]
    fn test_every_missing_field_is_named() {
        let decision = DecisionEngine::default().decide(&ClaimFixtures::empty());
        let reason = decision.reason();
        for field in ["policyholder name", "policy number", "flight number", "scheduled departure", "actual departure"] {
            assert!(reason.contains(field), "reason should name {}: {}", field, reason);
        }
    }

    #[test]
    fn test_missing_times_with_direct_evaluation() {
        let claim = ClaimInputBuilder::new().without_scheduled_departure().build();
        let decision = DecisionEngine::default().evaluate(&AssessedClaim::new(&claim));
        assert_eq!(decision.rule_name(), EXCEPTION_HANDLING);
        assert_decision_invariants(&decision);
    }

    #[test]
    fn test_decision_is_idempotent() {
        let engine = DecisionEngine::default();
        let claim = ClaimInputBuilder::new().delayed_by_hours(6).build();
        let first = engine.decide(&claim);
        let second = engine.decide(&claim);

        assert_eq!(first.eligible(), second.eligible());
        assert_eq!(first.compensation_amount(), second.compensation_amount());
        assert_eq!(first.rule_name(), second.rule_name());
    }

    #[test]
    fn test_engine_shared_across_threads() {
        let engine = Arc::new(DecisionEngine::default());
        let handles: Vec<_> = (0..8)
            .map(|hours| {
                let engine = Arc::clone(&engine);
                std::thread::spawn(move || {
                    let claim = ClaimInputBuilder::new().delayed_by_hours(hours * 4).build();
                    engine.decide(&claim).rule_name().to_string()
                })
            })
            .collect();

        let names: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(names[0], "Insufficient delay");
        assert_eq!(names[1], "Standard tier A");
        assert_eq!(names[7], "Anomalous delay");
    }
}

// ============================================================================
// Tier Properties
// ============================================================================

mod tier_properties {
    use super::*;

    fn decide_for(hours: i64) -> impl Strategy<Value = domain_claims::Decision> {
        claim_with_delay_strategy(hours).prop_map(|claim| DecisionEngine::default().decide(&claim))
    }

    proptest! {
        #[test]
        fn early_departure_is_declined(decision in (-96i64..0).prop_flat_map(decide_for)) {
            prop_assert!(!decision.eligible());
            prop_assert!(decision.compensation_amount().is_zero());
            prop_assert_eq!(decision.risk_level(), RiskLevel::Low);
            prop_assert!(!decision.requires_manual_review());
        }

        #[test]
        fn short_delay_is_declined(decision in (0i64..4).prop_flat_map(decide_for)) {
            prop_assert!(!decision.eligible());
            prop_assert!(decision.compensation_amount().is_zero());
        }

        #[test]
        fn tier_a_pays_300(decision in (4i64..8).prop_flat_map(decide_for)) {
            prop_assert!(decision.eligible());
            prop_assert_eq!(decision.compensation_amount().amount(), dec!(300.00));
        }

        #[test]
        fn tier_b_pays_600(decision in (8i64..=24).prop_flat_map(decide_for)) {
            prop_assert!(decision.eligible());
            prop_assert_eq!(decision.compensation_amount().amount(), dec!(600.00));
        }

        #[test]
        fn anomalous_delay_goes_to_review(decision in (25i64..500).prop_flat_map(decide_for)) {
            prop_assert!(!decision.eligible());
            prop_assert!(decision.requires_manual_review());
            prop_assert_eq!(decision.risk_level(), RiskLevel::High);
        }

        #[test]
        fn every_decision_upholds_invariants(claim in claim_input_strategy()) {
            let decision = DecisionEngine::default().decide(&claim);
            assert_decision_invariants(&decision);
            prop_assert_ne!(decision.rule_name(), EXCEPTION_HANDLING);
        }

        #[test]
        fn requested_amount_never_changes_compensation(claim in claim_input_strategy()) {
            let engine = DecisionEngine::default();
            let mut without = claim.clone();
            without.claimed_amount = None;

            let with_request = engine.decide(&claim);
            let plain = engine.decide(&without);
            prop_assert_eq!(with_request.eligible(), plain.eligible());
            prop_assert_eq!(with_request.compensation_amount(), plain.compensation_amount());
            prop_assert_eq!(with_request.rule_name(), plain.rule_name());
        }
    }
}

// ============================================================================
// Claim Service Tests
// ============================================================================

mod service_tests {
    use super::*;

    fn service() -> (Arc<InMemoryClaimRepository>, ClaimService) {
        let repository = Arc::new(InMemoryClaimRepository::new());
        let service = ClaimService::new(repository.clone(), DecisionEngine::default(), Timezone::default());
        (repository, service)
    }

    #[tokio::test]
    async fn test_submit_canonical_claim_is_approved() {
        let (_, service) = service();
        let submitted = service.submit_claim(ClaimFixtures::zhang_san()).await.unwrap();

        assert!(submitted.record.claim_number.starts_with("CLAIM"));
        assert_claim_status(&submitted.record, ClaimStatus::Approved);
        assert_eq!(submitted.record.delay_hours, 4);
        assert_money_eq(&submitted.record.calculated_amount, &MoneyFixtures::tier_a());
        assert_eq!(submitted.decision.rule_name(), "Standard tier A");

        let stored = service.get_claim(&submitted.record.claim_number).await.unwrap();
        assert_eq!(stored, submitted.record);
    }

    #[tokio::test]
    async fn test_claim_numbers_stay_unique_within_one_second() {
        let (_, service) = service();
        let mut numbers = Vec::new();
        for _ in 0..3 {
            let submitted = service.submit_claim(ClaimInputBuilder::new().build()).await.unwrap();
            numbers.push(submitted.record.claim_number);
        }
        numbers.sort();
        numbers.dedup();
        assert_eq!(numbers.len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_submissions_get_distinct_numbers() {
        let (_, service) = service();
        let service = Arc::new(service);

        let handles: Vec<_> = (0..300)
            .map(|_| {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.submit_claim(ClaimInputBuilder::new().build()).await })
            })
            .collect();

        let mut numbers = Vec::new();
        for handle in handles {
            let submitted = handle.await.unwrap().unwrap();
            numbers.push(submitted.record.claim_number);
        }
        numbers.sort();
        numbers.dedup();
        assert_eq!(numbers.len(), 300);
        assert_eq!(service.status_summary().await.unwrap().total, 300);
    }

    #[tokio::test]
    async fn test_review_claims_stay_pending_with_notes() {
        let (_, service) = service();
        let claim = ClaimInputBuilder::new()
            .delayed_by_hours(10)
            .with_claimed_amount(dec!(800))
            .build();
        let submitted = service.submit_claim(claim).await.unwrap();

        assert_claim_status(&submitted.record, ClaimStatus::Pending);
        assert!(submitted.record.requires_manual_review);
        assert!(submitted
            .record
            .approval_notes
            .as_deref()
            .unwrap()
            .starts_with(MANUAL_REVIEW_PREFIX));

        let review = service.claims_requiring_review().await.unwrap();
        assert_eq!(review.len(), 1);
    }

    #[tokio::test]
    async fn test_incomplete_claim_is_stored_for_review() {
        let (_, service) = service();
        let claim = ClaimInputBuilder::new().without_actual_departure().build();
        let submitted = service.submit_claim(claim).await.unwrap();

        assert_claim_status(&submitted.record, ClaimStatus::Pending);
        assert_eq!(submitted.record.rule_name.as_deref(), Some(COMPLETENESS_CHECK));
        assert_eq!(submitted.record.risk_level, Some(RiskLevel::High));
    }

    #[tokio::test]
    async fn test_manual_review_then_payment() {
        let (_, service) = service();
        let claim = ClaimInputBuilder::new().delayed_by_hours(30).build();
        let number = service.submit_claim(claim).await.unwrap().record.claim_number;

        let reviewed = service
            .manual_review(&number, true, Some("Confirmed with airline".to_string()))
            .await
            .unwrap();
        assert_claim_status(&reviewed, ClaimStatus::Approved);
        assert!(!reviewed.requires_manual_review);
        assert_eq!(reviewed.approval_notes.as_deref(), Some("Confirmed with airline"));

        let paid = service.mark_paid(&number).await.unwrap();
        assert_claim_status(&paid, ClaimStatus::Paid);

        // A paid claim with a long delay is still listed for review
        let review = service.claims_requiring_review().await.unwrap();
        assert_eq!(review.len(), 1);
    }

    #[tokio::test]
    async fn test_manual_review_of_settled_claim_is_rejected() {
        let (_, service) = service();
        let number = service
            .submit_claim(ClaimFixtures::zhang_san())
            .await
            .unwrap()
            .record
            .claim_number;

        let result = service.manual_review(&number, false, None).await;
        assert!(matches!(result, Err(ClaimError::InvalidStatusTransition { .. })));
    }

    #[tokio::test]
    async fn test_unknown_claim_is_not_found() {
        let (_, service) = service();
        let result = service.mark_paid("CLAIM19700101000000").await;
        assert!(matches!(result, Err(ClaimError::ClaimNotFound(_))));
    }

    #[tokio::test]
    async fn test_queries_and_summary() {
        let (repository, service) = service();
        service.submit_claim(ClaimFixtures::zhang_san()).await.unwrap();
        service
            .submit_claim(ClaimInputBuilder::new().delayed_by_hours(2).with_flight_number("MU5101").build())
            .await
            .unwrap();
        service
            .submit_claim(ClaimInputBuilder::new().delayed_by_hours(40).with_policy_number("POL000000009").build())
            .await
            .unwrap();

        assert_eq!(service.claims_for_policy("POL123456789").await.unwrap().len(), 2);
        assert_eq!(service.claims_for_flight("MU5101").await.unwrap().len(), 1);
        assert_eq!(service.todays_claims().await.unwrap().len(), 3);
        assert_eq!(
            repository.find_by_policyholder_name("张三").await.unwrap().len(),
            1
        );

        let summary = service.status_summary().await.unwrap();
        assert_eq!(
            summary,
            StatusSummary { pending: 1, approved: 1, rejected: 1, paid: 0, total: 3 }
        );

        let now = Utc::now();
        let recent = repository
            .count_by_policy_in_range("POL123456789", now - Duration::minutes(5), now)
            .await
            .unwrap();
        assert_eq!(recent, 2);
    }

    #[tokio::test]
    async fn test_foreign_currency_request_is_flagged() {
        let (_, service) = service();
        let claim = ClaimInputBuilder::new()
            .delayed_by_hours(5)
            .with_claimed_money(Money::new(dec!(300), Currency::HKD))
            .build();
        let submitted = service.submit_claim(claim).await.unwrap();
        assert_eq!(submitted.decision.risk_level(), RiskLevel::Medium);
        assert_claim_status(&submitted.record, ClaimStatus::Pending);
    }
}
