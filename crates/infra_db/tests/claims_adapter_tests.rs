//! PostgreSQL adapter tests
//!
//! These start a PostgreSQL container and need Docker:
//! `cargo test -p infra_db -- --ignored`

use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal_macros::dec;

use core_kernel::{HealthCheckable, Timezone};
use domain_claims::{ClaimRecord, ClaimRepository, ClaimService, ClaimStatus, DecisionEngine};
use infra_db::PostgresClaimAdapter;
use test_utils::{create_isolated_test_database, ClaimFixtures, ClaimInputBuilder};

async fn adapter() -> (test_utils::TestDatabase, PostgresClaimAdapter) {
    let db = create_isolated_test_database()
        .await
        .expect("Failed to create test database");
    let adapter = PostgresClaimAdapter::new(db.pool().clone());
    (db, adapter)
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_insert_and_find_round_trip() {
    let (_db, adapter) = adapter().await;
    let record = ClaimRecord::new("CLAIM20250626123000", ClaimFixtures::zhang_san(), Utc::now());

    adapter.insert(&record).await.unwrap();
    let found = adapter
        .find_by_claim_number("CLAIM20250626123000")
        .await
        .unwrap()
        .expect("claim should exist");

    assert_eq!(found.input, record.input);
    assert_eq!(found.delay_hours, 4);
    assert!(adapter.exists_by_claim_number("CLAIM20250626123000").await.unwrap());
    assert!(adapter.health_check().await.is_operational());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_duplicate_claim_number_is_conflict() {
    let (db, adapter) = adapter().await;
    let record = ClaimRecord::new("CLAIM1", ClaimFixtures::zhang_san(), Utc::now());

    adapter.insert(&record).await.unwrap();
    let err = adapter.insert(&record).await.unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(db.claim_count().await.unwrap(), 1);

    db.truncate_claims().await.unwrap();
    assert!(!adapter.exists_by_claim_number("CLAIM1").await.unwrap());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_unknown_claim_is_not_found() {
    let (_db, adapter) = adapter().await;
    let record = ClaimRecord::new("CLAIM404", ClaimFixtures::zhang_san(), Utc::now());
    assert!(adapter.update(&record).await.unwrap_err().is_not_found());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_queries_over_service_submissions() {
    let (_db, adapter) = adapter().await;
    let repository: Arc<dyn ClaimRepository> = Arc::new(adapter);
    let service = ClaimService::new(repository.clone(), DecisionEngine::default(), Timezone::default());

    let approved = service.submit_claim(ClaimInputBuilder::new().delayed_by_hours(5).build()).await.unwrap();
    let anomalous = service.submit_claim(ClaimInputBuilder::new().delayed_by_hours(30).build()).await.unwrap();
    let mismatch = service
        .submit_claim(ClaimInputBuilder::new().delayed_by_hours(9).with_claimed_amount(dec!(500)).build())
        .await
        .unwrap();

    assert_eq!(approved.record.status, ClaimStatus::Approved);
    assert_ne!(approved.record.claim_number, anomalous.record.claim_number);

    let review: Vec<String> = repository
        .find_requiring_review()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.claim_number)
        .collect();
    assert!(review.contains(&anomalous.record.claim_number));
    assert!(review.contains(&mismatch.record.claim_number));
    assert!(!review.contains(&approved.record.claim_number));

    let long = repository.find_by_delay_hours_at_least(9).await.unwrap();
    assert_eq!(long.len(), 2);

    let summary = service.status_summary().await.unwrap();
    assert_eq!(summary.approved, 1);
    assert_eq!(summary.pending, 2);
    assert_eq!(summary.total, 3);

    let now = Utc::now();
    let count = repository
        .count_by_policy_in_range("POL123456789", now - Duration::hours(1), now)
        .await
        .unwrap();
    assert_eq!(count, 3);

    let paid = service.mark_paid(&approved.record.claim_number).await.unwrap();
    assert_eq!(paid.status, ClaimStatus::Paid);
    let stored = repository.find_by_status(ClaimStatus::Paid).await.unwrap();
    assert_eq!(stored.len(), 1);
}
