//! Property-Based Test Generators
//!
//! Provides proptest strategies for claims and delays.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use core_kernel::{Currency, Money};
use domain_claims::ClaimInput;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// Strategy for any plausible delay in hours, early departures included
pub fn delay_hours_strategy() -> impl Strategy<Value = i64> {
    -48i64..=96i64
}

/// Strategy for delay in minutes, for exercising the ceiling rounding
pub fn delay_minutes_strategy() -> impl Strategy<Value = i64> {
    -3_000i64..=6_000i64
}

/// Strategy for requested amounts accepted at the API (0.01 to 9999.99)
pub fn claimed_amount_strategy() -> impl Strategy<Value = Money> {
    (1i64..=999_999i64).prop_map(|minor| Money::new(Decimal::new(minor, 2), Currency::CNY))
}

/// Strategy for policy numbers: `POL` + 9 digits
pub fn policy_number_strategy() -> impl Strategy<Value = String> {
    "POL[0-9]{9}"
}

/// Strategy for flight numbers: 2 uppercase letters + 3 or 4 digits
pub fn flight_number_strategy() -> impl Strategy<Value = String> {
    "[A-Z]{2}[0-9]{3,4}"
}

/// Strategy for scheduled departures across 2025
pub fn scheduled_departure_strategy() -> impl Strategy<Value = NaiveDateTime> {
    (0i64..365 * 24 * 60).prop_map(|minutes| {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + Duration::minutes(minutes)
    })
}

/// Strategy for complete claims with the given delay in hours
pub fn claim_with_delay_strategy(hours: i64) -> impl Strategy<Value = ClaimInput> {
    (
        "[A-Za-z ]{1,40}",
        policy_number_strategy(),
        flight_number_strategy(),
        scheduled_departure_strategy(),
    )
        .prop_map(move |(name, policy, flight, scheduled)| ClaimInput {
            policyholder_name: format!("P {}", name.trim()),
            policy_number: policy,
            flight_number: flight,
            scheduled_departure: Some(scheduled),
            actual_departure: Some(scheduled + Duration::hours(hours)),
            delay_reason: None,
            claimed_amount: None,
        })
}

/// Strategy for complete claims with an arbitrary delay and optional requested amount
pub fn claim_input_strategy() -> impl Strategy<Value = ClaimInput> {
    (
        delay_hours_strategy(),
        proptest::option::of(claimed_amount_strategy()),
    )
        .prop_flat_map(|(hours, claimed)| {
            claim_with_delay_strategy(hours).prop_map(move |mut claim| {
                claim.claimed_amount = claimed;
                claim
            })
        })
}
