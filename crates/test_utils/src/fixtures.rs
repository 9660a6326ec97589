//! Pre-built Test Fixtures
//!
//! Ready-to-use claim data for the scenarios the test suites keep returning to.

use chrono::{NaiveDate, NaiveDateTime};
use core_kernel::{Currency, Money};
use domain_claims::ClaimInput;
use rust_decimal_macros::dec;

/// Fixture for departure timestamps
pub struct TimeFixtures;

impl TimeFixtures {
    /// Test day used across the suites (June 26, 2025)
    pub fn claim_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 26).unwrap()
    }

    /// A time on the test day
    pub fn at(hour: u32, minute: u32) -> NaiveDateTime {
        Self::claim_day().and_hms_opt(hour, minute, 0).unwrap()
    }

    /// Scheduled departure used by most fixtures (08:30)
    pub fn scheduled() -> NaiveDateTime {
        Self::at(8, 30)
    }
}

/// Fixture for common strings
pub struct StringFixtures;

impl StringFixtures {
    pub fn policyholder_name() -> &'static str {
        "张三"
    }

    pub fn policy_number() -> &'static str {
        "POL123456789"
    }

    pub fn flight_number() -> &'static str {
        "CZ3251"
    }

    pub fn delay_reason() -> &'static str {
        "Weather"
    }
}

/// Fixture for claim amounts
pub struct MoneyFixtures;

impl MoneyFixtures {
    pub fn tier_a() -> Money {
        Money::new(dec!(300.00), Currency::CNY)
    }

    pub fn tier_b() -> Money {
        Money::new(dec!(600.00), Currency::CNY)
    }

    /// A requested amount that matches neither tier
    pub fn under_claim() -> Money {
        Money::new(dec!(250.00), Currency::CNY)
    }
}

/// Fixture for complete claims
pub struct ClaimFixtures;

impl ClaimFixtures {
    /// 张三, POL123456789, CZ3251, 08:30 scheduled, 12:30 actual, no requested amount
    pub fn zhang_san() -> ClaimInput {
        ClaimInput {
            policyholder_name: StringFixtures::policyholder_name().to_string(),
            policy_number: StringFixtures::policy_number().to_string(),
            flight_number: StringFixtures::flight_number().to_string(),
            scheduled_departure: Some(TimeFixtures::scheduled()),
            actual_departure: Some(TimeFixtures::at(12, 30)),
            delay_reason: Some(StringFixtures::delay_reason().to_string()),
            claimed_amount: None,
        }
    }

    /// A claim with every field empty
    pub fn empty() -> ClaimInput {
        ClaimInput {
            policyholder_name: String::new(),
            policy_number: String::new(),
            flight_number: String::new(),
            scheduled_departure: None,
            actual_departure: None,
            delay_reason: None,
            claimed_amount: None,
        }
    }
}
