//! Test Data Builders
//!
//! Builder for claim input. Tests set only the fields they care about and
//! get a complete, four-hour-late claim otherwise.

use chrono::{Duration, NaiveDateTime};
use core_kernel::{Currency, Money};
use domain_claims::ClaimInput;
use fake::faker::name::en::Name;
use fake::Fake;
use rust_decimal::Decimal;

use crate::fixtures::{StringFixtures, TimeFixtures};

/// Builder for constructing claim input
pub struct ClaimInputBuilder {
    policyholder_name: String,
    policy_number: String,
    flight_number: String,
    scheduled_departure: Option<NaiveDateTime>,
    actual_departure: Option<NaiveDateTime>,
    delay_reason: Option<String>,
    claimed_amount: Option<Money>,
}

impl Default for ClaimInputBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClaimInputBuilder {
    /// Creates a new builder with a random policyholder name
    pub fn new() -> Self {
        let scheduled = TimeFixtures::scheduled();
        Self {
            policyholder_name: Name().fake(),
            policy_number: StringFixtures::policy_number().to_string(),
            flight_number: StringFixtures::flight_number().to_string(),
            scheduled_departure: Some(scheduled),
            actual_departure: Some(scheduled + Duration::hours(4)),
            delay_reason: Some(StringFixtures::delay_reason().to_string()),
            claimed_amount: None,
        }
    }

    /// Sets the policyholder name
    pub fn with_policyholder_name(mut self, name: impl Into<String>) -> Self {
        self.policyholder_name = name.into();
        self
    }

    /// Sets the policy number
    pub fn with_policy_number(mut self, number: impl Into<String>) -> Self {
        self.policy_number = number.into();
        self
    }

    /// Sets the flight number
    pub fn with_flight_number(mut self, number: impl Into<String>) -> Self {
        self.flight_number = number.into();
        self
    }

    /// Sets both departure times
    pub fn with_departures(mut self, scheduled: NaiveDateTime, actual: NaiveDateTime) -> Self {
        self.scheduled_departure = Some(scheduled);
        self.actual_departure = Some(actual);
        self
    }

    /// Sets the actual departure `minutes` after the scheduled one
    pub fn delayed_by_minutes(mut self, minutes: i64) -> Self {
        let scheduled = self.scheduled_departure.unwrap_or_else(TimeFixtures::scheduled);
        self.scheduled_departure = Some(scheduled);
        self.actual_departure = Some(scheduled + Duration::minutes(minutes));
        self
    }

    /// Sets the actual departure `hours` after the scheduled one
    pub fn delayed_by_hours(self, hours: i64) -> Self {
        self.delayed_by_minutes(hours * 60)
    }

    /// Removes the scheduled departure
    pub fn without_scheduled_departure(mut self) -> Self {
        self.scheduled_departure = None;
        self
    }

    /// Removes the actual departure
    pub fn without_actual_departure(mut self) -> Self {
        self.actual_departure = None;
        self
    }

    /// Sets the delay reason
    pub fn with_delay_reason(mut self, reason: impl Into<String>) -> Self {
        self.delay_reason = Some(reason.into());
        self
    }

    pub fn without_delay_reason(mut self) -> Self {
        self.delay_reason = None;
        self
    }

    /// Sets a requested amount in CNY
    pub fn with_claimed_amount(mut self, amount: Decimal) -> Self {
        self.claimed_amount = Some(Money::new(amount, Currency::CNY));
        self
    }

    /// Sets a requested amount in any currency
    pub fn with_claimed_money(mut self, amount: Money) -> Self {
        self.claimed_amount = Some(amount);
        self
    }

    /// Builds the claim input
    pub fn build(self) -> ClaimInput {
        ClaimInput {
            policyholder_name: self.policyholder_name,
            policy_number: self.policy_number,
            flight_number: self.flight_number,
            scheduled_departure: self.scheduled_departure,
            actual_departure: self.actual_departure,
            delay_reason: self.delay_reason,
            claimed_amount: self.claimed_amount,
        }
    }
}
