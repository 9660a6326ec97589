//! Delay computation
//!
//! Delay hours are always derived from the two departure timestamps. They are
//! never taken from a caller, which is why [`AssessedClaim`] can only be
//! built from a [`ClaimInput`].

use chrono::NaiveDateTime;
use tracing::debug;

use crate::claim::ClaimInput;

const MINUTES_PER_HOUR: i64 = 60;

/// Returns the signed delay in hours, rounded up to the next whole hour
///
/// The difference is taken in whole minutes (seconds truncated toward zero)
/// and divided by 60 with ceiling rounding, so 61 minutes is 2 hours and
/// -61 minutes is -1 hour. Returns `0` when either timestamp is absent; the
/// completeness check is responsible for rejecting such claims.
pub fn compute_delay_hours(
    scheduled: Option<NaiveDateTime>,
    actual: Option<NaiveDateTime>,
) -> i64 {
    let (Some(scheduled), Some(actual)) = (scheduled, actual) else {
        return 0;
    };

    let minutes = (actual - scheduled).num_minutes();
    let hours = ceil_div(minutes, MINUTES_PER_HOUR);
    debug!(%scheduled, %actual, minutes, delay_hours = hours, "computed delay");
    hours
}

fn ceil_div(value: i64, divisor: i64) -> i64 {
    let quotient = value / divisor;
    if value % divisor > 0 {
        quotient + 1
    } else {
        quotient
    }
}

/// A claim paired with the delay derived from its own timestamps
#[derive(Debug, Clone, Copy)]
pub struct AssessedClaim<'a> {
    input: &'a ClaimInput,
    delay_hours: i64,
}

impl<'a> AssessedClaim<'a> {
    pub fn new(input: &'a ClaimInput) -> Self {
        Self {
            input,
            delay_hours: input.delay_hours(),
        }
    }

    pub fn input(&self) -> &'a ClaimInput {
        self.input
    }

    pub fn delay_hours(&self) -> i64 {
        self.delay_hours
    }

    /// Returns true if both departure timestamps are present
    pub fn has_departure_times(&self) -> bool {
        self.input.scheduled_departure.is_some() && self.input.actual_departure.is_some()
    }
}
