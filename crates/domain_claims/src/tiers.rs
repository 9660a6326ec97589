//! Compensation tiers
//!
//! The rules are a table of disjoint delay ranges, checked in order. Adding a
//! tier means adding a row, not another branch.
//!
//! | Tier               | Delay (hours) | Eligible | Amount | Risk | Review |
//! |--------------------|---------------|----------|--------|------|--------|
//! | Early departure    | d < 0         | no       | 0      | LOW  | no     |
//! | Insufficient delay | 0 ..= 3       | no       | 0      | LOW  | no     |
//! | Standard tier A    | 4 ..= 7       | yes      | 300.00 | LOW  | no     |
//! | Standard tier B    | 8 ..= 24      | yes      | 600.00 | LOW  | no     |
//! | Anomalous delay    | d > 24        | no       | 0      | HIGH | yes    |

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use core_kernel::{Currency, Money};
use crate::decision::{Decision, RiskLevel};
use crate::error::{EvaluationFault, TierTableError};

/// Placeholder replaced by the delay in reason templates
pub const DELAY_PLACEHOLDER: &str = "{delay}";

/// Inclusive range of delay hours; `None` leaves a side unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DelayRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl DelayRange {
    /// `d <= max`
    pub fn up_to(max: i64) -> Self {
        Self { min: None, max: Some(max) }
    }

    /// `min <= d <= max`
    pub fn between(min: i64, max: i64) -> Self {
        Self { min: Some(min), max: Some(max) }
    }

    /// `d >= min`
    pub fn from(min: i64) -> Self {
        Self { min: Some(min), max: None }
    }

    pub fn contains(&self, hours: i64) -> bool {
        self.min.map_or(true, |min| hours >= min) && self.max.map_or(true, |max| hours <= max)
    }

    fn is_empty(&self) -> bool {
        matches!((self.min, self.max), (Some(min), Some(max)) if min > max)
    }
}

/// What a tier decides
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TierOutcome {
    /// Eligible, paying a fixed amount
    Compensate { amount: Decimal },
    /// Ineligible
    Decline,
    /// Ineligible until a human has looked at it
    Refer { suggestion: String },
}

/// One row of the tier table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tier {
    pub name: String,
    pub range: DelayRange,
    pub outcome: TierOutcome,
    pub risk_level: RiskLevel,
    /// Reason text; `{delay}` is replaced with the delay hours
    pub reason: String,
}

impl Tier {
    pub fn new(
        name: impl Into<String>,
        range: DelayRange,
        outcome: TierOutcome,
        risk_level: RiskLevel,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            range,
            outcome,
            risk_level,
            reason: reason.into(),
        }
    }

    /// Renders the reason for a concrete delay
    pub fn reason_for(&self, delay_hours: i64) -> String {
        self.reason.replace(DELAY_PLACEHOLDER, &delay_hours.to_string())
    }

    /// Builds the decision this tier gives for `delay_hours`
    pub fn decide(&self, delay_hours: i64, currency: Currency) -> Result<Decision, EvaluationFault> {
        let reason = self.reason_for(delay_hours);
        let decision = match &self.outcome {
            TierOutcome::Compensate { amount } => Decision::approved(
                &self.name,
                reason,
                Money::new(*amount, currency),
                self.risk_level,
            )?,
            TierOutcome::Decline => Decision::rejected(&self.name, reason, self.risk_level),
            TierOutcome::Refer { suggestion } => {
                Decision::needs_review(&self.name, reason, self.risk_level, suggestion.as_str())
            }
        };
        Ok(decision.with_detail(format!("tier '{}' matched delay of {} hours", self.name, delay_hours)))
    }
}

/// Ordered, validated set of tiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierTable {
    tiers: Vec<Tier>,
    currency: Currency,
}

impl TierTable {
    /// Validates and builds a table
    ///
    /// Tiers must be listed in ascending delay order without overlapping, and
    /// every compensating tier must pay a positive amount. Gaps are allowed;
    /// see [`TierTable::is_total`].
    pub fn new(tiers: Vec<Tier>, currency: Currency) -> Result<Self, TierTableError> {
        if tiers.is_empty() {
            return Err(TierTableError::Empty);
        }

        for tier in &tiers {
            if tier.name.trim().is_empty() || tier.reason.trim().is_empty() {
                return Err(TierTableError::MissingText(tier.name.clone()));
            }
            if tier.range.is_empty() {
                return Err(TierTableError::EmptyRange(tier.name.clone()));
            }
            if let TierOutcome::Compensate { amount } = tier.outcome {
                if amount <= Decimal::ZERO {
                    return Err(TierTableError::NonPositiveAmount(tier.name.clone()));
                }
            }
        }

        for pair in tiers.windows(2) {
            let (earlier, later) = (&pair[0], &pair[1]);
            let ordered = match (earlier.range.max, later.range.min) {
                (Some(max), Some(min)) => min > max,
                _ => false,
            };
            if !ordered {
                return Err(TierTableError::Overlap {
                    earlier: earlier.name.clone(),
                    later: later.name.clone(),
                });
            }
        }

        Ok(Self { tiers, currency })
    }

    /// The travel delay compensation table
    pub fn standard() -> Self {
        Self {
            tiers: vec![
                Tier::new(
                    "Early departure",
                    DelayRange::up_to(-1),
                    TierOutcome::Decline,
                    RiskLevel::Low,
                    "Flight departed ahead of schedule (delay of {delay} hours); no delay compensation applies",
                ),
                Tier::new(
                    "Insufficient delay",
                    DelayRange::between(0, 3),
                    TierOutcome::Decline,
                    RiskLevel::Low,
                    "Delay of {delay} hours is below the 4 hour compensation threshold",
                ),
                Tier::new(
                    "Standard tier A",
                    DelayRange::between(4, 7),
                    TierOutcome::Compensate { amount: dec!(300.00) },
                    RiskLevel::Low,
                    "Delay of {delay} hours qualifies for compensation (4 to 8 hours)",
                ),
                Tier::new(
                    "Standard tier B",
                    DelayRange::between(8, 24),
                    TierOutcome::Compensate { amount: dec!(600.00) },
                    RiskLevel::Low,
                    "Delay of {delay} hours qualifies for compensation (8 to 24 hours)",
                ),
                Tier::new(
                    "Anomalous delay",
                    DelayRange::from(25),
                    TierOutcome::Refer {
                        suggestion: "Delay exceeds 24 hours; verify the flight data and the cause of the delay manually".to_string(),
                    },
                    RiskLevel::High,
                    "Delay of {delay} hours exceeds 24 hours and is treated as anomalous",
                ),
            ],
            currency: Currency::CNY,
        }
    }

    /// First tier whose range contains `delay_hours`
    pub fn select(&self, delay_hours: i64) -> Option<&Tier> {
        self.tiers.iter().find(|tier| tier.range.contains(delay_hours))
    }

    /// Returns true if every possible delay falls into some tier
    pub fn is_total(&self) -> bool {
        let (Some(first), Some(last)) = (self.tiers.first(), self.tiers.last()) else {
            return false;
        };
        first.range.min.is_none()
            && last.range.max.is_none()
            && self.tiers.windows(2).all(|pair| {
                matches!(
                    (pair[0].range.max, pair[1].range.min),
                    (Some(max), Some(min)) if min == max + 1
                )
            })
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self::standard()
    }
}
