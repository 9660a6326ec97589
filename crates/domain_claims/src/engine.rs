//! Claim decision engine
//!
//! ```text
//! ClaimInput ─► completeness check ──(missing)──► "completeness-check" decision
//!                    │
//!                    ▼
//!             delay computation ─► tier table ─► amount consistency ─► Decision
//!                                      │
//!                               (fault / panic) ──► "exception-handling" decision
//! ```
//!
//! The engine is stateless; one instance can be shared across threads.

use std::panic::{self, AssertUnwindSafe};

use tracing::{error, info, warn};

use crate::claim::ClaimInput;
use crate::decision::Decision;
use crate::delay::AssessedClaim;
use crate::error::EvaluationFault;
use crate::tiers::TierTable;
use crate::validation::ClaimValidator;

/// Evaluates claims against a tier table
#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    tiers: TierTable,
}

impl DecisionEngine {
    pub fn new(tiers: TierTable) -> Self {
        Self { tiers }
    }

    pub fn tiers(&self) -> &TierTable {
        &self.tiers
    }

    /// Runs the full pipeline for raw claim input
    ///
    /// Always returns a decision; incomplete claims never reach the tiers.
    /// Validation warnings are appended to the decision's rule details.
    pub fn decide(&self, input: &ClaimInput) -> Decision {
        let validation = ClaimValidator::validate(input);
        if !validation.is_valid {
            let missing = validation.summary();
            warn!(
                policy_number = %input.policy_number,
                flight_number = %input.flight_number,
                missing = %missing,
                "claim is incomplete, routing to manual review"
            );
            return Decision::incomplete(&missing);
        }

        let decision = self.evaluate(&AssessedClaim::new(input));
        validation.warnings.into_iter().fold(decision, Decision::with_detail)
    }

    /// Evaluates a claim whose delay has been derived
    ///
    /// Faults and panics are converted into an `exception-handling` decision.
    pub fn evaluate(&self, claim: &AssessedClaim<'_>) -> Decision {
        let outcome = guard(|| self.try_evaluate(claim));

        let decision = match outcome {
            Ok(decision) => decision,
            Err(fault) => {
                error!(
                    policy_number = %claim.input().policy_number,
                    delay_hours = claim.delay_hours(),
                    error = %fault,
                    "claim evaluation failed"
                );
                Decision::from_fault(&fault)
            }
        };

        info!(
            policy_number = %claim.input().policy_number,
            flight_number = %claim.input().flight_number,
            delay_hours = claim.delay_hours(),
            eligible = decision.eligible(),
            amount = %decision.compensation_amount(),
            rule = decision.rule_name(),
            risk = %decision.risk_level(),
            manual_review = decision.requires_manual_review(),
            "claim decided"
        );
        decision
    }

    fn try_evaluate(&self, claim: &AssessedClaim<'_>) -> Result<Decision, EvaluationFault> {
        if !claim.has_departure_times() {
            return Err(EvaluationFault::MissingDepartureTimes);
        }

        let delay_hours = claim.delay_hours();
        let tier = self
            .tiers
            .select(delay_hours)
            .ok_or(EvaluationFault::NoMatchingTier { delay_hours })?;
        let decision = tier.decide(delay_hours, self.tiers.currency())?;

        Ok(check_requested_amount(decision, claim))
    }
}

/// Flags eligible decisions whose requested amount differs from the computed one
fn check_requested_amount(decision: Decision, claim: &AssessedClaim<'_>) -> Decision {
    let Some(claimed) = claim.input().claimed_amount else {
        return decision;
    };
    if !decision.eligible() || claimed == decision.compensation_amount() {
        return decision;
    }

    warn!(
        policy_number = %claim.input().policy_number,
        requested = %claimed,
        calculated = %decision.compensation_amount(),
        "requested amount differs from calculated compensation"
    );
    decision.with_amount_mismatch(claimed)
}

/// Runs `f`, turning a panic into [`EvaluationFault::Panicked`]
fn guard<F>(f: F) -> Result<Decision, EvaluationFault>
where
    F: FnOnce() -> Result<Decision, EvaluationFault>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(EvaluationFault::Panicked(message))
        }
    }
}
