//! Claims domain errors

use thiserror::Error;

use core_kernel::{PortError, TemporalError};

/// Errors that can occur in the claims domain
#[derive(Debug, Error)]
pub enum ClaimError {
    #[error("Claim not found: {0}")]
    ClaimNotFound(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Could not allocate a unique claim number from {0}")]
    ClaimNumberExhausted(String),

    #[error(transparent)]
    Port(#[from] PortError),

    #[error(transparent)]
    Temporal(#[from] TemporalError),
}

/// Internal failure while evaluating a claim
///
/// Never leaves the engine: [`crate::engine::DecisionEngine`] converts every
/// fault into a high-risk decision routed to manual review.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EvaluationFault {
    #[error("departure times are missing, delay cannot be computed")]
    MissingDepartureTimes,

    #[error("no tier covers a delay of {delay_hours} hours")]
    NoMatchingTier { delay_hours: i64 },

    #[error("tier '{tier}' produced an invalid outcome: {detail}")]
    InvalidOutcome { tier: String, detail: String },

    #[error("evaluation panicked: {0}")]
    Panicked(String),
}

/// Errors raised when building a tier table
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TierTableError {
    #[error("tier table must contain at least one tier")]
    Empty,

    #[error("tier '{0}' has an empty delay range")]
    EmptyRange(String),

    #[error("tier '{later}' overlaps or precedes tier '{earlier}'")]
    Overlap { earlier: String, later: String },

    #[error("eligible tier '{0}' must pay a positive amount")]
    NonPositiveAmount(String),

    #[error("tier '{0}' must have a name and a reason")]
    MissingText(String),
}
