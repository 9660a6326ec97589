//! Travel Delay Claims Domain
//!
//! This crate holds the claim decision engine and the claim lifecycle
//! around it: completeness checks, delay computation, the compensation tier
//! table, the requested-amount consistency check, and the persistence port.
//!
//! # Claim Lifecycle
//!
//! ```text
//! Submitted -> Pending -> Approved -> Paid
//!                     \-> Rejected
//! ```
//!
//! Claims the engine flags for manual review stay `Pending` until a reviewer
//! approves or rejects them.

pub mod claim;
pub mod delay;
pub mod validation;
pub mod decision;
pub mod tiers;
pub mod engine;
pub mod workflow;
pub mod ports;
pub mod adapters;
pub mod service;
pub mod error;

pub use claim::{ClaimInput, ClaimRecord, ClaimStatus};
pub use delay::{compute_delay_hours, AssessedClaim};
pub use validation::{ClaimValidator, ValidationResult};
pub use decision::{Decision, RiskLevel};
pub use tiers::{DelayRange, Tier, TierOutcome, TierTable};
pub use engine::DecisionEngine;
pub use ports::{ClaimRepository, StatusCount};
pub use adapters::InMemoryClaimRepository;
pub use service::{ClaimService, StatusSummary, SubmittedClaim};
pub use error::{ClaimError, EvaluationFault, TierTableError};
