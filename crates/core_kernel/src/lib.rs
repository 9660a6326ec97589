//! Core Kernel - Foundational types shared by the claims system
//!
//! This crate provides the building blocks used by the domain, database and
//! API layers:
//! - Money types with precise decimal arithmetic
//! - Timezone and date-range handling for claim bookkeeping
//! - Strongly typed identifiers
//! - The common port error model

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;

pub use money::{Money, Currency, MoneyError};
pub use temporal::{DateTimeRange, Timezone, TemporalError};
pub use identifiers::{ClaimId, AuditEventId};
pub use ports::{PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth};
