//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! travel delay claims test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built claims for the canonical scenarios
//! - `builders`: Builder for claim input with sensible defaults
//! - `database`: PostgreSQL test container management
//! - `assertions`: Decision invariant checks
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
