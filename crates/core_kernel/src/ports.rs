//! Ports and Adapters Infrastructure
//!
//! The decision engine never touches storage. Anything it hands off to the
//! outside world goes through a port trait defined in the domain crate, and
//! adapters (in-memory, PostgreSQL) implement that trait.
//!
//! ```text
//!           ┌───────────────────────────────┐
//!           │        ClaimService           │
//!           └───────────────┬───────────────┘
//!                           ▼
//!           ┌───────────────────────────────┐
//!           │   ClaimRepository (port)      │
//!           └───────┬───────────────┬───────┘
//!                   ▲               ▲
//!        ┌──────────┴─────┐  ┌──────┴──────────┐
//!        │   In-memory    │  │   PostgreSQL    │
//!        │   adapter      │  │   adapter       │
//!        └────────────────┘  └─────────────────┘
//! ```
//!
//! This module holds the pieces every port shares: [`PortError`], the
//! [`DomainPort`] marker and the [`HealthCheckable`] contract.

use std::fmt;
use thiserror::Error;
use serde::{Deserialize, Serialize};

/// Error type for port operations
///
/// All adapters report failures through this type so callers handle the
/// in-memory and database implementations identically.
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: String,
        id: String,
    },

    /// The adapter refused data it cannot store
    #[error("Validation error: {message}")]
    Validation {
        message: String,
    },

    /// The operation conflicts with existing data
    #[error("Conflict: {message}")]
    Conflict {
        message: String,
    },

    /// Connection to the underlying system failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A stored value could not be mapped back to a domain type
    #[error("Transformation error: {message}")]
    Transformation {
        message: String,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
        }
    }

    /// Creates a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        PortError::Conflict {
            message: message.into(),
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a Transformation error
    pub fn transformation(message: impl Into<String>) -> Self {
        PortError::Transformation {
            message: message.into(),
        }
    }

    /// Returns true if this error indicates a transient failure that may succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(self, PortError::Connection { .. })
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }

    /// Returns true if this error indicates a uniqueness or state conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, PortError::Conflict { .. })
    }
}

/// Marker trait for all domain ports
///
/// All port traits should extend this marker to ensure they are
/// thread-safe and can be used in async contexts.
pub trait DomainPort: Send + Sync + 'static {}

/// Health status for an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    Healthy,
    Unhealthy,
}

/// Health check result for an adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    /// Adapter identifier
    pub adapter_id: String,
    /// Current health status
    pub status: AdapterHealth,
    /// Latency of the health check in milliseconds
    pub latency_ms: u64,
    /// Optional message with additional details
    pub message: Option<String>,
    /// Timestamp of the health check
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

impl HealthCheckResult {
    /// Creates a healthy result
    pub fn healthy(adapter_id: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            adapter_id: adapter_id.into(),
            status: AdapterHealth::Healthy,
            latency_ms,
            message: None,
            checked_at: chrono::Utc::now(),
        }
    }

    /// Creates an unhealthy result with a message
    pub fn unhealthy(adapter_id: impl Into<String>, latency_ms: u64, message: impl Into<String>) -> Self {
        Self {
            adapter_id: adapter_id.into(),
            status: AdapterHealth::Unhealthy,
            latency_ms,
            message: Some(message.into()),
            checked_at: chrono::Utc::now(),
        }
    }

    /// Returns true if the adapter can serve requests
    pub fn is_operational(&self) -> bool {
        self.status == AdapterHealth::Healthy
    }
}

/// Trait for adapters that support health checks
#[async_trait::async_trait]
pub trait HealthCheckable: Send + Sync {
    /// Performs a health check on the adapter
    async fn health_check(&self) -> HealthCheckResult;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_error_not_found() {
        let error = PortError::not_found("Claim", "CLAIM20250626143000");
        assert!(error.is_not_found());
        assert!(!error.is_transient());
        assert!(error.to_string().contains("Claim"));
        assert!(error.to_string().contains("CLAIM20250626143000"));
    }

    #[test]
    fn test_port_error_transient() {
        assert!(PortError::connection("pool closed").is_transient());
        assert!(!PortError::validation("calculated amount must not be negative").is_transient());

        let conflict = PortError::conflict("duplicate claim number");
        assert!(conflict.is_conflict());
        assert!(!conflict.is_transient());
    }

    #[test]
    fn test_health_check_result() {
        assert!(HealthCheckResult::healthy("memory", 0).is_operational());
        let down = HealthCheckResult::unhealthy("postgres", 12, "connection refused");
        assert!(!down.is_operational());
        assert_eq!(down.message.as_deref(), Some("connection refused"));
    }
}
