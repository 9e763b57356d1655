//! Ports and Adapters Infrastructure
//!
//! The cover engine never talks to the claims-assessment system, the
//! settlement vault, or the legacy token ledger directly. Each of those is a
//! port trait defined in the domain crate; this module provides the shared
//! error type and marker trait every port builds on.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               CoverService                    │
//! │  (claims, redemption, migration, registry)    │
//! └──────────────────────────────────────────────┘
//!          │               │                │
//!          ▼               ▼                ▼
//!   AssessmentPort   SettlementPort   LegacyCoverPort
//!          ▲               ▲                ▲
//!   voting system     asset vault      legacy ledger
//!   (or fake oracle)  (or in-memory)   (or in-memory)
//! ```

use std::fmt;
use thiserror::Error;

/// Error type for port operations
///
/// Adapters for every collaborator report failures through this type so the
/// domain can surface them uniformly.
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: String,
        id: String,
    },

    /// The collaborator rejected the request
    #[error("Rejected: {message}")]
    Rejected {
        message: String,
    },

    /// The operation conflicts with the collaborator's current state
    #[error("Conflict: {message}")]
    Conflict {
        message: String,
    },

    /// The pooled funds cannot cover the requested amount
    #[error("Insufficient liquidity: requested {requested}, available {available}")]
    InsufficientLiquidity {
        requested: String,
        available: String,
    },

    /// The collaborator is unavailable
    #[error("Service unavailable: {service}")]
    ServiceUnavailable {
        service: String,
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

    /// Creates a Rejected error
    pub fn rejected(message: impl Into<String>) -> Self {
        PortError::Rejected {
            message: message.into(),
        }
    }

    /// Creates a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        PortError::Conflict {
            message: message.into(),
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true if this error indicates a transient failure that may succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            PortError::InsufficientLiquidity { .. } | PortError::ServiceUnavailable { .. }
        )
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }
}

/// Marker trait for all domain ports
///
/// All port traits extend this marker so they can be shared across tasks.
pub trait DomainPort: Send + Sync + 'static {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_error_not_found() {
        let error = PortError::not_found("LegacyToken", "LTKN-3");
        assert!(error.is_not_found());
        assert!(!error.is_transient());
        assert!(error.to_string().contains("LTKN-3"));
    }

    #[test]
    fn test_port_error_transient() {
        let liquidity = PortError::InsufficientLiquidity {
            requested: "1 ETH".to_string(),
            available: "0.5 ETH".to_string(),
        };
        assert!(liquidity.is_transient());
        assert!(!PortError::rejected("bad").is_transient());
    }
}
