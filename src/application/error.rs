//! # Application Errors
//!
//! Error types for the engine's operation surface.
//!
//! These roll the layer-specific errors into one caller-facing type:
//! business-rule violations (client-caused), persistence failures, and
//! gateway failures.
//!
//! # Error Hierarchy
//!
//! ```text
//! EngineError
//! ├── Domain(DomainError)          - business rule violations (client-caused)
//! ├── Repository(RepositoryError)  - quote/history store failures
//! └── Gateway(GatewayError)        - product/user lookup failures
//! ```
//!
//! # Examples
//!
//! ```
//! use craft_quotes::application::error::EngineError;
//! use craft_quotes::domain::errors::DomainError;
//!
//! let err = EngineError::from(DomainError::validation("price must be positive"));
//! assert!(err.is_client_error());
//! assert!(!err.is_store_unavailable());
//! ```

use crate::application::gateways::GatewayError;
use crate::domain::errors::DomainError;
use crate::infrastructure::persistence::traits::RepositoryError;
use thiserror::Error;

/// Failure surfaced by a negotiation engine operation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Business-rule violation.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Quote or history store failure.
    #[error("store error: {0}")]
    Repository(#[from] RepositoryError),

    /// Product or user gateway failure.
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

impl EngineError {
    /// Returns true if the failure was caused by the caller's input or
    /// timing rather than by this service.
    ///
    /// Client-caused failures carry actionable detail for the transport
    /// layer and are not logged as server errors. Duplicate-active and
    /// version-conflict store errors also count: they report a race the
    /// caller lost, not a broken store.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        match self {
            Self::Domain(_) => true,
            Self::Repository(err) => err.is_duplicate() || err.is_version_conflict(),
            Self::Gateway(_) => false,
        }
    }

    /// Returns true if the underlying persistence is unavailable.
    #[must_use]
    pub const fn is_store_unavailable(&self) -> bool {
        matches!(self, Self::Repository(err) if err.is_unavailable())
    }

    /// Returns the domain error, if this is one.
    #[must_use]
    pub const fn as_domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
