//! # Domain Errors
//!
//! Business-rule violations surfaced by the negotiation engine.
//!
//! Every variant is client-caused: it names the rule that failed and carries
//! enough detail for the calling layer to produce an actionable message.
//! Infrastructure failures live in the persistence and application layers.
//!
//! # Examples
//!
//! ```
//! use craft_quotes::domain::errors::DomainError;
//! use craft_quotes::domain::value_objects::QuoteStatus;
//!
//! let err = DomainError::InvalidState {
//!     current: QuoteStatus::Rejected,
//!     required: "PENDING or COUNTER_OFFERED",
//! };
//! assert!(err.to_string().contains("REJECTED"));
//! ```

use crate::domain::value_objects::{Price, ProductId, QuoteStatus, Timestamp, UserId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Business-rule violation raised by domain logic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Type of entity.
        entity: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// The actor is not permitted to perform the action.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The quote's status does not permit the attempted action.
    #[error("invalid state: quote is {current}, action requires {required}")]
    InvalidState {
        /// The quote's current status.
        current: QuoteStatus,
        /// The status(es) the action requires.
        required: &'static str,
    },

    /// The quote's negotiation deadline has passed.
    #[error("quote expired at {expired_at}")]
    Expired {
        /// When the quote expired.
        expired_at: Timestamp,
    },

    /// Malformed or out-of-bounds input.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A requested price fell below the acceptable floor.
    #[error("requested price {offered} is below the floor of {floor}")]
    PriceBelowFloor {
        /// The price the customer offered.
        offered: Price,
        /// The minimum acceptable amount.
        floor: Decimal,
    },

    /// A free-text field exceeded its length bound.
    #[error("{field} is {len} chars, exceeding the {max} char limit")]
    TextTooLong {
        /// Which field overflowed.
        field: &'static str,
        /// Actual length.
        len: usize,
        /// Maximum allowed length.
        max: usize,
    },

    /// An active quote already exists for this customer/product pair.
    #[error("an active quote already exists for product {product_id} by customer {customer_id}")]
    DuplicateActiveQuote {
        /// The product being quoted.
        product_id: ProductId,
        /// The customer holding the active quote.
        customer_id: UserId,
    },
}

impl DomainError {
    /// Creates a not-found error.
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Creates a forbidden error.
    #[must_use]
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden(reason.into())
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }

    /// Returns true if this is a not-found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a state-machine violation.
    #[must_use]
    pub const fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState { .. })
    }

    /// Returns true if this error reports an expired quote.
    #[must_use]
    pub const fn is_expired(&self) -> bool {
        matches!(self, Self::Expired { .. })
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
