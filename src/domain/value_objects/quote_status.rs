//! # Quote Status
//!
//! Quote request lifecycle state machine.
//!
//! This module provides the [`QuoteStatus`] enum representing the lifecycle
//! of a price negotiation between a customer and an artisan.
//!
//! # State Machine
//!
//! ```text
//! Pending → CounterOffered ⟲ (artisan may re-counter)
//!    ↓           ↓
//!    ├───────────┼→ Accepted → Completed
//!    ├───────────┼→ Rejected
//!    └───────────┴→ Expired
//! ```
//!
//! # Examples
//!
//! ```
//! use craft_quotes::domain::value_objects::quote_status::QuoteStatus;
//!
//! let status = QuoteStatus::Pending;
//! assert!(status.can_transition_to(QuoteStatus::CounterOffered));
//! assert!(!status.can_transition_to(QuoteStatus::Completed));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Quote request lifecycle status.
///
/// State transitions are enforced via
/// [`can_transition_to`](QuoteStatus::can_transition_to).
///
/// # Terminal States
///
/// - [`Rejected`](QuoteStatus::Rejected) — the artisan declined, or a party cancelled
/// - [`Expired`](QuoteStatus::Expired) — the negotiation deadline passed
/// - [`Completed`](QuoteStatus::Completed) — the accepted quote was converted to an order
///
/// [`Accepted`](QuoteStatus::Accepted) is terminal for negotiation purposes
/// (no further offers) but may still move to `Completed` when the external
/// order conversion fires.
///
/// # Examples
///
/// ```
/// use craft_quotes::domain::value_objects::quote_status::QuoteStatus;
///
/// assert!(QuoteStatus::Pending.is_active());
/// assert!(!QuoteStatus::Rejected.is_active());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum QuoteStatus {
    /// Customer request submitted, awaiting the artisan's response.
    #[default]
    Pending = 0,

    /// The artisan countered with an alternative price, awaiting the customer.
    CounterOffered = 1,

    /// The artisan accepted; the final price is fixed.
    Accepted = 2,

    /// The artisan declined, or a party cancelled (terminal).
    Rejected = 3,

    /// The negotiation deadline passed without resolution (terminal).
    Expired = 4,

    /// The accepted quote was converted into an order (terminal).
    Completed = 5,
}

impl QuoteStatus {
    /// Returns true if this is a terminal status.
    ///
    /// Terminal statuses permit no further mutation.
    ///
    /// # Examples
    ///
    /// ```
    /// use craft_quotes::domain::value_objects::quote_status::QuoteStatus;
    ///
    /// assert!(!QuoteStatus::Pending.is_terminal());
    /// assert!(QuoteStatus::Rejected.is_terminal());
    /// assert!(QuoteStatus::Expired.is_terminal());
    /// assert!(QuoteStatus::Completed.is_terminal());
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Expired | Self::Completed)
    }

    /// Returns true if the quote is still negotiable (awaiting a party).
    ///
    /// Active quotes are the only ones the duplicate-per-pair invariant
    /// and the expiration sweeper consider.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::CounterOffered)
    }

    /// Returns true if this status can transition to the target status.
    ///
    /// Enforces the quote state machine rules:
    /// - Pending → CounterOffered, Accepted, Rejected, Expired
    /// - CounterOffered → CounterOffered, Accepted, Rejected, Expired
    /// - Accepted → Completed
    /// - Rejected, Expired, Completed → (none)
    ///
    /// The `CounterOffered → CounterOffered` self-transition covers an
    /// artisan revising a standing counter-offer.
    ///
    /// # Examples
    ///
    /// ```
    /// use craft_quotes::domain::value_objects::quote_status::QuoteStatus;
    ///
    /// assert!(QuoteStatus::CounterOffered.can_transition_to(QuoteStatus::CounterOffered));
    /// assert!(QuoteStatus::Accepted.can_transition_to(QuoteStatus::Completed));
    /// assert!(!QuoteStatus::Expired.can_transition_to(QuoteStatus::Pending));
    /// ```
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            // From Pending
            (Self::Pending, Self::CounterOffered)
                | (Self::Pending, Self::Accepted)
                | (Self::Pending, Self::Rejected)
                | (Self::Pending, Self::Expired)
                // From CounterOffered
                | (Self::CounterOffered, Self::CounterOffered)
                | (Self::CounterOffered, Self::Accepted)
                | (Self::CounterOffered, Self::Rejected)
                | (Self::CounterOffered, Self::Expired)
                // From Accepted
                | (Self::Accepted, Self::Completed)
        )
    }

    /// Returns the valid next statuses from this status.
    ///
    /// # Examples
    ///
    /// ```
    /// use craft_quotes::domain::value_objects::quote_status::QuoteStatus;
    ///
    /// let next = QuoteStatus::Accepted.valid_transitions();
    /// assert_eq!(next, vec![QuoteStatus::Completed]);
    /// ```
    #[must_use]
    pub fn valid_transitions(&self) -> Vec<Self> {
        match self {
            Self::Pending => vec![
                Self::CounterOffered,
                Self::Accepted,
                Self::Rejected,
                Self::Expired,
            ],
            Self::CounterOffered => vec![
                Self::CounterOffered,
                Self::Accepted,
                Self::Rejected,
                Self::Expired,
            ],
            Self::Accepted => vec![Self::Completed],
            Self::Rejected | Self::Expired | Self::Completed => vec![],
        }
    }

    /// Returns the numeric value of this status.
    #[inline]
    #[must_use]
    pub const fn as_u8(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "PENDING",
            Self::CounterOffered => "COUNTER_OFFERED",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
            Self::Expired => "EXPIRED",
            Self::Completed => "COMPLETED",
        };
        write!(f, "{s}")
    }
}

/// Error returned when converting an invalid u8 to a [`QuoteStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidQuoteStatusError(
    /// The invalid u8 value.
    pub u8,
);

impl fmt::Display for InvalidQuoteStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid quote status value: {}", self.0)
    }
}

impl std::error::Error for InvalidQuoteStatusError {}

impl TryFrom<u8> for QuoteStatus {
    type Error = InvalidQuoteStatusError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Pending),
            1 => Ok(Self::CounterOffered),
            2 => Ok(Self::Accepted),
            3 => Ok(Self::Rejected),
            4 => Ok(Self::Expired),
            5 => Ok(Self::Completed),
            _ => Err(InvalidQuoteStatusError(value)),
        }
    }
}
