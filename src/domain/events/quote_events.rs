//! # Quote Lifecycle Events
//!
//! Events emitted on quote transitions for the notification/order gateway.
//!
//! These are outbound intents: the engine records that something happened
//! and a collaborator decides how to deliver it. Event publication is
//! fire-and-forget and never influences negotiation logic.
//!
//! # Event Flow
//!
//! ```text
//! QuoteRequested -> QuoteResponded (reject / counter)
//!                -> QuoteAccepted  (order-eligible)
//!                -> QuoteExpired   (lazy check or sweeper)
//! ```

use crate::domain::value_objects::{EventId, Price, QuoteId, QuoteStatus, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Common metadata carried by every quote event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique identifier for this event.
    pub event_id: EventId,
    /// The quote this event relates to.
    pub quote_id: QuoteId,
    /// When this event occurred.
    pub timestamp: Timestamp,
}

impl EventMetadata {
    /// Creates metadata for a quote with a generated event ID.
    #[must_use]
    pub fn for_quote(quote_id: QuoteId) -> Self {
        Self {
            event_id: EventId::new_v4(),
            quote_id,
            timestamp: Timestamp::now(),
        }
    }
}

/// A quote lifecycle event for external collaborators.
///
/// Every variant carries the quote ID and both party IDs so the
/// notification layer can address each side without a read-back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteEvent {
    /// A customer opened a quote request.
    QuoteRequested {
        /// Event metadata.
        metadata: EventMetadata,
        /// The customer who opened the request.
        customer_id: UserId,
        /// The artisan being asked.
        artisan_id: UserId,
    },

    /// The artisan responded (reject or counter) without closing the deal.
    QuoteResponded {
        /// Event metadata.
        metadata: EventMetadata,
        /// The customer party.
        customer_id: UserId,
        /// The artisan party.
        artisan_id: UserId,
        /// The status after the response.
        new_status: QuoteStatus,
    },

    /// The artisan accepted; the quote is order-eligible.
    QuoteAccepted {
        /// Event metadata.
        metadata: EventMetadata,
        /// The customer party.
        customer_id: UserId,
        /// The artisan party.
        artisan_id: UserId,
        /// The agreed price.
        final_price: Price,
    },

    /// The quote passed its deadline and was force-expired.
    QuoteExpired {
        /// Event metadata.
        metadata: EventMetadata,
        /// The customer party.
        customer_id: UserId,
        /// The artisan party.
        artisan_id: UserId,
    },
}

impl QuoteEvent {
    /// Creates a `QuoteRequested` event.
    #[must_use]
    pub fn requested(quote_id: QuoteId, customer_id: UserId, artisan_id: UserId) -> Self {
        Self::QuoteRequested {
            metadata: EventMetadata::for_quote(quote_id),
            customer_id,
            artisan_id,
        }
    }

    /// Creates a `QuoteResponded` event.
    #[must_use]
    pub fn responded(
        quote_id: QuoteId,
        customer_id: UserId,
        artisan_id: UserId,
        new_status: QuoteStatus,
    ) -> Self {
        Self::QuoteResponded {
            metadata: EventMetadata::for_quote(quote_id),
            customer_id,
            artisan_id,
            new_status,
        }
    }

    /// Creates a `QuoteAccepted` event.
    #[must_use]
    pub fn accepted(
        quote_id: QuoteId,
        customer_id: UserId,
        artisan_id: UserId,
        final_price: Price,
    ) -> Self {
        Self::QuoteAccepted {
            metadata: EventMetadata::for_quote(quote_id),
            customer_id,
            artisan_id,
            final_price,
        }
    }

    /// Creates a `QuoteExpired` event.
    #[must_use]
    pub fn expired(quote_id: QuoteId, customer_id: UserId, artisan_id: UserId) -> Self {
        Self::QuoteExpired {
            metadata: EventMetadata::for_quote(quote_id),
            customer_id,
            artisan_id,
        }
    }

    /// Returns the event metadata.
    #[must_use]
    pub const fn metadata(&self) -> &EventMetadata {
        match self {
            Self::QuoteRequested { metadata, .. }
            | Self::QuoteResponded { metadata, .. }
            | Self::QuoteAccepted { metadata, .. }
            | Self::QuoteExpired { metadata, .. } => metadata,
        }
    }

    /// Returns the quote this event relates to.
    #[inline]
    #[must_use]
    pub const fn quote_id(&self) -> QuoteId {
        self.metadata().quote_id
    }

    /// Returns the human-readable name of this event.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::QuoteRequested { .. } => "QuoteRequested",
            Self::QuoteResponded { .. } => "QuoteResponded",
            Self::QuoteAccepted { .. } => "QuoteAccepted",
            Self::QuoteExpired { .. } => "QuoteExpired",
        }
    }
}

impl fmt::Display for QuoteEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} quote={}", self.event_name(), self.quote_id())
    }
}
