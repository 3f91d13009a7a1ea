//! # Negotiation History Entry
//!
//! One immutable audit record of an action taken on a quote request.
//!
//! Entries are append-only: they are created alongside every mutating
//! negotiation action and never modified or deleted. Reading them back in
//! ascending timestamp order reconstructs the negotiation.
//!
//! Expiration produces no entry; there is no party to attribute one to.
//!
//! # Examples
//!
//! ```
//! use craft_quotes::domain::entities::negotiation_entry::NegotiationEntry;
//! use craft_quotes::domain::value_objects::{Actor, NegotiationAction, Price, QuoteId};
//!
//! let entry = NegotiationEntry::new(QuoteId::new_v4(), NegotiationAction::Request, Actor::Customer)
//!     .with_new_price(Price::from_major(60).unwrap());
//!
//! assert_eq!(entry.action(), NegotiationAction::Request);
//! assert!(entry.previous_price().is_none());
//! ```

use crate::domain::value_objects::{Actor, EntryId, NegotiationAction, Price, QuoteId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An immutable negotiation audit record.
///
/// # Invariants
///
/// - Never mutated after creation (no setters; `with_*` consume the value
///   during construction only)
/// - `actor` is always a human party; system-driven expiry writes no entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegotiationEntry {
    /// Unique identifier for this entry.
    id: EntryId,
    /// The quote this entry belongs to.
    quote_id: QuoteId,
    /// What happened.
    action: NegotiationAction,
    /// Which party did it.
    actor: Actor,
    /// Price on the table before the action, if relevant.
    previous_price: Option<Price>,
    /// Price on the table after the action, if relevant.
    new_price: Option<Price>,
    /// Free-text note attached to the action.
    message: Option<String>,
    /// Optional structured side-data (e.g. old/new status).
    metadata: Option<serde_json::Value>,
    /// When the action happened.
    timestamp: Timestamp,
}

impl NegotiationEntry {
    /// Creates an entry for an action on a quote.
    #[must_use]
    pub fn new(quote_id: QuoteId, action: NegotiationAction, actor: Actor) -> Self {
        Self {
            id: EntryId::new_v4(),
            quote_id,
            action,
            actor,
            previous_price: None,
            new_price: None,
            message: None,
            metadata: None,
            timestamp: Timestamp::now(),
        }
    }

    /// Attaches the price that stood before the action.
    #[must_use]
    pub fn with_previous_price(mut self, price: Price) -> Self {
        self.previous_price = Some(price);
        self
    }

    /// Attaches the price that stands after the action.
    #[must_use]
    pub fn with_new_price(mut self, price: Price) -> Self {
        self.new_price = Some(price);
        self
    }

    /// Attaches a free-text note.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attaches structured side-data.
    #[must_use]
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Creates an entry with specific values (for reconstruction from storage).
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: EntryId,
        quote_id: QuoteId,
        action: NegotiationAction,
        actor: Actor,
        previous_price: Option<Price>,
        new_price: Option<Price>,
        message: Option<String>,
        metadata: Option<serde_json::Value>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id,
            quote_id,
            action,
            actor,
            previous_price,
            new_price,
            message,
            metadata,
            timestamp,
        }
    }

    /// Returns the entry ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> EntryId {
        self.id
    }

    /// Returns the quote this entry belongs to.
    #[inline]
    #[must_use]
    pub fn quote_id(&self) -> QuoteId {
        self.quote_id
    }

    /// Returns what happened.
    #[inline]
    #[must_use]
    pub fn action(&self) -> NegotiationAction {
        self.action
    }

    /// Returns which party acted.
    #[inline]
    #[must_use]
    pub fn actor(&self) -> Actor {
        self.actor
    }

    /// Returns the price that stood before the action, if recorded.
    #[inline]
    #[must_use]
    pub fn previous_price(&self) -> Option<Price> {
        self.previous_price
    }

    /// Returns the price that stands after the action, if recorded.
    #[inline]
    #[must_use]
    pub fn new_price(&self) -> Option<Price> {
        self.new_price
    }

    /// Returns the attached note, if any.
    #[inline]
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the structured side-data, if any.
    #[inline]
    #[must_use]
    pub fn metadata(&self) -> Option<&serde_json::Value> {
        self.metadata.as_ref()
    }

    /// Returns when the action happened.
    #[inline]
    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

impl fmt::Display for NegotiationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} by {} on quote {} at {}",
            self.action, self.actor, self.quote_id, self.timestamp
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_entry_has_fresh_id_and_timestamp() {
        let quote_id = QuoteId::new_v4();
        let a = NegotiationEntry::new(quote_id, NegotiationAction::Request, Actor::Customer);
        let b = NegotiationEntry::new(quote_id, NegotiationAction::Request, Actor::Customer);
        assert_ne!(a.id(), b.id());
        assert_eq!(a.quote_id(), quote_id);
    }

    #[test]
    fn price_snapshots_attach() {
        let entry = NegotiationEntry::new(
            QuoteId::new_v4(),
            NegotiationAction::Counter,
            Actor::Artisan,
        )
        .with_previous_price(Price::from_major(60).unwrap())
        .with_new_price(Price::from_major(75).unwrap());

        assert_eq!(entry.previous_price(), Some(Price::from_major(60).unwrap()));
        assert_eq!(entry.new_price(), Some(Price::from_major(75).unwrap()));
    }

    #[test]
    fn message_and_metadata_attach() {
        let entry = NegotiationEntry::new(
            QuoteId::new_v4(),
            NegotiationAction::Reject,
            Actor::Customer,
        )
        .with_message("found a better option")
        .with_metadata(json!({"old_status": "PENDING", "new_status": "REJECTED"}));

        assert_eq!(entry.message(), Some("found a better option"));
        assert_eq!(
            entry.metadata().and_then(|m| m.get("new_status")).and_then(|v| v.as_str()),
            Some("REJECTED")
        );
    }

    #[test]
    fn from_parts_reconstructs() {
        let id = EntryId::new_v4();
        let ts = Timestamp::from_secs(1_700_000_000).unwrap();
        let entry = NegotiationEntry::from_parts(
            id,
            QuoteId::new_v4(),
            NegotiationAction::Message,
            Actor::Artisan,
            None,
            None,
            Some("note".into()),
            None,
            ts,
        );
        assert_eq!(entry.id(), id);
        assert_eq!(entry.timestamp(), ts);
    }

    #[test]
    fn serde_roundtrip() {
        let entry = NegotiationEntry::new(
            QuoteId::new_v4(),
            NegotiationAction::Accept,
            Actor::Artisan,
        )
        .with_new_price(Price::from_major(75).unwrap());

        let json = serde_json::to_string(&entry).unwrap();
        let back: NegotiationEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }
}
