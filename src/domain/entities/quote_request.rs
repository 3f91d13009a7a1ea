//! # Quote Request Aggregate
//!
//! The quote request is the aggregate root of a price negotiation between a
//! customer and an artisan over a customizable product.
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
//! use craft_quotes::domain::entities::quote_request::QuoteRequestBuilder;
//! use craft_quotes::domain::value_objects::{Price, ProductId, QuoteStatus, Timestamp, UserId};
//!
//! let quote = QuoteRequestBuilder::new(
//!     ProductId::new_v4(),
//!     UserId::new_v4(),
//!     UserId::new_v4(),
//!     Timestamp::now().add_days(7),
//! )
//! .requested_price(Price::from_major(60).unwrap())
//! .build();
//!
//! assert_eq!(quote.status(), QuoteStatus::Pending);
//! assert!(quote.is_active());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Actor, Price, ProductId, QuoteId, QuoteStatus, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Quote request aggregate root.
///
/// Manages the negotiation lifecycle: the customer's request, the artisan's
/// accept/reject/counter responses, message mirrors, and the fixed final
/// price once accepted.
///
/// # Invariants
///
/// - Valid state transitions only (FSM enforced)
/// - `customer_id != artisan_id`
/// - `counter_offer` present only while `CounterOffered`
/// - `final_price` set exactly when the quote is accepted, never altered after
/// - Every mutation bumps `version` and `updated_at`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Unique identifier for this quote request.
    id: QuoteId,
    /// The product being negotiated.
    product_id: ProductId,
    /// The customer who opened the request.
    customer_id: UserId,
    /// The artisan selling the product (the product's seller at creation time).
    artisan_id: UserId,
    /// The customer's proposed price, if any.
    requested_price: Option<Price>,
    /// The artisan's standing counter-offer, if any.
    counter_offer: Option<Price>,
    /// The agreed price, fixed at acceptance.
    final_price: Option<Price>,
    /// Free-text customization requirements.
    specifications: Option<String>,
    /// Latest note from the customer.
    customer_message: Option<String>,
    /// Latest note from the artisan.
    artisan_message: Option<String>,
    /// Current lifecycle status.
    status: QuoteStatus,
    /// Negotiation deadline, fixed at creation.
    expires_at: Timestamp,
    /// When this quote was created.
    created_at: Timestamp,
    /// When this quote was last mutated.
    updated_at: Timestamp,
    /// Version for optimistic locking.
    version: u64,
}

impl QuoteRequest {
    const ACTIVE_STATES: &'static str = "PENDING or COUNTER_OFFERED";

    /// Creates a quote request with a specific ID (for reconstruction from storage).
    ///
    /// Bypasses validation; only use when reconstructing from trusted storage.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: QuoteId,
        product_id: ProductId,
        customer_id: UserId,
        artisan_id: UserId,
        requested_price: Option<Price>,
        counter_offer: Option<Price>,
        final_price: Option<Price>,
        specifications: Option<String>,
        customer_message: Option<String>,
        artisan_message: Option<String>,
        status: QuoteStatus,
        expires_at: Timestamp,
        created_at: Timestamp,
        updated_at: Timestamp,
        version: u64,
    ) -> Self {
        Self {
            id,
            product_id,
            customer_id,
            artisan_id,
            requested_price,
            counter_offer,
            final_price,
            specifications,
            customer_message,
            artisan_message,
            status,
            expires_at,
            created_at,
            updated_at,
            version,
        }
    }

    // ========== Accessors ==========

    /// Returns the quote ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> QuoteId {
        self.id
    }

    /// Returns the product being negotiated.
    #[inline]
    #[must_use]
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// Returns the customer.
    #[inline]
    #[must_use]
    pub fn customer_id(&self) -> UserId {
        self.customer_id
    }

    /// Returns the artisan.
    #[inline]
    #[must_use]
    pub fn artisan_id(&self) -> UserId {
        self.artisan_id
    }

    /// Returns the customer's proposed price, if any.
    #[inline]
    #[must_use]
    pub fn requested_price(&self) -> Option<Price> {
        self.requested_price
    }

    /// Returns the artisan's standing counter-offer, if any.
    #[inline]
    #[must_use]
    pub fn counter_offer(&self) -> Option<Price> {
        self.counter_offer
    }

    /// Returns the agreed price, if the quote was accepted.
    #[inline]
    #[must_use]
    pub fn final_price(&self) -> Option<Price> {
        self.final_price
    }

    /// Returns the customization requirements, if any.
    #[inline]
    #[must_use]
    pub fn specifications(&self) -> Option<&str> {
        self.specifications.as_deref()
    }

    /// Returns the latest customer note, if any.
    #[inline]
    #[must_use]
    pub fn customer_message(&self) -> Option<&str> {
        self.customer_message.as_deref()
    }

    /// Returns the latest artisan note, if any.
    #[inline]
    #[must_use]
    pub fn artisan_message(&self) -> Option<&str> {
        self.artisan_message.as_deref()
    }

    /// Returns the current status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> QuoteStatus {
        self.status
    }

    /// Returns the negotiation deadline.
    #[inline]
    #[must_use]
    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    /// Returns when this quote was created.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns when this quote was last mutated.
    #[inline]
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Returns the optimistic-lock version.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns true if the quote is still negotiable.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Returns true if the deadline has passed relative to `now`.
    #[inline]
    #[must_use]
    pub fn is_overdue(&self, now: Timestamp) -> bool {
        self.expires_at.is_before(&now)
    }

    /// Returns true if `user_id` is a party (customer or artisan) to this quote.
    #[inline]
    #[must_use]
    pub fn is_party(&self, user_id: UserId) -> bool {
        user_id == self.customer_id || user_id == self.artisan_id
    }

    /// Returns which party `user_id` is, if any.
    #[must_use]
    pub fn party_of(&self, user_id: UserId) -> Option<Actor> {
        if user_id == self.customer_id {
            Some(Actor::Customer)
        } else if user_id == self.artisan_id {
            Some(Actor::Artisan)
        } else {
            None
        }
    }

    /// Returns the price currently on the table: the artisan's counter if
    /// one stands, else the customer's request.
    #[must_use]
    pub fn standing_offer(&self) -> Option<Price> {
        self.counter_offer.or(self.requested_price)
    }

    // ========== State Transitions ==========

    fn transition_to(&mut self, target: QuoteStatus, required: &'static str) -> DomainResult<()> {
        if !self.status.can_transition_to(target) {
            return Err(DomainError::InvalidState {
                current: self.status,
                required,
            });
        }
        self.status = target;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
        self.version = self.version.saturating_add(1);
    }

    /// Accepts the quote at the resolved price.
    ///
    /// The caller resolves the final price (standing counter-offer, else
    /// requested price, else the product's live price) at acceptance time.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` unless the quote is active.
    pub fn accept(&mut self, final_price: Price) -> DomainResult<()> {
        self.transition_to(QuoteStatus::Accepted, Self::ACTIVE_STATES)?;
        self.final_price = Some(final_price);
        self.counter_offer = None;
        Ok(())
    }

    /// Rejects the quote.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` unless the quote is active.
    pub fn reject(&mut self) -> DomainResult<()> {
        self.transition_to(QuoteStatus::Rejected, Self::ACTIVE_STATES)?;
        self.counter_offer = None;
        Ok(())
    }

    /// Records an artisan counter-offer.
    ///
    /// A standing counter may be revised; the quote stays `CounterOffered`.
    /// The deadline is not extended.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` unless the quote is active.
    pub fn counter(&mut self, amount: Price) -> DomainResult<()> {
        self.transition_to(QuoteStatus::CounterOffered, Self::ACTIVE_STATES)?;
        self.counter_offer = Some(amount);
        Ok(())
    }

    /// Expires the quote.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` unless the quote is active.
    pub fn expire(&mut self) -> DomainResult<()> {
        self.transition_to(QuoteStatus::Expired, Self::ACTIVE_STATES)?;
        self.counter_offer = None;
        Ok(())
    }

    /// Marks an accepted quote as converted into an order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` unless the quote is `Accepted`.
    pub fn complete(&mut self) -> DomainResult<()> {
        self.transition_to(QuoteStatus::Completed, "ACCEPTED")
    }

    /// Mirrors the latest note from a party onto the quote.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` if the quote is terminal.
    pub fn note_from(&mut self, actor: Actor, text: impl Into<String>) -> DomainResult<()> {
        if self.status.is_terminal() {
            return Err(DomainError::InvalidState {
                current: self.status,
                required: "a non-terminal status",
            });
        }
        match actor {
            Actor::Customer => self.customer_message = Some(text.into()),
            Actor::Artisan => self.artisan_message = Some(text.into()),
        }
        self.touch();
        Ok(())
    }
}

impl fmt::Display for QuoteRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "QuoteRequest[{}] product={} status={} expires={}",
            self.id, self.product_id, self.status, self.expires_at
        )
    }
}

/// Builder for constructing [`QuoteRequest`] instances.
///
/// # Examples
///
/// ```
/// use craft_quotes::domain::entities::quote_request::QuoteRequestBuilder;
/// use craft_quotes::domain::value_objects::{ProductId, Timestamp, UserId};
///
/// let quote = QuoteRequestBuilder::new(
///     ProductId::new_v4(),
///     UserId::new_v4(),
///     UserId::new_v4(),
///     Timestamp::now().add_days(7),
/// )
/// .specifications("engraved walnut, 40cm")
/// .build();
///
/// assert_eq!(quote.specifications(), Some("engraved walnut, 40cm"));
/// ```
#[derive(Debug, Clone)]
pub struct QuoteRequestBuilder {
    product_id: ProductId,
    customer_id: UserId,
    artisan_id: UserId,
    expires_at: Timestamp,
    requested_price: Option<Price>,
    specifications: Option<String>,
    customer_message: Option<String>,
}

impl QuoteRequestBuilder {
    /// Creates a builder with the required fields.
    #[must_use]
    pub fn new(
        product_id: ProductId,
        customer_id: UserId,
        artisan_id: UserId,
        expires_at: Timestamp,
    ) -> Self {
        Self {
            product_id,
            customer_id,
            artisan_id,
            expires_at,
            requested_price: None,
            specifications: None,
            customer_message: None,
        }
    }

    /// Sets the customer's proposed price.
    #[must_use]
    pub fn requested_price(mut self, price: Price) -> Self {
        self.requested_price = Some(price);
        self
    }

    /// Sets the customization requirements.
    #[must_use]
    pub fn specifications(mut self, text: impl Into<String>) -> Self {
        self.specifications = Some(text.into());
        self
    }

    /// Sets the customer's opening note.
    #[must_use]
    pub fn customer_message(mut self, text: impl Into<String>) -> Self {
        self.customer_message = Some(text.into());
        self
    }

    /// Builds the quote request in `Pending` status.
    #[must_use]
    pub fn build(self) -> QuoteRequest {
        let now = Timestamp::now();
        QuoteRequest {
            id: QuoteId::new_v4(),
            product_id: self.product_id,
            customer_id: self.customer_id,
            artisan_id: self.artisan_id,
            requested_price: self.requested_price,
            counter_offer: None,
            final_price: None,
            specifications: self.specifications,
            customer_message: self.customer_message,
            artisan_message: None,
            status: QuoteStatus::Pending,
            expires_at: self.expires_at,
            created_at: now,
            updated_at: now,
            version: 0,
        }
    }

    /// Builds the quote request, validating party distinctness.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if customer and artisan are the
    /// same user.
    pub fn try_build(self) -> DomainResult<QuoteRequest> {
        if self.customer_id == self.artisan_id {
            return Err(DomainError::validation(
                "customer and artisan must be distinct users",
            ));
        }
        Ok(self.build())
    }
}
