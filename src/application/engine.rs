//! # Quote Negotiation Engine
//!
//! Orchestrates the negotiation lifecycle: validates transitions, applies
//! business rules, pairs every mutation with its audit entry, and emits
//! lifecycle events for external collaborators.
//!
//! # Command Flow
//!
//! ```text
//! caller → engine → quote store (+ paired history append)
//!                 → notification gateway (fire-and-forget)
//! ```
//!
//! Commands re-validate against the freshest stored state: on an
//! optimistic-lock conflict the engine reloads and re-runs its checks, so a
//! quote mutated concurrently is judged against the post-mutation state.
//!
//! # Examples
//!
//! ```ignore
//! let engine = QuoteNegotiationEngine::new(config, store.clone(), store, products, users, notifier);
//! let quote = engine
//!     .create_quote_request(NewQuoteRequest {
//!         customer_id,
//!         product_id,
//!         requested_price: Some(Price::from_major(60)?),
//!         specifications: Some("engraved walnut, 40cm".into()),
//!         message: None,
//!         expires_in_days: Some(3),
//!     })
//!     .await?;
//! ```

use crate::application::error::{EngineError, EngineResult};
use crate::application::gateways::{
    NotificationGateway, ProductGateway, ProductSnapshot, UserGateway,
};
use crate::application::stats::{QuoteStats, StatsScope};
use crate::config::EngineConfig;
use crate::domain::entities::negotiation_entry::NegotiationEntry;
use crate::domain::entities::quote_request::{QuoteRequest, QuoteRequestBuilder};
use crate::domain::errors::DomainError;
use crate::domain::events::QuoteEvent;
use crate::domain::value_objects::{
    Actor, NegotiationAction, Price, ProductId, QuoteId, QuoteStatus, ResponseAction, Timestamp,
    UserId,
};
use crate::infrastructure::persistence::traits::{
    NegotiationHistoryRepository, Page, Pagination, QuoteFilter, QuoteRepository,
    RepositoryError,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Bounded retries for optimistic-lock conflicts before giving up.
const MAX_CAS_RETRIES: u32 = 3;

/// Input for opening a quote request.
#[derive(Debug, Clone)]
pub struct NewQuoteRequest {
    /// The customer opening the request.
    pub customer_id: UserId,
    /// The product to negotiate over.
    pub product_id: ProductId,
    /// The customer's proposed price, if any.
    pub requested_price: Option<Price>,
    /// Free-text customization requirements.
    pub specifications: Option<String>,
    /// Opening note to the artisan.
    pub message: Option<String>,
    /// Days until the quote expires; defaults to the configured window.
    pub expires_in_days: Option<u8>,
}

/// The quote negotiation engine.
///
/// Holds no mutable state of its own; all state lives in the quote store.
/// Operations on different quotes are independent; per-quote ordering is
/// enforced by the store's optimistic version check.
pub struct QuoteNegotiationEngine {
    config: EngineConfig,
    quotes: Arc<dyn QuoteRepository>,
    history: Arc<dyn NegotiationHistoryRepository>,
    products: Arc<dyn ProductGateway>,
    users: Arc<dyn UserGateway>,
    notifications: Arc<dyn NotificationGateway>,
}

impl QuoteNegotiationEngine {
    /// Creates an engine over the given stores and gateways.
    #[must_use]
    pub fn new(
        config: EngineConfig,
        quotes: Arc<dyn QuoteRepository>,
        history: Arc<dyn NegotiationHistoryRepository>,
        products: Arc<dyn ProductGateway>,
        users: Arc<dyn UserGateway>,
        notifications: Arc<dyn NotificationGateway>,
    ) -> Self {
        Self {
            config,
            quotes,
            history,
            products,
            users,
            notifications,
        }
    }

    /// Returns the engine's configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ========== Commands ==========

    /// Opens a quote request for a customizable product.
    ///
    /// Validates the subject (product exists, is published and
    /// customizable, seller differs from the customer), the parties, the
    /// monetary floor, text bounds, and the expiry window, then writes the
    /// quote and its opening history entry atomically.
    ///
    /// # Errors
    ///
    /// - `DomainError::NotFound` if the customer or product is unknown
    /// - `DomainError::Validation` for self-quotes, unquotable products,
    ///   or an out-of-bounds expiry window
    /// - `DomainError::PriceBelowFloor` for lowball requests
    /// - `DomainError::TextTooLong` for oversized text fields
    /// - `DomainError::DuplicateActiveQuote` if the pair already has an
    ///   active negotiation
    /// - `EngineError::Repository` / `EngineError::Gateway` on
    ///   infrastructure failures
    pub async fn create_quote_request(
        &self,
        input: NewQuoteRequest,
    ) -> EngineResult<QuoteRequest> {
        if let Some(spec) = input.specifications.as_deref() {
            self.ensure_text_len("specifications", spec, self.config.max_specifications_len)?;
        }
        if let Some(message) = input.message.as_deref() {
            self.ensure_text_len("message", message, self.config.max_message_len)?;
        }

        let days = input.expires_in_days.unwrap_or(self.config.default_expiry_days);
        if days < self.config.min_expiry_days || days > self.config.max_expiry_days {
            return Err(DomainError::validation(format!(
                "expires_in_days {days} is outside {}..={}",
                self.config.min_expiry_days, self.config.max_expiry_days
            ))
            .into());
        }

        if self.users.user(&input.customer_id).await?.is_none() {
            return Err(DomainError::not_found("user", input.customer_id).into());
        }

        let product = self
            .products
            .product(&input.product_id)
            .await?
            .ok_or_else(|| DomainError::not_found("product", input.product_id))?;

        if product.seller_id == input.customer_id {
            return Err(DomainError::validation(
                "customers cannot open quotes on their own products",
            )
            .into());
        }
        if !product.is_quotable() {
            return Err(DomainError::validation(
                "product is not published as customizable",
            )
            .into());
        }
        if let Some(requested) = input.requested_price {
            self.ensure_price_floor(requested, &product)?;
        }

        let mut builder = QuoteRequestBuilder::new(
            input.product_id,
            input.customer_id,
            product.seller_id,
            Timestamp::now().add_days(i64::from(days)),
        );
        if let Some(price) = input.requested_price {
            builder = builder.requested_price(price);
        }
        if let Some(spec) = input.specifications {
            builder = builder.specifications(spec);
        }
        if let Some(message) = input.message.clone() {
            builder = builder.customer_message(message);
        }
        let quote = builder.try_build()?;

        let mut entry =
            NegotiationEntry::new(quote.id(), NegotiationAction::Request, Actor::Customer);
        if let Some(price) = input.requested_price {
            entry = entry.with_new_price(price);
        }
        if let Some(message) = input.message {
            entry = entry.with_message(message);
        }

        self.quotes
            .create(&quote, &entry)
            .await
            .map_err(Self::map_repository_error)?;

        info!(
            quote_id = %quote.id(),
            product_id = %quote.product_id(),
            customer_id = %quote.customer_id(),
            "quote request opened"
        );
        self.notify(QuoteEvent::requested(
            quote.id(),
            quote.customer_id(),
            quote.artisan_id(),
        ))
        .await;

        Ok(quote)
    }

    /// Applies the assigned artisan's response to an active quote.
    ///
    /// The deadline is re-checked at mutation time: a quote that ran out
    /// the clock is flipped to expired as a side effect and the call fails
    /// with `DomainError::Expired`.
    ///
    /// On accept, the final price resolves at acceptance time: standing
    /// counter-offer, else the customer's request, else the product's
    /// current effective price.
    ///
    /// # Errors
    ///
    /// - `DomainError::NotFound` if the quote is unknown
    /// - `DomainError::Forbidden` unless `artisan_id` is the assigned artisan
    /// - `DomainError::InvalidState` unless the quote is active
    /// - `DomainError::Expired` if the deadline passed (quote flips to expired)
    /// - `DomainError::TextTooLong` for an oversized message
    /// - `EngineError::Repository` / `EngineError::Gateway` on
    ///   infrastructure failures
    pub async fn respond_to_quote(
        &self,
        quote_id: QuoteId,
        artisan_id: UserId,
        action: ResponseAction,
    ) -> EngineResult<QuoteRequest> {
        if let Some(message) = action.message() {
            self.ensure_text_len("message", message, self.config.max_message_len)?;
        }

        let mut attempts = 0u32;
        loop {
            let mut quote = self.load_quote(&quote_id).await?;
            let expected_version = quote.version();

            if quote.artisan_id() != artisan_id {
                return Err(
                    DomainError::forbidden("only the assigned artisan may respond").into(),
                );
            }
            if !quote.status().is_active() {
                return Err(DomainError::InvalidState {
                    current: quote.status(),
                    required: "PENDING or COUNTER_OFFERED",
                }
                .into());
            }
            let now = Timestamp::now();
            if quote.is_overdue(now) {
                match self.flip_expired(quote, expected_version).await {
                    Ok(expired_at) => return Err(DomainError::Expired { expired_at }.into()),
                    Err(retry) => {
                        attempts = Self::bump_attempts(attempts, retry)?;
                        continue;
                    }
                }
            }

            let previous = quote.standing_offer();
            let old_status = quote.status();
            let entry = match &action {
                ResponseAction::Accept { message } => {
                    let final_price = match previous {
                        Some(price) => price,
                        None => {
                            let product = self
                                .products
                                .product(&quote.product_id())
                                .await?
                                .ok_or_else(|| {
                                    DomainError::not_found("product", quote.product_id())
                                })?;
                            product.effective_price()
                        }
                    };
                    // Mirror the note first: the aggregate refuses notes on
                    // terminal statuses, and Reject lands terminal.
                    if let Some(message) = message {
                        quote.note_from(Actor::Artisan, message.clone())?;
                    }
                    quote.accept(final_price)?;
                    let mut entry = NegotiationEntry::new(
                        quote.id(),
                        NegotiationAction::Accept,
                        Actor::Artisan,
                    )
                    .with_new_price(final_price)
                    .with_metadata(json!({
                        "old_status": old_status.to_string(),
                        "new_status": quote.status().to_string(),
                    }));
                    if let Some(price) = previous {
                        entry = entry.with_previous_price(price);
                    }
                    if let Some(message) = message {
                        entry = entry.with_message(message.clone());
                    }
                    entry
                }
                ResponseAction::Reject { message } => {
                    if let Some(message) = message {
                        quote.note_from(Actor::Artisan, message.clone())?;
                    }
                    quote.reject()?;
                    let mut entry = NegotiationEntry::new(
                        quote.id(),
                        NegotiationAction::Reject,
                        Actor::Artisan,
                    );
                    if let Some(message) = message {
                        entry = entry.with_message(message.clone());
                    }
                    entry
                }
                ResponseAction::Counter { amount, message } => {
                    if let Some(message) = message {
                        quote.note_from(Actor::Artisan, message.clone())?;
                    }
                    quote.counter(*amount)?;
                    let mut entry = NegotiationEntry::new(
                        quote.id(),
                        NegotiationAction::Counter,
                        Actor::Artisan,
                    )
                    .with_new_price(*amount);
                    if let Some(price) = previous {
                        entry = entry.with_previous_price(price);
                    }
                    if let Some(message) = message {
                        entry = entry.with_message(message.clone());
                    }
                    entry
                }
            };

            match self
                .quotes
                .update(&quote, expected_version, Some(&entry))
                .await
            {
                Ok(()) => {
                    debug!(
                        quote_id = %quote.id(),
                        action = action.action_name(),
                        status = %quote.status(),
                        "artisan response applied"
                    );
                    let event = match quote.status() {
                        QuoteStatus::Accepted => {
                            // accept() always fixes a final price.
                            match quote.final_price() {
                                Some(final_price) => QuoteEvent::accepted(
                                    quote.id(),
                                    quote.customer_id(),
                                    quote.artisan_id(),
                                    final_price,
                                ),
                                None => QuoteEvent::responded(
                                    quote.id(),
                                    quote.customer_id(),
                                    quote.artisan_id(),
                                    quote.status(),
                                ),
                            }
                        }
                        status => QuoteEvent::responded(
                            quote.id(),
                            quote.customer_id(),
                            quote.artisan_id(),
                            status,
                        ),
                    };
                    self.notify(event).await;
                    return Ok(quote);
                }
                Err(err @ RepositoryError::VersionConflict { .. }) => {
                    attempts = Self::bump_attempts(attempts, err)?;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Attaches a message from a party to an active (non-terminal) quote.
    ///
    /// # Errors
    ///
    /// - `DomainError::NotFound` if the quote is unknown
    /// - `DomainError::Forbidden` unless the sender is a party to the quote
    /// - `DomainError::InvalidState` if the quote is terminal
    /// - `DomainError::TextTooLong` for an oversized message
    /// - `EngineError::Repository` on infrastructure failure
    pub async fn add_message(
        &self,
        quote_id: QuoteId,
        user_id: UserId,
        text: impl Into<String> + Send,
    ) -> EngineResult<QuoteRequest> {
        let text = text.into();
        self.ensure_text_len("message", &text, self.config.max_message_len)?;

        let mut attempts = 0u32;
        loop {
            let mut quote = self.load_quote(&quote_id).await?;
            let expected_version = quote.version();

            let actor = quote
                .party_of(user_id)
                .ok_or_else(|| DomainError::forbidden("only quote parties may send messages"))?;

            quote.note_from(actor, text.clone())?;
            let entry = NegotiationEntry::new(quote.id(), NegotiationAction::Message, actor)
                .with_message(text.clone());

            match self
                .quotes
                .update(&quote, expected_version, Some(&entry))
                .await
            {
                Ok(()) => {
                    debug!(quote_id = %quote.id(), actor = %actor, "message attached");
                    return Ok(quote);
                }
                Err(err @ RepositoryError::VersionConflict { .. }) => {
                    attempts = Self::bump_attempts(attempts, err)?;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Cancels an active quote on behalf of either party.
    ///
    /// Recorded as a rejection attributed to the cancelling party, which
    /// keeps it distinguishable from an artisan rejection in the history.
    ///
    /// # Errors
    ///
    /// - `DomainError::NotFound` if the quote is unknown
    /// - `DomainError::Forbidden` unless the caller is a party to the quote
    /// - `DomainError::InvalidState` unless the quote is active
    /// - `DomainError::TextTooLong` for an oversized reason
    /// - `EngineError::Repository` on infrastructure failure
    pub async fn cancel_quote(
        &self,
        quote_id: QuoteId,
        user_id: UserId,
        reason: Option<String>,
    ) -> EngineResult<QuoteRequest> {
        if let Some(reason) = reason.as_deref() {
            self.ensure_text_len("reason", reason, self.config.max_message_len)?;
        }

        let mut attempts = 0u32;
        loop {
            let mut quote = self.load_quote(&quote_id).await?;
            let expected_version = quote.version();

            let actor = quote
                .party_of(user_id)
                .ok_or_else(|| DomainError::forbidden("only quote parties may cancel"))?;

            let old_status = quote.status();
            quote.reject()?;

            let mut entry = NegotiationEntry::new(quote.id(), NegotiationAction::Reject, actor)
                .with_metadata(json!({
                    "cancelled": true,
                    "old_status": old_status.to_string(),
                    "new_status": quote.status().to_string(),
                }));
            if let Some(reason) = reason.clone() {
                entry = entry.with_message(reason);
            }

            match self
                .quotes
                .update(&quote, expected_version, Some(&entry))
                .await
            {
                Ok(()) => {
                    info!(quote_id = %quote.id(), actor = %actor, "quote cancelled");
                    self.notify(QuoteEvent::responded(
                        quote.id(),
                        quote.customer_id(),
                        quote.artisan_id(),
                        quote.status(),
                    ))
                    .await;
                    return Ok(quote);
                }
                Err(err @ RepositoryError::VersionConflict { .. }) => {
                    attempts = Self::bump_attempts(attempts, err)?;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Marks an accepted quote as converted into an order.
    ///
    /// Triggered by the external order pipeline; not a negotiation action,
    /// so no history entry is written and the final price is untouched.
    ///
    /// # Errors
    ///
    /// - `DomainError::NotFound` if the quote is unknown
    /// - `DomainError::InvalidState` unless the quote is accepted
    /// - `EngineError::Repository` on infrastructure failure
    pub async fn complete_quote(&self, quote_id: QuoteId) -> EngineResult<QuoteRequest> {
        let mut attempts = 0u32;
        loop {
            let mut quote = self.load_quote(&quote_id).await?;
            let expected_version = quote.version();

            quote.complete()?;

            match self.quotes.update(&quote, expected_version, None).await {
                Ok(()) => {
                    info!(quote_id = %quote.id(), "quote converted to order");
                    return Ok(quote);
                }
                Err(err @ RepositoryError::VersionConflict { .. }) => {
                    attempts = Self::bump_attempts(attempts, err)?;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Force-expires every active quote whose deadline passed.
    ///
    /// The store applies one atomic bulk transition, so concurrent or
    /// repeated sweeps expire each quote exactly once; a second run returns
    /// zero. No history entries are written; there is no party to attribute
    /// them to. Notification failures are logged and skipped.
    ///
    /// # Arguments
    ///
    /// * `now_override` - Pins "now" for testing; defaults to the clock.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Repository` if the bulk update fails.
    pub async fn sweep_expired_quotes(
        &self,
        now_override: Option<Timestamp>,
    ) -> EngineResult<u64> {
        let now = now_override.unwrap_or_else(Timestamp::now);
        let expired = self.quotes.expire_overdue(now).await?;
        let count = expired.len() as u64;

        if count > 0 {
            info!(count, "expired overdue quotes");
        }
        for quote in expired {
            self.notify(QuoteEvent::expired(
                quote.id(),
                quote.customer_id(),
                quote.artisan_id(),
            ))
            .await;
        }
        Ok(count)
    }

    // ========== Queries ==========

    /// Fetches a quote by ID.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the quote does not exist.
    pub async fn get_quote(&self, quote_id: QuoteId) -> EngineResult<QuoteRequest> {
        self.load_quote(&quote_id).await
    }

    /// Lists a quote's negotiation history in ascending timestamp order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if the quote does not exist.
    pub async fn negotiation_history(
        &self,
        quote_id: QuoteId,
    ) -> EngineResult<Vec<NegotiationEntry>> {
        self.load_quote(&quote_id).await?;
        Ok(self.history.list_by_quote(&quote_id).await?)
    }

    /// Queries quotes by filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Repository` on infrastructure failure.
    pub async fn list_quotes(
        &self,
        filter: &QuoteFilter,
        pagination: Pagination,
    ) -> EngineResult<Page<QuoteRequest>> {
        Ok(self.quotes.query(filter, pagination).await?)
    }

    /// Lists a customer's quotes, newest first.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Repository` on infrastructure failure.
    pub async fn list_for_customer(
        &self,
        customer_id: UserId,
        pagination: Pagination,
    ) -> EngineResult<Page<QuoteRequest>> {
        self.list_quotes(&QuoteFilter::for_customer(customer_id), pagination)
            .await
    }

    /// Lists an artisan's quotes, newest first.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Repository` on infrastructure failure.
    pub async fn list_for_artisan(
        &self,
        artisan_id: UserId,
        pagination: Pagination,
    ) -> EngineResult<Page<QuoteRequest>> {
        self.list_quotes(&QuoteFilter::for_artisan(artisan_id), pagination)
            .await
    }

    /// Lists active quotes whose deadline has already passed: the set the
    /// next sweep will expire.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Repository` on infrastructure failure.
    pub async fn list_overdue_quotes(&self) -> EngineResult<Vec<QuoteRequest>> {
        Ok(self.quotes.find_active_expired(Timestamp::now()).await?)
    }

    /// Computes exact (unsampled) statistics over a scope.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Repository` on infrastructure failure.
    pub async fn get_stats(&self, scope: StatsScope) -> EngineResult<QuoteStats> {
        let quotes = self.quotes.find_matching(&scope.to_filter()).await?;
        Ok(QuoteStats::from_quotes(&quotes))
    }

    // ========== Internals ==========

    async fn load_quote(&self, quote_id: &QuoteId) -> EngineResult<QuoteRequest> {
        self.quotes
            .get(quote_id)
            .await?
            .ok_or_else(|| DomainError::not_found("quote", quote_id).into())
    }

    /// Flips an overdue quote to expired (no history entry) and reports
    /// when it expired. A version conflict is handed back for retry.
    async fn flip_expired(
        &self,
        mut quote: QuoteRequest,
        expected_version: u64,
    ) -> Result<Timestamp, RepositoryError> {
        let expired_at = quote.expires_at();
        if quote.expire().is_ok() {
            match self.quotes.update(&quote, expected_version, None).await {
                Ok(()) => {
                    info!(quote_id = %quote.id(), "quote expired on response attempt");
                    self.notify(QuoteEvent::expired(
                        quote.id(),
                        quote.customer_id(),
                        quote.artisan_id(),
                    ))
                    .await;
                }
                Err(err @ RepositoryError::VersionConflict { .. }) => return Err(err),
                // The response still fails with Expired; a sweeper will
                // catch the record if this write was lost.
                Err(error) => {
                    warn!(quote_id = %quote.id(), %error, "failed to persist lazy expiry");
                }
            }
        }
        Ok(expired_at)
    }

    fn ensure_text_len(
        &self,
        field: &'static str,
        text: &str,
        max: usize,
    ) -> Result<(), DomainError> {
        let len = text.chars().count();
        if len > max {
            return Err(DomainError::TextTooLong { field, len, max });
        }
        Ok(())
    }

    fn ensure_price_floor(
        &self,
        requested: Price,
        product: &ProductSnapshot,
    ) -> Result<(), DomainError> {
        let floor = product
            .effective_price()
            .scale(self.config.price_floor_ratio)
            .ok_or_else(|| DomainError::validation("price floor computation overflowed"))?;
        if requested.get() < floor {
            return Err(DomainError::PriceBelowFloor {
                offered: requested,
                floor,
            });
        }
        Ok(())
    }

    fn bump_attempts(attempts: u32, err: RepositoryError) -> EngineResult<u32> {
        let next = attempts + 1;
        if next >= MAX_CAS_RETRIES {
            return Err(err.into());
        }
        debug!(attempt = next, "version conflict, reloading quote");
        Ok(next)
    }

    fn map_repository_error(err: RepositoryError) -> EngineError {
        match err {
            RepositoryError::DuplicateActiveQuote {
                product_id,
                customer_id,
            } => DomainError::DuplicateActiveQuote {
                product_id,
                customer_id,
            }
            .into(),
            other => other.into(),
        }
    }

    async fn notify(&self, event: QuoteEvent) {
        let name = event.event_name();
        let quote_id = event.quote_id();
        if let Err(error) = self.notifications.publish(event).await {
            warn!(%quote_id, event = name, %error, "notification publish failed, continuing");
        }
    }
}

impl std::fmt::Debug for QuoteNegotiationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteNegotiationEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
