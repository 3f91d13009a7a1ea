//! # Repository Traits
//!
//! Port definitions for persistence abstraction.
//!
//! This module defines the repository traits (ports) that abstract the
//! quote store and the negotiation history store. Implementations can use
//! different backends; the crate ships an in-memory reference store.
//!
//! # Available Repositories
//!
//! - [`QuoteRepository`]: persistence and unit-of-work for quote requests
//! - [`NegotiationHistoryRepository`]: the append-only audit log
//!
//! # Unit of work
//!
//! Every quote mutation pairs a record update with a history append. The
//! paired write is a single operation on [`QuoteRepository`]
//! ([`create`](QuoteRepository::create) / [`update`](QuoteRepository::update))
//! so an implementation can make it atomic: both writes commit or neither.
//!
//! # Examples
//!
//! ```ignore
//! use craft_quotes::infrastructure::persistence::traits::QuoteRepository;
//!
//! async fn show(repo: &impl QuoteRepository, id: &QuoteId) {
//!     if let Some(quote) = repo.get(id).await.unwrap() {
//!         println!("{quote}");
//!     }
//! }
//! ```

use crate::domain::entities::negotiation_entry::NegotiationEntry;
use crate::domain::entities::quote_request::QuoteRequest;
use crate::domain::value_objects::{ProductId, QuoteId, QuoteStatus, Timestamp, UserId};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Entity not found.
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// An active quote already exists for the customer/product pair.
    #[error("Duplicate active quote for product {product_id} by customer {customer_id}")]
    DuplicateActiveQuote {
        /// The product being quoted.
        product_id: ProductId,
        /// The customer holding the active quote.
        customer_id: UserId,
    },

    /// Optimistic locking conflict.
    #[error("Version conflict: quote {id} expected version {expected}, found {actual}")]
    VersionConflict {
        /// Quote identifier.
        id: QuoteId,
        /// Expected version.
        expected: u64,
        /// Actual version.
        actual: u64,
    },

    /// History append failed; the paired quote write was rolled back.
    #[error("History append failed: {0}")]
    AppendFailed(String),

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query error.
    #[error("Query error: {0}")]
    Query(String),
}

impl RepositoryError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type,
            id: id.to_string(),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a query error.
    #[must_use]
    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a duplicate-active-quote error.
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateActiveQuote { .. })
    }

    /// Returns true if this is a version conflict.
    #[must_use]
    pub const fn is_version_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }

    /// Returns true if the underlying store is unavailable.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Query(_) | Self::AppendFailed(_))
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Filter for quote queries. Empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteFilter {
    /// Match quotes opened by this customer.
    pub customer_id: Option<UserId>,
    /// Match quotes addressed to this artisan.
    pub artisan_id: Option<UserId>,
    /// Match quotes over this product.
    pub product_id: Option<ProductId>,
    /// Match quotes in this status.
    pub status: Option<QuoteStatus>,
    /// Match quotes created at or after this instant.
    pub created_after: Option<Timestamp>,
    /// Match quotes created at or before this instant.
    pub created_before: Option<Timestamp>,
}

impl QuoteFilter {
    /// Filter scoped to a customer.
    #[must_use]
    pub fn for_customer(customer_id: UserId) -> Self {
        Self {
            customer_id: Some(customer_id),
            ..Self::default()
        }
    }

    /// Filter scoped to an artisan.
    #[must_use]
    pub fn for_artisan(artisan_id: UserId) -> Self {
        Self {
            artisan_id: Some(artisan_id),
            ..Self::default()
        }
    }

    /// Narrows the filter to one status.
    #[must_use]
    pub fn with_status(mut self, status: QuoteStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns true if `quote` matches every set criterion.
    #[must_use]
    pub fn matches(&self, quote: &QuoteRequest) -> bool {
        if let Some(id) = self.customer_id
            && quote.customer_id() != id
        {
            return false;
        }
        if let Some(id) = self.artisan_id
            && quote.artisan_id() != id
        {
            return false;
        }
        if let Some(id) = self.product_id
            && quote.product_id() != id
        {
            return false;
        }
        if let Some(status) = self.status
            && quote.status() != status
        {
            return false;
        }
        if let Some(after) = self.created_after
            && quote.created_at().is_before(&after)
        {
            return false;
        }
        if let Some(before) = self.created_before
            && quote.created_at().is_after(&before)
        {
            return false;
        }
        true
    }
}

/// Page request for quote queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-indexed page number.
    pub page: usize,
    /// Items per page.
    pub per_page: usize,
}

impl Pagination {
    /// Default page size.
    pub const DEFAULT_PER_PAGE: usize = 20;

    /// Creates a page request, clamping degenerate values.
    ///
    /// Page numbers below 1 become 1; a zero page size becomes the default.
    #[must_use]
    pub fn new(page: usize, per_page: usize) -> Self {
        Self {
            page: page.max(1),
            per_page: if per_page == 0 {
                Self::DEFAULT_PER_PAGE
            } else {
                per_page
            },
        }
    }

    /// Returns the number of items to skip.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, Self::DEFAULT_PER_PAGE)
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Total number of matching items across all pages.
    pub total: usize,
    /// The page request that produced this page.
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Returns the number of pages available.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.pagination.per_page)
    }

    /// Returns true if a later page exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.pagination.page < self.total_pages()
    }
}

/// Repository for quote requests.
///
/// This port is also the transactional boundary: the paired history entry
/// rides along with each write so that record and audit log move together.
#[async_trait]
pub trait QuoteRepository: Send + Sync + fmt::Debug {
    /// Creates a quote together with its opening history entry, atomically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DuplicateActiveQuote` if an active
    /// (pending/counter-offered) quote already exists for the same
    /// `(product, customer)` pair. Concurrent creations for the same pair
    /// resolve to exactly one winner.
    async fn create(
        &self,
        quote: &QuoteRequest,
        request_entry: &NegotiationEntry,
    ) -> RepositoryResult<()>;

    /// Gets a quote by ID.
    ///
    /// Returns `None` if the quote does not exist.
    async fn get(&self, id: &QuoteId) -> RepositoryResult<Option<QuoteRequest>>;

    /// Updates a quote, optionally appending a paired history entry, atomically.
    ///
    /// Compare-and-swap: the write applies only while the stored version
    /// still equals `expected_version` (the version the caller loaded).
    /// A failing append rolls the whole write back.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::NotFound` if the quote does not exist
    /// - `RepositoryError::VersionConflict` if another writer got there
    ///   first (caller reloads, re-validates, retries)
    /// - `RepositoryError::AppendFailed` if the paired append failed (the
    ///   quote update is rolled back)
    async fn update(
        &self,
        quote: &QuoteRequest,
        expected_version: u64,
        entry: Option<&NegotiationEntry>,
    ) -> RepositoryResult<()>;

    /// Finds active quotes whose deadline passed before `before`.
    async fn find_active_expired(&self, before: Timestamp)
        -> RepositoryResult<Vec<QuoteRequest>>;

    /// Atomically transitions every overdue active quote to expired.
    ///
    /// This is the sweeper's bulk operation: one atomic "update all
    /// matching" so concurrent sweeps are idempotent and never double-count.
    /// Returns the post-transition snapshots of the quotes it moved.
    async fn expire_overdue(&self, before: Timestamp) -> RepositoryResult<Vec<QuoteRequest>>;

    /// Queries quotes by filter, newest first, paginated.
    async fn query(
        &self,
        filter: &QuoteFilter,
        pagination: Pagination,
    ) -> RepositoryResult<Page<QuoteRequest>>;

    /// Returns every quote matching the filter (stats source, unpaginated).
    async fn find_matching(&self, filter: &QuoteFilter) -> RepositoryResult<Vec<QuoteRequest>>;

    /// Counts all quotes.
    async fn count(&self) -> RepositoryResult<u64>;
}

/// Repository for the append-only negotiation audit log.
///
/// History is a passive observer: appends never reject based on quote
/// state, and entries are never mutated or deleted.
#[async_trait]
pub trait NegotiationHistoryRepository: Send + Sync + fmt::Debug {
    /// Appends an entry to the log.
    ///
    /// # Errors
    ///
    /// Fails only if the underlying store is unavailable.
    async fn append(&self, entry: &NegotiationEntry) -> RepositoryResult<()>;

    /// Lists a quote's entries in ascending timestamp order.
    ///
    /// Each call is a fresh read of the full, finite sequence.
    async fn list_by_quote(&self, quote_id: &QuoteId)
        -> RepositoryResult<Vec<NegotiationEntry>>;
}
