//! # In-Memory Negotiation Store
//!
//! In-memory implementation of [`QuoteRepository`] and
//! [`NegotiationHistoryRepository`] for tests and the reference setup.
//!
//! Both stores live behind a single `RwLock`, so a quote update and its
//! paired history append commit under one write guard: the unit of work is
//! atomic by construction, and the duplicate-active-quote check cannot race
//! with a concurrent create.

use crate::domain::entities::negotiation_entry::NegotiationEntry;
use crate::domain::entities::quote_request::QuoteRequest;
use crate::domain::value_objects::{QuoteId, Timestamp};
use crate::infrastructure::persistence::traits::{
    NegotiationHistoryRepository, Page, Pagination, QuoteFilter, QuoteRepository,
    RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Inner {
    quotes: HashMap<QuoteId, QuoteRequest>,
    entries: HashMap<QuoteId, Vec<NegotiationEntry>>,
    fail_appends: bool,
}

/// In-memory implementation of the quote and history stores.
///
/// Uses a single thread-safe map pair for storage. Suitable for unit tests
/// and local runs without database dependencies.
///
/// # Examples
///
/// ```
/// use craft_quotes::infrastructure::persistence::in_memory::InMemoryNegotiationStore;
///
/// let store = InMemoryNegotiationStore::new();
/// assert!(store.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryNegotiationStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryNegotiationStore {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of quotes in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .try_read()
            .map(|guard| guard.quotes.len())
            .unwrap_or(0)
    }

    /// Returns true if the store holds no quotes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all quotes and history entries.
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.quotes.clear();
        inner.entries.clear();
    }

    /// Makes subsequent history appends fail, including the append half of
    /// paired writes. Lets tests verify that a failing append rolls back
    /// the quote write it rides with.
    pub async fn fail_appends(&self, fail: bool) {
        self.inner.write().await.fail_appends = fail;
    }

    fn active_pair_exists(inner: &Inner, quote: &QuoteRequest) -> bool {
        inner.quotes.values().any(|existing| {
            existing.status().is_active()
                && existing.product_id() == quote.product_id()
                && existing.customer_id() == quote.customer_id()
        })
    }
}

#[async_trait]
impl QuoteRepository for InMemoryNegotiationStore {
    async fn create(
        &self,
        quote: &QuoteRequest,
        request_entry: &NegotiationEntry,
    ) -> RepositoryResult<()> {
        let mut inner = self.inner.write().await;

        if Self::active_pair_exists(&inner, quote) {
            return Err(RepositoryError::DuplicateActiveQuote {
                product_id: quote.product_id(),
                customer_id: quote.customer_id(),
            });
        }
        if inner.fail_appends {
            // Nothing has been written yet; failing here leaves no trace.
            return Err(RepositoryError::AppendFailed(
                "history store rejected the append".to_string(),
            ));
        }

        inner.quotes.insert(quote.id(), quote.clone());
        inner
            .entries
            .entry(quote.id())
            .or_default()
            .push(request_entry.clone());
        Ok(())
    }

    async fn get(&self, id: &QuoteId) -> RepositoryResult<Option<QuoteRequest>> {
        let inner = self.inner.read().await;
        Ok(inner.quotes.get(id).cloned())
    }

    async fn update(
        &self,
        quote: &QuoteRequest,
        expected_version: u64,
        entry: Option<&NegotiationEntry>,
    ) -> RepositoryResult<()> {
        let mut inner = self.inner.write().await;

        let stored = inner
            .quotes
            .get(&quote.id())
            .ok_or_else(|| RepositoryError::not_found("QuoteRequest", quote.id()))?;

        if stored.version() != expected_version {
            return Err(RepositoryError::VersionConflict {
                id: quote.id(),
                expected: expected_version,
                actual: stored.version(),
            });
        }
        if entry.is_some() && inner.fail_appends {
            // Append would fail: abandon the whole write before touching
            // the quote record.
            return Err(RepositoryError::AppendFailed(
                "history store rejected the append".to_string(),
            ));
        }

        inner.quotes.insert(quote.id(), quote.clone());
        if let Some(entry) = entry {
            inner
                .entries
                .entry(quote.id())
                .or_default()
                .push(entry.clone());
        }
        Ok(())
    }

    async fn find_active_expired(
        &self,
        before: Timestamp,
    ) -> RepositoryResult<Vec<QuoteRequest>> {
        let inner = self.inner.read().await;
        Ok(inner
            .quotes
            .values()
            .filter(|q| q.status().is_active() && q.is_overdue(before))
            .cloned()
            .collect())
    }

    async fn expire_overdue(&self, before: Timestamp) -> RepositoryResult<Vec<QuoteRequest>> {
        let mut inner = self.inner.write().await;
        let mut expired = Vec::new();

        for quote in inner.quotes.values_mut() {
            if quote.status().is_active() && quote.is_overdue(before) {
                // Active and overdue, so the transition cannot fail.
                if quote.expire().is_ok() {
                    expired.push(quote.clone());
                }
            }
        }
        Ok(expired)
    }

    async fn query(
        &self,
        filter: &QuoteFilter,
        pagination: Pagination,
    ) -> RepositoryResult<Page<QuoteRequest>> {
        let inner = self.inner.read().await;
        let mut matching: Vec<QuoteRequest> = inner
            .quotes
            .values()
            .filter(|q| filter.matches(q))
            .cloned()
            .collect();
        matching.sort_by_key(|q| std::cmp::Reverse(q.created_at()));

        let total = matching.len();
        let items = matching
            .into_iter()
            .skip(pagination.offset())
            .take(pagination.per_page)
            .collect();

        Ok(Page {
            items,
            total,
            pagination,
        })
    }

    async fn find_matching(&self, filter: &QuoteFilter) -> RepositoryResult<Vec<QuoteRequest>> {
        let inner = self.inner.read().await;
        Ok(inner
            .quotes
            .values()
            .filter(|q| filter.matches(q))
            .cloned()
            .collect())
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let inner = self.inner.read().await;
        Ok(inner.quotes.len() as u64)
    }
}

#[async_trait]
impl NegotiationHistoryRepository for InMemoryNegotiationStore {
    async fn append(&self, entry: &NegotiationEntry) -> RepositoryResult<()> {
        let mut inner = self.inner.write().await;
        if inner.fail_appends {
            return Err(RepositoryError::AppendFailed(
                "history store rejected the append".to_string(),
            ));
        }
        inner
            .entries
            .entry(entry.quote_id())
            .or_default()
            .push(entry.clone());
        Ok(())
    }

    async fn list_by_quote(
        &self,
        quote_id: &QuoteId,
    ) -> RepositoryResult<Vec<NegotiationEntry>> {
        let inner = self.inner.read().await;
        let mut entries = inner.entries.get(quote_id).cloned().unwrap_or_default();
        entries.sort_by_key(NegotiationEntry::timestamp);
        Ok(entries)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::quote_request::QuoteRequestBuilder;
    use crate::domain::value_objects::{
        Actor, NegotiationAction, Price, ProductId, QuoteStatus, UserId,
    };

    fn sample_quote(expires_at: Timestamp) -> QuoteRequest {
        QuoteRequestBuilder::new(
            ProductId::new_v4(),
            UserId::new_v4(),
            UserId::new_v4(),
            expires_at,
        )
        .requested_price(Price::from_major(60).unwrap())
        .build()
    }

    fn request_entry(quote: &QuoteRequest) -> NegotiationEntry {
        NegotiationEntry::new(quote.id(), NegotiationAction::Request, Actor::Customer)
            .with_new_price(Price::from_major(60).unwrap())
    }

    #[tokio::test]
    async fn new_store_is_empty() {
        let store = InMemoryNegotiationStore::new();
        assert!(store.is_empty());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn create_and_get() {
        let store = InMemoryNegotiationStore::new();
        let quote = sample_quote(Timestamp::now().add_days(7));

        store.create(&quote, &request_entry(&quote)).await.unwrap();

        let loaded = store.get(&quote.id()).await.unwrap().unwrap();
        assert_eq!(loaded, quote);

        let history = store.list_by_quote(&quote.id()).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history.first().unwrap().action(), NegotiationAction::Request);
    }

    #[tokio::test]
    async fn get_nonexistent_returns_none() {
        let store = InMemoryNegotiationStore::new();
        assert!(store.get(&QuoteId::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_active_pair_rejected() {
        let store = InMemoryNegotiationStore::new();
        let first = sample_quote(Timestamp::now().add_days(7));
        store.create(&first, &request_entry(&first)).await.unwrap();

        // Same (product, customer) pair, new quote id.
        let second = QuoteRequestBuilder::new(
            first.product_id(),
            first.customer_id(),
            first.artisan_id(),
            Timestamp::now().add_days(7),
        )
        .build();

        let result = store.create(&second, &request_entry(&second)).await;
        assert!(matches!(
            result,
            Err(RepositoryError::DuplicateActiveQuote { .. })
        ));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn resolved_quote_frees_the_pair() {
        let store = InMemoryNegotiationStore::new();
        let mut first = sample_quote(Timestamp::now().add_days(7));
        store.create(&first, &request_entry(&first)).await.unwrap();

        let expected = first.version();
        first.reject().unwrap();
        store.update(&first, expected, None).await.unwrap();

        let second = QuoteRequestBuilder::new(
            first.product_id(),
            first.customer_id(),
            first.artisan_id(),
            Timestamp::now().add_days(7),
        )
        .build();
        assert!(store.create(&second, &request_entry(&second)).await.is_ok());
    }

    #[tokio::test]
    async fn concurrent_creates_have_one_winner() {
        let store = InMemoryNegotiationStore::new();
        let template = sample_quote(Timestamp::now().add_days(7));
        let rival = QuoteRequestBuilder::new(
            template.product_id(),
            template.customer_id(),
            template.artisan_id(),
            Timestamp::now().add_days(7),
        )
        .build();

        let template_entry = request_entry(&template);
        let rival_entry = request_entry(&rival);
        let (a, b) = tokio::join!(
            store.create(&template, &template_entry),
            store.create(&rival, &rival_entry),
        );
        assert_ne!(a.is_ok(), b.is_ok());
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn update_applies_cas() {
        let store = InMemoryNegotiationStore::new();
        let mut quote = sample_quote(Timestamp::now().add_days(7));
        store.create(&quote, &request_entry(&quote)).await.unwrap();

        let loaded_version = quote.version();
        quote.counter(Price::from_major(75).unwrap()).unwrap();

        // Stale expected version loses.
        let stale = store.update(&quote, loaded_version + 5, None).await;
        assert!(matches!(
            stale,
            Err(RepositoryError::VersionConflict { .. })
        ));

        store.update(&quote, loaded_version, None).await.unwrap();
        let stored = store.get(&quote.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), QuoteStatus::CounterOffered);
    }

    #[tokio::test]
    async fn update_missing_quote_is_not_found() {
        let store = InMemoryNegotiationStore::new();
        let quote = sample_quote(Timestamp::now().add_days(7));
        let result = store.update(&quote, 0, None).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn failing_append_rolls_back_paired_update() {
        let store = InMemoryNegotiationStore::new();
        let mut quote = sample_quote(Timestamp::now().add_days(7));
        store.create(&quote, &request_entry(&quote)).await.unwrap();

        store.fail_appends(true).await;

        let expected = quote.version();
        quote.counter(Price::from_major(75).unwrap()).unwrap();
        let entry =
            NegotiationEntry::new(quote.id(), NegotiationAction::Counter, Actor::Artisan);
        let result = store.update(&quote, expected, Some(&entry)).await;
        assert!(matches!(result, Err(RepositoryError::AppendFailed(_))));

        // Neither half landed.
        let stored = store.get(&quote.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), QuoteStatus::Pending);
        assert_eq!(stored.version(), expected);
        assert_eq!(store.list_by_quote(&quote.id()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failing_append_without_entry_still_updates() {
        let store = InMemoryNegotiationStore::new();
        let mut quote = sample_quote(Timestamp::now().add_days(7));
        store.create(&quote, &request_entry(&quote)).await.unwrap();

        store.fail_appends(true).await;

        // Sweeper-style update carries no entry, so it is unaffected.
        let expected = quote.version();
        quote.expire().unwrap();
        assert!(store.update(&quote, expected, None).await.is_ok());
    }

    #[tokio::test]
    async fn expire_overdue_is_idempotent() {
        let store = InMemoryNegotiationStore::new();
        let overdue = sample_quote(Timestamp::now().sub_secs(60));
        let fresh = sample_quote(Timestamp::now().add_days(7));
        store.create(&overdue, &request_entry(&overdue)).await.unwrap();
        store.create(&fresh, &request_entry(&fresh)).await.unwrap();

        let first = store.expire_overdue(Timestamp::now()).await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first.first().unwrap().id(), overdue.id());
        assert_eq!(first.first().unwrap().status(), QuoteStatus::Expired);

        let second = store.expire_overdue(Timestamp::now()).await.unwrap();
        assert!(second.is_empty());

        let untouched = store.get(&fresh.id()).await.unwrap().unwrap();
        assert_eq!(untouched.status(), QuoteStatus::Pending);
    }

    #[tokio::test]
    async fn concurrent_sweeps_expire_once() {
        let store = InMemoryNegotiationStore::new();
        let overdue = sample_quote(Timestamp::now().sub_secs(60));
        store.create(&overdue, &request_entry(&overdue)).await.unwrap();

        let now = Timestamp::now();
        let (a, b) = tokio::join!(store.expire_overdue(now), store.expire_overdue(now));
        let total = a.unwrap().len() + b.unwrap().len();
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn query_paginates_newest_first() {
        let store = InMemoryNegotiationStore::new();
        let customer = UserId::new_v4();
        for _ in 0..5 {
            let quote = QuoteRequestBuilder::new(
                ProductId::new_v4(),
                customer,
                UserId::new_v4(),
                Timestamp::now().add_days(7),
            )
            .build();
            store.create(&quote, &request_entry(&quote)).await.unwrap();
        }

        let page = store
            .query(&QuoteFilter::for_customer(customer), Pagination::new(1, 2))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());

        let last = store
            .query(&QuoteFilter::for_customer(customer), Pagination::new(3, 2))
            .await
            .unwrap();
        assert_eq!(last.items.len(), 1);
        assert!(!last.has_next());
    }

    #[tokio::test]
    async fn history_appends_in_order() {
        let store = InMemoryNegotiationStore::new();
        let quote = sample_quote(Timestamp::now().add_days(7));
        store.create(&quote, &request_entry(&quote)).await.unwrap();

        let counter =
            NegotiationEntry::new(quote.id(), NegotiationAction::Counter, Actor::Artisan);
        store.append(&counter).await.unwrap();

        let history = store.list_by_quote(&quote.id()).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history.first().unwrap().action(), NegotiationAction::Request);
        assert_eq!(history.get(1).unwrap().action(), NegotiationAction::Counter);
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let store = InMemoryNegotiationStore::new();
        let quote = sample_quote(Timestamp::now().add_days(7));
        store.create(&quote, &request_entry(&quote)).await.unwrap();

        store.clear().await;
        assert!(store.is_empty());
        assert!(store.list_by_quote(&quote.id()).await.unwrap().is_empty());
    }
}
