//! # Expiration Sweeper
//!
//! Periodic task that force-expires overdue active quotes.
//!
//! The sweeper is a thin scheduler shim over
//! [`QuoteNegotiationEngine::sweep_expired_quotes`]: each tick is one atomic
//! bulk transition in the store, so any number of concurrent sweepers (or a
//! sweeper racing an in-flight response) converge on the same end state.
//!
//! # Examples
//!
//! ```ignore
//! let sweeper = ExpirationSweeper::new(engine, Duration::from_secs(3600));
//! tokio::spawn(async move { sweeper.run().await });
//! ```

use crate::application::engine::QuoteNegotiationEngine;
use crate::application::error::EngineResult;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default cadence between sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

/// Periodic expiration sweeper.
///
/// Safe to run from multiple processes at once; the store's bulk update
/// makes each overdue quote expire exactly once.
#[derive(Debug)]
pub struct ExpirationSweeper {
    engine: Arc<QuoteNegotiationEngine>,
    interval: Duration,
}

impl ExpirationSweeper {
    /// Creates a sweeper over the engine with the given cadence.
    #[must_use]
    pub fn new(engine: Arc<QuoteNegotiationEngine>, interval: Duration) -> Self {
        Self { engine, interval }
    }

    /// Creates a sweeper with the default hourly cadence.
    #[must_use]
    pub fn hourly(engine: Arc<QuoteNegotiationEngine>) -> Self {
        Self::new(engine, DEFAULT_SWEEP_INTERVAL)
    }

    /// Returns the configured cadence.
    #[inline]
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Runs a single sweep and returns the number of quotes expired.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Repository` if the bulk update fails.
    pub async fn tick(&self) -> EngineResult<u64> {
        self.engine.sweep_expired_quotes(None).await
    }

    /// Runs sweeps forever at the configured cadence.
    ///
    /// A failing tick is logged and the loop keeps going; transient store
    /// outages must not kill the schedule.
    pub async fn run(&self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            match self.tick().await {
                Ok(count) => debug!(count, "sweep completed"),
                Err(error) => warn!(%error, "sweep failed, retrying next interval"),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::gateways::{
        GatewayResult, NotificationGateway, ProductGateway, ProductSnapshot, UserGateway,
        UserSnapshot,
    };
    use crate::config::EngineConfig;
    use crate::domain::entities::negotiation_entry::NegotiationEntry;
    use crate::domain::entities::quote_request::QuoteRequestBuilder;
    use crate::domain::events::QuoteEvent;
    use crate::domain::value_objects::{
        Actor, NegotiationAction, Price, ProductId, QuoteStatus, Timestamp, UserId,
    };
    use crate::infrastructure::persistence::in_memory::InMemoryNegotiationStore;
    use crate::infrastructure::persistence::traits::QuoteRepository;
    use async_trait::async_trait;

    #[derive(Debug)]
    struct NoopGateways;

    #[async_trait]
    impl ProductGateway for NoopGateways {
        async fn product(&self, _id: &ProductId) -> GatewayResult<Option<ProductSnapshot>> {
            Ok(None)
        }
    }

    #[async_trait]
    impl UserGateway for NoopGateways {
        async fn user(&self, _id: &UserId) -> GatewayResult<Option<UserSnapshot>> {
            Ok(None)
        }
    }

    #[async_trait]
    impl NotificationGateway for NoopGateways {
        async fn publish(&self, _event: QuoteEvent) -> GatewayResult<()> {
            Ok(())
        }
    }

    fn engine_over(store: &InMemoryNegotiationStore) -> Arc<QuoteNegotiationEngine> {
        let gateways = Arc::new(NoopGateways);
        Arc::new(QuoteNegotiationEngine::new(
            EngineConfig::default(),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            gateways.clone(),
            gateways.clone(),
            gateways,
        ))
    }

    async fn plant_quote(store: &InMemoryNegotiationStore, expires_at: Timestamp) {
        let quote = QuoteRequestBuilder::new(
            ProductId::new_v4(),
            UserId::new_v4(),
            UserId::new_v4(),
            expires_at,
        )
        .requested_price(Price::from_major(60).unwrap())
        .build();
        let entry =
            NegotiationEntry::new(quote.id(), NegotiationAction::Request, Actor::Customer);
        store.create(&quote, &entry).await.unwrap();
    }

    #[tokio::test]
    async fn tick_expires_only_overdue_quotes() {
        let store = InMemoryNegotiationStore::new();
        plant_quote(&store, Timestamp::now().sub_secs(60)).await;
        plant_quote(&store, Timestamp::now().add_days(7)).await;

        let sweeper = ExpirationSweeper::hourly(engine_over(&store));
        assert_eq!(sweeper.tick().await.unwrap(), 1);

        let leftover = store
            .find_matching(&crate::infrastructure::persistence::traits::QuoteFilter::default())
            .await
            .unwrap();
        let expired = leftover
            .iter()
            .filter(|q| q.status() == QuoteStatus::Expired)
            .count();
        assert_eq!(expired, 1);
    }

    #[tokio::test]
    async fn repeated_ticks_are_idempotent() {
        let store = InMemoryNegotiationStore::new();
        plant_quote(&store, Timestamp::now().sub_secs(60)).await;

        let sweeper = ExpirationSweeper::hourly(engine_over(&store));
        assert_eq!(sweeper.tick().await.unwrap(), 1);
        assert_eq!(sweeper.tick().await.unwrap(), 0);
        assert_eq!(sweeper.tick().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn concurrent_ticks_expire_each_quote_once() {
        let store = InMemoryNegotiationStore::new();
        for _ in 0..4 {
            plant_quote(&store, Timestamp::now().sub_secs(60)).await;
        }

        let engine = engine_over(&store);
        let a = ExpirationSweeper::hourly(engine.clone());
        let b = ExpirationSweeper::hourly(engine);
        let (ra, rb) = tokio::join!(a.tick(), b.tick());
        assert_eq!(ra.unwrap() + rb.unwrap(), 4);
    }

    #[test]
    fn hourly_uses_default_interval() {
        let store = InMemoryNegotiationStore::new();
        let sweeper = ExpirationSweeper::hourly(engine_over(&store));
        assert_eq!(sweeper.interval(), DEFAULT_SWEEP_INTERVAL);
    }
}
