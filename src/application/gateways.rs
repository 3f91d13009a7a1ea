//! # External Gateways
//!
//! Ports to the collaborators the engine consults but does not own:
//! the product catalog, the identity system, and the notification/order
//! pipeline.
//!
//! The engine only reads snapshots from the catalog and identity gateways;
//! notification publication is fire-and-forget and never influences
//! negotiation outcomes.
//!
//! # Examples
//!
//! ```ignore
//! let product = products.product(&product_id).await?
//!     .ok_or_else(|| DomainError::not_found("product", product_id))?;
//! ```

use crate::domain::events::QuoteEvent;
use crate::domain::value_objects::{Price, ProductId, UserId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for gateway calls.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The remote service could not be reached.
    #[error("gateway unavailable: {0}")]
    Unavailable(String),

    /// The remote service returned something unusable.
    #[error("gateway protocol error: {0}")]
    Protocol(String),
}

impl GatewayError {
    /// Creates an unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

/// Result type for gateway calls.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Catalog lifecycle status of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    /// Listed and purchasable.
    Published,
    /// Not yet listed.
    Draft,
    /// Withdrawn from the catalog.
    Archived,
}

/// Read-only snapshot of a product, as the catalog sees it right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    /// Product identifier.
    pub id: ProductId,
    /// The artisan currently selling this product.
    pub seller_id: UserId,
    /// List price.
    pub price: Price,
    /// Discounted price, if a discount is running.
    pub discount_price: Option<Price>,
    /// Whether the artisan accepts customization requests.
    pub is_customizable: bool,
    /// Catalog lifecycle status.
    pub status: ProductStatus,
}

impl ProductSnapshot {
    /// Returns the price negotiations are measured against: the discounted
    /// price when a discount is running, else the list price.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        self.discount_price.unwrap_or(self.price)
    }

    /// Returns true if the product can be the subject of a quote request.
    #[must_use]
    pub fn is_quotable(&self) -> bool {
        self.status == ProductStatus::Published && self.is_customizable
    }
}

/// Role of a user in the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Buys products and opens quote requests.
    Customer,
    /// Sells products and answers quote requests.
    Artisan,
    /// Marketplace operator.
    Admin,
}

/// Read-only snapshot of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSnapshot {
    /// User identifier.
    pub id: UserId,
    /// Marketplace role.
    pub role: UserRole,
}

/// Port to the product catalog.
#[async_trait]
pub trait ProductGateway: Send + Sync {
    /// Fetches the current snapshot of a product.
    ///
    /// Returns `Ok(None)` if the product does not exist.
    ///
    /// # Errors
    ///
    /// Returns a `GatewayError` on infrastructure failure.
    async fn product(&self, id: &ProductId) -> GatewayResult<Option<ProductSnapshot>>;
}

/// Port to the identity system.
#[async_trait]
pub trait UserGateway: Send + Sync {
    /// Fetches the current snapshot of a user.
    ///
    /// Returns `Ok(None)` if the user does not exist.
    ///
    /// # Errors
    ///
    /// Returns a `GatewayError` on infrastructure failure.
    async fn user(&self, id: &UserId) -> GatewayResult<Option<UserSnapshot>>;
}

/// Port to the notification/order pipeline.
///
/// Publication failures must never roll back a negotiation transition;
/// the engine logs them and moves on.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    /// Publishes a quote lifecycle event.
    ///
    /// # Errors
    ///
    /// Returns a `GatewayError` on infrastructure failure; callers treat
    /// this as advisory.
    async fn publish(&self, event: QuoteEvent) -> GatewayResult<()>;
}
