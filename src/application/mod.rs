//! # Application Layer
//!
//! The negotiation engine, its external collaborator ports, statistics,
//! and the expiration sweeper.
//!
//! This module provides:
//! - [`QuoteNegotiationEngine`]: the command/query surface
//! - [`ExpirationSweeper`]: periodic force-expiry of overdue quotes
//! - [`QuoteStats`]: exact per-scope negotiation statistics

pub mod engine;
pub mod error;
pub mod gateways;
pub mod stats;
pub mod sweeper;

pub use engine::{NewQuoteRequest, QuoteNegotiationEngine};
pub use error::{EngineError, EngineResult};
pub use gateways::{
    GatewayError, GatewayResult, NotificationGateway, ProductGateway, ProductSnapshot,
    ProductStatus, UserGateway, UserRole, UserSnapshot,
};
pub use stats::{QuoteStats, ScopeRole, StatsScope};
pub use sweeper::{ExpirationSweeper, DEFAULT_SWEEP_INTERVAL};
