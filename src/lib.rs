//! # craft-quotes
//!
//! Quote negotiation engine for a marketplace of customizable artisan
//! products: customers request custom prices and specifications, artisans
//! accept, reject, or counter, both sides exchange messages, overdue quotes
//! expire automatically, and an accepted quote becomes order-eligible.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │ application: engine, sweeper, stats, gateway ports  │
//! ├─────────────────────────────────────────────────────┤
//! │ domain: quote aggregate, audit entries, FSM, errors │
//! ├─────────────────────────────────────────────────────┤
//! │ infrastructure: repository ports, in-memory store   │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! Commands flow caller → engine → quote store (with the paired history
//! append in the same unit of work). Queries flow caller → engine → store.
//! The engine holds no process-wide mutable state; everything lives behind
//! the repository ports.
//!
//! # Quick Start
//!
//! ```ignore
//! use craft_quotes::application::{NewQuoteRequest, QuoteNegotiationEngine};
//! use craft_quotes::config::EngineConfig;
//! use craft_quotes::infrastructure::persistence::InMemoryNegotiationStore;
//! use std::sync::Arc;
//!
//! let store = InMemoryNegotiationStore::new();
//! let engine = QuoteNegotiationEngine::new(
//!     EngineConfig::load()?,
//!     Arc::new(store.clone()),
//!     Arc::new(store),
//!     products,       // your catalog gateway
//!     users,          // your identity gateway
//!     notifications,  // your notification gateway
//! );
//!
//! let quote = engine.create_quote_request(NewQuoteRequest { /* … */ }).await?;
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;
