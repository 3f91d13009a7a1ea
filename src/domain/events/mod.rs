//! # Domain Events
//!
//! Outbound lifecycle events consumed by the notification/order gateway.

pub mod quote_events;

pub use quote_events::{EventMetadata, QuoteEvent};
