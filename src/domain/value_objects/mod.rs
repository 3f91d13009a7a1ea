//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`QuoteId`], [`EntryId`], [`EventId`]: UUID identifiers owned by the engine
//! - [`UserId`], [`ProductId`]: UUID references to external entities
//!
//! ## Numeric Types
//!
//! - [`Price`]: strictly positive decimal amount
//!
//! ## Domain Enums
//!
//! - [`QuoteStatus`]: quote lifecycle state machine
//! - [`ResponseAction`]: artisan response tagged union
//! - [`NegotiationAction`], [`Actor`]: audit-log vocabulary

pub mod ids;
pub mod price;
pub mod quote_status;
pub mod response_action;
pub mod timestamp;

pub use ids::{EntryId, EventId, ProductId, QuoteId, UserId};
pub use price::Price;
pub use quote_status::{InvalidQuoteStatusError, QuoteStatus};
pub use response_action::{Actor, NegotiationAction, ResponseAction};
pub use timestamp::Timestamp;
