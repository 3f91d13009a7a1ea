//! # Negotiation Actions
//!
//! Typed actions exchanged during a quote negotiation.
//!
//! This module provides:
//! - [`ResponseAction`]: what an artisan can do with a pending quote
//! - [`NegotiationAction`]: the audit-log action kinds
//! - [`Actor`]: which party performed an action
//!
//! [`ResponseAction`] is a tagged union so that a counter amount can only
//! exist on a `Counter` response; the other variants have no field for it.
//!
//! # Examples
//!
//! ```
//! use craft_quotes::domain::value_objects::response_action::ResponseAction;
//! use craft_quotes::domain::value_objects::price::Price;
//!
//! let counter = ResponseAction::Counter {
//!     amount: Price::from_major(75).unwrap(),
//!     message: Some("best I can do for hand-carved oak".into()),
//! };
//! assert_eq!(counter.action_name(), "COUNTER");
//! ```

use crate::domain::value_objects::price::Price;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The party performing a negotiation action.
///
/// Expiration is never attributed to a party; swept quotes produce no
/// history entry at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    /// The customer who opened the quote request.
    Customer,
    /// The artisan selling the product.
    Artisan,
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Customer => write!(f, "customer"),
            Self::Artisan => write!(f, "artisan"),
        }
    }
}

/// Kind of action recorded in the negotiation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NegotiationAction {
    /// Customer opened the quote request.
    Request,
    /// Artisan accepted the standing offer.
    Accept,
    /// Artisan declined, or a party cancelled.
    Reject,
    /// Artisan proposed an alternative price.
    Counter,
    /// Either party attached a free-text note.
    Message,
}

impl fmt::Display for NegotiationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Request => "REQUEST",
            Self::Accept => "ACCEPT",
            Self::Reject => "REJECT",
            Self::Counter => "COUNTER",
            Self::Message => "MESSAGE",
        };
        write!(f, "{s}")
    }
}

/// An artisan's response to an active quote request.
///
/// The counter amount lives only on the [`Counter`](ResponseAction::Counter)
/// variant, so "counter-offer required exactly when the action is COUNTER"
/// holds by construction rather than by runtime check.
///
/// # Examples
///
/// ```
/// use craft_quotes::domain::value_objects::response_action::ResponseAction;
///
/// let accept = ResponseAction::Accept { message: None };
/// assert_eq!(accept.action_name(), "ACCEPT");
/// assert!(accept.message().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseAction {
    /// Accept the standing offer; the final price is resolved at acceptance.
    Accept {
        /// Optional note to the customer.
        message: Option<String>,
    },
    /// Decline the quote request.
    Reject {
        /// Optional note to the customer.
        message: Option<String>,
    },
    /// Propose an alternative price.
    Counter {
        /// The counter-offer amount.
        amount: Price,
        /// Optional note to the customer.
        message: Option<String>,
    },
}

impl ResponseAction {
    /// Returns the audit-log action kind for this response.
    #[must_use]
    pub const fn negotiation_action(&self) -> NegotiationAction {
        match self {
            Self::Accept { .. } => NegotiationAction::Accept,
            Self::Reject { .. } => NegotiationAction::Reject,
            Self::Counter { .. } => NegotiationAction::Counter,
        }
    }

    /// Returns the wire name of this action.
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::Accept { .. } => "ACCEPT",
            Self::Reject { .. } => "REJECT",
            Self::Counter { .. } => "COUNTER",
        }
    }

    /// Returns the note attached to this response, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Accept { message } | Self::Reject { message } | Self::Counter { message, .. } => {
                message.as_deref()
            }
        }
    }
}

impl fmt::Display for ResponseAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.action_name())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod actions {
        use super::*;

        #[test]
        fn action_names() {
            assert_eq!(ResponseAction::Accept { message: None }.action_name(), "ACCEPT");
            assert_eq!(ResponseAction::Reject { message: None }.action_name(), "REJECT");
            let counter = ResponseAction::Counter {
                amount: Price::from_major(10).unwrap(),
                message: None,
            };
            assert_eq!(counter.action_name(), "COUNTER");
        }

        #[test]
        fn negotiation_action_mapping() {
            assert_eq!(
                ResponseAction::Accept { message: None }.negotiation_action(),
                NegotiationAction::Accept
            );
            assert_eq!(
                ResponseAction::Reject { message: None }.negotiation_action(),
                NegotiationAction::Reject
            );
        }

        #[test]
        fn message_extraction() {
            let action = ResponseAction::Counter {
                amount: Price::from_major(10).unwrap(),
                message: Some("note".into()),
            };
            assert_eq!(action.message(), Some("note"));
        }
    }

    mod display {
        use super::*;

        #[test]
        fn actor_display() {
            assert_eq!(Actor::Customer.to_string(), "customer");
            assert_eq!(Actor::Artisan.to_string(), "artisan");
        }

        #[test]
        fn negotiation_action_display() {
            assert_eq!(NegotiationAction::Request.to_string(), "REQUEST");
            assert_eq!(NegotiationAction::Message.to_string(), "MESSAGE");
        }
    }

    mod serde_repr {
        use super::*;

        #[test]
        fn response_action_tagged() {
            let counter = ResponseAction::Counter {
                amount: Price::from_major(75).unwrap(),
                message: None,
            };
            let json = serde_json::to_string(&counter).unwrap();
            assert!(json.contains("\"action\":\"COUNTER\""));
            let back: ResponseAction = serde_json::from_str(&json).unwrap();
            assert_eq!(back, counter);
        }

        #[test]
        fn actor_snake_case() {
            assert_eq!(serde_json::to_string(&Actor::Artisan).unwrap(), "\"artisan\"");
        }
    }
}
