//! # Identifier Value Objects
//!
//! UUID-backed identifiers for quotes, history entries, events, and the
//! external entities (users, products) the engine references.
//!
//! # Examples
//!
//! ```
//! use craft_quotes::domain::value_objects::ids::QuoteId;
//!
//! let id = QuoteId::new_v4();
//! assert_ne!(id, QuoteId::new_v4());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a new random (v4) identifier.
            #[must_use]
            pub fn new_v4() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing UUID (for reconstruction from storage).
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID.
            #[inline]
            #[must_use]
            pub const fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

uuid_id!(
    /// Identifier of a quote request aggregate.
    QuoteId
);

uuid_id!(
    /// Identifier of a single negotiation history entry.
    EntryId
);

uuid_id!(
    /// Identifier of a domain event.
    EventId
);

uuid_id!(
    /// Identifier of a user (customer or artisan) in the external identity system.
    UserId
);

uuid_id!(
    /// Identifier of a product in the external catalog.
    ProductId
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_v4_is_unique() {
        assert_ne!(QuoteId::new_v4(), QuoteId::new_v4());
        assert_ne!(EntryId::new_v4(), EntryId::new_v4());
    }

    #[test]
    fn from_uuid_roundtrip() {
        let uuid = Uuid::new_v4();
        let id = UserId::from_uuid(uuid);
        assert_eq!(id.as_uuid(), uuid);
        assert_eq!(Uuid::from(id), uuid);
    }

    #[test]
    fn display_matches_uuid() {
        let uuid = Uuid::new_v4();
        let id = ProductId::from(uuid);
        assert_eq!(id.to_string(), uuid.to_string());
    }

    #[test]
    fn serde_is_transparent() {
        let id = QuoteId::new_v4();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let back: QuoteId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn ordering_is_stable() {
        let a = EventId::from_uuid(Uuid::nil());
        let b = EventId::new_v4();
        assert!(a <= b);
    }
}
