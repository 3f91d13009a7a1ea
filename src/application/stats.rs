//! # Quote Statistics
//!
//! Aggregate negotiation statistics over a user or global scope.
//!
//! Statistics are computed over the full matching set, not a sample, so the
//! conversion rate and negotiation-time average are exact. A scope with no
//! quotes yields all-zero stats rather than a division error.
//!
//! # Examples
//!
//! ```
//! use craft_quotes::application::stats::QuoteStats;
//!
//! let empty = QuoteStats::from_quotes(&[]);
//! assert_eq!(empty.total_quotes, 0);
//! assert_eq!(empty.conversion_rate_percent, 0.0);
//! ```

use crate::domain::entities::quote_request::QuoteRequest;
use crate::domain::value_objects::{QuoteStatus, UserId};
use crate::infrastructure::persistence::traits::QuoteFilter;
use serde::{Deserialize, Serialize};

/// Which side of the marketplace a stats scope looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeRole {
    /// Quotes the user opened.
    Customer,
    /// Quotes addressed to the user.
    Artisan,
}

/// Scope selector for [`QuoteStats`].
///
/// The default scope covers every quote (admin view).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsScope {
    /// Restrict to one user's quotes.
    pub user_id: Option<UserId>,
    /// Which side of the quotes the user is on. Ignored without `user_id`.
    pub role: Option<ScopeRole>,
}

impl StatsScope {
    /// Scope over every quote.
    #[must_use]
    pub const fn global() -> Self {
        Self {
            user_id: None,
            role: None,
        }
    }

    /// Scope over quotes a customer opened.
    #[must_use]
    pub const fn customer(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            role: Some(ScopeRole::Customer),
        }
    }

    /// Scope over quotes addressed to an artisan.
    #[must_use]
    pub const fn artisan(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            role: Some(ScopeRole::Artisan),
        }
    }

    /// Converts the scope into a repository filter.
    #[must_use]
    pub fn to_filter(self) -> QuoteFilter {
        match (self.user_id, self.role) {
            (Some(id), Some(ScopeRole::Customer)) => QuoteFilter::for_customer(id),
            (Some(id), Some(ScopeRole::Artisan)) => QuoteFilter::for_artisan(id),
            // A bare user id without a role means "either side"; the
            // filter cannot express a disjunction, so scope by customer.
            (Some(id), None) => QuoteFilter::for_customer(id),
            (None, _) => QuoteFilter::default(),
        }
    }
}

/// Aggregate statistics over a set of quotes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuoteStats {
    /// Number of quotes in scope.
    pub total_quotes: u64,
    /// Quotes awaiting the artisan's first response.
    pub pending_quotes: u64,
    /// Quotes accepted (including ones since converted to orders).
    pub accepted_quotes: u64,
    /// Quotes rejected or cancelled.
    pub rejected_quotes: u64,
    /// Quotes that ran out the clock.
    pub expired_quotes: u64,
    /// Mean hours from creation to acceptance, over accepted quotes.
    pub average_negotiation_time_hours: f64,
    /// Accepted quotes as a percentage of all quotes in scope.
    pub conversion_rate_percent: f64,
}

impl QuoteStats {
    /// All-zero statistics for an empty scope.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            total_quotes: 0,
            pending_quotes: 0,
            accepted_quotes: 0,
            rejected_quotes: 0,
            expired_quotes: 0,
            average_negotiation_time_hours: 0.0,
            conversion_rate_percent: 0.0,
        }
    }

    /// Computes statistics over a set of quotes.
    ///
    /// `accepted_quotes` counts both `Accepted` and `Completed` (a
    /// completed quote was converted, so it stays in the conversion
    /// numerator). The negotiation-time average covers `Accepted` only:
    /// conversion bumps `updated_at` again and would skew the signal.
    #[must_use]
    pub fn from_quotes(quotes: &[QuoteRequest]) -> Self {
        if quotes.is_empty() {
            return Self::empty();
        }

        let mut pending = 0u64;
        let mut accepted = 0u64;
        let mut rejected = 0u64;
        let mut expired = 0u64;
        let mut negotiation_hours = Vec::new();

        for quote in quotes {
            match quote.status() {
                QuoteStatus::Pending => pending += 1,
                QuoteStatus::CounterOffered => {}
                QuoteStatus::Accepted => {
                    accepted += 1;
                    negotiation_hours.push(quote.updated_at().hours_since(&quote.created_at()));
                }
                QuoteStatus::Completed => accepted += 1,
                QuoteStatus::Rejected => rejected += 1,
                QuoteStatus::Expired => expired += 1,
            }
        }

        let total = quotes.len() as u64;
        let average_hours = if negotiation_hours.is_empty() {
            0.0
        } else {
            negotiation_hours.iter().sum::<f64>() / negotiation_hours.len() as f64
        };
        let conversion = accepted as f64 / total as f64 * 100.0;

        Self {
            total_quotes: total,
            pending_quotes: pending,
            accepted_quotes: accepted,
            rejected_quotes: rejected,
            expired_quotes: expired,
            average_negotiation_time_hours: round2(average_hours),
            conversion_rate_percent: round2(conversion),
        }
    }
}

/// Rounds to two decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
