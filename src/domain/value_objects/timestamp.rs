//! # Timestamp Value Object
//!
//! DateTime wrapper with domain-specific methods.
//!
//! This module provides the [`Timestamp`] type used for quote expiry
//! deadlines, audit ordering, and negotiation-time statistics.
//!
//! # Examples
//!
//! ```
//! use craft_quotes::domain::value_objects::timestamp::Timestamp;
//!
//! let now = Timestamp::now();
//! let deadline = now.add_days(7);
//!
//! assert!(deadline.is_after(&now));
//! ```

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// A UTC timestamp.
///
/// Wraps `chrono::DateTime<Utc>` with domain-specific methods for
/// expiry windows and negotiation timing.
///
/// # Invariants
///
/// - Always in UTC timezone
///
/// # Examples
///
/// ```
/// use craft_quotes::domain::value_objects::timestamp::Timestamp;
///
/// let now = Timestamp::now();
/// let in_three_days = now.add_days(3);
/// assert!(!in_three_days.is_past());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from Unix seconds.
    ///
    /// # Returns
    ///
    /// `Some(Timestamp)` if the value is valid, `None` otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use craft_quotes::domain::value_objects::timestamp::Timestamp;
    ///
    /// let ts = Timestamp::from_secs(1704067200).unwrap();
    /// assert_eq!(ts.timestamp_secs(), 1704067200);
    /// ```
    #[must_use]
    pub fn from_secs(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }

    /// Creates a timestamp from Unix milliseconds.
    ///
    /// # Returns
    ///
    /// `Some(Timestamp)` if the value is valid, `None` otherwise.
    #[must_use]
    pub fn from_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self)
    }

    /// Returns the Unix timestamp in seconds.
    #[inline]
    #[must_use]
    pub fn timestamp_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// Returns the Unix timestamp in milliseconds.
    #[inline]
    #[must_use]
    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Adds seconds to the timestamp.
    ///
    /// # Arguments
    ///
    /// * `secs` - Number of seconds to add (can be negative)
    #[must_use]
    pub fn add_secs(&self, secs: i64) -> Self {
        Self(self.0 + Duration::seconds(secs))
    }

    /// Adds whole days to the timestamp.
    ///
    /// # Arguments
    ///
    /// * `days` - Number of days to add (can be negative)
    ///
    /// # Examples
    ///
    /// ```
    /// use craft_quotes::domain::value_objects::timestamp::Timestamp;
    ///
    /// let ts = Timestamp::from_secs(0).unwrap();
    /// assert_eq!(ts.add_days(1).timestamp_secs(), 86_400);
    /// ```
    #[must_use]
    pub fn add_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// Subtracts seconds from the timestamp.
    #[must_use]
    pub fn sub_secs(&self, secs: i64) -> Self {
        Self(self.0 - Duration::seconds(secs))
    }

    /// Returns true if this timestamp lies in the past.
    ///
    /// # Examples
    ///
    /// ```
    /// use craft_quotes::domain::value_objects::timestamp::Timestamp;
    ///
    /// assert!(Timestamp::from_secs(0).unwrap().is_past());
    /// assert!(!Timestamp::now().add_days(1).is_past());
    /// ```
    #[must_use]
    pub fn is_past(&self) -> bool {
        self.0 < Utc::now()
    }

    /// Returns true if this timestamp is before another.
    #[inline]
    #[must_use]
    pub fn is_before(&self, other: &Self) -> bool {
        self.0 < other.0
    }

    /// Returns true if this timestamp is after another.
    #[inline]
    #[must_use]
    pub fn is_after(&self, other: &Self) -> bool {
        self.0 > other.0
    }

    /// Returns the fractional hours elapsed from `earlier` to `self`.
    ///
    /// Clamped to zero if `earlier` is actually later.
    ///
    /// # Examples
    ///
    /// ```
    /// use craft_quotes::domain::value_objects::timestamp::Timestamp;
    ///
    /// let start = Timestamp::from_secs(0).unwrap();
    /// let end = Timestamp::from_secs(5400).unwrap();
    /// assert!((end.hours_since(&start) - 1.5).abs() < f64::EPSILON);
    /// ```
    #[must_use]
    pub fn hours_since(&self, earlier: &Self) -> f64 {
        let millis = (self.0 - earlier.0).num_milliseconds();
        if millis <= 0 {
            return 0.0;
        }
        millis as f64 / 3_600_000.0
    }

    /// Returns the underlying DateTime.
    #[inline]
    #[must_use]
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl Add<std::time::Duration> for Timestamp {
    type Output = Self;

    fn add(self, rhs: std::time::Duration) -> Self::Output {
        Self(self.0 + Duration::from_std(rhs).unwrap_or(Duration::zero()))
    }
}

impl Sub<std::time::Duration> for Timestamp {
    type Output = Self;

    fn sub(self, rhs: std::time::Duration) -> Self::Output {
        Self(self.0 - Duration::from_std(rhs).unwrap_or(Duration::zero()))
    }
}

impl Sub<Timestamp> for Timestamp {
    type Output = std::time::Duration;

    fn sub(self, rhs: Timestamp) -> Self::Output {
        (self.0 - rhs.0)
            .to_std()
            .unwrap_or(std::time::Duration::ZERO)
    }
}
