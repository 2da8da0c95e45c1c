//! Core domain types for austat
//!
//! This module contains the fundamental types used throughout the austat
//! library: user identifiers, half-open time spans, and the usage record
//! produced for each reported period.
//!
//! Every instant handled by the core is a `chrono::DateTime<FixedOffset>`,
//! so the UTC offset is always explicit. Naive timestamps must be rejected
//! or normalized at the boundary before they reach these types.

use chrono::{DateTime, FixedOffset, TimeDelta};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Strongly-typed user identifier
///
/// Wraps the integer primary key of an external user account. Ids on the
/// event-recording path must be positive; that contract is enforced by the
/// recorder, not here.
///
/// # Examples
/// ```
/// use austat_core::types::UserId;
///
/// let id = UserId::new(42);
/// assert_eq!(id.get(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Create a new UserId
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner integer value
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A user account object that can stand in for a bare id
///
/// The recording path accepts either a raw id or a full account handle;
/// this trait is the seam for the latter. The username is used only for
/// logging.
pub trait UserLike {
    /// The account's primary key
    fn id(&self) -> UserId;

    /// Human-readable name, for log messages
    fn username(&self) -> &str;
}

/// Either a bare user id or a borrowed account handle
///
/// # Examples
/// ```
/// use austat_core::types::{UserId, UserRef};
///
/// let user: UserRef = 7.into();
/// assert_eq!(user.id(), UserId::new(7));
/// ```
#[derive(Clone, Copy)]
pub enum UserRef<'a> {
    /// A bare primary key
    Id(UserId),
    /// A full account object
    Account(&'a dyn UserLike),
}

impl UserRef<'_> {
    /// Resolve to the underlying user id
    pub fn id(&self) -> UserId {
        match self {
            UserRef::Id(id) => *id,
            UserRef::Account(account) => account.id(),
        }
    }

    /// Name to use in log messages
    pub fn display_name(&self) -> String {
        match self {
            UserRef::Id(id) => id.to_string(),
            UserRef::Account(account) => account.username().to_string(),
        }
    }
}

impl From<i64> for UserRef<'static> {
    fn from(id: i64) -> Self {
        UserRef::Id(UserId::new(id))
    }
}

impl From<UserId> for UserRef<'static> {
    fn from(id: UserId) -> Self {
        UserRef::Id(id)
    }
}

impl<'a, T: UserLike> From<&'a T> for UserRef<'a> {
    fn from(account: &'a T) -> Self {
        UserRef::Account(account)
    }
}

/// Half-open time interval: start inclusive, end exclusive
///
/// Spans produced by the period enumerators are always non-empty
/// (`start < end`) and consecutive spans in an enumerated sequence are
/// contiguous: each span's end equals the next span's start.
///
/// # Examples
/// ```
/// use austat_core::types::Span;
/// use chrono::DateTime;
///
/// let start = DateTime::parse_from_rfc3339("2017-03-01T00:00:00+00:00").unwrap();
/// let end = DateTime::parse_from_rfc3339("2017-04-01T00:00:00+00:00").unwrap();
/// let span = Span::new(start, end);
///
/// assert!(span.contains(start));
/// assert!(!span.contains(end));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// Start of the interval (inclusive)
    pub start: DateTime<FixedOffset>,
    /// End of the interval (exclusive)
    pub end: DateTime<FixedOffset>,
}

impl Span {
    /// Create a new Span
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        Self { start, end }
    }

    /// Length of the span
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Whether an instant falls inside the span
    pub fn contains(&self, instant: DateTime<FixedOffset>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Whether the span covers no time at all
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}

/// User counts for one reported period
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageCounts {
    /// Accounts created strictly before the period's end
    pub registered: u64,
    /// The subset of registered accounts currently flagged active
    pub activated: u64,
    /// Distinct users with at least one recorded event inside the period
    pub active: u64,
}

/// Human-readable labels attached to a reported period
///
/// Subscription-anchored reports carry relative labels derived from the
/// period's 1-based ordinal (`Y01 M02` style); calendar-aligned reports
/// carry labels derived from the period's start instant (`2017-03` style).
/// Only the kinds relevant to a given report are populated.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodLabels {
    /// Relative year and month, e.g. "Y02 M11"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_month: Option<String>,
    /// Relative year and quarter, e.g. "Y02 Q4"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_quarter: Option<String>,
    /// Relative year, e.g. "Y02"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    /// Calendar year and month, e.g. "2017-03"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_year_month: Option<String>,
    /// Calendar year, e.g. 2017
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_year: Option<i32>,
}

/// Usage data for one reported period
///
/// Produced fresh per period by the usage aggregator and never mutated
/// afterwards. Records in a report sequence are chronologically ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// The period this record covers
    pub period: Span,
    /// Registered/activated/active counts for the period
    pub usage: UsageCounts,
    /// Period labels for display
    pub labels: PeriodLabels,
}
