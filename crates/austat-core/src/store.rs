//! Collaborator traits
//!
//! The reporting core is a pure computation over whatever these
//! collaborators return. Implementations live outside the core (a
//! database, an HTTP service, or the in-memory stores the CLI uses);
//! their failures propagate to the caller unmodified and the core
//! performs no retry.

use crate::error::Result;
use crate::types::UserId;
use chrono::{DateTime, FixedOffset, TimeDelta};

/// Storage for user-seen events
///
/// All range queries treat `start` as inclusive and `end` as exclusive.
pub trait EventStore {
    /// Persist one user-seen event.
    fn record_event(&self, user_id: UserId, when: DateTime<FixedOffset>) -> Result<()>;

    /// Whether an identical event (same user, same timestamp) exists.
    fn has_event(&self, user_id: UserId, when: DateTime<FixedOffset>) -> Result<bool>;

    /// Number of distinct users with at least one event in the range.
    /// Omitted bounds leave that side of the range open.
    fn count_distinct_users(
        &self,
        start: Option<DateTime<FixedOffset>>,
        end: Option<DateTime<FixedOffset>>,
    ) -> Result<u64>;

    /// Timestamp of the earliest recorded event, if any.
    fn earliest_event(&self) -> Result<Option<DateTime<FixedOffset>>>;

    /// Timestamp of the latest recorded event, if any.
    fn latest_event(&self) -> Result<Option<DateTime<FixedOffset>>>;
}

/// Read-only view of the external user directory
pub trait UserDirectory {
    /// Total accounts created strictly before `when`.
    fn count_joined_before(&self, when: DateTime<FixedOffset>) -> Result<u64>;

    /// Accounts created strictly before `when` that are currently flagged
    /// active.
    fn count_active_joined_before(&self, when: DateTime<FixedOffset>) -> Result<u64>;
}

/// Per-user last-seen cache backing the recording path's rate limit
///
/// Used only by event recording, never by reporting.
pub trait SeenCache {
    /// Last timestamp stored under `key`, if it has not expired.
    fn last_seen(&self, key: &str) -> Option<DateTime<FixedOffset>>;

    /// Store `when` under `key` with a time-to-live.
    fn set_last_seen(&self, key: &str, when: DateTime<FixedOffset>, ttl: TimeDelta);
}
