//! Event recording
//!
//! The write path of the system: validate the user id, apply the per-user
//! rate limit, optionally skip exact duplicates, and persist the event.
//! Every call reports what happened through [`RecordOutcome`] so callers
//! can distinguish a stored event from a deliberately skipped one.

use austat_core::error::{AustatError, Result};
use austat_core::store::{EventStore, SeenCache};
use austat_core::types::UserRef;
use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use std::fmt;
use tracing::debug;

/// What the recorder did with a seen notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The event was persisted
    Added,
    /// Skipped: the user was already seen inside the rate-limit window
    RateLimited,
    /// Skipped: an identical event already exists
    Duplicated,
}

impl fmt::Display for RecordOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RecordOutcome::Added => "added",
            RecordOutcome::RateLimited => "rate-limited",
            RecordOutcome::Duplicated => "duplicated",
        };
        write!(f, "{s}")
    }
}

/// Recorder tuning
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Width of the per-user rate-limit window; zero disables the limit
    pub rate_limit_seconds: u64,
    /// Prefix of the per-user keys in the seen cache
    pub cache_prefix: String,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            rate_limit_seconds: 360,
            cache_prefix: "austat.seen".to_string(),
        }
    }
}

/// Write-side façade over an event store and a seen cache
pub struct Recorder<'a> {
    events: &'a dyn EventStore,
    cache: &'a dyn SeenCache,
    config: RecorderConfig,
}

impl<'a> Recorder<'a> {
    pub fn new(events: &'a dyn EventStore, cache: &'a dyn SeenCache) -> Self {
        Self {
            events,
            cache,
            config: RecorderConfig::default(),
        }
    }

    pub fn with_config(mut self, config: RecorderConfig) -> Self {
        self.config = config;
        self
    }

    /// Record that a user was seen
    ///
    /// `when` defaults to the current time. With `rate_limit` set, a user
    /// already seen inside the configured window is skipped without
    /// touching the store; with `check_duplicate` set, an event identical
    /// in user and timestamp is skipped. Non-positive user ids are
    /// rejected with [`AustatError::InvalidArgument`].
    pub fn record_seen(
        &self,
        user: UserRef<'_>,
        when: Option<DateTime<FixedOffset>>,
        rate_limit: bool,
        check_duplicate: bool,
    ) -> Result<RecordOutcome> {
        let user_id = user.id();
        if user_id.get() <= 0 {
            return Err(AustatError::InvalidArgument(format!(
                "user id must be positive, got {user_id}"
            )));
        }
        let when = when.unwrap_or_else(|| Utc::now().fixed_offset());

        if rate_limit && self.config.rate_limit_seconds > 0 {
            let key = format!("{}.{}", self.config.cache_prefix, user_id);
            let window = TimeDelta::seconds(self.config.rate_limit_seconds as i64);
            if let Some(last) = self.cache.last_seen(&key) {
                if when < last + window {
                    debug!(user = %user.display_name(), %last, "seen event rate-limited");
                    return Ok(RecordOutcome::RateLimited);
                }
            }
            self.cache.set_last_seen(&key, when, window);
        }

        if check_duplicate && self.events.has_event(user_id, when)? {
            debug!(user = %user.display_name(), %when, "seen event already recorded");
            return Ok(RecordOutcome::Duplicated);
        }

        self.events.record_event(user_id, when)?;
        debug!(user = %user.display_name(), %when, "seen event recorded");
        Ok(RecordOutcome::Added)
    }
}
