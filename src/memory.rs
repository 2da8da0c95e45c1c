//! In-memory store implementations
//!
//! Thread-safe backing stores for the CLI and the test suite. Interior
//! mutability is a `Mutex` per store; every operation takes the lock once,
//! does its work, and releases it, so the stores can be shared by
//! reference across threads.

use austat_core::error::Result;
use austat_core::store::{EventStore, SeenCache, UserDirectory};
use austat_core::types::UserId;
use chrono::{DateTime, FixedOffset, TimeDelta};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Instant;

/// One external user account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Account {
    /// Primary key in the external directory
    pub id: UserId,
    /// When the account was created
    pub joined: DateTime<FixedOffset>,
    /// Whether the account is currently flagged active
    pub active: bool,
}

impl Account {
    pub fn new(id: UserId, joined: DateTime<FixedOffset>, active: bool) -> Self {
        Self { id, joined, active }
    }
}

/// Event store over a plain vector of (user, timestamp) pairs
#[derive(Debug, Default)]
pub struct MemoryEventStore {
    events: Mutex<Vec<(UserId, DateTime<FixedOffset>)>>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored events.
    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventStore for MemoryEventStore {
    fn record_event(&self, user_id: UserId, when: DateTime<FixedOffset>) -> Result<()> {
        self.events.lock().unwrap().push((user_id, when));
        Ok(())
    }

    fn has_event(&self, user_id: UserId, when: DateTime<FixedOffset>) -> Result<bool> {
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .any(|(id, at)| *id == user_id && *at == when))
    }

    fn count_distinct_users(
        &self,
        start: Option<DateTime<FixedOffset>>,
        end: Option<DateTime<FixedOffset>>,
    ) -> Result<u64> {
        let events = self.events.lock().unwrap();
        let users: HashSet<UserId> = events
            .iter()
            .filter(|(_, at)| start.is_none_or(|s| *at >= s) && end.is_none_or(|e| *at < e))
            .map(|(id, _)| *id)
            .collect();
        Ok(users.len() as u64)
    }

    fn earliest_event(&self) -> Result<Option<DateTime<FixedOffset>>> {
        Ok(self.events.lock().unwrap().iter().map(|(_, at)| *at).min())
    }

    fn latest_event(&self) -> Result<Option<DateTime<FixedOffset>>> {
        Ok(self.events.lock().unwrap().iter().map(|(_, at)| *at).max())
    }
}

/// User directory over a plain vector of accounts
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    accounts: Mutex<Vec<Account>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one account.
    pub fn insert(&self, account: Account) {
        self.accounts.lock().unwrap().push(account);
    }

    pub fn len(&self) -> usize {
        self.accounts.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl UserDirectory for MemoryDirectory {
    fn count_joined_before(&self, when: DateTime<FixedOffset>) -> Result<u64> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .filter(|account| account.joined < when)
            .count() as u64)
    }

    fn count_active_joined_before(&self, when: DateTime<FixedOffset>) -> Result<u64> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .filter(|account| account.active && account.joined < when)
            .count() as u64)
    }
}

/// Last-seen cache with wall-clock expiry
#[derive(Debug, Default)]
pub struct MemorySeenCache {
    entries: Mutex<HashMap<String, (DateTime<FixedOffset>, Instant)>>,
}

impl MemorySeenCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SeenCache for MemorySeenCache {
    fn last_seen(&self, key: &str) -> Option<DateTime<FixedOffset>> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some((when, expires)) if *expires > Instant::now() => Some(*when),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn set_last_seen(&self, key: &str, when: DateTime<FixedOffset>, ttl: TimeDelta) {
        let ttl = ttl.to_std().unwrap_or_default();
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (when, Instant::now() + ttl));
    }
}
