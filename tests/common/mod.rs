//! Shared fixture for the integration tests
//!
//! A customer subscribed on 2010-01-24 at 22:00 UTC. One new user shows up
//! every Valentine's Day at noon from 2010 through 2017, plus one more on
//! 2015-10-17, and each user's account was created at the moment of their
//! first (and only) event. Reports are evaluated as of 2017-04-03 23:00.

#![allow(dead_code)]

use austat::memory::{Account, MemoryDirectory, MemoryEventStore};
use austat::store::EventStore;
use austat::types::UserId;
use chrono::{DateTime, FixedOffset, TimeZone};

/// Subscription anchor: 2010-01-24T22:00:00+00:00.
pub fn anchor() -> DateTime<FixedOffset> {
    at(2010, 1, 24, 22)
}

/// The pinned clock: 2017-04-03T23:00:00+00:00.
pub fn now() -> DateTime<FixedOffset> {
    at(2017, 4, 3, 23)
}

/// A UTC instant on the hour.
pub fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(year, month, day, hour, 0, 0)
        .unwrap()
}

/// All event timestamps in the fixture, chronologically ascending.
pub fn event_times() -> Vec<DateTime<FixedOffset>> {
    let mut times: Vec<_> = (2010..=2017).map(|year| at(year, 2, 14, 12)).collect();
    times.push(at(2015, 10, 17, 12));
    times.sort();
    times
}

/// Build the stores: one active account and one event per timestamp.
pub fn seeded_stores() -> (MemoryEventStore, MemoryDirectory) {
    let events = MemoryEventStore::new();
    let directory = MemoryDirectory::new();
    for (i, when) in event_times().into_iter().enumerate() {
        let id = UserId::new(i as i64 + 1);
        events.record_event(id, when).unwrap();
        directory.insert(Account::new(id, when, true));
    }
    (events, directory)
}
