//! JSONL data loading
//!
//! Reads the flat-file inputs of the CLI: an events file with one
//! `{"user": 3, "when": "2017-02-14T12:00:00+00:00"}` object per line and
//! an accounts file with one `{"id": 3, "joined": "...", "active": true}`
//! object per line. Timestamps must carry an explicit UTC offset; lines
//! that fail to parse are skipped with a warning rather than aborting the
//! load, so one corrupt line does not hide an entire report.

use crate::memory::{Account, MemoryDirectory, MemoryEventStore};
use austat_core::error::Result;
use austat_core::store::EventStore;
use austat_core::types::UserId;
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct RawEvent {
    user: i64,
    when: String,
}

#[derive(Debug, Deserialize)]
struct RawAccount {
    id: i64,
    joined: String,
    active: bool,
}

/// Loader for the events and accounts JSONL files
///
/// Either path may be absent; the corresponding store is then left empty,
/// which is enough for reports that do not need it (an active-user count
/// reads no accounts, for example).
#[derive(Debug, Default)]
pub struct DataLoader {
    events_path: Option<PathBuf>,
    accounts_path: Option<PathBuf>,
}

impl DataLoader {
    pub fn new(events_path: Option<PathBuf>, accounts_path: Option<PathBuf>) -> Self {
        Self {
            events_path,
            accounts_path,
        }
    }

    /// Load both files into fresh in-memory stores.
    pub fn load(&self) -> Result<(MemoryEventStore, MemoryDirectory)> {
        let events = MemoryEventStore::new();
        if let Some(path) = &self.events_path {
            let loaded = load_events(path, &events)?;
            debug!(path = %path.display(), loaded, "loaded events");
        }

        let directory = MemoryDirectory::new();
        if let Some(path) = &self.accounts_path {
            let loaded = load_accounts(path, &directory)?;
            debug!(path = %path.display(), loaded, "loaded accounts");
        }

        Ok((events, directory))
    }
}

/// Load events from a JSONL file into `store`, returning how many were
/// stored.
pub fn load_events(path: &Path, store: &MemoryEventStore) -> Result<usize> {
    let reader = BufReader::new(File::open(path)?);
    let mut loaded = 0;
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let raw: RawEvent = match serde_json::from_str(&line) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %path.display(), line = number + 1, error = %e, "skipping malformed event");
                continue;
            }
        };
        let when = match parse_timestamp(&raw.when) {
            Some(when) => when,
            None => {
                warn!(
                    path = %path.display(),
                    line = number + 1,
                    when = %raw.when,
                    "skipping event without a valid offset-aware timestamp"
                );
                continue;
            }
        };
        store.record_event(UserId::new(raw.user), when)?;
        loaded += 1;
    }
    Ok(loaded)
}

/// Load accounts from a JSONL file into `directory`, returning how many
/// were stored.
pub fn load_accounts(path: &Path, directory: &MemoryDirectory) -> Result<usize> {
    let reader = BufReader::new(File::open(path)?);
    let mut loaded = 0;
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let raw: RawAccount = match serde_json::from_str(&line) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %path.display(), line = number + 1, error = %e, "skipping malformed account");
                continue;
            }
        };
        let joined = match parse_timestamp(&raw.joined) {
            Some(joined) => joined,
            None => {
                warn!(
                    path = %path.display(),
                    line = number + 1,
                    joined = %raw.joined,
                    "skipping account without a valid offset-aware timestamp"
                );
                continue;
            }
        };
        directory.insert(Account::new(UserId::new(raw.id), joined, raw.active));
        loaded += 1;
    }
    Ok(loaded)
}

/// Parse an RFC 3339 timestamp; naive timestamps are not accepted.
fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s).ok()
}
