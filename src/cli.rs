//! CLI interface for austat
//!
//! This module defines the command-line interface using clap: one
//! subcommand per report kind plus `record` for appending events, with
//! input paths and output controls shared globally.
//!
//! # Example
//!
//! ```bash
//! # Monthly usage anchored to a customer's subscription start
//! austat monthly --events events.jsonl --accounts accounts.jsonl \
//!     --subscription-start 2010-01-24T22:00:00+00:00
//!
//! # Calendar-aligned monthly usage as CSV
//! austat calendar --events events.jsonl --accounts accounts.jsonl --csv
//!
//! # Ad hoc active-user count for March 2017
//! austat active --events events.jsonl --after 2017-03-01 --before 2017-04-01
//! ```

use austat_core::error::{AustatError, Result};
use chrono::{DateTime, FixedOffset, NaiveDate};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Report registered, activated, and active user counts over time
#[derive(Parser, Debug, Clone)]
#[command(name = "austat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the events JSONL file (one {"user", "when"} object per line)
    #[arg(long, global = true, env = "AUSTAT_EVENTS")]
    pub events: Option<PathBuf>,

    /// Path to the accounts JSONL file (one {"id", "joined", "active"} object per line)
    #[arg(long, global = true, env = "AUSTAT_ACCOUNTS")]
    pub accounts: Option<PathBuf>,

    /// Output as CSV
    #[arg(long, global = true)]
    pub csv: bool,

    /// Output as JSON
    #[arg(long, global = true, conflicts_with = "csv")]
    pub json: bool,

    /// Show only the most recent NUM rows
    #[arg(long, value_name = "NUM", global = true)]
    pub recent: Option<usize>,

    /// List rows oldest first (default is most recent first)
    #[arg(long, global = true)]
    pub ascending: bool,

    /// strftime format for date columns
    #[arg(long, default_value = "%Y-%m-%d", global = true)]
    pub datefmt: String,

    /// Only warnings and errors
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Arguments shared by the subscription-anchored reports
#[derive(Args, Debug, Clone)]
pub struct AnchoredArgs {
    /// Customer's subscription start or last renewal (RFC 3339)
    #[arg(long, value_name = "DATE")]
    pub subscription_start: String,

    /// Hide periods ending at or before DATE
    #[arg(long, value_name = "DATE")]
    pub after: Option<String>,

    /// Stop enumerating periods at DATE (defaults to now)
    #[arg(long, value_name = "DATE")]
    pub before: Option<String>,
}

/// Arguments for the calendar-aligned report
#[derive(Args, Debug, Clone)]
pub struct CalendarArgs {
    /// Start of the report (defaults to the earliest recorded event)
    #[arg(long, value_name = "DATE")]
    pub after: Option<String>,

    /// End of the report (defaults to just past the latest recorded event)
    #[arg(long, value_name = "DATE")]
    pub before: Option<String>,

    /// Rejected: calendar reports cannot also be anchored to a subscription
    #[arg(long, value_name = "DATE", hide = true)]
    pub subscription_start: Option<String>,
}

/// Arguments for the ad hoc active-user count
#[derive(Args, Debug, Clone)]
pub struct ActiveArgs {
    /// Count events at or after DATE
    #[arg(long, value_name = "DATE")]
    pub after: Option<String>,

    /// Count events before DATE
    #[arg(long, value_name = "DATE")]
    pub before: Option<String>,
}

/// Arguments for recording a seen event
#[derive(Args, Debug, Clone)]
pub struct RecordArgs {
    /// Id of the user that was seen
    #[arg(long)]
    pub user: i64,

    /// When the user was seen (RFC 3339, defaults to now)
    #[arg(long, value_name = "DATE")]
    pub when: Option<String>,

    /// Store the event even if an identical one exists
    #[arg(long)]
    pub allow_duplicate: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Daily usage anchored to a customer's subscription start
    Daily(AnchoredArgs),
    /// Monthly usage anchored to a customer's subscription start
    Monthly(AnchoredArgs),
    /// Quarterly usage anchored to a customer's subscription start
    Quarterly(AnchoredArgs),
    /// Yearly usage anchored to a customer's subscription start
    Yearly(AnchoredArgs),
    /// Monthly usage aligned to calendar months
    Calendar(CalendarArgs),
    /// Count distinct active users in a date range
    Active(ActiveArgs),
    /// Record that a user was seen, appending to the events file
    Record(RecordArgs),
}

/// Parse a CLI date argument
///
/// Accepts a full RFC 3339 timestamp or a bare `YYYY-MM-DD`, which is
/// taken as UTC midnight. Anything else, including a naive date-time, is
/// an [`AustatError::InvalidDate`].
pub fn parse_date(s: &str) -> Result<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| AustatError::InvalidDate(s.to_string()))?;
        let utc = FixedOffset::east_opt(0)
            .ok_or_else(|| AustatError::InvalidDate(s.to_string()))?;
        return midnight
            .and_local_timezone(utc)
            .single()
            .ok_or_else(|| AustatError::InvalidDate(s.to_string()));
    }
    Err(AustatError::InvalidDate(format!(
        "expected an RFC 3339 timestamp or YYYY-MM-DD, got '{s}'"
    )))
}

/// Parse an optional CLI date argument.
pub fn parse_date_opt(s: Option<&str>) -> Result<Option<DateTime<FixedOffset>>> {
    s.map(parse_date).transpose()
}

impl CalendarArgs {
    /// Reject the subscription anchor: a report is aligned to the calendar
    /// or to a subscription, never both.
    pub fn validate(&self) -> Result<()> {
        if self.subscription_start.is_some() {
            return Err(AustatError::InvalidArgument(
                "calendar reports cannot take --subscription-start".to_string(),
            ));
        }
        Ok(())
    }
}
