//! austat - report user activity statistics from seen events
//!
//! This library provides functionality to:
//! - Record user-seen events with rate limiting and duplicate detection
//! - Enumerate day/month/quarter/year periods anchored to a customer's
//!   subscription start or aligned to calendar months
//! - Count registered, activated, and active users for each period
//! - Render reports as tables, CSV, or JSON
//!
//! The calendar arithmetic and period enumeration live in the `austat-core`
//! crate and are re-exported here.
//!
//! # Examples
//!
//! ```no_run
//! use austat::{
//!     cli::parse_date,
//!     data_loader::DataLoader,
//!     reports::Reporter,
//! };
//! use std::path::PathBuf;
//!
//! fn main() -> austat::Result<()> {
//!     let loader = DataLoader::new(
//!         Some(PathBuf::from("events.jsonl")),
//!         Some(PathBuf::from("accounts.jsonl")),
//!     );
//!     let (events, directory) = loader.load()?;
//!
//!     let reporter = Reporter::new(&events, &directory);
//!     let anchor = parse_date("2010-01-24T22:00:00+00:00")?;
//!     for record in reporter.customer_monthly_usage(anchor, None, None) {
//!         let record = record?;
//!         println!("{}: {} active", record.period, record.usage.active);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod data_loader;
pub mod memory;
pub mod output;
pub mod recorder;
pub mod reports;

// Re-export the core crate's modules and commonly used types
pub use austat_core::{calendar, labels, periods, store, types};
pub use austat_core::{AustatError, PeriodLabels, Result, Span, UsageCounts, UsageRecord, UserId, UserRef};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
