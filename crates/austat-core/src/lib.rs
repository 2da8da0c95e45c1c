//! Core types, calendar arithmetic, and period enumeration for austat
//!
//! This crate is the pure heart of austat: strongly-typed domain values,
//! the calendar math that anchors billing periods to an arbitrary
//! subscription start, lazy period enumerators, period labeling, and the
//! trait seams to the external event store and user directory. It performs
//! no I/O of its own.

pub mod calendar;
pub mod error;
pub mod labels;
pub mod periods;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use error::{AustatError, Result};
pub use types::{PeriodLabels, Span, UsageCounts, UsageRecord, UserId, UserRef};
