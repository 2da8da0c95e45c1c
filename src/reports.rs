//! Usage reports
//!
//! This module turns enumerated periods into usage records: for each span
//! it asks the user directory for registered/activated totals as of the
//! span's end, asks the event store for the distinct active users inside
//! the span, and attaches period labels.
//!
//! Reports are pull-based lazy sequences. Nothing is computed until the
//! consumer asks for the next record, each record costs exactly one pair
//! of collaborator queries, and dropping the iterator part-way through is
//! always safe. Records are chronologically ascending.
//!
//! Two intentionally different default-start policies exist (do not unify
//! them): customer reports always enumerate from the subscription anchor
//! and use the requested start only to suppress display of early periods,
//! while the calendar report seeds its start from the earliest recorded
//! event when none is given.
//!
//! # Examples
//!
//! ```
//! use austat::memory::{Account, MemoryDirectory, MemoryEventStore};
//! use austat::reports::Reporter;
//! use austat::store::EventStore;
//! use austat::types::UserId;
//! use chrono::DateTime;
//!
//! # fn main() -> austat::Result<()> {
//! let events = MemoryEventStore::new();
//! let directory = MemoryDirectory::new();
//! let when = DateTime::parse_from_rfc3339("2017-02-14T12:00:00+00:00").unwrap();
//! events.record_event(UserId::new(1), when)?;
//! directory.insert(Account::new(UserId::new(1), when, true));
//!
//! let reporter = Reporter::new(&events, &directory);
//! for record in reporter.calendar_monthly_usage(None, None) {
//!     let record = record?;
//!     println!("{:?}: {} active", record.labels.calendar_year_month, record.usage.active);
//! }
//! # Ok(())
//! # }
//! ```

use austat_core::calendar::start_of_calendar_month;
use austat_core::error::Result;
use austat_core::periods::{iter_days, iter_months, iter_quarters, iter_years};
use austat_core::store::{EventStore, UserDirectory};
use austat_core::types::{PeriodLabels, Span, UsageCounts, UsageRecord};
use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use tracing::debug;

/// A lazy sequence of usage records
pub type UsageIter<'a> = Box<dyn Iterator<Item = Result<UsageRecord>> + 'a>;

/// Per-span usage aggregation
///
/// The default implementation queries the event store and user directory;
/// a custom implementation can be injected via
/// [`Reporter::with_usage_source`] to change how counts are produced
/// without touching the period enumeration or labeling.
pub trait UsageSource {
    /// Counts for one period.
    fn usage_for_span(&self, span: &Span) -> Result<UsageCounts>;
}

/// Default usage source: one directory query pair plus one event-store
/// query per span
pub struct StoreUsageSource<'a> {
    events: &'a dyn EventStore,
    directory: &'a dyn UserDirectory,
}

impl<'a> StoreUsageSource<'a> {
    pub fn new(events: &'a dyn EventStore, directory: &'a dyn UserDirectory) -> Self {
        Self { events, directory }
    }
}

impl UsageSource for StoreUsageSource<'_> {
    fn usage_for_span(&self, span: &Span) -> Result<UsageCounts> {
        // growth is attributed to the period in which it is observed at
        // period-end
        let registered = self.directory.count_joined_before(span.end)?;
        let activated = self.directory.count_active_joined_before(span.end)?;
        let active = self
            .events
            .count_distinct_users(Some(span.start), Some(span.end))?;
        Ok(UsageCounts {
            registered,
            activated,
            active,
        })
    }
}

/// Report façade over an event store and a user directory
///
/// Holds no cross-call state; every report invocation computes
/// independently, so concurrent invocations do not interfere.
pub struct Reporter<'a> {
    events: &'a dyn EventStore,
    source: Box<dyn UsageSource + 'a>,
    now: Option<DateTime<FixedOffset>>,
}

impl<'a> Reporter<'a> {
    /// Create a reporter with the default per-span aggregation
    pub fn new(events: &'a dyn EventStore, directory: &'a dyn UserDirectory) -> Self {
        Self {
            events,
            source: Box::new(StoreUsageSource::new(events, directory)),
            now: None,
        }
    }

    /// Replace the per-span aggregation
    pub fn with_usage_source(mut self, source: Box<dyn UsageSource + 'a>) -> Self {
        self.source = source;
        self
    }

    /// Pin the reporter's notion of "now" (used as the default end bound
    /// of customer reports); primarily for deterministic tests
    pub fn with_now(mut self, now: DateTime<FixedOffset>) -> Self {
        self.now = Some(now);
        self
    }

    fn now_or(&self, offset: &FixedOffset) -> DateTime<FixedOffset> {
        self.now
            .unwrap_or_else(|| Utc::now().with_timezone(offset))
    }

    /// Monthly usage anchored to a customer's subscription start
    ///
    /// Periods always enumerate from `subscription_start` so that each
    /// month's ordinal (and hence its `Y.. M..` label) is stable; `start`
    /// only suppresses the display of periods that end at or before it,
    /// and those suppressed periods still consume their ordinal.
    pub fn customer_monthly_usage(
        &self,
        subscription_start: DateTime<FixedOffset>,
        start: Option<DateTime<FixedOffset>>,
        end: Option<DateTime<FixedOffset>>,
    ) -> UsageIter<'_> {
        let display_start = start.unwrap_or(subscription_start);
        let end = end.unwrap_or_else(|| self.now_or(subscription_start.offset()));
        debug!(%subscription_start, %end, "enumerating monthly usage");
        self.anchored_usage(
            iter_months(subscription_start, end),
            display_start,
            PeriodLabels::for_month_ordinal,
        )
    }

    /// Quarterly usage anchored to a customer's subscription start
    pub fn customer_quarterly_usage(
        &self,
        subscription_start: DateTime<FixedOffset>,
        start: Option<DateTime<FixedOffset>>,
        end: Option<DateTime<FixedOffset>>,
    ) -> UsageIter<'_> {
        let display_start = start.unwrap_or(subscription_start);
        let end = end.unwrap_or_else(|| self.now_or(subscription_start.offset()));
        debug!(%subscription_start, %end, "enumerating quarterly usage");
        self.anchored_usage(
            iter_quarters(subscription_start, end),
            display_start,
            PeriodLabels::for_quarter_ordinal,
        )
    }

    /// Yearly usage anchored to a customer's subscription start
    pub fn customer_yearly_usage(
        &self,
        subscription_start: DateTime<FixedOffset>,
        start: Option<DateTime<FixedOffset>>,
        end: Option<DateTime<FixedOffset>>,
    ) -> UsageIter<'_> {
        let display_start = start.unwrap_or(subscription_start);
        let end = end.unwrap_or_else(|| self.now_or(subscription_start.offset()));
        debug!(%subscription_start, %end, "enumerating yearly usage");
        self.anchored_usage(
            iter_years(subscription_start, end),
            display_start,
            PeriodLabels::for_year_ordinal,
        )
    }

    /// Daily usage anchored to a customer's subscription start
    ///
    /// Labeling needs a month ordinal, so each month of
    /// [`Self::customer_monthly_usage`] is subdivided into days and every
    /// day reuses its month's labels. Display suppression therefore stays
    /// at month granularity, exactly like the monthly report.
    pub fn daily_usage<'s>(
        &'s self,
        subscription_start: DateTime<FixedOffset>,
        start: Option<DateTime<FixedOffset>>,
        end: Option<DateTime<FixedOffset>>,
    ) -> UsageIter<'s> {
        let monthly = self.customer_monthly_usage(subscription_start, start, end);
        Box::new(monthly.flat_map(move |record| {
            let days: UsageIter<'s> = match record {
                Err(e) => Box::new(std::iter::once(Err(e))),
                Ok(month) => {
                    let labels = month.labels;
                    Box::new(iter_days(month.period.start, month.period.end).map(
                        move |day| {
                            self.source.usage_for_span(&day).map(|usage| UsageRecord {
                                period: day,
                                usage,
                                labels: labels.clone(),
                            })
                        },
                    ))
                }
            };
            days
        }))
    }

    /// Monthly usage aligned to calendar months
    ///
    /// `start` defaults to the earliest recorded event and is normalized
    /// to the start of its calendar month; `end` defaults to one second
    /// after the latest recorded event so the boundary record is included
    /// under the exclusive-end rule. With no events and no explicit
    /// bounds the report is empty rather than an error.
    pub fn calendar_monthly_usage(
        &self,
        start: Option<DateTime<FixedOffset>>,
        end: Option<DateTime<FixedOffset>>,
    ) -> UsageIter<'_> {
        let start = match start {
            Some(start) => start,
            None => match self.events.earliest_event() {
                Ok(Some(earliest)) => earliest,
                Ok(None) => return Box::new(std::iter::empty()),
                Err(e) => return Box::new(std::iter::once(Err(e))),
            },
        };
        let start = start_of_calendar_month(start);
        let end = match end {
            Some(end) => end,
            None => match self.events.latest_event() {
                Ok(Some(latest)) => latest + TimeDelta::seconds(1),
                Ok(None) => return Box::new(std::iter::empty()),
                Err(e) => return Box::new(std::iter::once(Err(e))),
            },
        };
        debug!(%start, %end, "enumerating calendar-monthly usage");
        Box::new(iter_months(start, end).map(move |span| {
            self.source.usage_for_span(&span).map(|usage| UsageRecord {
                labels: PeriodLabels::for_calendar_month(&span.start),
                period: span,
                usage,
            })
        }))
    }

    /// Ad hoc total of distinct active users in a range
    ///
    /// Omitted bounds leave that side of the range open; equal bounds
    /// denote an empty interval and count zero.
    pub fn count_active_users(
        &self,
        start: Option<DateTime<FixedOffset>>,
        end: Option<DateTime<FixedOffset>>,
    ) -> Result<u64> {
        self.events.count_distinct_users(start, end)
    }

    /// Shared body of the anchored reports: assign ordinals from the
    /// anchor-based enumeration, suppress periods ending at or before the
    /// display start, and aggregate the rest.
    fn anchored_usage<'s, I, F>(
        &'s self,
        periods: I,
        display_start: DateTime<FixedOffset>,
        labels_for: F,
    ) -> UsageIter<'s>
    where
        I: Iterator<Item = Span> + 's,
        F: Fn(u32) -> PeriodLabels + 's,
    {
        Box::new(periods.enumerate().filter_map(move |(index, span)| {
            let ordinal = index as u32 + 1;
            if span.end <= display_start {
                // suppressed, but the ordinal is spent
                return None;
            }
            Some(self.source.usage_for_span(&span).map(|usage| UsageRecord {
                period: span,
                usage,
                labels: labels_for(ordinal),
            }))
        }))
    }
}
