//! Calendar arithmetic for subscription-anchored periods
//!
//! Pure functions over `DateTime<FixedOffset>`: clamping a day-of-month to
//! what a month actually supports, shifting an instant by whole months,
//! and normalizing an instant to the start of a calendar month or to the
//! latest subscription-anchor boundary at or before it.
//!
//! The clamping rule is what keeps billing cycles contiguous when the
//! anchor day does not exist in shorter months: a subscription starting
//! Jan 31 rolls through Feb 28 (29 in a leap year) and returns to day 31
//! as soon as the month supports it, because every shift re-clamps from
//! the preferred day rather than from the previously clamped one.

use crate::error::{AustatError, Result};
use chrono::{DateTime, Datelike, FixedOffset, LocalResult, NaiveDate, NaiveTime, TimeZone};

/// Number of days in a given month
///
/// `month` must be in 1..=12.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    debug_assert!((1..=12).contains(&month), "month out of range: {month}");
    match month {
        4 | 6 | 9 | 11 => 30,
        // chrono knows the leap rule; Feb 29 parses only in leap years
        2 => {
            if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
                29
            } else {
                28
            }
        }
        _ => 31,
    }
}

/// Clamp `day` to the days available in `year`/`month`
///
/// Never errors; the result is always in 1..=days_in_month and the
/// function is idempotent.
///
/// # Examples
/// ```
/// use austat_core::calendar::nearest_day_of_month;
///
/// assert_eq!(nearest_day_of_month(2017, 2, 30), 28);
/// assert_eq!(nearest_day_of_month(2016, 2, 30), 29); // leap year
/// assert_eq!(nearest_day_of_month(2017, 1, 31), 31);
/// ```
pub fn nearest_day_of_month(year: i32, month: u32, day: u32) -> u32 {
    day.clamp(1, days_in_month(year, month))
}

/// Rebuild an instant on a new calendar date, keeping `template`'s
/// time-of-day and offset. The (year, month, day) triple must already be
/// valid.
fn on_date(template: DateTime<FixedOffset>, year: i32, month: u32, day: u32) -> DateTime<FixedOffset> {
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .expect("day was clamped to the month's length");
    match template.offset().from_local_datetime(&date.and_time(template.time())) {
        LocalResult::Single(out) => out,
        // a fixed offset maps every local time to exactly one instant
        _ => unreachable!("fixed offsets are unambiguous"),
    }
}

/// Shift an instant by whole months without the zero-delta check.
///
/// The month arithmetic is closed-form, so arbitrarily large deltas cost
/// the same as a single step. The day lands on
/// `nearest_day_of_month(new_year, new_month, preferred_day)`.
pub(crate) fn shift_months_clamped(
    dt: DateTime<FixedOffset>,
    preferred_day: u32,
    delta: i32,
) -> DateTime<FixedOffset> {
    let months = dt.year() as i64 * 12 + dt.month0() as i64 + delta as i64;
    let year = months.div_euclid(12) as i32;
    let month = months.rem_euclid(12) as u32 + 1;
    let day = nearest_day_of_month(year, month, preferred_day);
    on_date(dt, year, month, day)
}

/// Shift `dt` by `delta` whole months, forward or backward
///
/// The year carries correctly across the 12-month boundary in both
/// directions. The day-of-month becomes the nearest valid day to
/// `preferred_day` (or `dt`'s own day when `preferred_day` is `None`);
/// time-of-day and offset are preserved.
///
/// A zero `delta` is a contract violation and returns
/// [`AustatError::InvalidArgument`].
///
/// # Examples
/// ```
/// use austat_core::calendar::shift_months;
/// use chrono::DateTime;
///
/// let dt = DateTime::parse_from_rfc3339("2017-01-31T23:30:00+00:00").unwrap();
/// let next = shift_months(dt, None, 1).unwrap();
/// assert_eq!(next.to_rfc3339(), "2017-02-28T23:30:00+00:00");
///
/// // the preferred day survives clamping in later months
/// let back = shift_months(next, Some(31), 1).unwrap();
/// assert_eq!(back.to_rfc3339(), "2017-03-31T23:30:00+00:00");
/// ```
pub fn shift_months(
    dt: DateTime<FixedOffset>,
    preferred_day: Option<u32>,
    delta: i32,
) -> Result<DateTime<FixedOffset>> {
    if delta == 0 {
        return Err(AustatError::InvalidArgument(
            "month shift delta must be non-zero".to_string(),
        ));
    }
    Ok(shift_months_clamped(
        dt,
        preferred_day.unwrap_or_else(|| dt.day()),
        delta,
    ))
}

/// Normalize an instant to the start of its calendar month
///
/// Day becomes 1, time becomes 00:00:00, the offset is unchanged.
pub fn start_of_calendar_month(dt: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let date = NaiveDate::from_ymd_opt(dt.year(), dt.month(), 1)
        .expect("day 1 exists in every month");
    match dt.offset().from_local_datetime(&date.and_time(NaiveTime::MIN)) {
        LocalResult::Single(out) => out,
        _ => unreachable!("fixed offsets are unambiguous"),
    }
}

/// Latest anchor-aligned instant at or before `dt`
///
/// Builds a candidate in `dt`'s year and month using the anchor's day
/// (clamped to the month) and the anchor's time and offset. If that
/// candidate lands after `dt`, the correct boundary is one month earlier.
/// The result is the start of the subscription period containing `dt`.
pub fn adjust_to_subscription_anchor(
    dt: DateTime<FixedOffset>,
    anchor: DateTime<FixedOffset>,
) -> DateTime<FixedOffset> {
    let day = nearest_day_of_month(dt.year(), dt.month(), anchor.day());
    let candidate = on_date(anchor, dt.year(), dt.month(), day);
    if candidate > dt {
        shift_months_clamped(candidate, anchor.day(), -1)
    } else {
        candidate
    }
}
