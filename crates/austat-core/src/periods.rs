//! Period enumeration
//!
//! Lazy, finite iterators of contiguous [`Span`]s covering `[start, end)`
//! at day, month, quarter, or year granularity. Consecutive spans always
//! satisfy `spans[i].end == spans[i+1].start`, their union is exactly
//! `[start, end)`, and no span is ever empty. When `start >= end` every
//! enumerator yields nothing.
//!
//! Month-derived granularities anchor on `start`'s day-of-month: a start
//! on the 31st rolls through shorter months on their last day and returns
//! to the 31st when the month supports it (see [`crate::calendar`]).
//! Quarters and years are built by merging months three or twelve at a
//! time; the final group absorbs whatever months remain, even just one.

use crate::calendar::shift_months_clamped;
use crate::types::Span;
use chrono::{DateTime, Datelike, FixedOffset, TimeDelta};

/// Spans of exactly 24 hours, aligned to `start`'s time-of-day
///
/// The final span's end is clamped to `end` and may be shorter than a
/// full day.
pub fn iter_days(
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
) -> impl Iterator<Item = Span> {
    let mut cursor = start;
    std::iter::from_fn(move || {
        if cursor >= end {
            return None;
        }
        let next = (cursor + TimeDelta::hours(24)).min(end);
        let span = Span::new(cursor, next);
        cursor = next;
        Some(span)
    })
}

/// One span per month, anchored to `start`'s day and time
///
/// The first span starts at `start` exactly (no normalization); each
/// boundary is one month later with the day clamped toward `start.day()`;
/// the final span's end is clamped to `end`.
///
/// # Examples
/// ```
/// use austat_core::periods::iter_months;
/// use chrono::DateTime;
///
/// let start = DateTime::parse_from_rfc3339("2015-12-31T01:02:03+00:00").unwrap();
/// let end = DateTime::parse_from_rfc3339("2016-03-15T00:00:00+00:00").unwrap();
/// let boundaries: Vec<String> = iter_months(start, end)
///     .map(|span| span.start.to_rfc3339())
///     .collect();
///
/// // the leap year clamps Feb to the 29th, not the 31st
/// assert_eq!(boundaries[2], "2016-02-29T01:02:03+00:00");
/// ```
pub fn iter_months(
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
) -> impl Iterator<Item = Span> {
    let preferred_day = start.day();
    let mut cursor = start;
    std::iter::from_fn(move || {
        if cursor >= end {
            return None;
        }
        let next = shift_months_clamped(cursor, preferred_day, 1).min(end);
        let span = Span::new(cursor, next);
        cursor = next;
        Some(span)
    })
}

/// Months merged three at a time
///
/// The final quarter absorbs a partial group smaller than three months
/// rather than dropping it.
pub fn iter_quarters(
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
) -> impl Iterator<Item = Span> {
    merge_spans(iter_months(start, end), 3)
}

/// Months merged twelve at a time, with the same partial-group rule as
/// [`iter_quarters`]
pub fn iter_years(
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
) -> impl Iterator<Item = Span> {
    merge_spans(iter_months(start, end), 12)
}

/// Merge consecutive spans into groups of `size`, keeping the first
/// span's start and the last available span's end.
fn merge_spans(
    mut spans: impl Iterator<Item = Span>,
    size: usize,
) -> impl Iterator<Item = Span> {
    std::iter::from_fn(move || {
        let mut merged = spans.next()?;
        for _ in 1..size {
            match spans.next() {
                Some(next) => merged.end = next.end,
                None => break,
            }
        }
        Some(merged)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    /// Build the expected span list from consecutive boundary instants.
    fn spans_of(boundaries: &[DateTime<FixedOffset>]) -> Vec<Span> {
        boundaries
            .windows(2)
            .map(|pair| Span::new(pair[0], pair[1]))
            .collect()
    }

    #[test]
    fn test_iter_days() {
        let start = dt("2017-03-29T01:02:03+00:00");
        let end = dt("2017-04-07T11:22:33+00:00");

        let days: Vec<Span> = iter_days(start, end).collect();

        let mut boundaries: Vec<DateTime<FixedOffset>> = [
            "2017-03-29",
            "2017-03-30",
            "2017-03-31",
            "2017-04-01",
            "2017-04-02",
            "2017-04-03",
            "2017-04-04",
            "2017-04-05",
            "2017-04-06",
            "2017-04-07",
        ]
        .iter()
        .map(|day| dt(&format!("{day}T01:02:03+00:00")))
        .collect();
        boundaries.push(end);

        assert_eq!(days, spans_of(&boundaries));
    }

    #[test]
    fn test_iter_months_day_drift_and_leap() {
        let start = dt("2015-12-31T01:02:03+00:00");
        let end = dt("2018-06-10T11:22:33+00:00");

        let months: Vec<Span> = iter_months(start, end).collect();

        let mut boundaries: Vec<DateTime<FixedOffset>> = [
            "2015-12-31",
            "2016-01-31",
            "2016-02-29", // leap!
            "2016-03-31",
            "2016-04-30",
            "2016-05-31",
            "2016-06-30",
            "2016-07-31",
            "2016-08-31",
            "2016-09-30",
            "2016-10-31",
            "2016-11-30",
            "2016-12-31",
            "2017-01-31",
            "2017-02-28",
            "2017-03-31",
            "2017-04-30",
            "2017-05-31",
            "2017-06-30",
            "2017-07-31",
            "2017-08-31",
            "2017-09-30",
            "2017-10-31",
            "2017-11-30",
            "2017-12-31",
            "2018-01-31",
            "2018-02-28",
            "2018-03-31",
            "2018-04-30",
            "2018-05-31",
        ]
        .iter()
        .map(|day| dt(&format!("{day}T01:02:03+00:00")))
        .collect();
        boundaries.push(end);

        assert_eq!(months, spans_of(&boundaries));
    }

    #[test]
    fn test_iter_quarters() {
        let start = dt("2015-11-30T01:02:03+00:00");
        let end = dt("2017-02-28T11:22:33+00:00");

        let quarters: Vec<Span> = iter_quarters(start, end).collect();

        let mut boundaries: Vec<DateTime<FixedOffset>> = [
            "2015-11-30",
            "2016-02-29", // leap!
            "2016-05-30",
            "2016-08-30",
            "2016-11-30",
            "2017-02-28",
        ]
        .iter()
        .map(|day| dt(&format!("{day}T01:02:03+00:00")))
        .collect();
        boundaries.push(end);

        assert_eq!(quarters, spans_of(&boundaries));
    }

    #[test]
    fn test_iter_quarters_partial_final_group() {
        // four months of data: one full quarter plus a single month that
        // must become its own (short) quarter without losing any days
        let start = dt("2017-01-15T00:00:00+00:00");
        let end = dt("2017-05-15T00:00:00+00:00");

        let quarters: Vec<Span> = iter_quarters(start, end).collect();

        assert_eq!(
            quarters,
            vec![
                Span::new(start, dt("2017-04-15T00:00:00+00:00")),
                Span::new(dt("2017-04-15T00:00:00+00:00"), end),
            ]
        );
    }

    #[test]
    fn test_iter_years() {
        let start = dt("2016-02-29T01:02:03+00:00");
        let end = dt("2019-02-28T11:22:33+00:00");

        let years: Vec<Span> = iter_years(start, end).collect();

        let mut boundaries: Vec<DateTime<FixedOffset>> = [
            "2016-02-29", // leap!
            "2017-02-28",
            "2018-02-28",
            "2019-02-28",
        ]
        .iter()
        .map(|day| dt(&format!("{day}T01:02:03+00:00")))
        .collect();
        boundaries.push(end);

        assert_eq!(years, spans_of(&boundaries));
    }

    #[test]
    fn test_empty_when_start_not_before_end() {
        let at = dt("2013-02-14T12:00:00+00:00");
        let later = dt("2013-03-14T12:00:00+00:00");

        assert_eq!(iter_days(at, at).count(), 0);
        assert_eq!(iter_months(at, at).count(), 0);
        assert_eq!(iter_quarters(at, at).count(), 0);
        assert_eq!(iter_years(at, at).count(), 0);
        assert_eq!(iter_months(later, at).count(), 0);
    }

    #[test]
    fn test_contiguity_and_union() {
        let start = dt("2015-12-31T01:02:03+00:00");
        let end = dt("2018-06-10T11:22:33+00:00");

        for spans in [
            iter_days(start, end).collect::<Vec<_>>(),
            iter_months(start, end).collect::<Vec<_>>(),
            iter_quarters(start, end).collect::<Vec<_>>(),
            iter_years(start, end).collect::<Vec<_>>(),
        ] {
            assert_eq!(spans.first().map(|s| s.start), Some(start));
            assert_eq!(spans.last().map(|s| s.end), Some(end));
            for pair in spans.windows(2) {
                assert_eq!(pair[0].end, pair[1].start);
            }
            assert!(spans.iter().all(|s| !s.is_empty()));
        }
    }
}
