//! Property-based tests for austat using proptest

use austat::calendar::{nearest_day_of_month, shift_months};
use austat::labels::{month_ordinal, month_to_month, month_to_year, quarter_to_quarter, quarter_to_year};
use austat::periods::{iter_days, iter_months, iter_quarters, iter_years};
use austat::types::Span;
use chrono::{DateTime, Datelike, FixedOffset, TimeDelta, TimeZone};
use proptest::prelude::*;

// Strategies for generating test data

prop_compose! {
    fn arb_instant()(
        year in 1990i32..2040,
        month in 1u32..=12,
        day in 1u32..=31,
        hour in 0u32..24,
        minute in 0u32..60,
        quarter_hours in -47i32..=48,
    ) -> DateTime<FixedOffset> {
        let offset = FixedOffset::east_opt(quarter_hours * 900).unwrap();
        let day = nearest_day_of_month(year, month, day);
        offset.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
    }
}

prop_compose! {
    fn arb_range()(
        start in arb_instant(),
        days in 1i64..1500,
        extra_minutes in 0i64..1440,
    ) -> (DateTime<FixedOffset>, DateTime<FixedOffset>) {
        let end = start + TimeDelta::days(days) + TimeDelta::minutes(extra_minutes);
        (start, end)
    }
}

fn assert_covers(spans: &[Span], start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) {
    assert_eq!(spans.first().map(|s| s.start), Some(start));
    assert_eq!(spans.last().map(|s| s.end), Some(end));
    for pair in spans.windows(2) {
        assert_eq!(pair[0].end, pair[1].start, "spans must be contiguous");
    }
    for span in spans {
        assert!(span.start < span.end, "no span may be empty");
    }
}

proptest! {
    #[test]
    fn prop_enumerators_cover_the_range_exactly((start, end) in arb_range()) {
        assert_covers(&iter_days(start, end).collect::<Vec<_>>(), start, end);
        assert_covers(&iter_months(start, end).collect::<Vec<_>>(), start, end);
        assert_covers(&iter_quarters(start, end).collect::<Vec<_>>(), start, end);
        assert_covers(&iter_years(start, end).collect::<Vec<_>>(), start, end);
    }

    #[test]
    fn prop_quarters_and_years_group_months((start, end) in arb_range()) {
        let months = iter_months(start, end).count();
        prop_assert_eq!(iter_quarters(start, end).count(), months.div_ceil(3));
        prop_assert_eq!(iter_years(start, end).count(), months.div_ceil(12));
    }

    #[test]
    fn prop_empty_when_start_not_before_end(start in arb_instant(), back in 0i64..1000) {
        let end = start - TimeDelta::hours(back);
        prop_assert_eq!(iter_days(start, end).count(), 0);
        prop_assert_eq!(iter_months(start, end).count(), 0);
        prop_assert_eq!(iter_quarters(start, end).count(), 0);
        prop_assert_eq!(iter_years(start, end).count(), 0);
    }

    #[test]
    fn prop_shift_months_round_trips_without_clamping(
        instant in arb_instant(),
        delta in prop::sample::select(vec![1i32, 2, 3, 11, 12, 13, 60, 127]),
    ) {
        // days 1..=28 exist in every month, so no clamping can occur and
        // the shift must invert exactly
        prop_assume!(instant.day() <= 28);
        let there = shift_months(instant, None, delta).unwrap();
        let back = shift_months(there, None, -delta).unwrap();
        prop_assert_eq!(back, instant);
    }

    #[test]
    fn prop_shift_months_preserves_time_and_offset(
        instant in arb_instant(),
        delta in prop::sample::select(vec![-127i32, -12, -1, 1, 12, 127]),
    ) {
        let shifted = shift_months(instant, None, delta).unwrap();
        prop_assert_eq!(shifted.time(), instant.time());
        prop_assert_eq!(shifted.offset(), instant.offset());
    }

    #[test]
    fn prop_nearest_day_is_idempotent(
        year in 1990i32..2040,
        month in 1u32..=12,
        day in 0u32..=40,
    ) {
        let once = nearest_day_of_month(year, month, day);
        prop_assert!((1..=31).contains(&once));
        prop_assert_eq!(nearest_day_of_month(year, month, once), once);
    }

    #[test]
    fn prop_month_ordinal_round_trips(m in 1u32..=10_000) {
        prop_assert_eq!(month_ordinal(month_to_year(m), month_to_month(m)), m);
    }

    #[test]
    fn prop_quarter_split_stays_in_range(q in 1u32..=10_000) {
        prop_assert!((1..=4).contains(&quarter_to_quarter(q)));
        prop_assert_eq!((quarter_to_year(q) - 1) * 4 + quarter_to_quarter(q), q);
    }
}
