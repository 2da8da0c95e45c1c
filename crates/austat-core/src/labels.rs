//! Period labeling
//!
//! Subscription-anchored reports label periods relative to the anchor:
//! every period generated from the anchor gets a 1-based ordinal, and the
//! relative year / month-in-year / quarter-in-year are derived from that
//! ordinal. Ordinals are assigned from the anchor itself, never from a
//! display-filtered start, so labels stay stable regardless of which
//! window is displayed.
//!
//! Calendar-aligned reports need no ordinal bookkeeping; their labels come
//! straight from the period's start instant.

use crate::types::PeriodLabels;
use chrono::{DateTime, Datelike, FixedOffset};

/// Relative year of a 1-based month ordinal
pub fn month_to_year(m: u32) -> u32 {
    (m - 1) / 12 + 1
}

/// Month-in-year of a 1-based month ordinal
pub fn month_to_month(m: u32) -> u32 {
    (m - 1) % 12 + 1
}

/// Quarter-in-year of a 1-based month ordinal
pub fn month_to_quarter(m: u32) -> u32 {
    ((m - 1) / 3) % 4 + 1
}

/// Relative year of a 1-based quarter ordinal
pub fn quarter_to_year(q: u32) -> u32 {
    (q - 1) / 4 + 1
}

/// Quarter-in-year of a 1-based quarter ordinal
pub fn quarter_to_quarter(q: u32) -> u32 {
    (q - 1) % 4 + 1
}

/// Inverse of the month-ordinal split: (year, month-in-year) back to the
/// ordinal
pub fn month_ordinal(year: u32, month_in_year: u32) -> u32 {
    (year - 1) * 12 + month_in_year
}

pub fn label_year_month(m: u32) -> String {
    format!("Y{:02} M{:02}", month_to_year(m), month_to_month(m))
}

pub fn label_year_quarter_of_month(m: u32) -> String {
    format!("Y{:02} Q{}", month_to_year(m), month_to_quarter(m))
}

pub fn label_year_quarter(q: u32) -> String {
    format!("Y{:02} Q{}", quarter_to_year(q), quarter_to_quarter(q))
}

pub fn label_year(y: u32) -> String {
    format!("Y{y:02}")
}

impl PeriodLabels {
    /// Labels for the `m`-th month (1-based) after a subscription anchor
    pub fn for_month_ordinal(m: u32) -> Self {
        Self {
            year_month: Some(label_year_month(m)),
            year_quarter: Some(label_year_quarter_of_month(m)),
            year: Some(label_year(month_to_year(m))),
            ..Default::default()
        }
    }

    /// Labels for the `q`-th quarter (1-based) after a subscription anchor
    pub fn for_quarter_ordinal(q: u32) -> Self {
        Self {
            year_quarter: Some(label_year_quarter(q)),
            year: Some(label_year(quarter_to_year(q))),
            ..Default::default()
        }
    }

    /// Labels for the `y`-th year (1-based) after a subscription anchor
    pub fn for_year_ordinal(y: u32) -> Self {
        Self {
            year: Some(label_year(y)),
            ..Default::default()
        }
    }

    /// Labels for a calendar-aligned period starting at `start`
    pub fn for_calendar_month(start: &DateTime<FixedOffset>) -> Self {
        Self {
            calendar_year_month: Some(start.format("%Y-%m").to_string()),
            calendar_year: Some(start.year()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_ordinal_labels() {
        assert_eq!(label_year_month(1), "Y01 M01");
        assert_eq!(label_year_month(12), "Y01 M12");
        assert_eq!(label_year_month(13), "Y02 M01");
        assert_eq!(label_year_month(87), "Y08 M03");
    }

    #[test]
    fn test_month_to_quarter() {
        assert_eq!(month_to_quarter(1), 1);
        assert_eq!(month_to_quarter(3), 1);
        assert_eq!(month_to_quarter(4), 2);
        assert_eq!(month_to_quarter(12), 4);
        assert_eq!(month_to_quarter(13), 1);
        // the 69th month after the anchor falls in Y06 Q3
        assert_eq!(label_year_quarter_of_month(69), "Y06 Q3");
    }

    #[test]
    fn test_quarter_ordinal_labels() {
        assert_eq!(label_year_quarter(1), "Y01 Q1");
        assert_eq!(label_year_quarter(4), "Y01 Q4");
        assert_eq!(label_year_quarter(5), "Y02 Q1");
        assert_eq!(label_year_quarter(23), "Y06 Q3");
    }

    #[test]
    fn test_year_label() {
        assert_eq!(label_year(1), "Y01");
        assert_eq!(label_year(10), "Y10");
    }

    #[test]
    fn test_month_ordinal_round_trip() {
        for m in 1..=240 {
            assert_eq!(month_ordinal(month_to_year(m), month_to_month(m)), m);
        }
    }

    #[test]
    fn test_calendar_labels() {
        let start = chrono::DateTime::parse_from_rfc3339("2017-03-01T00:00:00+00:00").unwrap();
        let labels = PeriodLabels::for_calendar_month(&start);
        assert_eq!(labels.calendar_year_month.as_deref(), Some("2017-03"));
        assert_eq!(labels.calendar_year, Some(2017));
        assert!(labels.year_month.is_none());
    }

    #[test]
    fn test_anchored_label_sets() {
        let monthly = PeriodLabels::for_month_ordinal(69);
        assert_eq!(monthly.year_month.as_deref(), Some("Y06 M09"));
        assert_eq!(monthly.year_quarter.as_deref(), Some("Y06 Q3"));
        assert_eq!(monthly.year.as_deref(), Some("Y06"));

        let quarterly = PeriodLabels::for_quarter_ordinal(23);
        assert_eq!(quarterly.year_quarter.as_deref(), Some("Y06 Q3"));
        assert_eq!(quarterly.year.as_deref(), Some("Y06"));
        assert!(quarterly.year_month.is_none());

        let yearly = PeriodLabels::for_year_ordinal(6);
        assert_eq!(yearly.year.as_deref(), Some("Y06"));
        assert!(yearly.year_quarter.is_none());
    }
}
