//! Output formatting for austat
//!
//! Reports are rendered from a [`ReportTable`], an ordered set of rows
//! already shaped for display. The table knows nothing about output
//! syntax; formatters turn it into a pretty-printed table or CSV. JSON
//! output serializes the usage records directly and bypasses this module's
//! formatters.
//!
//! # Examples
//!
//! ```
//! use austat::output::{get_formatter, ReportTable};
//!
//! let table = ReportTable {
//!     headers: vec!["month", "active"],
//!     rows: vec![vec!["2017-02".to_string(), "1".to_string()]],
//! };
//!
//! let formatter = get_formatter(true);
//! assert_eq!(formatter.format_report(&table), "month,active\n2017-02,1\n");
//! ```

use austat_core::types::UsageRecord;
use prettytable::{Cell, Row, Table, format};

/// A report shaped for display: column headers plus stringified rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    /// Daily report: one row per day, dated by the day's end.
    pub fn daily(records: &[UsageRecord], datefmt: &str) -> Self {
        Self {
            headers: vec!["date", "registered", "activated", "active"],
            rows: records
                .iter()
                .map(|r| {
                    vec![
                        r.period.end.format(datefmt).to_string(),
                        r.usage.registered.to_string(),
                        r.usage.activated.to_string(),
                        r.usage.active.to_string(),
                    ]
                })
                .collect(),
        }
    }

    /// Monthly report labeled with relative year/month ordinals.
    pub fn monthly(records: &[UsageRecord], datefmt: &str) -> Self {
        Self::labeled("month", records, datefmt, |r| {
            r.labels.year_month.clone().unwrap_or_default()
        })
    }

    /// Quarterly report labeled with relative year/quarter ordinals.
    pub fn quarterly(records: &[UsageRecord], datefmt: &str) -> Self {
        Self::labeled("quarter", records, datefmt, |r| {
            r.labels.year_quarter.clone().unwrap_or_default()
        })
    }

    /// Yearly report labeled with relative year ordinals.
    pub fn yearly(records: &[UsageRecord], datefmt: &str) -> Self {
        Self::labeled("year", records, datefmt, |r| {
            r.labels.year.clone().unwrap_or_default()
        })
    }

    /// Calendar-aligned monthly report labeled `YYYY-MM`.
    pub fn calendar(records: &[UsageRecord], datefmt: &str) -> Self {
        Self::labeled("month", records, datefmt, |r| {
            r.labels.calendar_year_month.clone().unwrap_or_default()
        })
    }

    fn labeled<F>(label: &'static str, records: &[UsageRecord], datefmt: &str, label_of: F) -> Self
    where
        F: Fn(&UsageRecord) -> String,
    {
        Self {
            headers: vec![label, "start", "end", "registered", "activated", "active"],
            rows: records
                .iter()
                .map(|r| {
                    vec![
                        label_of(r),
                        r.period.start.format(datefmt).to_string(),
                        r.period.end.format(datefmt).to_string(),
                        r.usage.registered.to_string(),
                        r.usage.activated.to_string(),
                        r.usage.active.to_string(),
                    ]
                })
                .collect(),
        }
    }
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Render one report.
    fn format_report(&self, table: &ReportTable) -> String;
}

/// Human-readable table formatter
pub struct TableFormatter;

impl OutputFormatter for TableFormatter {
    fn format_report(&self, table: &ReportTable) -> String {
        let mut out = Table::new();
        out.set_format(*format::consts::FORMAT_NO_LINESEP_WITH_TITLE);
        out.set_titles(Row::new(
            table
                .headers
                .iter()
                .map(|h| Cell::new(h).style_spec("b"))
                .collect(),
        ));
        for row in &table.rows {
            out.add_row(Row::new(row.iter().map(|c| Cell::new(c)).collect()));
        }
        out.to_string()
    }
}

/// CSV formatter
pub struct CsvFormatter;

impl OutputFormatter for CsvFormatter {
    fn format_report(&self, table: &ReportTable) -> String {
        let mut out = String::new();
        out.push_str(&csv_line(table.headers.iter().map(|h| h.to_string())));
        for row in &table.rows {
            out.push_str(&csv_line(row.iter().cloned()));
        }
        out
    }
}

fn csv_line(fields: impl Iterator<Item = String>) -> String {
    let mut line = fields
        .map(|field| csv_escape(&field))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

/// Quote a field only when it contains a delimiter, a quote, or a newline.
fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Get the appropriate formatter for the requested output syntax
pub fn get_formatter(csv: bool) -> Box<dyn OutputFormatter> {
    if csv {
        Box::new(CsvFormatter)
    } else {
        Box::new(TableFormatter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use austat_core::types::{PeriodLabels, Span, UsageCounts};
    use chrono::DateTime;

    fn record() -> UsageRecord {
        UsageRecord {
            period: Span::new(
                DateTime::parse_from_rfc3339("2017-02-24T22:00:00+00:00").unwrap(),
                DateTime::parse_from_rfc3339("2017-03-24T22:00:00+00:00").unwrap(),
            ),
            usage: UsageCounts {
                registered: 10,
                activated: 8,
                active: 3,
            },
            labels: PeriodLabels::for_month_ordinal(2),
        }
    }

    #[test]
    fn test_monthly_table_shape() {
        let table = ReportTable::monthly(&[record()], "%Y-%m-%d");
        assert_eq!(
            table.headers,
            vec!["month", "start", "end", "registered", "activated", "active"]
        );
        assert_eq!(
            table.rows,
            vec![vec![
                "Y01 M02".to_string(),
                "2017-02-24".to_string(),
                "2017-03-24".to_string(),
                "10".to_string(),
                "8".to_string(),
                "3".to_string(),
            ]]
        );
    }

    #[test]
    fn test_daily_rows_are_dated_by_period_end() {
        let table = ReportTable::daily(&[record()], "%Y-%m-%d");
        assert_eq!(table.headers, vec!["date", "registered", "activated", "active"]);
        assert_eq!(table.rows[0][0], "2017-03-24");
    }

    #[test]
    fn test_datefmt_is_honored() {
        let table = ReportTable::monthly(&[record()], "%d/%m/%Y");
        assert_eq!(table.rows[0][1], "24/02/2017");
    }

    #[test]
    fn test_csv_output() {
        let table = ReportTable::monthly(&[record()], "%Y-%m-%d");
        let csv = CsvFormatter.format_report(&table);
        assert_eq!(
            csv,
            "month,start,end,registered,activated,active\n\
             Y01 M02,2017-02-24,2017-03-24,10,8,3\n"
        );
    }

    #[test]
    fn test_csv_escaping() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_table_output_contains_headers_and_values() {
        let table = ReportTable::monthly(&[record()], "%Y-%m-%d");
        let rendered = TableFormatter.format_report(&table);
        assert!(rendered.contains("month"));
        assert!(rendered.contains("Y01 M02"));
        assert!(rendered.contains("2017-02-24"));
    }
}
