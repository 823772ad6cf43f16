use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::document::has_text;
use crate::profile::models::EmploymentRecord;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmploymentSummary {
    pub current_employments: Vec<EmploymentRecord>,
    pub past_employments: Vec<EmploymentRecord>,
    pub total_experience: String,
}

/// Calendar-month delta; the day of month is ignored.
fn months_between(start: NaiveDate, end: NaiveDate) -> i32 {
    let years = end.year() - start.year();
    let months = end.month() as i32 - start.month() as i32;
    years * 12 + months
}

/// Months contributed by one record. Records without a usable span
/// contribute nothing.
fn record_months(record: &EmploymentRecord, today: NaiveDate) -> u32 {
    let Some(start) = record.start_date else {
        return 0;
    };
    let end = if record.is_current {
        today
    } else {
        match record.end_date {
            Some(end) => end,
            None => return 0,
        }
    };
    if start > end {
        return 0;
    }
    months_between(start, end).max(0) as u32
}

fn plural(n: u32, unit: &str) -> String {
    if n == 1 {
        format!("{n} {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

pub fn format_experience(total_months: u32) -> String {
    let years = total_months / 12;
    let months = total_months % 12;
    match (years, months) {
        (0, 0) => "0 months".to_string(),
        (0, m) => plural(m, "month"),
        (y, 0) => plural(y, "year"),
        (y, m) => format!("{} {}", plural(y, "year"), plural(m, "month")),
    }
}

/// Total experience as "X years Y months", evaluated against `today`.
///
/// A manual total on the first record wins over the computed one.
pub fn total_experience(records: &[EmploymentRecord], today: NaiveDate) -> String {
    if let Some(manual) = records
        .first()
        .and_then(|r| r.total_experience_manual.as_deref())
        .filter(|m| has_text(Some(*m)))
    {
        return manual.trim().to_string();
    }

    let total: u32 = records.iter().map(|r| record_months(r, today)).sum();
    format_experience(total)
}

pub fn employment_summary(records: &[EmploymentRecord], today: NaiveDate) -> EmploymentSummary {
    let (current_employments, past_employments): (Vec<_>, Vec<_>) =
        records.iter().cloned().partition(|r| r.is_current);
    EmploymentSummary {
        current_employments,
        past_employments,
        total_experience: total_experience(records, today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn past(start: NaiveDate, end: NaiveDate) -> EmploymentRecord {
        EmploymentRecord {
            start_date: Some(start),
            end_date: Some(end),
            ..Default::default()
        }
    }

    fn current(start: NaiveDate) -> EmploymentRecord {
        EmploymentRecord {
            start_date: Some(start),
            is_current: true,
            ..Default::default()
        }
    }

    fn today() -> NaiveDate {
        date(2023, 6, 1)
    }

    #[test]
    fn test_full_year() {
        let records = vec![past(date(2020, 1, 1), date(2021, 1, 1))];
        assert_eq!(total_experience(&records, today()), "1 year");
    }

    #[test]
    fn test_day_of_month_truncated() {
        let records = vec![past(date(2020, 1, 1), date(2020, 4, 15))];
        assert_eq!(total_experience(&records, today()), "3 months");
    }

    #[test]
    fn test_month_boundary_counts_as_full_month() {
        let records = vec![past(date(2020, 1, 31), date(2020, 2, 1))];
        assert_eq!(total_experience(&records, today()), "1 month");
    }

    #[test]
    fn test_current_job_runs_until_today() {
        let records = vec![current(date(2022, 6, 1))];
        assert_eq!(total_experience(&records, today()), "1 year");
    }

    #[test]
    fn test_start_after_end_contributes_nothing() {
        let records = vec![
            past(date(2021, 5, 1), date(2020, 1, 1)),
            past(date(2019, 1, 1), date(2019, 3, 1)),
        ];
        assert_eq!(total_experience(&records, today()), "2 months");
    }

    #[test]
    fn test_missing_dates_are_skipped() {
        let records = vec![
            EmploymentRecord {
                end_date: Some(date(2020, 1, 1)),
                ..Default::default()
            },
            EmploymentRecord {
                start_date: Some(date(2019, 1, 1)),
                ..Default::default()
            },
        ];
        assert_eq!(total_experience(&records, today()), "0 months");
    }

    #[test]
    fn test_years_and_months_sum_across_records() {
        let records = vec![
            past(date(2015, 3, 10), date(2017, 4, 2)),
            past(date(2017, 5, 1), date(2018, 10, 1)),
        ];
        // 25 + 17 = 42 months
        assert_eq!(total_experience(&records, today()), "3 years 6 months");
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(total_experience(&[], today()), "0 months");
    }

    #[test]
    fn test_pluralization() {
        assert_eq!(format_experience(0), "0 months");
        assert_eq!(format_experience(1), "1 month");
        assert_eq!(format_experience(2), "2 months");
        assert_eq!(format_experience(12), "1 year");
        assert_eq!(format_experience(24), "2 years");
        assert_eq!(format_experience(13), "1 year 1 month");
        assert_eq!(format_experience(26), "2 years 2 months");
    }

    #[test]
    fn test_manual_total_overrides() {
        let mut first = past(date(2020, 1, 1), date(2021, 1, 1));
        first.total_experience_manual = Some(" 4 years 2 months ".to_string());
        assert_eq!(total_experience(&[first], today()), "4 years 2 months");

        let mut blank = past(date(2020, 1, 1), date(2021, 1, 1));
        blank.total_experience_manual = Some("  ".to_string());
        assert_eq!(total_experience(&[blank], today()), "1 year");
    }

    #[test]
    fn test_unparsable_dates_in_document_are_skipped() {
        let records: Vec<EmploymentRecord> = serde_json::from_value(serde_json::json!([
            {"start_date": "not a date", "end_date": "2021-01-01"},
            {"start_date": "2020-01-01T00:00:00Z", "end_date": "2020-07-01", "is_current": null}
        ]))
        .unwrap();
        assert_eq!(total_experience(&records, today()), "6 months");
    }

    #[test]
    fn test_summary_splits_current_and_past() {
        let records = vec![
            current(date(2022, 6, 1)),
            past(date(2020, 1, 1), date(2021, 1, 1)),
        ];
        let summary = employment_summary(&records, today());
        assert_eq!(summary.current_employments.len(), 1);
        assert_eq!(summary.past_employments.len(), 1);
        assert_eq!(summary.total_experience, "2 years");
    }
}
