//! Weekly workout frequency
//!
//! Weeks run Monday through Sunday and are keyed by their Sunday. The window
//! spans `last_x_weeks` whole weeks ending with the week of the latest record.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Duration, NaiveDate};
use tracing::debug;

use super::ChartSink;
use crate::models::{FrequencyPlot, WeeklyCount, WorkoutRecord};

/// Sunday closing the week that contains `date`
pub fn week_end(date: NaiveDate) -> NaiveDate {
    let days_left = 6 - date.weekday().num_days_from_monday();
    date + Duration::days(i64::from(days_left))
}

/// Monday opening the week that contains `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Inclusive date range covered by the last `weeks` weeks up to `end_date`
pub fn window(end_date: NaiveDate, weeks: u32) -> (NaiveDate, NaiveDate) {
    let back = Duration::days(i64::from(weeks.saturating_sub(1)) * 7);
    let start = week_start(end_date)
        .checked_sub_signed(back)
        .unwrap_or(NaiveDate::MIN);
    (start, end_date)
}

/// Distinct workouts per week within the trailing window
///
/// Buckets run from the first week holding any record through the week of
/// the latest record; weeks without workouts in between count as 0.
pub fn weekly_counts(records: &[WorkoutRecord], last_x_weeks: u32) -> Vec<WeeklyCount> {
    if last_x_weeks == 0 {
        return Vec::new();
    }
    let Some(end_date) = records.iter().map(|r| r.date).max() else {
        return Vec::new();
    };
    let (start_date, end_date) = window(end_date, last_x_weeks);

    let mut weeks: BTreeMap<NaiveDate, BTreeSet<&str>> = BTreeMap::new();
    for record in records
        .iter()
        .filter(|r| r.date >= start_date && r.date <= end_date)
    {
        let names = weeks.entry(week_end(record.date)).or_default();
        if !record.workout_name.is_empty() {
            names.insert(record.workout_name.as_str());
        }
    }

    let (Some(&first), Some(&last)) = (weeks.keys().next(), weeks.keys().next_back()) else {
        return Vec::new();
    };

    let mut counts = Vec::new();
    let mut week = first;
    while week <= last {
        counts.push(WeeklyCount {
            week_end: week,
            workouts: weeks.get(&week).map_or(0, BTreeSet::len),
        });
        week += Duration::days(7);
    }

    debug!(
        start = %start_date,
        end = %end_date,
        weeks = counts.len(),
        "Counted workouts per week"
    );
    counts
}

/// Bar chart inputs; `None` when there are no records
pub fn frequency_plot(records: &[WorkoutRecord], last_x_weeks: u32) -> Option<FrequencyPlot> {
    let weeks = weekly_counts(records, last_x_weeks);
    if weeks.is_empty() {
        return None;
    }

    Some(FrequencyPlot {
        title: format!("Workouts Per Week for the Last {} Weeks", last_x_weeks),
        x_label: "Week".to_string(),
        y_label: "Number of Workouts".to_string(),
        weeks,
    })
}

/// Hand the weekly counts to the chart collaborator
pub fn render<S: ChartSink + ?Sized>(
    records: &[WorkoutRecord],
    last_x_weeks: u32,
    sink: &mut S,
) -> Result<bool, S::Error> {
    match frequency_plot(records, last_x_weeks) {
        Some(plot) => {
            sink.bar_chart(&plot)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::RecordingSink;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rec(date: NaiveDate, workout: &str) -> WorkoutRecord {
        WorkoutRecord::new(date, workout, "Squat", 100.0, 5.0, 3.0)
    }

    #[test]
    fn test_week_boundaries() {
        // 2023-06-07 is a Wednesday
        assert_eq!(week_start(date(2023, 6, 7)), date(2023, 6, 5));
        assert_eq!(week_end(date(2023, 6, 7)), date(2023, 6, 11));
        // Sunday closes its own week, Monday opens the next
        assert_eq!(week_end(date(2023, 6, 11)), date(2023, 6, 11));
        assert_eq!(week_end(date(2023, 6, 12)), date(2023, 6, 18));
    }

    #[test]
    fn test_counts_distinct_workouts() {
        let records = vec![
            rec(date(2023, 6, 5), "Push"),
            rec(date(2023, 6, 5), "Push"),
            rec(date(2023, 6, 7), "Pull"),
            rec(date(2023, 6, 9), "Push"),
            rec(date(2023, 6, 12), "Legs"),
        ];
        let counts = weekly_counts(&records, 4);
        assert_eq!(
            counts,
            vec![
                WeeklyCount { week_end: date(2023, 6, 11), workouts: 2 },
                WeeklyCount { week_end: date(2023, 6, 18), workouts: 1 },
            ]
        );
    }

    #[test]
    fn test_window_limits_bucket_count() {
        // Three workouts a week for 10 weeks, ending on a Wednesday
        let end = date(2023, 6, 7);
        let records: Vec<_> = (0..70)
            .step_by(2)
            .map(|i| rec(end - Duration::days(i), if i % 4 == 0 { "A" } else { "B" }))
            .collect();

        let counts = weekly_counts(&records, 5);
        assert_eq!(counts.len(), 5);
        assert_eq!(counts.last().unwrap().week_end, date(2023, 6, 11));

        let (start, stop) = window(end, 5);
        assert!(start >= end - Duration::weeks(5));
        assert_eq!(stop, end);
        for pair in counts.windows(2) {
            assert_eq!(pair[1].week_end - pair[0].week_end, Duration::days(7));
        }
    }

    #[test]
    fn test_empty_weeks_inside_window_are_zero() {
        let records = vec![rec(date(2023, 6, 1), "A"), rec(date(2023, 6, 20), "B")];
        let counts = weekly_counts(&records, 6);
        let workouts: Vec<_> = counts.iter().map(|c| c.workouts).collect();
        assert_eq!(workouts, vec![1, 0, 0, 1]);
    }

    #[test]
    fn test_sparse_data_gives_fewer_buckets() {
        let records = vec![rec(date(2023, 6, 7), "A")];
        assert_eq!(weekly_counts(&records, 5).len(), 1);
    }

    #[test]
    fn test_window_wider_than_calendar_starts_at_min_date() {
        let (start, end) = window(date(2023, 6, 7), 20_000_000);
        assert_eq!(start, NaiveDate::MIN);
        assert_eq!(end, date(2023, 6, 7));

        let records = vec![rec(date(2023, 6, 7), "A")];
        let counts = weekly_counts(&records, 20_000_000);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].workouts, 1);
    }

    #[test]
    fn test_unnamed_workouts_are_not_counted() {
        let records = vec![rec(date(2023, 6, 7), ""), rec(date(2023, 6, 8), "A")];
        assert_eq!(weekly_counts(&records, 1)[0].workouts, 1);
    }

    #[test]
    fn test_no_records_no_chart() {
        let mut sink = RecordingSink::default();
        assert!(!render(&[], 5, &mut sink).unwrap());
        assert!(sink.bars.is_empty());
        assert!(weekly_counts(&[rec(date(2023, 6, 7), "A")], 0).is_empty());
    }

    #[test]
    fn test_render_bar_chart() {
        let records = vec![rec(date(2023, 6, 7), "A")];
        let mut sink = RecordingSink::default();
        assert!(render(&records, 5, &mut sink).unwrap());
        assert_eq!(sink.bars[0].title, "Workouts Per Week for the Last 5 Weeks");
        assert_eq!(sink.bars[0].x_label, "Week");
        assert_eq!(sink.bars[0].y_label, "Number of Workouts");
    }
}
