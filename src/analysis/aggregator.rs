//! Exercise aggregation
//!
//! Groups records by exercise, filters by popularity and recency, and reduces
//! each exercise to one metric value per date.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::metrics;
use crate::models::{Metric, MetricSeries, SeriesPoint, WorkoutRecord};

/// Filters applied when building metric series
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesQuery {
    /// Only these exercises; `None` keeps every exercise
    pub exercises: Option<BTreeSet<String>>,
    /// Minimum number of logged rows for an exercise to be charted
    pub min_occurrences: usize,
    /// Keep only the last N days of each exercise; 0 disables the filter
    pub trailing_days: Option<u32>,
}

impl SeriesQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exercises<I, S>(mut self, exercises: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exercises = Some(exercises.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_min_occurrences(mut self, min_occurrences: usize) -> Self {
        self.min_occurrences = min_occurrences;
        self
    }

    pub fn with_trailing_days(mut self, days: u32) -> Self {
        self.trailing_days = Some(days);
        self
    }

    fn allows(&self, exercise_name: &str) -> bool {
        !exercise_name.is_empty()
            && self
                .exercises
                .as_ref()
                .map_or(true, |set| set.contains(exercise_name))
    }
}

/// Partition records by exercise, keeping row order within each group
pub fn group_by_exercise<'a>(
    records: &'a [WorkoutRecord],
    query: &SeriesQuery,
) -> BTreeMap<&'a str, Vec<&'a WorkoutRecord>> {
    let mut groups: BTreeMap<&str, Vec<&WorkoutRecord>> = BTreeMap::new();
    for record in records {
        if query.allows(&record.exercise_name) {
            groups
                .entry(record.exercise_name.as_str())
                .or_default()
                .push(record);
        }
    }

    groups.retain(|name, rows| {
        let keep = rows.len() >= query.min_occurrences;
        if !keep {
            debug!(
                exercise = %name,
                count = rows.len(),
                min = query.min_occurrences,
                "Skipping infrequent exercise"
            );
        }
        keep
    });
    groups
}

/// Reduce one exercise group to its per-date maximum metric values
pub fn reduce_group(
    exercise_name: &str,
    rows: &[&WorkoutRecord],
    metric: Metric,
    trailing_days: Option<u32>,
) -> MetricSeries {
    let total = rows.len();
    let mut rows: Vec<&WorkoutRecord> = rows.iter().copied().filter(|r| r.has_load()).collect();
    if rows.len() < total {
        warn!(
            exercise = %exercise_name,
            dropped = total - rows.len(),
            "Rows without weight or reps reached aggregation"
        );
    }

    if let Some(days) = trailing_days.filter(|d| *d > 0) {
        // A window reaching past the earliest representable date keeps every row
        let cutoff = rows
            .iter()
            .map(|r| r.date)
            .max()
            .and_then(|max_date| max_date.checked_sub_signed(Duration::days(i64::from(days))));
        if let Some(cutoff) = cutoff {
            rows.retain(|r| r.date >= cutoff);
        }
    }

    let values = metrics::evaluate(metric, &rows);

    let mut by_date: BTreeMap<_, f64> = BTreeMap::new();
    for (row, value) in rows.iter().zip(values) {
        let Some(value) = value else { continue };
        by_date
            .entry(row.date)
            .and_modify(|best| *best = best.max(value))
            .or_insert(value);
    }

    MetricSeries {
        exercise_name: exercise_name.to_string(),
        metric,
        points: by_date
            .into_iter()
            .map(|(date, value)| SeriesPoint { date, value })
            .collect(),
    }
}

/// Build one metric series per qualifying exercise
///
/// Exercises below `min_occurrences` or left without data after filtering
/// are omitted.
pub fn compute_series(
    records: &[WorkoutRecord],
    query: &SeriesQuery,
    metric: Metric,
) -> BTreeMap<String, MetricSeries> {
    let groups = group_by_exercise(records, query);

    let series: BTreeMap<String, MetricSeries> = groups
        .into_iter()
        .map(|(name, rows)| reduce_group(name, &rows, metric, query.trailing_days))
        .filter(|series| !series.is_empty())
        .map(|series| (series.exercise_name.clone(), series))
        .collect();

    debug!(metric = %metric, exercises = series.len(), "Computed metric series");
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 1).unwrap() + Duration::days(i64::from(n))
    }

    fn rec(n: u32, exercise: &str, weight: f64, reps: f64) -> WorkoutRecord {
        WorkoutRecord::new(day(n), "Workout", exercise, weight, reps, 3.0)
    }

    fn squat_and_curl() -> Vec<WorkoutRecord> {
        let mut records: Vec<_> = (0..12)
            .map(|i| rec(i, "Squat", 100.0 + f64::from(i), 5.0))
            .collect();
        records.push(rec(3, "Curl", 20.0, 10.0));
        records.push(rec(7, "Curl", 22.0, 10.0));
        records
    }

    #[test]
    fn test_min_occurrences_filters_exercises() {
        let query = SeriesQuery::new().with_min_occurrences(10);
        let series = compute_series(&squat_and_curl(), &query, Metric::OneRepMax);
        assert_eq!(series.keys().collect::<Vec<_>>(), vec!["Squat"]);
        assert_eq!(series["Squat"].len(), 12);
    }

    #[test]
    fn test_output_respects_occurrence_threshold() {
        let records = squat_and_curl();
        for min in [0, 2, 3, 12, 13] {
            let query = SeriesQuery::new().with_min_occurrences(min);
            for name in compute_series(&records, &query, Metric::BestSet).keys() {
                let count = records.iter().filter(|r| &r.exercise_name == name).count();
                assert!(count >= min);
            }
        }
    }

    #[test]
    fn test_same_date_reduces_to_max() {
        // 1RM of 100x6 = 119.98 and 120x4 = 135.984 -> max wins
        let records = vec![rec(0, "Bench", 100.0, 6.0), rec(0, "Bench", 120.0, 4.0)];
        let series = compute_series(&records, &SeriesQuery::new(), Metric::OneRepMax);
        let bench = &series["Bench"];
        assert_eq!(bench.len(), 1);
        assert!((bench.points[0].value - 120.0 * (1.0 + 0.0333 * 4.0)).abs() < 1e-9);
    }

    #[test]
    fn test_series_is_chronological() {
        let records = vec![
            rec(0, "Row", 50.0, 10.0),
            rec(2, "Row", 55.0, 8.0),
            rec(2, "Row", 40.0, 12.0),
            rec(5, "Row", 60.0, 5.0),
        ];
        let series = compute_series(&records, &SeriesQuery::new(), Metric::BestSet);
        let points = &series["Row"].points;
        assert_eq!(points.iter().map(|p| p.date).collect::<Vec<_>>(), vec![day(0), day(2), day(5)]);
        assert_eq!(points[1].value, 480.0);
    }

    #[test]
    fn test_trailing_days_uses_group_max_date() {
        let mut records: Vec<_> = (0..30).map(|i| rec(i, "Deadlift", 140.0, 3.0)).collect();
        // Another exercise with a later date must not shift the Deadlift window
        records.push(rec(60, "Press", 40.0, 5.0));

        let query = SeriesQuery::new().with_trailing_days(7);
        let series = compute_series(&records, &query, Metric::BestSet);
        let deadlift = &series["Deadlift"];
        assert_eq!(deadlift.points.first().map(|p| p.date), Some(day(22)));
        assert_eq!(deadlift.points.last().map(|p| p.date), Some(day(29)));
        assert_eq!(deadlift.len(), 8);
    }

    #[test]
    fn test_huge_trailing_window_keeps_everything() {
        let records: Vec<_> = (0..4).map(|i| rec(i, "Squat", 100.0, 5.0)).collect();
        let query = SeriesQuery::new().with_trailing_days(u32::MAX);
        let series = compute_series(&records, &query, Metric::BestSet);
        assert_eq!(series["Squat"].len(), 4);
    }

    #[test]
    fn test_zero_trailing_days_keeps_everything() {
        let records: Vec<_> = (0..5).map(|i| rec(i, "Squat", 100.0, 5.0)).collect();
        let query = SeriesQuery::new().with_trailing_days(0);
        assert_eq!(compute_series(&records, &query, Metric::BestSet)["Squat"].len(), 5);
    }

    #[test]
    fn test_exercise_filter() {
        let query = SeriesQuery::new().with_exercises(["Curl"]);
        let series = compute_series(&squat_and_curl(), &query, Metric::BestSet);
        assert_eq!(series.keys().collect::<Vec<_>>(), vec!["Curl"]);
    }

    #[test]
    fn test_rows_without_load_are_dropped() {
        let mut missing = rec(1, "Plank", 0.0, 0.0);
        missing.weight = None;
        missing.reps = None;
        let records = vec![missing, rec(2, "Squat", 100.0, 5.0)];

        // Plank passes the count filter but has no usable rows
        let series = compute_series(&records, &SeriesQuery::new(), Metric::OneRepMax);
        assert!(!series.contains_key("Plank"));
        assert!(series.contains_key("Squat"));
    }

    #[test]
    fn test_empty_input_gives_empty_map() {
        let series = compute_series(&[], &SeriesQuery::new().with_min_occurrences(1), Metric::BestSet);
        assert!(series.is_empty());
    }

    #[test]
    fn test_compute_series_is_deterministic() {
        let records = squat_and_curl();
        let query = SeriesQuery::new().with_min_occurrences(2).with_trailing_days(5);
        for metric in Metric::ALL {
            assert_eq!(
                compute_series(&records, &query, metric),
                compute_series(&records, &query, metric)
            );
        }
    }
}
