//! Per-set metric functions
//!
//! Pure computations over weight, reps and sets. `evaluate` applies a
//! [`Metric`] column-wise to a group of records in row order.

use crate::models::{Metric, WorkoutRecord};

/// Coefficient of the Epley-style one-rep-max estimate
pub const EPLEY_COEFFICIENT: f64 = 0.0333;

/// Weight moved in a single set
pub fn best_set(weight: f64, reps: f64) -> f64 {
    weight * reps
}

/// Weight moved across all sets of an entry
pub fn total_volume(weight: f64, reps: f64, sets: f64) -> f64 {
    weight * reps * sets
}

/// Estimated one-rep max: `w * (1 + 0.0333 * r)`
pub fn one_rep_max(weight: f64, reps: f64) -> f64 {
    weight * (1.0 + EPLEY_COEFFICIENT * reps)
}

/// Streak marker for rows that hit a single rep
///
/// A new streak starts at position 0 and wherever `reps[i] != reps[i-1] + 1`.
/// The value at `i` is the running streak count when `reps[i] == 1`, else 0.
pub fn max_consecutive_reps(reps: &[f64]) -> Vec<f64> {
    let mut streak_id = 0u64;
    let mut prev: Option<f64> = None;

    reps.iter()
        .map(|&r| {
            let continues = matches!(prev, Some(p) if r - p == 1.0);
            if !continues {
                streak_id += 1;
            }
            prev = Some(r);

            if r == 1.0 {
                streak_id as f64
            } else {
                0.0
            }
        })
        .collect()
}

/// Apply `metric` to each record, in order
///
/// Yields `None` where a field the metric needs is missing.
pub fn evaluate(metric: Metric, rows: &[&WorkoutRecord]) -> Vec<Option<f64>> {
    match metric {
        Metric::BestSet => rows
            .iter()
            .map(|r| Some(best_set(r.weight?, r.reps?)))
            .collect(),
        Metric::TotalVolume => rows
            .iter()
            .map(|r| Some(total_volume(r.weight?, r.reps?, r.sets?)))
            .collect(),
        Metric::OneRepMax => rows
            .iter()
            .map(|r| Some(one_rep_max(r.weight?, r.reps?)))
            .collect(),
        Metric::MaxConsecutiveReps => {
            // NaN never equals prev + 1 nor 1, so missing reps break the streak
            let reps: Vec<f64> = rows.iter().map(|r| r.reps.unwrap_or(f64::NAN)).collect();
            max_consecutive_reps(&reps)
                .into_iter()
                .zip(rows)
                .map(|(value, row)| row.reps.map(|_| value))
                .collect()
        }
    }
}
