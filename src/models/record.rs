//! Workout record model
//!
//! One logged set from the workout log, after cleaning.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// CSV header for the session date
pub const COL_DATE: &str = "Date";
/// CSV header for the workout (session) label
pub const COL_WORKOUT_NAME: &str = "Workout Name";
/// CSV header for the exercise label
pub const COL_EXERCISE_NAME: &str = "Exercise Name";
/// CSV header for the load
pub const COL_WEIGHT: &str = "Weight";
/// CSV header for the repetitions
pub const COL_REPS: &str = "Reps";
/// CSV header for the set count
pub const COL_SETS: &str = "Sets";
/// CSV header for free-form notes
pub const COL_NOTES: &str = "Notes";

/// Columns every workout log must provide, in projection order
pub const REQUIRED_COLUMNS: [&str; 7] = [
    COL_DATE,
    COL_WORKOUT_NAME,
    COL_EXERCISE_NAME,
    COL_WEIGHT,
    COL_REPS,
    COL_SETS,
    COL_NOTES,
];

/// A single cleaned workout set
///
/// Numeric fields are only `None` when the whole column had no observed
/// value, so there was no median to impute from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub date: NaiveDate,
    pub workout_name: String,
    pub exercise_name: String,
    pub weight: Option<f64>,
    pub reps: Option<f64>,
    pub sets: Option<f64>,
    pub notes: Option<String>,
}

impl WorkoutRecord {
    /// Build a fully-populated record (mostly used by tests and fixtures)
    pub fn new(
        date: NaiveDate,
        workout_name: &str,
        exercise_name: &str,
        weight: f64,
        reps: f64,
        sets: f64,
    ) -> Self {
        Self {
            date,
            workout_name: workout_name.to_string(),
            exercise_name: exercise_name.to_string(),
            weight: Some(weight),
            reps: Some(reps),
            sets: Some(sets),
            notes: None,
        }
    }

    /// Weight and reps are both present
    pub fn has_load(&self) -> bool {
        self.weight.is_some() && self.reps.is_some()
    }
}
