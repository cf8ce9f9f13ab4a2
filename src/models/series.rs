//! Derived series models
//!
//! Per-exercise metric series, weekly workout counts and the plot inputs
//! handed to the chart collaborator.

use chrono::NaiveDate;
use serde::Serialize;

use super::Metric;

/// One reduced value per date for a single exercise
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricSeries {
    pub exercise_name: String,
    pub metric: Metric,
    /// Chronological, one entry per date
    pub points: Vec<SeriesPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl MetricSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

/// Distinct workouts in one Monday-Sunday week
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeeklyCount {
    /// Sunday that closes the week
    pub week_end: NaiveDate,
    pub workouts: usize,
}

/// Line chart input: raw series plus optional best-fit line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPlot {
    pub title: String,
    pub legend: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<SeriesPoint>,
    /// Fit evaluated at every series date; `None` when fewer than two points
    pub fit: Option<Vec<SeriesPoint>>,
}

/// Bar chart input: chronological weekly counts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyPlot {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub weeks: Vec<WeeklyCount>,
}
