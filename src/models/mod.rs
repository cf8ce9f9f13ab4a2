//! Data models
//!
//! Cleaned workout records and the series derived from them.

mod metric;
mod record;
mod series;

pub use metric::{Metric, UnknownMetric};
pub use record::{
    WorkoutRecord, COL_DATE, COL_EXERCISE_NAME, COL_NOTES, COL_REPS, COL_SETS, COL_WEIGHT,
    COL_WORKOUT_NAME, REQUIRED_COLUMNS,
};
pub use series::{FrequencyPlot, MetricSeries, SeriesPoint, TrendPlot, WeeklyCount};
