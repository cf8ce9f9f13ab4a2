//! Workout analysis pipeline
//!
//! Loader -> aggregator (using the metric functions) -> trend renderer, and
//! loader -> frequency reporter. Rendering is delegated to a [`ChartSink`].

pub mod aggregator;
pub mod frequency;
pub mod loader;
pub mod metrics;
pub mod trend;

pub use aggregator::{compute_series, SeriesQuery};
pub use frequency::weekly_counts;
pub use loader::{load_records, parse_records, LoadError, LoadResult};
pub use metrics::{best_set, max_consecutive_reps, one_rep_max, total_volume};
pub use trend::{fit_linear, LinearFit};

use crate::models::{FrequencyPlot, TrendPlot};

/// Receives prepared plot inputs and owns all presentation
pub trait ChartSink {
    type Error;

    /// Per-date metric series with optional best-fit line
    fn line_chart(&mut self, plot: &TrendPlot) -> Result<(), Self::Error>;

    /// Weekly workout counts
    fn bar_chart(&mut self, plot: &FrequencyPlot) -> Result<(), Self::Error>;
}
