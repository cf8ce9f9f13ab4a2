//! Trend fitting
//!
//! Least-squares line over a metric series and preparation of the line chart
//! handed to a [`ChartSink`].

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use super::ChartSink;
use crate::models::{MetricSeries, SeriesPoint, TrendPlot};

/// Degree-1 least-squares fit with x measured in days from `origin`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub origin: NaiveDate,
    /// Change in metric value per day
    pub slope: f64,
    /// Fitted value at `origin`
    pub intercept: f64,
}

impl LinearFit {
    pub fn value_at(&self, date: NaiveDate) -> f64 {
        let x = (date - self.origin).num_days() as f64;
        self.intercept + self.slope * x
    }
}

/// Fit a line through the series
///
/// Returns `None` with fewer than two distinct dates; the chart then shows
/// the raw series without a fit line.
pub fn fit_linear(points: &[SeriesPoint]) -> Option<LinearFit> {
    let origin = points.first()?.date;
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let xs: Vec<f64> = points
        .iter()
        .map(|p| (p.date - origin).num_days() as f64)
        .collect();
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.value).sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (x, p) in xs.iter().zip(points) {
        sxx += (x - mean_x).powi(2);
        sxy += (x - mean_x) * (p.value - mean_y);
    }

    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    Some(LinearFit {
        origin,
        slope,
        intercept: mean_y - slope * mean_x,
    })
}

/// Line chart inputs for a series; `None` when there is nothing to draw
pub fn trend_plot(series: &MetricSeries) -> Option<TrendPlot> {
    if series.is_empty() {
        return None;
    }

    let metric_name = series.metric.display_name();
    let fit = fit_linear(&series.points).map(|fit| {
        series
            .points
            .iter()
            .map(|p| SeriesPoint {
                date: p.date,
                value: fit.value_at(p.date),
            })
            .collect()
    });

    Some(TrendPlot {
        title: format!("{} {} Over Time", series.exercise_name, metric_name),
        legend: format!("{} {}", series.exercise_name, metric_name),
        x_label: "Date".to_string(),
        y_label: metric_name.to_string(),
        points: series.points.clone(),
        fit,
    })
}

/// Hand the series and its fit to the chart collaborator
///
/// Returns `Ok(false)` without calling the sink for an empty series.
pub fn render<S: ChartSink + ?Sized>(series: &MetricSeries, sink: &mut S) -> Result<bool, S::Error> {
    match trend_plot(series) {
        Some(plot) => {
            if plot.fit.is_none() {
                debug!(exercise = %series.exercise_name, "Single data point; skipping fit line");
            }
            sink.line_chart(&plot)?;
            Ok(true)
        }
        None => {
            debug!(exercise = %series.exercise_name, "No data; no chart produced");
            Ok(false)
        }
    }
}
