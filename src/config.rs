//! Analysis configuration
//!
//! Defaults match a plain run over `example_data.csv`: one-rep-max trends
//! for every exercise plus workouts per week over the last five weeks.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::SeriesQuery;
use crate::models::Metric;

/// Configuration error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("At least one metric must be selected")]
    NoMetrics,

    #[error("last_x_weeks must be greater than zero")]
    ZeroWeeks,

    #[error("trailing_days must be greater than zero when set")]
    ZeroTrailingDays,

    #[error("Chart size must be non-zero, got {width}x{height}")]
    InvalidChartSize { width: u32, height: u32 },
}

/// Settings for one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Workout log to read
    #[serde(default = "default_input_path")]
    pub input_path: PathBuf,

    /// Where charts, the JSON summary and the PDF go
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Metrics to chart for every exercise
    #[serde(default = "default_metrics")]
    pub metrics: Vec<Metric>,

    /// Restrict charts to these exercises
    #[serde(default)]
    pub exercises: Option<BTreeSet<String>>,

    #[serde(default)]
    pub min_occurrences: usize,

    #[serde(default)]
    pub trailing_days: Option<u32>,

    #[serde(default = "default_last_x_weeks")]
    pub last_x_weeks: u32,

    #[serde(default = "default_chart_width")]
    pub chart_width: u32,

    #[serde(default = "default_chart_height")]
    pub chart_height: u32,

    /// Also bundle the charts into a PDF
    #[serde(default = "default_pdf_report")]
    pub pdf_report: bool,
}

fn default_input_path() -> PathBuf {
    PathBuf::from("example_data.csv")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("charts")
}

fn default_metrics() -> Vec<Metric> {
    vec![Metric::OneRepMax]
}

fn default_last_x_weeks() -> u32 {
    5
}

fn default_chart_width() -> u32 {
    crate::charts::DEFAULT_WIDTH
}

fn default_chart_height() -> u32 {
    crate::charts::DEFAULT_HEIGHT
}

fn default_pdf_report() -> bool {
    true
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input_path: default_input_path(),
            output_dir: default_output_dir(),
            metrics: default_metrics(),
            exercises: None,
            min_occurrences: 0,
            trailing_days: None,
            last_x_weeks: default_last_x_weeks(),
            chart_width: default_chart_width(),
            chart_height: default_chart_height(),
            pdf_report: default_pdf_report(),
        }
    }
}

impl AnalysisConfig {
    /// Default configuration reading from `input_path`
    pub fn with_input<P: Into<PathBuf>>(input_path: P) -> Self {
        Self {
            input_path: input_path.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.metrics.is_empty() {
            return Err(ConfigError::NoMetrics);
        }
        if self.last_x_weeks == 0 {
            return Err(ConfigError::ZeroWeeks);
        }
        if self.trailing_days == Some(0) {
            return Err(ConfigError::ZeroTrailingDays);
        }
        if self.chart_width == 0 || self.chart_height == 0 {
            return Err(ConfigError::InvalidChartSize {
                width: self.chart_width,
                height: self.chart_height,
            });
        }
        Ok(())
    }

    /// Aggregator filters for this run
    pub fn query(&self) -> SeriesQuery {
        SeriesQuery {
            exercises: self.exercises.clone(),
            min_occurrences: self.min_occurrences,
            trailing_days: self.trailing_days,
        }
    }

    pub fn pdf_path(&self) -> PathBuf {
        self.output_dir.join("workout_report.pdf")
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join("summary.json")
    }
}
