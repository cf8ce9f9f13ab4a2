//! End-to-end analysis run
//!
//! Load -> metric series -> trend charts, plus the weekly frequency chart.
//! `analyze` is the pure part over already-loaded records; `run` adds the
//! file I/O around it.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::analysis::{self, frequency, loader, trend, ChartSink, LoadError};
use crate::build_info::BuildInfo;
use crate::charts::report::{write_pdf_report, ReportSummary};
use crate::charts::{ChartError, PngRenderer};
use crate::config::{AnalysisConfig, ConfigError};
use crate::models::{FrequencyPlot, TrendPlot, WorkoutRecord};

/// Pipeline error types
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error("Failed to write summary: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Every plot handed to the chart sink during one run
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisOutput {
    pub trends: Vec<TrendPlot>,
    pub frequency: Option<FrequencyPlot>,
    pub exercises_charted: usize,
}

/// Forwards plots to the real sink and keeps a copy
struct Tee<'a, S: ?Sized> {
    inner: &'a mut S,
    output: AnalysisOutput,
}

impl<S: ChartSink + ?Sized> ChartSink for Tee<'_, S> {
    type Error = S::Error;

    fn line_chart(&mut self, plot: &TrendPlot) -> Result<(), Self::Error> {
        self.inner.line_chart(plot)?;
        self.output.trends.push(plot.clone());
        Ok(())
    }

    fn bar_chart(&mut self, plot: &FrequencyPlot) -> Result<(), Self::Error> {
        self.inner.bar_chart(plot)?;
        self.output.frequency = Some(plot.clone());
        Ok(())
    }
}

/// Compute every configured metric series and the weekly counts, handing
/// each resulting plot to `sink`
pub fn analyze<S: ChartSink + ?Sized>(
    records: &[WorkoutRecord],
    config: &AnalysisConfig,
    sink: &mut S,
) -> Result<AnalysisOutput, S::Error> {
    let query = config.query();
    let mut tee = Tee {
        inner: sink,
        output: AnalysisOutput::default(),
    };
    let mut exercises = std::collections::BTreeSet::new();

    for &metric in &config.metrics {
        let series = analysis::compute_series(records, &query, metric);
        info!(metric = %metric, exercises = series.len(), "Rendering metric trends");

        for (name, series) in &series {
            if trend::render(series, &mut tee)? {
                exercises.insert(name.clone());
            }
        }
    }

    frequency::render(records, config.last_x_weeks, &mut tee)?;

    let mut output = tee.output;
    output.exercises_charted = exercises.len();
    Ok(output)
}

/// Layout of `summary.json`
#[derive(Serialize)]
struct SummaryFile<'a> {
    build: BuildInfo,
    summary: &'a ReportSummary,
    plots: &'a AnalysisOutput,
}

/// Files produced by a run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub records: usize,
    pub charts: Vec<PathBuf>,
    pub summary_path: PathBuf,
    pub pdf_path: Option<PathBuf>,
}

/// Load the workout log, render every chart and write the outputs
pub fn run(config: &AnalysisConfig) -> PipelineResult<RunOutcome> {
    config.validate()?;

    let records = loader::load_records(&config.input_path)?;

    let mut renderer = PngRenderer::new(config.chart_width, config.chart_height);
    let output = analyze(&records, config, &mut renderer)?;

    let charts = renderer.write_to_dir(&config.output_dir)?;

    let summary = ReportSummary {
        input: config.input_path.display().to_string(),
        records: records.len(),
        first_date: records.first().map(|r| r.date),
        last_date: records.last().map(|r| r.date),
        metrics: config
            .metrics
            .iter()
            .map(|m| m.display_name().to_string())
            .collect(),
        exercises_charted: output.exercises_charted,
        generated: chrono::Local::now().format("%Y-%m-%d %H:%M").to_string(),
        generator: BuildInfo::current().label(),
    };

    let summary_path = config.summary_path();
    let json = serde_json::to_string_pretty(&SummaryFile {
        build: BuildInfo::current(),
        summary: &summary,
        plots: &output,
    })?;
    std::fs::write(&summary_path, json)?;
    info!(path = %summary_path.display(), "Wrote plot summary");

    let pdf_path = if config.pdf_report {
        let path = config.pdf_path();
        write_pdf_report(renderer.charts(), &summary, &path)?;
        Some(path)
    } else {
        None
    };

    Ok(RunOutcome {
        records: records.len(),
        charts,
        summary_path,
        pdf_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::RecordingSink;
    use crate::models::Metric;
    use chrono::{Duration, NaiveDate};

    fn records() -> Vec<WorkoutRecord> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let mut records: Vec<_> = (0..12)
            .map(|i| {
                let date = start + Duration::days(i * 3);
                WorkoutRecord::new(date, "Legs", "Squat", 100.0 + i as f64, 5.0, 3.0)
            })
            .collect();
        records.push(WorkoutRecord::new(start, "Arms", "Curl", 20.0, 10.0, 3.0));
        records.push(WorkoutRecord::new(start + Duration::days(1), "Arms", "Curl", 22.0, 8.0, 3.0));
        records
    }

    #[test]
    fn test_analyze_renders_popular_exercises_only() {
        let mut config = AnalysisConfig::default();
        config.min_occurrences = 10;

        let mut sink = RecordingSink::default();
        let output = analyze(&records(), &config, &mut sink).unwrap();

        assert_eq!(sink.lines.len(), 1);
        assert_eq!(sink.lines[0].title, "Squat 1RM Over Time");
        assert!(sink.lines[0].fit.is_some());
        assert_eq!(sink.bars.len(), 1);
        assert_eq!(output.trends, sink.lines);
        assert_eq!(output.exercises_charted, 1);
    }

    #[test]
    fn test_analyze_one_chart_per_metric_and_exercise() {
        let mut config = AnalysisConfig::default();
        config.metrics = vec![Metric::BestSet, Metric::TotalVolume];

        let mut sink = RecordingSink::default();
        let output = analyze(&records(), &config, &mut sink).unwrap();

        let titles: Vec<_> = sink.lines.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Curl Best Set Over Time",
                "Squat Best Set Over Time",
                "Curl Total Volume Over Time",
                "Squat Total Volume Over Time",
            ]
        );
        assert_eq!(output.exercises_charted, 2);
    }

    #[test]
    fn test_analyze_empty_log_produces_nothing() {
        let mut sink = RecordingSink::default();
        let output = analyze(&[], &AnalysisConfig::default(), &mut sink).unwrap();
        assert!(sink.lines.is_empty());
        assert!(sink.bars.is_empty());
        assert!(output.frequency.is_none());
    }

    #[test]
    fn test_summary_file_records_build() {
        let summary = ReportSummary {
            input: "log.csv".to_string(),
            records: 0,
            first_date: None,
            last_date: None,
            metrics: vec!["1RM".to_string()],
            exercises_charted: 0,
            generated: "2024-03-01 08:00".to_string(),
            generator: BuildInfo::current().label(),
        };
        let output = AnalysisOutput::default();
        let json = serde_json::to_value(SummaryFile {
            build: BuildInfo::current(),
            summary: &summary,
            plots: &output,
        })
        .unwrap();

        assert_eq!(json["build"]["name"], "liftlog");
        assert_eq!(json["build"]["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(json["summary"]["generator"], BuildInfo::current().label());
        assert!(json["plots"]["trends"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_run_rejects_invalid_config() {
        let mut config = AnalysisConfig::default();
        config.last_x_weeks = 0;
        assert!(matches!(run(&config), Err(PipelineError::Config(ConfigError::ZeroWeeks))));
    }

    #[test]
    fn test_run_reports_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let config = AnalysisConfig::with_input(dir.path().join("missing.csv"));
        assert!(matches!(run(&config), Err(PipelineError::Load(LoadError::Io(_)))));
    }
}
