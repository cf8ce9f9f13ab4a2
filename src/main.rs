//! liftlog
//!
//! Reads a workout log and writes per-exercise trend charts plus a weekly
//! workout frequency chart.
//!
//! Usage: liftlog [path/to/log.csv] [metric,metric,...]

use tracing_subscriber::EnvFilter;

use liftlog::build_info;
use liftlog::config::AnalysisConfig;
use liftlog::models::Metric;
use liftlog::pipeline;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("liftlog=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();

    let mut args = std::env::args().skip(1);
    let mut config = match args.next() {
        Some(path) => AnalysisConfig::with_input(path),
        None => AnalysisConfig::default(),
    };
    if let Some(metrics) = args.next() {
        config.metrics = metrics
            .split(',')
            .map(str::parse::<Metric>)
            .collect::<Result<_, _>>()?;
    }
    eprintln!("Workout log: {}", config.input_path.display());

    let outcome = pipeline::run(&config)?;

    eprintln!("Records analyzed: {}", outcome.records);
    for chart in &outcome.charts {
        eprintln!("  chart: {}", chart.display());
    }
    eprintln!("Plot summary: {}", outcome.summary_path.display());
    if let Some(pdf) = &outcome.pdf_path {
        eprintln!("PDF report: {}", pdf.display());
    }

    Ok(())
}
