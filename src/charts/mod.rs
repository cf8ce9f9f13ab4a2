//! Chart rendering
//!
//! PNG chart generation with plotters. Every chart is drawn onto its own
//! [`Figure`]; nothing is shared between renders.

pub mod bar;
pub mod line;
pub mod report;

use std::fs;
use std::path::{Path, PathBuf};

use printpdf::image_crate::{DynamicImage, ImageFormat, RgbImage};
use thiserror::Error;
use tracing::info;

use crate::analysis::ChartSink;
use crate::models::{FrequencyPlot, TrendPlot};

/// Chart error types
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Drawing failed: {0}")]
    Draw(String),

    #[error("Image encoding failed: {0}")]
    Encode(String),

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("Failed to write chart: {0}")]
    Io(#[from] std::io::Error),

    #[error("No data to chart")]
    NoData,
}

/// Result type for chart operations
pub type ChartResult<T> = Result<T, ChartError>;

pub(crate) fn draw_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Draw(e.to_string())
}

/// Default figure size: 10 x 5 inches at 100 DPI
pub const DEFAULT_WIDTH: u32 = 1000;
pub const DEFAULT_HEIGHT: u32 = 500;

/// Bytes needed for a `width` x `height` RGB canvas
fn rgb_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 3
}

/// An RGB canvas owned by a single chart
pub struct Figure {
    width: u32,
    height: u32,
    buffer: Vec<u8>,
}

impl Figure {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            buffer: vec![0u8; rgb_len(width, height)],
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw RGB pixels, row-major
    pub fn pixels(&self) -> &[u8] {
        &self.buffer
    }

    pub(crate) fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }

    /// Encode the canvas as PNG bytes
    pub fn to_png(&self) -> ChartResult<Vec<u8>> {
        let img = RgbImage::from_raw(self.width, self.height, self.buffer.clone())
            .ok_or_else(|| ChartError::Encode("Failed to create image from buffer".to_string()))?;

        let mut png_bytes = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
            .map_err(|e| ChartError::Encode(e.to_string()))?;

        Ok(png_bytes)
    }
}

/// A finished chart ready to be written out or embedded
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

impl RenderedChart {
    /// File name derived from the title, prefixed with the chart's position
    pub fn file_name(&self, index: usize) -> String {
        format!("{:02}_{}.png", index + 1, slugify(&self.title))
    }
}

/// Lowercase ASCII slug: alphanumerics kept, everything else collapsed to `_`
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("chart");
    }
    slug
}

/// Chart sink that draws every plot to a PNG
pub struct PngRenderer {
    width: u32,
    height: u32,
    charts: Vec<RenderedChart>,
}

impl PngRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            charts: Vec::new(),
        }
    }

    pub fn charts(&self) -> &[RenderedChart] {
        &self.charts
    }

    fn finish(&mut self, title: &str, figure: Figure) -> ChartResult<()> {
        let (width, height) = figure.size();
        self.charts.push(RenderedChart {
            title: title.to_string(),
            width,
            height,
            png: figure.to_png()?,
        });
        Ok(())
    }

    /// Write every chart into `dir`, returning the written paths in order
    pub fn write_to_dir<P: AsRef<Path>>(&self, dir: P) -> ChartResult<Vec<PathBuf>> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let mut written = Vec::with_capacity(self.charts.len());
        for (index, chart) in self.charts.iter().enumerate() {
            let path = dir.join(chart.file_name(index));
            fs::write(&path, &chart.png)?;
            info!(path = %path.display(), "Wrote chart");
            written.push(path);
        }
        Ok(written)
    }
}

impl Default for PngRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl ChartSink for PngRenderer {
    type Error = ChartError;

    fn line_chart(&mut self, plot: &TrendPlot) -> ChartResult<()> {
        let mut figure = Figure::new(self.width, self.height);
        line::draw_trend(plot, &mut figure)?;
        self.finish(&plot.title, figure)
    }

    fn bar_chart(&mut self, plot: &FrequencyPlot) -> ChartResult<()> {
        let mut figure = Figure::new(self.width, self.height);
        bar::draw_weekly_counts(plot, &mut figure)?;
        self.finish(&plot.title, figure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Bench Press (Barbell) 1RM Over Time"), "bench_press_barbell_1rm_over_time");
        assert_eq!(slugify("  --Squat--  "), "squat");
        assert_eq!(slugify("???"), "chart");
    }

    #[test]
    fn test_file_name_is_numbered() {
        let chart = RenderedChart {
            title: "Workouts Per Week for the Last 5 Weeks".to_string(),
            width: 1,
            height: 1,
            png: Vec::new(),
        };
        assert_eq!(chart.file_name(0), "01_workouts_per_week_for_the_last_5_weeks.png");
    }

    #[test]
    fn test_blank_figure_encodes_png() {
        let figure = Figure::new(4, 3);
        assert_eq!(figure.pixels().len(), 36);
        let png = figure.to_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_canvas_size_past_u32() {
        assert_eq!(rgb_len(70_000, 70_000), 14_700_000_000);
    }

    #[test]
    fn test_renderer_rejects_empty_plot() {
        let mut renderer = PngRenderer::new(200, 100);
        let plot = TrendPlot {
            title: "Empty".to_string(),
            legend: "Empty".to_string(),
            x_label: "Date".to_string(),
            y_label: "1RM".to_string(),
            points: Vec::new(),
            fit: None,
        };
        assert!(matches!(renderer.line_chart(&plot), Err(ChartError::NoData)));
        assert!(renderer.charts().is_empty());
    }
}
