//! PDF report
//!
//! Bundles the rendered charts into one document: a summary page followed
//! by one landscape page per chart.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::NaiveDate;
use printpdf::*;
use serde::Serialize;
use tracing::info;

use super::{ChartError, ChartResult, RenderedChart};

// ============================================================================
// Color Constants (RGB 0-255)
// ============================================================================

const COLOR_TITLE: (u8, u8, u8) = (31, 119, 180);
const COLOR_BLACK: (u8, u8, u8) = (0, 0, 0);
const COLOR_GRAY: (u8, u8, u8) = (128, 128, 128);

// Letter, in mm
const PAGE_SHORT: f32 = 215.9;
const PAGE_LONG: f32 = 279.4;
const MARGIN_LEFT: f32 = 15.0;
const CHART_DPI: f32 = 120.0;

/// Run details printed on the summary page
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub input: String,
    pub records: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub metrics: Vec<String>,
    pub exercises_charted: usize,
    pub generated: String,
    /// Build that produced the report
    pub generator: String,
}

impl ReportSummary {
    fn lines(&self) -> Vec<String> {
        let period = match (self.first_date, self.last_date) {
            (Some(first), Some(last)) => format!("{} to {}", first, last),
            _ => "no records".to_string(),
        };

        vec![
            format!("Input: {}", self.input),
            format!("Records: {}", self.records),
            format!("Period: {}", period),
            format!("Metrics: {}", self.metrics.join(", ")),
            format!("Exercises charted: {}", self.exercises_charted),
            format!("Generated: {}", self.generated),
            format!("Generator: {}", self.generator),
        ]
    }
}

fn rgb_to_printpdf(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

fn add_text(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    text: &str,
    x: Mm,
    y: Mm,
    size: f32,
    color: (u8, u8, u8),
) {
    layer.set_fill_color(rgb_to_printpdf(color.0, color.1, color.2));
    layer.use_text(text, size, x, y, font);
}

fn add_line(layer: &PdfLayerReference, x1: Mm, x2: Mm, y: Mm, color: (u8, u8, u8), width: f32) {
    layer.set_outline_color(rgb_to_printpdf(color.0, color.1, color.2));
    layer.set_outline_thickness(width);

    let line = Line {
        points: vec![(Point::new(x1, y), false), (Point::new(x2, y), false)],
        is_closed: false,
    };
    layer.add_line(line);
}

/// Write all charts into a single PDF at `output_path`
pub fn write_pdf_report<P: AsRef<Path>>(
    charts: &[RenderedChart],
    summary: &ReportSummary,
    output_path: P,
) -> ChartResult<()> {
    let pdf_err = |e: &dyn std::fmt::Display| ChartError::Pdf(e.to_string());

    let (doc, page1, layer1) = PdfDocument::new(
        "Workout Report",
        Mm(PAGE_SHORT),
        Mm(PAGE_LONG),
        "Layer 1",
    );

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| pdf_err(&e))?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| pdf_err(&e))?;

    // Summary page (portrait)
    let layer = doc.get_page(page1).get_layer(layer1);
    let mut y = PAGE_LONG - 20.0;

    add_text(&layer, &font_bold, "Workout Report", Mm(MARGIN_LEFT), Mm(y), 18.0, COLOR_TITLE);
    y -= 8.0;
    add_line(&layer, Mm(MARGIN_LEFT), Mm(PAGE_SHORT - MARGIN_LEFT), Mm(y), COLOR_GRAY, 0.5);
    y -= 10.0;

    for line in summary.lines() {
        add_text(&layer, &font, &line, Mm(MARGIN_LEFT), Mm(y), 11.0, COLOR_BLACK);
        y -= 6.0;
    }
    y -= 6.0;

    add_text(&layer, &font_bold, "Charts", Mm(MARGIN_LEFT), Mm(y), 12.0, COLOR_BLACK);
    y -= 7.0;
    for (index, chart) in charts.iter().enumerate() {
        if y < 20.0 {
            break;
        }
        let entry = format!("{}. {}", index + 1, chart.title);
        add_text(&layer, &font, &entry, Mm(MARGIN_LEFT), Mm(y), 10.0, COLOR_BLACK);
        y -= 5.0;
    }

    // One landscape page per chart
    for chart in charts {
        let (page, page_layer) = doc.add_page(Mm(PAGE_LONG), Mm(PAGE_SHORT), "Chart Page");
        let layer = doc.get_page(page).get_layer(page_layer);
        let top = PAGE_SHORT - 20.0;

        add_text(&layer, &font_bold, &chart.title, Mm(MARGIN_LEFT), Mm(top), 16.0, COLOR_TITLE);

        let dynamic_image =
            printpdf::image_crate::load_from_memory(&chart.png).map_err(|e| pdf_err(&e))?;
        let pdf_image = Image::from_dynamic_image(&dynamic_image);

        let chart_height_mm = chart.height as f32 / CHART_DPI * 25.4;
        let transform = ImageTransform {
            translate_x: Some(Mm(MARGIN_LEFT)),
            translate_y: Some(Mm(top - 8.0 - chart_height_mm)),
            dpi: Some(CHART_DPI),
            ..Default::default()
        };
        pdf_image.add_to_layer(layer.clone(), transform);
    }

    let path = output_path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    doc.save(&mut writer).map_err(|e| pdf_err(&e))?;

    info!(path = %path.display(), pages = charts.len() + 1, "Wrote PDF report");
    Ok(())
}
