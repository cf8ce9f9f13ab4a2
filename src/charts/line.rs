//! Trend line chart

use chrono::{Duration, NaiveDate};
use plotters::prelude::*;

use super::{draw_err, ChartError, ChartResult, Figure};
use crate::models::TrendPlot;

const SERIES_COLOR: RGBColor = RGBColor(31, 119, 180);
const FIT_COLOR: RGBColor = RGBColor(214, 39, 40);

/// Y axis bounds with 5% headroom; flat or empty input gets a unit band
pub fn value_range<I: IntoIterator<Item = f64>>(values: I) -> (f64, f64) {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if !min.is_finite() {
        return (0.0, 1.0);
    }
    if max - min < f64::EPSILON {
        return (min - 1.0, max + 1.0);
    }

    let pad = (max - min) * 0.05;
    (min - pad, max + pad)
}

/// Draw the series, its markers and the fit line (when present)
pub fn draw_trend(plot: &TrendPlot, figure: &mut Figure) -> ChartResult<()> {
    let origin = plot.points.first().ok_or(ChartError::NoData)?.date;
    let day = |date: NaiveDate| (date - origin).num_days() as f64;

    let span = plot
        .points
        .last()
        .map(|p| day(p.date))
        .unwrap_or(0.0)
        .max(1.0);
    let (y_min, y_max) = value_range(
        plot.points
            .iter()
            .chain(plot.fit.iter().flatten())
            .map(|p| p.value),
    );

    let (width, height) = figure.size();
    let root = BitMapBackend::with_buffer(figure.buffer_mut(), (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&plot.title, ("sans-serif", 22))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5..span + 0.5, y_min..y_max)
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .x_labels(8)
        .x_label_formatter(&|x| {
            (origin + Duration::days(x.round() as i64))
                .format("%Y-%m-%d")
                .to_string()
        })
        .x_desc(plot.x_label.as_str())
        .y_desc(plot.y_label.as_str())
        .draw()
        .map_err(draw_err)?;

    let points: Vec<(f64, f64)> = plot.points.iter().map(|p| (day(p.date), p.value)).collect();

    chart
        .draw_series(LineSeries::new(points.clone(), SERIES_COLOR.stroke_width(2)))
        .map_err(draw_err)?
        .label(plot.legend.as_str())
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], SERIES_COLOR.stroke_width(2)));

    chart
        .draw_series(
            points
                .iter()
                .map(|(x, y)| Circle::new((*x, *y), 3, SERIES_COLOR.filled())),
        )
        .map_err(draw_err)?;

    if let Some(fit) = &plot.fit {
        chart
            .draw_series(LineSeries::new(
                fit.iter().map(|p| (day(p.date), p.value)),
                FIT_COLOR.stroke_width(2),
            ))
            .map_err(draw_err)?
            .label("Best fit")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], FIT_COLOR.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(draw_err)?;

    root.present().map_err(draw_err)?;
    Ok(())
}
