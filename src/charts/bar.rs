//! Weekly frequency bar chart

use plotters::prelude::*;

use super::{draw_err, ChartError, ChartResult, Figure};
use crate::models::FrequencyPlot;

const BAR_COLOR: RGBColor = RGBColor(31, 119, 180);

/// Draw one bar per week, labelled with the week's closing Sunday
pub fn draw_weekly_counts(plot: &FrequencyPlot, figure: &mut Figure) -> ChartResult<()> {
    if plot.weeks.is_empty() {
        return Err(ChartError::NoData);
    }

    let last_index = (plot.weeks.len() - 1) as u32;
    let y_max = plot.weeks.iter().map(|w| w.workouts).max().unwrap_or(0) as u32 + 1;

    let (width, height) = figure.size();
    let root = BitMapBackend::with_buffer(figure.buffer_mut(), (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&plot.title, ("sans-serif", 22))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(50)
        .build_cartesian_2d((0u32..last_index).into_segmented(), 0u32..y_max)
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(plot.weeks.len())
        .y_labels(y_max as usize + 1)
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => plot
                .weeks
                .get(*i as usize)
                .map(|w| w.week_end.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .x_desc(plot.x_label.as_str())
        .y_desc(plot.y_label.as_str())
        .draw()
        .map_err(draw_err)?;

    chart
        .draw_series(
            Histogram::vertical(&chart)
                .style(BAR_COLOR.filled())
                .margin(6)
                .data(
                    plot.weeks
                        .iter()
                        .enumerate()
                        .map(|(i, w)| (i as u32, w.workouts as u32)),
                ),
        )
        .map_err(draw_err)?;

    root.present().map_err(draw_err)?;
    Ok(())
}
