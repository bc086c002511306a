//! Plotters-powered bar chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using
//! `plotters-ratatui-backend`. Category labels are drawn by the caller as a
//! Ratatui legend line; this widget only draws bars, value text and the y-axis.

use plotters::prelude::*;
use plotters::style::Color as PlotColor;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::chart::Bar;

/// A render-only bar chart description.
///
/// All bars and bounds are computed outside the render call (the axis range
/// comes straight from the active `ReportView`).
pub struct BarPlottersChart<'a> {
    pub bars: &'a [Bar],
    /// Y bounds (percent).
    pub y_bounds: [f64; 2],
    pub y_label: &'a str,
    /// Formatting of tick labels.
    pub fmt_y: fn(f64) -> String,
}

impl<'a> Widget for BarPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let n = self.bars.len();
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];
        if n == 0 || !(y0.is_finite() && y1.is_finite()) || y1 <= y0 {
            return;
        }
        let x1 = n as f64;

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 7)
                .set_label_area_size(LabelAreaPosition::Bottom, 1)
                .build_cartesian_2d(0.0..x1, y0..y1)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(0)
                .y_labels(5)
                .y_desc(self.y_label)
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            // Zero baseline, only when the range straddles it.
            if y0 < 0.0 && y1 > 0.0 {
                chart.draw_series(LineSeries::new([(0.0, 0.0), (x1, 0.0)], &WHITE))?;
            }

            // Bars grow from zero (or the nearest bound when zero is off-screen).
            // N/A bars are not drawn at all; only their text is.
            let base = 0.0_f64.clamp(y0, y1);
            chart.draw_series(self.bars.iter().enumerate().filter_map(|(i, bar)| {
                let v = bar.value.value()?;
                let color = RGBColor(bar.color.0, bar.color.1, bar.color.2);
                let x = i as f64;
                Some(Rectangle::new(
                    [(x + 0.15, base), (x + 0.85, v.clamp(y0, y1))],
                    color.filled(),
                ))
            }))?;

            chart.draw_series(self.bars.iter().enumerate().map(|(i, bar)| {
                let y = bar.value.value().unwrap_or(0.0).clamp(y0, y1);
                Text::new(
                    bar.text.clone(),
                    (i as f64 + 0.2, y),
                    ("sans-serif", 10).into_font().color(&WHITE),
                )
            }))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
