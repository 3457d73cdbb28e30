//! Plotters-powered market trend chart widget for Ratatui.
//!
//! Average regional sale price per month, drawn as a line with a dot per month.
//! Rendered into the Ratatui buffer through `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::market::MarketTrend;

/// Render-only chart over a trend series.
///
/// Points and bounds are computed by [`TrendChart::new`], outside the render call.
pub struct TrendChart<'a> {
    trends: &'a [MarketTrend],
    points: Vec<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

impl<'a> TrendChart<'a> {
    pub fn new(trends: &'a [MarketTrend]) -> Self {
        let points = trend_points(trends);
        let (x_bounds, y_bounds) = chart_bounds(&points);
        Self {
            trends,
            points,
            x_bounds,
            y_bounds,
        }
    }
}

impl Widget for TrendChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }
        if self.points.is_empty() {
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        let trends = self.trends;
        let points = self.points;

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 2)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Mesh lines are noise at terminal resolution.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(6)
                .y_labels(4)
                .x_label_formatter(&|v| month_label(trends, *v))
                .y_label_formatter(&|v| fmt_price_k(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .draw()?;

            let line_color = RGBColor(0, 255, 255);
            chart.draw_series(LineSeries::new(points.iter().copied(), &line_color))?;

            // `Circle` radii come out huge on this backend; a pixel reads as a dot.
            chart.draw_series(points.iter().map(|&(x, y)| Pixel::new((x, y), WHITE)))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

/// (month index, average price) pairs.
fn trend_points(trends: &[MarketTrend]) -> Vec<(f64, f64)> {
    trends
        .iter()
        .enumerate()
        .map(|(i, t)| (i as f64, t.avg_price as f64))
        .collect()
}

/// X spans the month indices; Y is padded 5% on both sides.
fn chart_bounds(points: &[(f64, f64)]) -> ([f64; 2], [f64; 2]) {
    let x1 = points.len().saturating_sub(1).max(1) as f64;

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(_, y) in points {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if !y_min.is_finite() || !y_max.is_finite() {
        return ([0.0, x1], [0.0, 1.0]);
    }

    let pad = ((y_max - y_min) * 0.05).max(1_000.0);
    ([0.0, x1], [y_min - pad, y_max + pad])
}

fn month_label(trends: &[MarketTrend], v: f64) -> String {
    let idx = v.round();
    if idx < 0.0 || (v - idx).abs() > 0.01 {
        return String::new();
    }
    trends
        .get(idx as usize)
        .map(|t| t.month.to_string())
        .unwrap_or_default()
}

fn fmt_price_k(v: f64) -> String {
    format!("${:.0}k", v / 1_000.0)
}
