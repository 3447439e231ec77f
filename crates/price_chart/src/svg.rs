//! Standalone SVG rendering of a [`ChartSpec`].

use crate::{ChartSpec, LineSeries, escape};
use chrono::NaiveDate;
use itertools::{Itertools, MinMaxResult};

const WIDTH: f64 = 900.0;
const HEIGHT: f64 = 420.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 70.0;
const MAX_X_TICKS: usize = 12;
const Y_TICKS: usize = 5;

struct Frame {
    first: Option<NaiveDate>,
    days: f64,
    low: f64,
    high: f64,
}

impl Frame {
    fn new(chart: &ChartSpec) -> Self {
        let dates = chart.dates();
        let first = dates.first().copied();
        let days = match (dates.first(), dates.last()) {
            (Some(a), Some(b)) => (*b - *a).num_days() as f64,
            _ => 0.0,
        };

        let values = chart.series.iter().flat_map(|s| s.points.iter().map(|p| p.value));
        let (low, high) = match values.minmax() {
            MinMaxResult::NoElements => (0.0, 1.0),
            MinMaxResult::OneElement(v) => (v - 1.0, v + 1.0),
            MinMaxResult::MinMax(lo, hi) if hi - lo < f64::EPSILON => (lo - 1.0, hi + 1.0),
            MinMaxResult::MinMax(lo, hi) => {
                let pad = (hi - lo) * 0.05;
                (lo - pad, hi + pad)
            }
        };

        Frame {
            first,
            days,
            low,
            high,
        }
    }

    fn plot_width() -> f64 {
        WIDTH - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn plot_height() -> f64 {
        HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
    }

    fn x(&self, date: NaiveDate) -> f64 {
        let Some(first) = self.first else {
            return MARGIN_LEFT;
        };
        if self.days == 0.0 {
            return MARGIN_LEFT + Self::plot_width() / 2.0;
        }
        let offset = (date - first).num_days() as f64;
        MARGIN_LEFT + offset / self.days * Self::plot_width()
    }

    fn y(&self, value: f64) -> f64 {
        let ratio = (value - self.low) / (self.high - self.low);
        MARGIN_TOP + (1.0 - ratio) * Self::plot_height()
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

fn polyline(out: &mut String, frame: &Frame, series: &LineSeries) {
    if series.points.is_empty() {
        return;
    }
    let points = series
        .points
        .iter()
        .sorted_by_key(|p| p.date)
        .map(|p| format!("{:.1},{:.1}", frame.x(p.date), frame.y(p.value)))
        .join(" ");
    push_line(
        out,
        &format!(
            r#"<polyline fill="none" stroke="{}" stroke-width="{}" points="{}"/>"#,
            escape(&series.color),
            series.width,
            points
        ),
    );
}

fn axes(out: &mut String, frame: &Frame, chart: &ChartSpec) {
    let bottom = HEIGHT - MARGIN_BOTTOM;
    let right = WIDTH - MARGIN_RIGHT;
    push_line(
        out,
        &format!(
            r#"<line x1="{l}" y1="{b}" x2="{r}" y2="{b}" stroke="black"/><line x1="{l}" y1="{t}" x2="{l}" y2="{b}" stroke="black"/>"#,
            l = MARGIN_LEFT,
            r = right,
            t = MARGIN_TOP,
            b = bottom
        ),
    );

    let dates = chart.dates();
    let step = dates.len().div_ceil(MAX_X_TICKS).max(1);
    for date in dates.iter().step_by(step) {
        let x = frame.x(*date);
        push_line(
            out,
            &format!(
                r#"<line x1="{x:.1}" y1="{b}" x2="{x:.1}" y2="{t}" stroke="black"/><text x="{x:.1}" y="{ty}" font-size="11" text-anchor="middle">{label}</text>"#,
                b = bottom,
                t = bottom + 5.0,
                ty = bottom + 18.0,
                label = escape(&chart.tick_label(*date))
            ),
        );
    }

    for i in 0..=Y_TICKS {
        let value = frame.low + (frame.high - frame.low) * i as f64 / Y_TICKS as f64;
        let y = frame.y(value);
        push_line(
            out,
            &format!(
                r#"<line x1="{l0}" y1="{y:.1}" x2="{l}" y2="{y:.1}" stroke="black"/><text x="{tx}" y="{ty:.1}" font-size="11" text-anchor="end">{value:.2}</text>"#,
                l0 = MARGIN_LEFT - 5.0,
                l = MARGIN_LEFT,
                tx = MARGIN_LEFT - 8.0,
                ty = y + 4.0
            ),
        );
    }

    push_line(
        out,
        &format!(
            r#"<text x="{x}" y="{y}" font-size="13" text-anchor="middle">{label}</text>"#,
            x = MARGIN_LEFT + Frame::plot_width() / 2.0,
            y = HEIGHT - 20.0,
            label = escape(&chart.x_axis_label)
        ),
    );
    push_line(
        out,
        &format!(
            r#"<text x="18" y="{y}" font-size="13" text-anchor="middle" transform="rotate(-90 18 {y})">{label}</text>"#,
            y = MARGIN_TOP + Frame::plot_height() / 2.0,
            label = escape(&chart.y_axis_label)
        ),
    );
}

fn legend(out: &mut String, chart: &ChartSpec) {
    let x = WIDTH - MARGIN_RIGHT - 150.0;
    for (i, series) in chart.series.iter().enumerate() {
        let y = MARGIN_TOP + 10.0 + 18.0 * i as f64;
        push_line(
            out,
            &format!(
                r#"<line x1="{x}" y1="{y}" x2="{x2}" y2="{y}" stroke="{color}" stroke-width="{w}"/><text x="{tx}" y="{ty}" font-size="12">{label}</text>"#,
                x2 = x + 24.0,
                color = escape(&series.color),
                w = series.width,
                tx = x + 30.0,
                ty = y + 4.0,
                label = escape(&series.legend)
            ),
        );
    }
}

pub fn render(chart: &ChartSpec) -> String {
    let frame = Frame::new(chart);
    let mut out = String::new();

    push_line(
        &mut out,
        &format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="100%" font-family="sans-serif">"#,
            w = WIDTH,
            h = HEIGHT
        ),
    );
    push_line(
        &mut out,
        &format!(
            r#"<text x="{x}" y="28" font-size="18" font-weight="bold">{title}</text>"#,
            x = MARGIN_LEFT,
            title = escape(&chart.title)
        ),
    );

    axes(&mut out, &frame, chart);
    for series in &chart.series {
        polyline(&mut out, &frame, series);
    }
    legend(&mut out, chart);

    out.push_str("</svg>\n");
    out
}
