use chrono::NaiveDate;
use history_model::{Month, MonthRow, Year};
use itertools::Itertools;
use serde::Serialize;

pub mod svg;

pub const Y_AXIS_LABEL: &str = "stock price ($)";
/// `Jan 05`
pub const X_TICK_FORMAT: &str = "%b %d";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub legend: String,
    pub color: String,
    pub width: u32,
    pub points: Vec<Point>,
}

/// Everything needed to draw one month of prices for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_axis_label: String,
    pub y_axis_label: String,
    pub x_tick_format: String,
    pub month: Month,
    pub year: Year,
    pub series: Vec<LineSeries>,
}

impl ChartSpec {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    /// Distinct plotted dates in calendar order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.date))
            .sorted()
            .dedup()
            .collect()
    }

    pub fn tick_label(&self, date: NaiveDate) -> String {
        date.format(&self.x_tick_format).to_string()
    }
}

/// Escapes text for SVG and HTML content and attribute values.
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Close and adjusted close of `rows` as two line series.
pub fn render_chart(rows: &[MonthRow], month: Month, year: Year, ticker: &str) -> ChartSpec {
    let close = rows
        .iter()
        .map(|row| Point {
            date: row.date,
            value: row.close,
        })
        .collect();
    let adjusted_close = rows
        .iter()
        .map(|row| Point {
            date: row.date,
            value: row.adjusted_close,
        })
        .collect();

    ChartSpec {
        title: ticker.to_uppercase(),
        x_axis_label: year.to_string(),
        y_axis_label: Y_AXIS_LABEL.to_string(),
        x_tick_format: X_TICK_FORMAT.to_string(),
        month,
        year,
        series: vec![
            LineSeries {
                legend: "close".to_string(),
                color: "blue".to_string(),
                width: 4,
                points: close,
            },
            LineSeries {
                legend: "adjusted close".to_string(),
                color: "red".to_string(),
                width: 1,
                points: adjusted_close,
            },
        ],
    }
}
