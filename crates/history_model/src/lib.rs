use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

mod month;
mod window;

pub use month::{Month, ParseError, Year};
pub use window::{MonthWindow, select_month, select_month_str};

/// One trading day of a daily-adjusted series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adjusted_close: f64,
    pub volume: i64,
    pub dividend_amount: f64,
    pub split_coefficient: f64,
}

/// The columns a monthly chart needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthRow {
    pub date: NaiveDate,
    pub close: f64,
    pub adjusted_close: f64,
}

impl From<&PriceRow> for MonthRow {
    fn from(row: &PriceRow) -> Self {
        MonthRow {
            date: row.date,
            close: row.close,
            adjusted_close: row.adjusted_close,
        }
    }
}
