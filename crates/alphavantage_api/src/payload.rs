use crate::CustomError;
use chrono::NaiveDate;
use history_model::PriceRow;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct DailyAdjustedCsvRow {
    timestamp: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    adjusted_close: f64,
    volume: i64,
    dividend_amount: f64,
    split_coefficient: f64,
}

impl From<DailyAdjustedCsvRow> for PriceRow {
    fn from(row: DailyAdjustedCsvRow) -> Self {
        PriceRow {
            date: row.timestamp,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            adjusted_close: row.adjusted_close,
            volume: row.volume,
            dividend_amount: row.dividend_amount,
            split_coefficient: row.split_coefficient,
        }
    }
}

// Error bodies come back as pretty printed JSON even with datatype=csv, so the
// first data cell looks like `    "Error Message": "Invalid API call..."`.
fn sentinel_rest<'a>(cell: &'a str, name: &str) -> Option<&'a str> {
    let mut chars = cell.trim().chars();
    chars.next()?;
    chars.as_str().strip_prefix(name)
}

pub fn is_error_sentinel(cell: &str) -> bool {
    sentinel_rest(cell, "Error").is_some()
}

fn notice_message(line: &str) -> Option<String> {
    let rest = sentinel_rest(line, "Information").or_else(|| sentinel_rest(line, "Note"))?;
    let message = rest
        .trim_start_matches('"')
        .trim_start_matches(':')
        .trim()
        .trim_matches('"');
    Some(message.to_string())
}

/// Fails on payloads that carry an API message instead of a price series.
pub fn classify(payload: &str) -> Result<(), CustomError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(payload.as_bytes());

    let record = match reader.records().next() {
        Some(record) => record?,
        None => return Err(CustomError::Parse("empty payload".to_string())),
    };

    let first = record.get(0).unwrap_or_default();
    if is_error_sentinel(first) {
        return Err(CustomError::InvalidTicker);
    }

    let line = record.iter().collect::<Vec<_>>().join(",");
    if let Some(message) = notice_message(&line) {
        return Err(CustomError::Notice(message));
    }

    Ok(())
}

pub fn parse_history(payload: &str) -> Result<Vec<PriceRow>, CustomError> {
    classify(payload)?;

    let mut reader = csv::Reader::from_reader(payload.as_bytes());
    reader
        .deserialize::<DailyAdjustedCsvRow>()
        .map(|row| row.map(PriceRow::from).map_err(CustomError::from))
        .collect()
}
