use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CustomError {
    /// The API answered with an `Error Message` body instead of a series.
    InvalidTicker,
    /// The API answered with an `Information` or `Note` body (rate limit, premium endpoint).
    Notice(String),
    Request(String),
    Parse(String),
    Cache(String),
}

impl fmt::Display for CustomError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CustomError::InvalidTicker => write!(f, "Not a valid ticker"),
            CustomError::Notice(msg) => write!(f, "API notice: {}", msg),
            CustomError::Request(e) => write!(f, "Request error: {}", e),
            CustomError::Parse(e) => write!(f, "Parse error: {}", e),
            CustomError::Cache(e) => write!(f, "Cache error: {}", e),
        }
    }
}

impl Error for CustomError {}

impl From<reqwest::Error> for CustomError {
    fn from(err: reqwest::Error) -> CustomError {
        CustomError::Request(err.to_string())
    }
}

impl From<csv::Error> for CustomError {
    fn from(err: csv::Error) -> CustomError {
        CustomError::Parse(err.to_string())
    }
}

impl From<redis::RedisError> for CustomError {
    fn from(err: redis::RedisError) -> CustomError {
        CustomError::Cache(err.to_string())
    }
}
