use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// Calendar number, 1 for January.
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    pub fn two_digit(self) -> String {
        format!("{:02}", self.number())
    }

    /// The following month. December wraps to January.
    pub fn next(self) -> Month {
        Month::ALL[(self.number() % 12) as usize]
    }

    pub fn abbrev(self) -> &'static str {
        match self {
            Month::Jan => "Jan",
            Month::Feb => "Feb",
            Month::Mar => "Mar",
            Month::Apr => "Apr",
            Month::May => "May",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Aug => "Aug",
            Month::Sep => "Sep",
            Month::Oct => "Oct",
            Month::Nov => "Nov",
            Month::Dec => "Dec",
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.abbrev())
    }
}

impl FromStr for Month {
    type Err = ParseError;

    // case sensitive: "Jan" only
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Month::ALL
            .into_iter()
            .find(|m| m.abbrev() == s)
            .ok_or_else(|| ParseError::UnknownMonth(s.to_string()))
    }
}

/// A four digit calendar year, as picked in the year selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Year(u16);

impl Year {
    pub fn new(value: u16) -> Result<Self, ParseError> {
        if value > 9999 {
            return Err(ParseError::InvalidYear(value.to_string()));
        }
        Ok(Year(value))
    }

    pub fn value(self) -> u16 {
        self.0
    }

    pub fn next(self) -> Year {
        Year(self.0 + 1)
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

impl FromStr for Year {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidYear(s.to_string()));
        }
        s.parse::<u16>()
            .map(Year)
            .map_err(|_| ParseError::InvalidYear(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    UnknownMonth(String),
    InvalidYear(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParseError::UnknownMonth(m) => write!(f, "Unknown month: {:?}", m),
            ParseError::InvalidYear(y) => write!(f, "Invalid year: {:?}", y),
        }
    }
}

impl Error for ParseError {}
