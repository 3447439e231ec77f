use crate::{Month, MonthRow, ParseError, PriceRow, Year};
use serde::Serialize;

/// String bounds used to cut one month out of a price history.
///
/// Both bounds are inclusive and compared lexicographically against
/// `YYYY-MM-DD` dates. `upper` is the bare `YYYY-MM` of the following month,
/// so any day of that month sorts after it and is left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthWindow {
    pub lower: String,
    pub upper: String,
}

impl MonthWindow {
    pub fn new(month: Month, year: Year) -> Self {
        let next = month.next();
        let upper_year = match next {
            Month::Jan => year.next(),
            _ => year,
        };

        MonthWindow {
            lower: format!("{}-{}", year, month.two_digit()),
            upper: format!("{}-{}", upper_year, next.two_digit()),
        }
    }

    pub fn contains(&self, date: &str) -> bool {
        self.lower.as_str() <= date && date <= self.upper.as_str()
    }
}

/// Rows of `history` that fall in the window of `month`/`year`, in input order.
pub fn select_month(history: &[PriceRow], month: Month, year: Year) -> Vec<MonthRow> {
    let window = MonthWindow::new(month, year);
    history
        .iter()
        .filter(|row| window.contains(&row.date.format("%Y-%m-%d").to_string()))
        .map(MonthRow::from)
        .collect()
}

/// Same as [`select_month`] for raw selector values, e.g. `("Mar", "2020")`.
pub fn select_month_str(
    history: &[PriceRow],
    month: &str,
    year: &str,
) -> Result<Vec<MonthRow>, ParseError> {
    Ok(select_month(history, month.parse()?, year.parse()?))
}
