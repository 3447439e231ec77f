use history_model::Month;
use price_chart::escape;
use serde::Deserialize;

pub const FIRST_YEAR: u16 = 2000;

const INTRO: &str = "This site is a simple app that makes a call to the Alpha Vantage API and plots \
a months worth of closing prices for a given stock. Have fun!";

/// Raw selector values. An empty string is the unselected state.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct ChartForm {
    pub ticker: String,
    pub year: String,
    pub month: String,
}

impl ChartForm {
    pub fn is_complete(&self) -> bool {
        !self.ticker.trim().is_empty() && !self.year.is_empty() && !self.month.is_empty()
    }
}

fn select(out: &mut String, name: &str, label: &str, options: &[String], selected: &str) {
    out.push_str(&format!("<label>{label} <select name=\"{name}\">\n"));
    out.push_str("<option value=\"\"></option>\n");
    for option in options {
        let mark = if option == selected { " selected" } else { "" };
        out.push_str(&format!(
            "<option value=\"{v}\"{mark}>{v}</option>\n",
            v = escape(option)
        ));
    }
    out.push_str("</select></label>\n");
}

/// The selector page, newest year first, with `body` below the form.
pub fn render_page(form: &ChartForm, last_year: u16, body: &str) -> String {
    let years: Vec<String> = (FIRST_YEAR..=last_year.max(FIRST_YEAR))
        .rev()
        .map(|y| y.to_string())
        .collect();
    let months: Vec<String> = Month::ALL.iter().map(|m| m.to_string()).collect();

    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>Monthly stock prices</title></head><body>\n");
    out.push_str(&format!("<p>{}</p>\n", INTRO));
    out.push_str("<form method=\"get\" action=\"/\">\n");
    out.push_str(&format!(
        "<label>Enter a ticker (e.g. IBM) <input type=\"text\" name=\"ticker\" value=\"{}\"></label>\n",
        escape(&form.ticker)
    ));
    select(&mut out, "year", "Enter a year", &years, &form.year);
    select(&mut out, "month", "Enter a month", &months, &form.month);
    out.push_str("<button type=\"submit\">Plot</button>\n</form>\n");
    out.push_str(body);
    out.push_str("\n</body></html>\n");
    out
}

pub fn message(text: &str) -> String {
    format!("<p>{}</p>", escape(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_complete_pass() {
        let form = ChartForm {
            ticker: "IBM".to_string(),
            year: "2020".to_string(),
            month: "Mar".to_string(),
        };
        assert!(form.is_complete());
    }

    #[test]
    fn is_complete_fail_any_unselected() {
        assert!(!ChartForm::default().is_complete());
        let form = ChartForm {
            ticker: " ".to_string(),
            year: "2020".to_string(),
            month: "Mar".to_string(),
        };
        assert!(!form.is_complete());
        let form = ChartForm {
            ticker: "IBM".to_string(),
            year: "2020".to_string(),
            month: String::new(),
        };
        assert!(!form.is_complete());
    }

    #[test]
    fn render_page_pass_selectors() {
        let page = render_page(&ChartForm::default(), 2026, "");
        assert!(page.contains(r#"<option value="2026">2026</option>"#));
        assert!(page.contains(r#"<option value="2000">2000</option>"#));
        assert!(!page.contains(r#"<option value="1999">"#));
        assert!(page.contains(r#"<option value="Dec">Dec</option>"#));
        assert_eq!(page.matches(r#"<option value=""></option>"#).count(), 2);
        assert!(page.find("2026").unwrap() < page.find("2025").unwrap());
    }

    #[test]
    fn render_page_pass_keeps_selection() {
        let form = ChartForm {
            ticker: "ibm\"><x".to_string(),
            year: "2020".to_string(),
            month: "Mar".to_string(),
        };
        let page = render_page(&form, 2026, "<p>body</p>");
        assert!(page.contains(r#"<option value="2020" selected>2020</option>"#));
        assert!(page.contains(r#"<option value="Mar" selected>Mar</option>"#));
        assert!(page.contains(r#"value="ibm&quot;&gt;&lt;x""#));
        assert!(page.contains("<p>body</p>"));
    }
}
