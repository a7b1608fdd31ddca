use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The ISO calendar format used by the store, the CLI and the CSV files.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Whether chrono can render `format`. Formatting with a pattern that fails
/// this check makes `to_string()` panic.
pub fn is_valid_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// A calendar date as it reaches the metrics layer.
///
/// Rows read from the database carry parsed dates, while imported or
/// hand-built records may still hold the raw text. Both forms must yield the
/// same metrics for the same day, and unparsable text must never abort a
/// calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateValue {
    Parsed(NaiveDate),
    Text(String),
}

impl DateValue {
    /// Resolves the value to a calendar date, or `None` if the text does not
    /// match `format`.
    pub fn resolve(&self, format: &str) -> Option<NaiveDate> {
        match self {
            DateValue::Parsed(date) => Some(*date),
            DateValue::Text(text) => NaiveDate::parse_from_str(text.trim(), format).ok(),
        }
    }

    /// Renders the value for tabular output. Raw text is passed through as-is.
    pub fn render(&self, format: &str) -> String {
        match self {
            DateValue::Parsed(date) => date.format(format).to_string(),
            DateValue::Text(text) => text.clone(),
        }
    }
}

impl From<NaiveDate> for DateValue {
    fn from(date: NaiveDate) -> Self {
        DateValue::Parsed(date)
    }
}

impl From<&str> for DateValue {
    fn from(text: &str) -> Self {
        DateValue::Text(text.to_string())
    }
}

impl From<String> for DateValue {
    fn from(text: String) -> Self {
        DateValue::Text(text)
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(DEFAULT_DATE_FORMAT))
    }
}
