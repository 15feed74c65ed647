use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

use crate::error::RowError;

/// Statements write dates as month/day/year
pub const STATEMENT_DATE_FORMAT: &str = "%m/%d/%Y";

/// Whether a row moves money out of (expense) or into (credit) the account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Expense,
    Credit,
}

/// One CSV data row keyed by header name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    fields: HashMap<String, String>,
}

impl RawRow {
    pub fn from_record(headers: &csv::StringRecord, record: &csv::StringRecord) -> Self {
        let fields = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.to_string(), v.to_string()))
            .collect();
        Self { fields }
    }

    pub fn get(&self, column: &'static str) -> Result<&str, RowError> {
        self.fields
            .get(column)
            .map(String::as_str)
            .ok_or(RowError::MissingColumn(column))
    }

    pub fn date(&self, column: &'static str) -> Result<NaiveDate, RowError> {
        let value = self.get(column)?;
        NaiveDate::parse_from_str(value.trim(), STATEMENT_DATE_FORMAT).map_err(|source| {
            RowError::Date {
                column,
                value: value.to_string(),
                source,
            }
        })
    }

    /// Exact decimal parse; no float round-trip
    pub fn decimal(&self, column: &'static str) -> Result<Decimal, RowError> {
        let value = self.get(column)?;
        Decimal::from_str(value.trim()).map_err(|source| RowError::Amount {
            column,
            value: value.to_string(),
            source,
        })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
