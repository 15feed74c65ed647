//! Statement shapes: the closed set of CSV layouts an importer can be
//! configured for. Each shape owns its extra columns, its date column, and
//! its rule for deciding the direction of a row.

pub mod checking_account;
pub mod credit_card;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::RowError;
use crate::types::{Direction, RawRow};

/// Columns every supported statement carries. Extra columns are tolerated.
pub const BASE_COLUMNS: &[&str] = &[
    "Transaction Date",
    "Post Date",
    "Description",
    "Category",
    "Type",
    "Amount",
    "Memo",
];

pub const TRANSACTION_DATE: &str = "Transaction Date";
pub const PAYEE: &str = "Description";
pub const NARRATION: &str = "Type";
pub const AMOUNT: &str = "Amount";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatementShape {
    CheckingAccount,
    CreditCard,
}

impl StatementShape {
    pub fn label(&self) -> &'static str {
        match self {
            StatementShape::CheckingAccount => "Checking account",
            StatementShape::CreditCard => "Credit card",
        }
    }

    /// Base columns plus whatever this shape reads on top of them
    pub fn required_columns(&self) -> impl Iterator<Item = &'static str> {
        let extra = match self {
            StatementShape::CheckingAccount => checking_account::EXTRA_COLUMNS,
            StatementShape::CreditCard => credit_card::EXTRA_COLUMNS,
        };
        BASE_COLUMNS.iter().chain(extra.iter()).copied()
    }

    /// Column holding the date the entry is booked on
    pub fn date_column(&self) -> &'static str {
        match self {
            StatementShape::CheckingAccount => checking_account::DATE_COLUMN,
            StatementShape::CreditCard => credit_card::DATE_COLUMN,
        }
    }

    pub fn direction(&self, row: &RawRow, amount: Decimal) -> Result<Direction, RowError> {
        match self {
            StatementShape::CheckingAccount => checking_account::direction(row),
            StatementShape::CreditCard => Ok(credit_card::direction(amount)),
        }
    }
}
