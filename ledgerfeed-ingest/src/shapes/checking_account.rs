//! Checking account export
//!
//! Header (column order varies between exports):
//!   Details,Posting Date,Transaction Date,Post Date,Description,Category,Type,Amount,Memo,Balance
//!   DEBIT,01/05/2024,01/05/2024,01/05/2024,COFFEE SHOP,Food & Drink,Purchase,4.50,,1995.50

use crate::error::RowError;
use crate::types::{Direction, RawRow};

pub const EXTRA_COLUMNS: &[&str] = &["Details", "Posting Date"];
pub const DATE_COLUMN: &str = "Posting Date";

const DETAILS: &str = "Details";
const DEBIT: &str = "DEBIT";

/// `Details == "DEBIT"` marks money leaving the account; anything else is a credit
pub fn direction(row: &RawRow) -> Result<Direction, RowError> {
    if row.get(DETAILS)? == DEBIT {
        Ok(Direction::Expense)
    } else {
        Ok(Direction::Credit)
    }
}
