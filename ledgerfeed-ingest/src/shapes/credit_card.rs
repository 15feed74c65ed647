//! Credit card export: only the base columns, purchases are negative
//!
//!   Transaction Date,Post Date,Description,Category,Type,Amount,Memo
//!   03/02/2024,03/03/2024,GROCERY MART,Groceries,Sale,-82.17,

use rust_decimal::Decimal;

use crate::types::Direction;

pub const EXTRA_COLUMNS: &[&str] = &[];
pub const DATE_COLUMN: &str = "Post Date";

pub fn direction(amount: Decimal) -> Direction {
    if amount.is_sign_negative() && !amount.is_zero() {
        Direction::Expense
    } else {
        Direction::Credit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_sign_decides_direction() {
        assert_eq!(direction(dec!(-82.17)), Direction::Expense);
        assert_eq!(direction(dec!(500.00)), Direction::Credit);
        assert_eq!(direction(dec!(0)), Direction::Credit);
    }
}
