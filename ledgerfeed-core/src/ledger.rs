//! Double-entry ledger records produced by statement importers

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Neg;

/// A decimal quantity of a single currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    pub number: Decimal,
    pub currency: String,
}

impl Amount {
    pub fn new(number: Decimal, currency: impl Into<String>) -> Self {
        Self {
            number,
            currency: currency.into(),
        }
    }
}

impl Neg for &Amount {
    type Output = Amount;

    fn neg(self) -> Amount {
        Amount {
            number: -self.number,
            currency: self.currency.clone(),
        }
    }
}

/// One account/amount leg of a transaction. Never carries a cost or price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    /// Colon-delimited account path, e.g. `Assets:Bank:Checking`
    pub account: String,
    pub units: Amount,
}

impl Posting {
    pub fn new(account: impl Into<String>, units: Amount) -> Self {
        Self {
            account: account.into(),
            units,
        }
    }
}

/// Transaction status marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flag {
    #[serde(rename = "*")]
    Okay,
    /// Imported entries that a human still has to look at
    #[serde(rename = "!")]
    Review,
}

impl Flag {
    pub fn as_char(&self) -> char {
        match self {
            Flag::Okay => '*',
            Flag::Review => '!',
        }
    }
}

/// Where a record came from: source file and zero-based data row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub filename: String,
    pub lineno: usize,
}

/// A dated, flagged set of postings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub meta: Meta,
    pub date: NaiveDate,
    pub flag: Flag,
    pub payee: String,
    pub narration: String,
    /// Reserved; importers leave these empty
    pub tags: BTreeSet<String>,
    pub links: BTreeSet<String>,
    pub postings: Vec<Posting>,
}

impl Transaction {
    /// Create a transaction flagged for review, with no postings yet
    pub fn new(
        meta: Meta,
        date: NaiveDate,
        payee: impl Into<String>,
        narration: impl Into<String>,
    ) -> Self {
        Self {
            meta,
            date,
            flag: Flag::Review,
            payee: payee.into(),
            narration: narration.into(),
            tags: BTreeSet::new(),
            links: BTreeSet::new(),
            postings: Vec::new(),
        }
    }

    pub fn with_posting(mut self, posting: Posting) -> Self {
        self.postings.push(posting);
        self
    }

    /// Sum of posting amounts per currency
    pub fn totals(&self) -> BTreeMap<&str, Decimal> {
        let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
        for p in &self.postings {
            *totals.entry(p.units.currency.as_str()).or_default() += p.units.number;
        }
        totals
    }

    /// True when every currency nets to exactly zero
    pub fn is_balanced(&self) -> bool {
        self.totals().values().all(|n| n.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn meta() -> Meta {
        Meta {
            filename: "statement.csv".to_string(),
            lineno: 0,
        }
    }

    #[test]
    fn test_negation_is_exact() {
        let a = Amount::new(dec!(1234.56), "USD");
        let n = -&a;
        assert_eq!(n.number, dec!(-1234.56));
        assert_eq!(n.currency, "USD");
        assert_eq!(a.number + n.number, Decimal::ZERO);
    }

    #[test]
    fn test_new_transaction_is_flagged_for_review() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let txn = Transaction::new(meta(), date, "COFFEE SHOP", "Purchase");
        assert_eq!(txn.flag, Flag::Review);
        assert!(txn.tags.is_empty());
        assert!(txn.links.is_empty());
        assert!(txn.postings.is_empty());
    }

    #[test]
    fn test_balanced_two_legs() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let primary = Amount::new(dec!(4.50), "USD");
        let txn = Transaction::new(meta(), date, "COFFEE SHOP", "Purchase")
            .with_posting(Posting::new("Assets:Bank:Checking", primary.clone()))
            .with_posting(Posting::new("Expenses:FIXME", -&primary));
        assert!(txn.is_balanced());
        assert_eq!(txn.totals().get("USD"), Some(&Decimal::ZERO));
    }

    #[test]
    fn test_single_leg_is_not_balanced() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let txn = Transaction::new(meta(), date, "PAYROLL", "ACH_CREDIT")
            .with_posting(Posting::new("Assets:Bank:Checking", Amount::new(dec!(100), "USD")));
        assert!(!txn.is_balanced());
    }

    #[test]
    fn test_currencies_balance_independently() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let txn = Transaction::new(meta(), date, "FX", "Transfer")
            .with_posting(Posting::new("Assets:A", Amount::new(dec!(10), "USD")))
            .with_posting(Posting::new("Assets:B", Amount::new(dec!(-10), "EUR")));
        assert!(!txn.is_balanced());
    }

    #[test]
    fn test_flag_serializes_as_marker() {
        let json = serde_json::to_string(&Flag::Review).unwrap();
        assert_eq!(json, "\"!\"");
    }
}
