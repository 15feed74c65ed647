//! Plain-text ledger rendering (beancount-style)
//!
//!   2024-01-05 ! "COFFEE SHOP" "Purchase"
//!     Assets:Bank:Checking  4.50 USD
//!     Expenses:FIXME  -4.50 USD

use std::fmt;

use crate::ledger::{Amount, Posting, Transaction};

fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.number, self.currency)
    }
}

impl fmt::Display for Posting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {}  {}", self.account, self.units)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.date.format("%Y-%m-%d"),
            self.flag.as_char(),
            quoted(&self.payee),
            quoted(&self.narration)
        )?;
        for tag in &self.tags {
            write!(f, " #{tag}")?;
        }
        for link in &self.links {
            write!(f, " ^{link}")?;
        }
        writeln!(f)?;
        for p in &self.postings {
            writeln!(f, "{p}")?;
        }
        Ok(())
    }
}

/// Render transactions separated by blank lines
pub fn render_ledger(txns: &[Transaction]) -> String {
    txns.iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
