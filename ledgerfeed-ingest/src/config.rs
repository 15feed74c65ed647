use serde::{Deserialize, Serialize};

use crate::shapes::StatementShape;

/// Per-account importer settings, one `[[importers]]` table in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImporterConfig {
    pub shape: StatementShape,
    /// Ledger account the statement belongs to, e.g. `Assets:Bank:Checking`
    pub account: String,
    /// Counter-account for money leaving the account
    #[serde(default)]
    pub expense_category: Option<String>,
    /// Counter-account for money entering the account
    #[serde(default)]
    pub income_category: Option<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// WHATWG encoding label
    #[serde(default = "default_encoding")]
    pub encoding: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

impl ImporterConfig {
    pub fn new(shape: StatementShape, account: impl Into<String>) -> Self {
        Self {
            shape,
            account: account.into(),
            expense_category: None,
            income_category: None,
            currency: default_currency(),
            encoding: default_encoding(),
        }
    }

    pub fn with_expense_category(mut self, account: impl Into<String>) -> Self {
        self.expense_category = Some(account.into());
        self
    }

    pub fn with_income_category(mut self, account: impl Into<String>) -> Self {
        self.income_category = Some(account.into());
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = label.into();
        self
    }

    /// Empty strings count as "not configured"
    pub fn expense_category(&self) -> Option<&str> {
        self.expense_category.as_deref().filter(|s| !s.is_empty())
    }

    pub fn income_category(&self) -> Option<&str> {
        self.income_category.as_deref().filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_toml() {
        let cfg: ImporterConfig = toml::from_str(
            r#"
shape = "checking-account"
account = "Assets:GenericBank:Checking"
expense_category = "Expenses:FIXME"
"#,
        )
        .unwrap();
        assert_eq!(cfg.currency, "USD");
        assert_eq!(cfg.encoding, "utf-8");
        assert_eq!(cfg.expense_category(), Some("Expenses:FIXME"));
        assert_eq!(cfg.income_category(), None);
    }

    #[test]
    fn test_empty_category_is_unconfigured() {
        let cfg = ImporterConfig::new(StatementShape::CreditCard, "Liabilities:Card")
            .with_expense_category("")
            .with_income_category("Income:FIXME");
        assert_eq!(cfg.expense_category(), None);
        assert_eq!(cfg.income_category(), Some("Income:FIXME"));
    }
}
