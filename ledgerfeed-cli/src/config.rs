use anyhow::{Context, Result};
use ledgerfeed_ingest::{Importer, ImporterConfig, StatementShape};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Tried in order; the first importer that recognizes a file handles it
    #[serde(default)]
    pub importers: Vec<ImporterConfig>,
    #[serde(default)]
    pub prices: PricesSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PricesSection {
    /// bean-price compatible executable
    pub tool: Option<PathBuf>,
    pub commodities: Option<PathBuf>,
    /// Price history the fetched lines are appended to
    pub history: Option<PathBuf>,
}

impl Config {
    /// Starter config with one generic checking-account importer
    pub fn sample() -> Self {
        Self {
            importers: vec![
                ImporterConfig::new(StatementShape::CheckingAccount, "Assets:GenericBank:Checking")
                    .with_expense_category("Expenses:FIXME")
                    .with_income_category("Income:FIXME"),
            ],
            prices: PricesSection {
                tool: Some(PathBuf::from("bean-price")),
                commodities: Some(PathBuf::from("commodities.beancount")),
                history: Some(PathBuf::from("prices.beancount")),
            },
        }
    }

    pub fn importers(&self) -> Result<Vec<Importer>> {
        self.importers
            .iter()
            .cloned()
            .map(|cfg| {
                let account = cfg.account.clone();
                Importer::new(cfg).with_context(|| format!("importer for {account}"))
            })
            .collect()
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        warn!(path = %path.display(), "config not found; using empty defaults");
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn save_config(path: &Path, cfg: &Config) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists: {}", path.display());
        return Ok(());
    }
    save_config(path, &Config::sample())?;
    println!("Wrote {}", path.display());
    Ok(())
}
