//! The external price tool, invoked once per day:
//!   <tool> <commodities-file> --date YYYY-MM-DD -i

use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

use crate::error::FetchError;

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Fetches price lines for every commodity on a single day
pub trait PriceFetcher {
    fn fetch(&self, commodities: &Path, date: NaiveDate) -> Result<String, FetchError>;
}

impl<F> PriceFetcher for F
where
    F: Fn(&Path, NaiveDate) -> Result<String, FetchError>,
{
    fn fetch(&self, commodities: &Path, date: NaiveDate) -> Result<String, FetchError> {
        self(commodities, date)
    }
}

/// Runs a `bean-price`-compatible executable and captures its stdout
#[derive(Debug, Clone)]
pub struct BeanPrice {
    program: PathBuf,
}

impl BeanPrice {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn command(&self, commodities: &Path, date: NaiveDate) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(commodities)
            .arg("--date")
            .arg(date.format(ISO_DATE_FORMAT).to_string())
            .arg("-i")
            .stdin(Stdio::null());
        cmd
    }
}

impl PriceFetcher for BeanPrice {
    fn fetch(&self, commodities: &Path, date: NaiveDate) -> Result<String, FetchError> {
        let mut cmd = self.command(commodities, date);
        debug!(?cmd, "running price tool");

        let output = cmd.output().map_err(|source| FetchError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(FetchError::Exit {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line() {
        let tool = BeanPrice::new("/usr/local/bin/bean-price");
        let date = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        let cmd = tool.command(Path::new("commodities.beancount"), date);

        assert_eq!(cmd.get_program(), "/usr/local/bin/bean-price");
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(args, ["commodities.beancount", "--date", "2024-03-11", "-i"]);
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let tool = BeanPrice::new("/nonexistent/bean-price");
        let date = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        let err = tool.fetch(Path::new("commodities.beancount"), date).unwrap_err();
        assert!(matches!(err, FetchError::Spawn { .. }));
    }
}
