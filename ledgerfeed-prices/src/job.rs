//! One backfill run: resolve the range, walk it, append what was fetched.
//! Re-running after a failure resumes from the last appended day.

use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::{error, info};

use crate::backfill::{
    default_end, determine_start_date, update_prices, write_output, DateRange,
};
use crate::error::PriceError;
use crate::fetcher::PriceFetcher;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceJob {
    /// Price tool executable
    pub tool: PathBuf,
    /// Commodity declarations handed to the tool
    pub commodities: PathBuf,
    /// Append-only price history
    pub history: PathBuf,
}

#[derive(Debug)]
pub struct BackfillReport {
    pub range: DateRange,
    pub fetched: Vec<NaiveDate>,
    pub bytes_written: usize,
    /// Day the walk stopped on
    pub failure: Option<PriceError>,
    /// Appending the fetched lines to the history failed
    pub write_failure: Option<PriceError>,
}

impl BackfillReport {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none() && self.write_failure.is_none()
    }
}

impl PriceJob {
    /// All three paths must exist before anything runs
    pub fn validate(&self) -> Result<(), PriceError> {
        for (what, path) in [
            ("commodities file", &self.commodities),
            ("price tool", &self.tool),
            ("prices file", &self.history),
        ] {
            if !path.exists() {
                return Err(PriceError::Missing {
                    what,
                    path: path.clone(),
                });
            }
        }
        Ok(())
    }

    /// Missing `start` is derived from the history; missing `end` is two days before `today`
    pub fn resolve_range(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<DateRange, PriceError> {
        let start = match start {
            Some(d) => d,
            None => determine_start_date(&self.history)?
                .ok_or_else(|| PriceError::NoStartDate {
                    path: self.history.clone(),
                })?,
        };
        Ok(DateRange::new(start, end.unwrap_or_else(|| default_end(today))))
    }

    /// Walk the range and append the result. A failed day and a failed append
    /// are both returned in the report; neither hides the other.
    pub fn run(
        &self,
        fetcher: &impl PriceFetcher,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<BackfillReport, PriceError> {
        let range = self.resolve_range(start, end, today)?;
        if range.is_empty() {
            info!(start = %range.start, end = %range.end, "prices already up to date");
            return Ok(BackfillReport {
                range,
                fetched: Vec::new(),
                bytes_written: 0,
                failure: None,
                write_failure: None,
            });
        }

        info!(start = %range.start, end = %range.end, "backfilling prices");
        let backfill = update_prices(fetcher, &self.commodities, range);
        let (bytes_written, write_failure) = match write_output(&self.history, &backfill.output) {
            Ok(()) => (backfill.output.len(), None),
            Err(e) => {
                error!(error = %e, fetched = backfill.fetched.len(), "could not append prices");
                (0, Some(e))
            }
        };

        Ok(BackfillReport {
            range,
            fetched: backfill.fetched,
            bytes_written,
            failure: backfill.failure,
            write_failure,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn tool_failure(msg: &str) -> FetchError {
        FetchError::Spawn {
            program: PathBuf::from("bean-price"),
            source: std::io::Error::other(msg.to_string()),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn job(dir: &TempDir, history: &str) -> PriceJob {
        let job = PriceJob {
            tool: dir.path().join("bean-price"),
            commodities: dir.path().join("commodities.beancount"),
            history: dir.path().join("prices.beancount"),
        };
        fs::write(&job.tool, "").unwrap();
        fs::write(&job.commodities, "2019-01-01 commodity USD\n").unwrap();
        fs::write(&job.history, history).unwrap();
        job
    }

    fn ok_fetcher(_: &Path, d: NaiveDate) -> Result<String, FetchError> {
        Ok(format!("{d} price USD 0.91 EUR"))
    }

    #[test]
    fn test_validate_reports_missing_file() {
        let dir = TempDir::new().unwrap();
        let j = job(&dir, "");
        assert!(j.validate().is_ok());
        fs::remove_file(&j.tool).unwrap();
        let err = j.validate().unwrap_err();
        assert!(matches!(err, PriceError::Missing { what: "price tool", .. }));
    }

    #[test]
    fn test_resolve_range_from_history() {
        let dir = TempDir::new().unwrap();
        let j = job(&dir, "2024-03-10 price USD 0.91 EUR\n");
        let range = j.resolve_range(None, None, date(2024, 3, 14)).unwrap();
        assert_eq!(range, DateRange::new(date(2024, 3, 11), date(2024, 3, 12)));
    }

    #[test]
    fn test_no_start_date_is_an_error() {
        let dir = TempDir::new().unwrap();
        let j = job(&dir, "");
        let err = j.resolve_range(None, None, date(2024, 3, 14)).unwrap_err();
        assert!(matches!(err, PriceError::NoStartDate { .. }));
        // an explicit start date does not need the history
        assert!(j.resolve_range(Some(date(2024, 1, 1)), None, date(2024, 3, 14)).is_ok());
    }

    #[test]
    fn test_run_appends_and_resumes() {
        let dir = TempDir::new().unwrap();
        let j = job(&dir, "2024-03-10 price USD 0.91 EUR\n");

        let report = j.run(&ok_fetcher, None, Some(date(2024, 3, 12)), date(2024, 3, 20)).unwrap();
        assert!(report.is_complete());
        assert_eq!(report.fetched, vec![date(2024, 3, 11), date(2024, 3, 12)]);

        let text = fs::read_to_string(&j.history).unwrap();
        assert!(text.ends_with("2024-03-11 price USD 0.91 EUR\n2024-03-12 price USD 0.91 EUR\n"));

        // second run starts where the first stopped and finds nothing to do
        let again = j.run(&ok_fetcher, None, Some(date(2024, 3, 12)), date(2024, 3, 20)).unwrap();
        assert!(again.range.is_empty());
        assert_eq!(again.bytes_written, 0);
    }

    #[test]
    fn test_run_keeps_partial_output_on_failure() {
        let dir = TempDir::new().unwrap();
        let j = job(&dir, "2024-03-10 price USD 0.91 EUR\n");
        let flaky = |_: &Path, d: NaiveDate| -> Result<String, FetchError> {
            if d == date(2024, 3, 12) {
                Err(tool_failure("timeout"))
            } else {
                Ok(format!("{d} price USD 0.91 EUR"))
            }
        };

        let report = j.run(&flaky, None, Some(date(2024, 3, 13)), date(2024, 3, 20)).unwrap();
        assert!(!report.is_complete());
        assert!(report.failure.as_ref().unwrap().to_string().contains("2024-03-12"));

        let text = fs::read_to_string(&j.history).unwrap();
        assert!(text.contains("2024-03-11 price"));
        assert!(!text.contains("2024-03-13"));

        // the next run retries the failed day
        let range = j.resolve_range(None, Some(date(2024, 3, 13)), date(2024, 3, 20)).unwrap();
        assert_eq!(range.start, date(2024, 3, 12));
    }

    #[test]
    fn test_run_reports_fetch_and_write_failures_together() {
        let dir = TempDir::new().unwrap();
        let mut j = job(&dir, "");
        // a directory exists but cannot be appended to
        j.history = dir.path().join("prices.d");
        fs::create_dir(&j.history).unwrap();
        assert!(j.validate().is_ok());

        let flaky = |_: &Path, d: NaiveDate| -> Result<String, FetchError> {
            if d == date(2024, 3, 12) {
                Err(tool_failure("timeout"))
            } else {
                Ok(format!("{d} price USD 0.91 EUR"))
            }
        };
        let report = j
            .run(&flaky, Some(date(2024, 3, 11)), Some(date(2024, 3, 13)), date(2024, 3, 20))
            .unwrap();

        assert!(!report.is_complete());
        assert_eq!(report.bytes_written, 0);
        assert!(matches!(report.write_failure, Some(PriceError::Io { .. })));
        match report.failure {
            Some(PriceError::Fetch { date: failed, .. }) => assert_eq!(failed, date(2024, 3, 12)),
            other => panic!("expected fetch failure, got {other:?}"),
        }
    }
}
