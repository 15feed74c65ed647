//! Day-by-day price backfill over an append-only price history

use chrono::{Days, NaiveDate};
use regex::Regex;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::{error, info};

use crate::error::PriceError;
use crate::fetcher::{PriceFetcher, ISO_DATE_FORMAT};

const ISO_DATE_PATTERN: &str = r"([12]\d{3}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01]))";

/// Prices for the last two days may not have settled yet
const SETTLE_DAYS: u64 = 2;

/// Inclusive range of days to fetch. Empty when `start > end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Range from `start` up to two days before `today`
    pub fn until_settled(start: NaiveDate, today: NaiveDate) -> Self {
        Self::new(start, default_end(today))
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

pub fn default_end(today: NaiveDate) -> NaiveDate {
    today.checked_sub_days(Days::new(SETTLE_DAYS)).unwrap_or(today)
}

/// Day after the most recent dated line of the history file.
///
/// Lines are scanned newest first; the first ISO date on a line counts, and a
/// match that is not a real calendar day falls through to earlier lines.
pub fn determine_start_date(history: &Path) -> Result<Option<NaiveDate>, PriceError> {
    let text = fs::read_to_string(history).map_err(|source| PriceError::Io {
        path: history.to_path_buf(),
        source,
    })?;
    let re = Regex::new(ISO_DATE_PATTERN)?;

    for line in text.lines().rev() {
        let Some(caps) = re.captures(line) else {
            continue;
        };
        match NaiveDate::parse_from_str(&caps[1], ISO_DATE_FORMAT) {
            Ok(last) => return Ok(last.succ_opt()),
            Err(_) => continue,
        }
    }
    Ok(None)
}

/// Output of a walk: everything fetched before the walk stopped
#[derive(Debug, Default)]
pub struct Backfill {
    pub output: String,
    pub fetched: Vec<NaiveDate>,
    /// Set when a day failed; no later day was attempted
    pub failure: Option<PriceError>,
}

/// Invoke `fetcher` for every day in `range`, ascending. Stops at the first
/// failure and keeps what was gathered so far. No retries.
pub fn update_prices(
    fetcher: &impl PriceFetcher,
    commodities: &Path,
    range: DateRange,
) -> Backfill {
    let mut backfill = Backfill::default();

    for date in range.days() {
        match fetcher.fetch(commodities, date) {
            Ok(stdout) => {
                backfill.output.push_str(&stdout);
                backfill.output.push('\n');
                backfill.fetched.push(date);
                info!(%date, "updated prices");
            }
            Err(source) => {
                error!(%date, error = %source, "failed to update prices");
                backfill.failure = Some(PriceError::Fetch { date, source });
                break;
            }
        }
    }
    backfill
}

/// Append fetched text verbatim to the history file
pub fn write_output(history: &Path, output: &str) -> Result<(), PriceError> {
    let io_err = |source| PriceError::Io {
        path: history.to_path_buf(),
        source,
    };
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(history)
        .map_err(io_err)?;
    file.write_all(output.as_bytes()).map_err(io_err)?;
    info!(file = %history.display(), bytes = output.len(), "appended prices");
    Ok(())
}
