use chrono::NaiveDate;
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// One invocation of the price tool went wrong
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("could not launch {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} exited with {status}: {stderr}", program.display())]
    Exit {
        program: PathBuf,
        status: ExitStatus,
        stderr: String,
    },
}

#[derive(Debug, Error)]
pub enum PriceError {
    #[error("{what} not found at {}", path.display())]
    Missing { what: &'static str, path: PathBuf },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no dated entry in {}; pass a start date explicitly", path.display())]
    NoStartDate { path: PathBuf },

    #[error("invalid date pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("failed to update prices for {date}: {source}")]
    Fetch {
        date: NaiveDate,
        #[source]
        source: FetchError,
    },
}
