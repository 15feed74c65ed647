use std::path::PathBuf;
use thiserror::Error;

/// A single CSV row could not be turned into a transaction
#[derive(Debug, Error)]
pub enum RowError {
    #[error("missing column `{0}`")]
    MissingColumn(&'static str),

    #[error("invalid date in `{column}`: {value:?} (expected MM/DD/YYYY)")]
    Date {
        column: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid amount in `{column}`: {value:?}")]
    Amount {
        column: &'static str,
        value: String,
        #[source]
        source: rust_decimal::Error,
    },
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("unknown text encoding: {0}")]
    UnknownEncoding(String),

    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid {encoding}", path.display())]
    Decode { path: PathBuf, encoding: &'static str },

    #[error("{}: malformed CSV: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{}: row {row}: {source}", path.display())]
    Row {
        path: PathBuf,
        row: usize,
        #[source]
        source: RowError,
    },
}
