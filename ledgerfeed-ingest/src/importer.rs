//! CSV statement importer: header detection, latest-date lookup, and
//! conversion of rows into review-flagged double-entry transactions.

use chrono::NaiveDate;
use encoding_rs::{DecoderResult, Encoding};
use ledgerfeed_core::{Amount, Meta, Posting, Transaction};
use std::borrow::Cow;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::config::ImporterConfig;
use crate::error::{ImportError, RowError};
use crate::shapes::{self, StatementShape};
use crate::types::{Direction, RawRow};

/// Give up looking for the end of the header line after this many bytes
const MAX_HEADER_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct Importer {
    config: ImporterConfig,
    encoding: &'static Encoding,
}

impl Importer {
    /// Build an importer; fails only if the encoding label is unknown
    pub fn new(config: ImporterConfig) -> Result<Self, ImportError> {
        let encoding = Encoding::for_label(config.encoding.as_bytes())
            .ok_or_else(|| ImportError::UnknownEncoding(config.encoding.clone()))?;
        Ok(Self { config, encoding })
    }

    pub fn shape(&self) -> StatementShape {
        self.config.shape
    }

    pub fn name(&self) -> String {
        format!("{}: {}", self.config.shape.label(), self.config.account)
    }

    /// Account that identified statements are filed under
    pub fn file_account(&self) -> &str {
        &self.config.account
    }

    /// True iff the first line of `path` holds every required column.
    /// Unreadable or undecodable files are simply not ours.
    pub fn identify(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match self.read_header(path) {
            Ok(line) => self.is_valid_header(&line),
            Err(e) => {
                debug!(error = %e, "identify: treating file as unrecognized");
                false
            }
        }
    }

    pub fn is_valid_header(&self, line: &str) -> bool {
        let columns: HashSet<&str> = line
            .trim()
            .split(',')
            .map(|c| c.trim_matches('"'))
            .collect();
        self.config
            .shape
            .required_columns()
            .all(|c| columns.contains(c))
    }

    /// Latest `Transaction Date` in the statement, or `None` when the file
    /// is not identified or has no data rows.
    pub fn file_date(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Option<NaiveDate>, ImportError> {
        let path = path.as_ref();
        if !self.identify(path) {
            return Ok(None);
        }

        let mut latest: Option<NaiveDate> = None;
        for (index, row) in self.rows(path)?.iter().enumerate() {
            let date = row
                .date(shapes::TRANSACTION_DATE)
                .map_err(|source| ImportError::Row {
                    path: path.to_path_buf(),
                    row: index,
                    source,
                })?;
            latest = latest.max(Some(date));
        }
        Ok(latest)
    }

    /// Convert every row into a transaction, in file order.
    ///
    /// A bad row fails the whole file: rows parsed before it are discarded
    /// and the error names the file and the zero-based row index.
    pub fn extract(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<Vec<Transaction>, ImportError> {
        let path = path.as_ref();
        if !self.identify(path) {
            return Ok(Vec::new());
        }

        let filename = path.display().to_string();
        let rows = self.rows(path)?;
        let mut txns = Vec::with_capacity(rows.len());

        for (index, row) in rows.iter().enumerate() {
            let meta = Meta {
                filename: filename.clone(),
                lineno: index,
            };
            let txn = self
                .transaction(meta, row)
                .map_err(|source| ImportError::Row {
                    path: path.to_path_buf(),
                    row: index,
                    source,
                })?;
            txns.push(txn);
        }

        info!(
            file = %filename,
            count = txns.len(),
            importer = %self.name(),
            "extracted transactions"
        );
        Ok(txns)
    }

    fn transaction(&self, meta: Meta, row: &RawRow) -> Result<Transaction, RowError> {
        let shape = self.config.shape;
        let number = row.decimal(shapes::AMOUNT)?;
        let direction = shape.direction(row, number)?;
        let date = row.date(shape.date_column())?;

        let units = Amount::new(number, &self.config.currency);
        let counter = match direction {
            Direction::Expense => self.config.expense_category(),
            Direction::Credit => self.config.income_category(),
        };
        debug!(row = meta.lineno, ?direction, %number, "row parsed");

        let payee = row.get(shapes::PAYEE)?;
        let narration = row.get(shapes::NARRATION)?;
        let mut txn = Transaction::new(meta, date, payee, narration)
            .with_posting(Posting::new(&self.config.account, units.clone()));
        if let Some(account) = counter {
            txn = txn.with_posting(Posting::new(account, -&units));
        }
        Ok(txn)
    }

    /// Decode the file incrementally until the first newline so multi-byte
    /// encodings (UTF-16) split lines on characters, not raw bytes.
    fn read_header(&self, path: &Path) -> Result<String, ImportError> {
        let io_err = |source| ImportError::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut file = File::open(path).map_err(io_err)?;
        let mut decoder = self.encoding.new_decoder();
        let mut text = String::new();
        let mut chunk = [0u8; 4096];
        let mut consumed = 0;

        loop {
            let n = file.read(&mut chunk).map_err(io_err)?;
            let last = n == 0;
            let mut src = &chunk[..n];

            loop {
                let room = decoder
                    .max_utf8_buffer_length_without_replacement(src.len())
                    .unwrap_or(src.len() * 3 + 16);
                text.reserve(room);
                let (result, read) =
                    decoder.decode_to_string_without_replacement(src, &mut text, last);
                src = &src[read..];
                match result {
                    DecoderResult::InputEmpty => break,
                    DecoderResult::OutputFull => continue,
                    DecoderResult::Malformed(..) => {
                        // Bad bytes past the header do not matter here
                        return match text.find('\n') {
                            Some(end) => Ok(text[..end].to_string()),
                            None => Err(ImportError::Decode {
                                path: path.to_path_buf(),
                                encoding: self.encoding.name(),
                            }),
                        };
                    }
                }
            }

            consumed += n;
            if let Some(end) = text.find('\n') {
                text.truncate(end);
                return Ok(text);
            }
            if last || consumed >= MAX_HEADER_BYTES {
                return Ok(text);
            }
        }
    }

    fn decode<'a>(&self, path: &Path, bytes: &'a [u8]) -> Result<Cow<'a, str>, ImportError> {
        let (text, _, had_errors) = self.encoding.decode(bytes);
        if had_errors {
            return Err(ImportError::Decode {
                path: path.to_path_buf(),
                encoding: self.encoding.name(),
            });
        }
        Ok(text)
    }

    fn rows(&self, path: &Path) -> Result<Vec<RawRow>, ImportError> {
        let bytes = fs::read(path).map_err(|source| ImportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let text = self.decode(path, &bytes)?;
        let csv_err = |source| ImportError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b',')
            .quote(b'"')
            .flexible(true)
            .from_reader(text.as_bytes());
        let headers = rdr.headers().map_err(csv_err)?.clone();

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(csv_err)?;
            rows.push(RawRow::from_record(&headers, &record));
        }
        Ok(rows)
    }
}
