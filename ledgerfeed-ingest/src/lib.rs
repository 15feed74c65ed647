//! ledgerfeed-ingest: bank CSV statement detection and conversion into
//! double-entry transactions.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod importer;
pub mod shapes;
pub mod types;

pub use config::ImporterConfig;
pub use dispatch::{extract_all, identify_with};
pub use error::{ImportError, RowError};
pub use importer::Importer;
pub use shapes::StatementShape;
pub use types::{Direction, RawRow};
