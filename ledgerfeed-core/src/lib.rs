//! ledgerfeed-core: double-entry ledger types shared by importers and the CLI

pub mod format;
pub mod ledger;

pub use format::render_ledger;
pub use ledger::{Amount, Flag, Meta, Posting, Transaction};
