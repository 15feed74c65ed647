//! Running an explicit list of importers over a set of files

use ledgerfeed_core::Transaction;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::ImportError;
use crate::importer::Importer;

/// First importer that recognizes `path`, in list order
pub fn identify_with<'a>(importers: &'a [Importer], path: &Path) -> Option<&'a Importer> {
    importers.iter().find(|imp| imp.identify(path))
}

/// Extract every recognized file, in the order given. Unrecognized files are
/// logged and skipped; the first extraction error aborts the run.
pub fn extract_all(
    importers: &[Importer],
    paths: &[PathBuf],
) -> Result<Vec<Transaction>, ImportError> {
    let mut out = Vec::new();
    for path in paths {
        match identify_with(importers, path) {
            Some(imp) => out.extend(imp.extract(path)?),
            None => warn!(file = %path.display(), "no importer recognizes this file; skipping"),
        }
    }
    Ok(out)
}
