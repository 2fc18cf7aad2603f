//! Stream count comparison between the two backends.

use crate::probe::StreamCounts;

use serde::Serialize;

use std::path::{Path, PathBuf};

/// A file on which the backends reported different stream counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisagreementRecord {
    pub path: PathBuf,
    pub embedded: StreamCounts,
    pub external: StreamCounts,
}

/// True when all three counts match.
pub fn counts_agree(embedded: &StreamCounts, external: &StreamCounts) -> bool {
    embedded == external
}

/// Compares both results for `path`, producing a record only on mismatch.
/// Neither side is preferred; the record carries both triples as reported.
pub fn compare(path: &Path, embedded: StreamCounts, external: StreamCounts) -> Option<DisagreementRecord> {
    if counts_agree(&embedded, &external) {
        return None;
    }
    Some(DisagreementRecord {
        path: path.to_path_buf(),
        embedded,
        external,
    })
}
