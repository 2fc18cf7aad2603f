//! The report produced at the end of a run.

use crate::compare::DisagreementRecord;
use crate::extensions::ExtensionClass;
use crate::probe::Backend;
use crate::stats::ExtensionStats;

use serde::{Serialize, Serializer};

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// A backend that could not produce counts for a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeFailureRecord {
    pub path: PathBuf,
    pub backend: Backend,
    pub reason: String,
}

/// Everything observed during one run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Extension class the run selected files by
    pub class: ExtensionClass,

    /// Directory that was walked
    pub root: PathBuf,

    /// Wall time of the whole run, traversal included
    #[serde(serialize_with = "serialize_secs")]
    pub elapsed: Duration,

    /// Files probed by both backends
    pub files_processed: u64,

    /// Statistics keyed by normalized extension
    pub extension_stats: BTreeMap<String, ExtensionStats>,

    /// Distinct extensions that were not selected, in first-seen order
    pub skipped_extensions: Vec<String>,

    /// Selected extensions the embedded backend cannot read, in first-seen
    /// order; their files show up as embedded failures
    pub unsupported_extensions: Vec<String>,

    /// Files that disappeared between traversal and probing
    pub vanished_files: Vec<PathBuf>,

    /// Soft failures of either backend, in file order
    pub probe_failures: Vec<ProbeFailureRecord>,

    /// Files on which the backends disagree, in file order
    pub disagreements: Vec<DisagreementRecord>,
}

impl RunReport {
    pub fn new(class: ExtensionClass, root: PathBuf) -> Self {
        Self {
            class,
            root,
            elapsed: Duration::ZERO,
            files_processed: 0,
            extension_stats: BTreeMap::new(),
            skipped_extensions: Vec::new(),
            unsupported_extensions: Vec::new(),
            vanished_files: Vec::new(),
            probe_failures: Vec::new(),
            disagreements: Vec::new(),
        }
    }

    /// Probe invocations per second over the whole run, counting both
    /// backends (two items per file). Zero when nothing was processed.
    pub fn overall_throughput(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if self.files_processed == 0 || secs <= 0.0 {
            return 0.0;
        }
        (self.files_processed * 2) as f64 / secs
    }

    pub fn stats_for(&self, extension: &str) -> Option<&ExtensionStats> {
        self.extension_stats.get(extension)
    }

    pub fn failures_for(&self, backend: Backend) -> impl Iterator<Item = &ProbeFailureRecord> {
        self.probe_failures.iter().filter(move |f| f.backend == backend)
    }

    pub fn has_disagreements(&self) -> bool {
        !self.disagreements.is_empty()
    }
}

pub(crate) fn serialize_secs<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(duration.as_secs_f64())
}
