// ============================================================================
// probediff-core/src/runner.rs
// ============================================================================
//
// RUN ORCHESTRATION: Traversal, dual probing, comparison and aggregation
//
// The runner walks the root directory, selects files through the extension
// filter, probes every selected file with the embedded backend and then the
// external backend, and folds the per-file outcomes into the statistics,
// failure and disagreement lists that make up the RunReport.
//
// Per-file problems (vanished files, probe failures) never abort the run. The
// embedded backend built by run_benchmark is time-bounded and panic-safe, so
// one corrupt file cannot stall the loop or unwind through the worker pool.
// With more than one job the files are probed on a rayon pool; each worker
// returns an owned FileOutcome and the outcomes are folded in file order, so
// the aggregated state is never shared between threads.

use crate::compare::compare;
use crate::config::{FailurePolicy, ProbeConfig};
use crate::discovery::find_media_files;
use crate::embedded::create_probe;
use crate::error::{CoreError, CoreResult};
use crate::extensions::{ExtensionFilter, ExtensionSet};
use crate::external::check_dependency;
use crate::probe::{Backend, ProbeOutcome, StreamCounts, StreamProbe, TimedOutcome, run_probe};
use crate::report::{ProbeFailureRecord, RunReport};
use crate::stats::StatsAggregator;

use rayon::prelude::*;

use std::path::{Path, PathBuf};
use std::time::Instant;

/// What happened to one selected file.
#[derive(Debug, Clone)]
pub enum FileOutcome {
    /// Both backends were run against the file.
    Probed(ProbedFile),
    /// The file was gone by the time it was due to be probed.
    Vanished(PathBuf),
}

#[derive(Debug, Clone)]
pub struct ProbedFile {
    pub path: PathBuf,
    pub extension: String,
    pub embedded: TimedOutcome,
    pub external: TimedOutcome,
}

/// Drives one benchmark run over a directory tree.
pub struct BenchmarkRunner<'a> {
    config: &'a ProbeConfig,
    extensions: &'a ExtensionSet,
    embedded: &'a dyn StreamProbe,
    external: &'a dyn StreamProbe,
}

impl<'a> BenchmarkRunner<'a> {
    pub fn new(
        config: &'a ProbeConfig,
        extensions: &'a ExtensionSet,
        embedded: &'a dyn StreamProbe,
        external: &'a dyn StreamProbe,
    ) -> Self {
        Self {
            config,
            extensions,
            embedded,
            external,
        }
    }

    /// Runs the benchmark over every file below `root`.
    ///
    /// Only a missing root directory or a failure to set up the worker pool
    /// is returned as an error; everything that goes wrong for an individual
    /// file ends up in the report.
    pub fn run(&self, root: &Path) -> CoreResult<RunReport> {
        let start = Instant::now();

        let files = find_media_files(root)?;
        let found = files.len();

        let mut filter = ExtensionFilter::new(self.extensions);
        let selected: Vec<(PathBuf, String)> = files
            .into_iter()
            .filter_map(|path| filter.admit(&path).map(|ext| (path, ext)))
            .collect();

        log::info!(
            "Filtering for {}: {} of {} files selected",
            self.config.class.description(),
            selected.len(),
            found
        );

        let (unsupported, affected) = self.unsupported_extensions(&selected);
        if !unsupported.is_empty() {
            log::warn!(
                "The {} embedded backend cannot read {} ({} of {} selected files); \
                 those files will be listed as embedded failures",
                self.embedded.name(),
                unsupported.join(", "),
                affected,
                selected.len()
            );
        }

        let mut acc = RunAccumulator::new(self.config.failure_policy);
        let total = selected.len();

        if self.config.jobs <= 1 || total <= 1 {
            for (index, (path, ext)) in selected.iter().enumerate() {
                acc.absorb(self.probe_file(index, total, path, ext));
            }
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.jobs)
                .build()
                .map_err(|e| CoreError::OperationFailed(format!("failed to start worker pool: {e}")))?;
            let outcomes: Vec<FileOutcome> = pool.install(|| {
                selected
                    .par_iter()
                    .enumerate()
                    .map(|(index, (path, ext))| self.probe_file(index, total, path, ext))
                    .collect()
            });
            for outcome in outcomes {
                acc.absorb(outcome);
            }
        }

        let mut report = acc.into_report(self.config, root);
        report.skipped_extensions = filter.into_skipped();
        report.unsupported_extensions = unsupported;
        report.elapsed = start.elapsed();
        Ok(report)
    }

    /// Selected extensions outside the embedded backend's formats, in
    /// first-seen order, and the number of selected files carrying them.
    fn unsupported_extensions(&self, selected: &[(PathBuf, String)]) -> (Vec<String>, usize) {
        let mut extensions: Vec<String> = Vec::new();
        let mut files = 0;
        for (_, ext) in selected {
            if self.embedded.supports_extension(ext) {
                continue;
            }
            files += 1;
            if !extensions.contains(ext) {
                extensions.push(ext.clone());
            }
        }
        (extensions, files)
    }

    /// Probes one file with both backends, embedded first.
    pub fn probe_file(&self, index: usize, total: usize, path: &Path, extension: &str) -> FileOutcome {
        if !path.is_file() {
            log::warn!("File {} not found!", path.display());
            return FileOutcome::Vanished(path.to_path_buf());
        }

        let embedded = run_probe(self.embedded, path);
        let external = run_probe(self.external, path);

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        log::info!(
            "{} of {}: {} -> {} {} in {:.1?}; {} {} in {:.1?}",
            index + 1,
            total,
            name,
            self.embedded.name(),
            embedded.outcome,
            embedded.elapsed,
            self.external.name(),
            external.outcome,
            external.elapsed
        );
        for (probe, timed) in [(self.embedded, &embedded), (self.external, &external)] {
            if let Some(reason) = timed.outcome.failure_reason() {
                log::warn!("  {} failed on {}: {}", probe.name(), name, reason);
            }
        }

        FileOutcome::Probed(ProbedFile {
            path: path.to_path_buf(),
            extension: extension.to_string(),
            embedded,
            external,
        })
    }
}

/// Ordered fold of file outcomes into the run's aggregated state.
#[derive(Debug)]
struct RunAccumulator {
    policy: FailurePolicy,
    stats: StatsAggregator,
    processed: u64,
    vanished: Vec<PathBuf>,
    failures: Vec<ProbeFailureRecord>,
    disagreements: Vec<crate::compare::DisagreementRecord>,
}

impl RunAccumulator {
    fn new(policy: FailurePolicy) -> Self {
        Self {
            policy,
            stats: StatsAggregator::new(),
            processed: 0,
            vanished: Vec::new(),
            failures: Vec::new(),
            disagreements: Vec::new(),
        }
    }

    fn absorb(&mut self, outcome: FileOutcome) {
        let file = match outcome {
            FileOutcome::Vanished(path) => {
                self.vanished.push(path);
                return;
            }
            FileOutcome::Probed(file) => file,
        };

        self.processed += 1;
        self.stats.record(&file.extension, Backend::Embedded, file.embedded.elapsed);
        self.stats.record(&file.extension, Backend::External, file.external.elapsed);

        for (backend, timed) in [
            (Backend::Embedded, &file.embedded),
            (Backend::External, &file.external),
        ] {
            if let ProbeOutcome::Failed { reason } = &timed.outcome {
                self.failures.push(ProbeFailureRecord {
                    path: file.path.clone(),
                    backend,
                    reason: reason.clone(),
                });
            }
        }

        if let Some((embedded, external)) = self.comparable_counts(&file) {
            if let Some(record) = compare(&file.path, embedded, external) {
                log::warn!(
                    "Backends do not agree on the number of streams for {}: embedded {}, external {}",
                    file.path.display(),
                    embedded,
                    external
                );
                self.disagreements.push(record);
            }
        }
    }

    fn comparable_counts(&self, file: &ProbedFile) -> Option<(StreamCounts, StreamCounts)> {
        match self.policy {
            FailurePolicy::Skip => file.embedded.outcome.counts().zip(file.external.outcome.counts()),
            FailurePolicy::TreatAsZero => Some((
                file.embedded.outcome.counts_or_zero(),
                file.external.outcome.counts_or_zero(),
            )),
        }
    }

    fn into_report(self, config: &ProbeConfig, root: &Path) -> RunReport {
        let mut report = RunReport::new(config.class, root.to_path_buf());
        report.files_processed = self.processed;
        report.extension_stats = self.stats.into_stats();
        report.vanished_files = self.vanished;
        report.probe_failures = self.failures;
        report.disagreements = self.disagreements;
        report
    }
}

/// Runs a complete benchmark with the probes described by `config`.
///
/// Performs the fatal checks first: configuration, root directory, and the
/// availability of the external probe command.
///
/// # Examples
///
/// ```rust,no_run
/// use probediff_core::{ExtensionClass, ProbeConfig, run_benchmark};
/// use std::path::Path;
///
/// let config = ProbeConfig::new(ExtensionClass::AudioVideo);
/// let report = run_benchmark(&config, Path::new("/path/to/media")).unwrap();
/// println!("{} disagreements", report.disagreements.len());
/// ```
pub fn run_benchmark(config: &ProbeConfig, root: &Path) -> CoreResult<RunReport> {
    config.validate()?;
    if !root.is_dir() {
        return Err(CoreError::DirectoryNotFound(root.to_path_buf()));
    }

    let extensions = config.load_extensions()?;
    let external = config.ffprobe_executor();
    check_dependency(external.program())?;
    let embedded = create_probe(config.embedded_backend, config.embedded_timeout)?;

    log::debug!(
        "Embedded backend: {} (limit {:?}), external: {}, jobs: {}, failure policy: {}",
        embedded.name(),
        embedded.timeout(),
        external.program().display(),
        config.jobs,
        config.failure_policy
    );

    BenchmarkRunner::new(config, &extensions, &embedded, &external).run(root)
}
