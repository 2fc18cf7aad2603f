//! Core library for benchmarking and cross-checking media stream probes.
//!
//! A run walks a directory tree, selects files by extension class, probes
//! every selected file twice (once with an in-process embedded probe and
//! once with an external `ffprobe` process), times both, aggregates the
//! timings per extension and records files on which the two probes report
//! different video/audio/subtitle stream counts.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use probediff_core::{ExtensionClass, FailurePolicy, ProbeConfigBuilder, run_benchmark};
//! use std::path::Path;
//! use std::time::Duration;
//!
//! let config = ProbeConfigBuilder::new(ExtensionClass::AudioVideo)
//!     .output_timeout(Duration::from_secs(10))
//!     .failure_policy(FailurePolicy::Skip)
//!     .jobs(4)
//!     .build();
//!
//! let report = run_benchmark(&config, Path::new("/path/to/media")).unwrap();
//! for record in &report.disagreements {
//!     println!("{}: {} vs {}", record.path.display(), record.embedded, record.external);
//! }
//! ```

pub mod compare;
pub mod config;
pub mod discovery;
pub mod embedded;
pub mod error;
pub mod extensions;
pub mod external;
pub mod file_logging;
pub mod probe;
pub mod report;
pub mod runner;
pub mod stats;
pub mod utils;

// Re-exports for public API
pub use compare::{DisagreementRecord, compare, counts_agree};
pub use config::{EmbeddedBackend, FailurePolicy, ProbeConfig, ProbeConfigBuilder};
pub use discovery::find_media_files;
pub use embedded::{GuardedProbe, Mp4Probe, create_probe};
pub use error::{CoreError, CoreResult};
pub use extensions::{ExtensionClass, ExtensionFilter, ExtensionSet, extension_of, normalize_extension};
pub use external::{FfprobeExecutor, check_dependency};
pub use file_logging::setup_file_logging;
pub use probe::{Backend, ProbeOutcome, StreamCounts, StreamProbe, TimedOutcome, run_probe};
pub use report::{ProbeFailureRecord, RunReport};
pub use runner::{BenchmarkRunner, FileOutcome, run_benchmark};
pub use stats::{ExtensionStats, StatsAggregator};
pub use utils::{format_elapsed, format_rate};
