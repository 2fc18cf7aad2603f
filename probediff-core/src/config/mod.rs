//! Configuration structures and constants for the probediff-core library.
//!
//! This module provides the configuration of a benchmark run: which extension
//! class is selected, where the extension list and the ffprobe binary come
//! from, timeouts for both probes, parallelism and how backend failures take
//! part in the comparison.

mod builder;

use crate::error::{CoreError, CoreResult};
use crate::extensions::{ExtensionClass, ExtensionSet};
use crate::external::FfprobeExecutor;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub use builder::ProbeConfigBuilder;

// Default constants

/// Command used to run the external probe when no path is configured.
pub const DEFAULT_FFPROBE_PROGRAM: &str = "ffprobe";

/// Upper bound for ffprobe to deliver its complete JSON document.
/// A process that has not finished writing by then is considered hung.
/// Together with the exit grace period this is the longest a single file can
/// hold up the external side.
pub const DEFAULT_OUTPUT_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound for one in-process analysis.
pub const DEFAULT_EMBEDDED_TIMEOUT: Duration = Duration::from_secs(10);

/// Grace period for ffprobe to exit after its output was handled.
pub const DEFAULT_EXIT_TIMEOUT: Duration = Duration::from_millis(1000);

/// Files are probed one at a time unless asked otherwise.
pub const DEFAULT_JOBS: usize = 1;

/// How a backend failure takes part in the stream count comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Files where either backend failed are not compared; the failure is
    /// reported on its own.
    #[default]
    Skip,
    /// A failed backend is compared as if it found no streams. The failure
    /// is still reported.
    TreatAsZero,
}

impl FromStr for FailurePolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(Self::Skip),
            "zero" | "treat-as-zero" => Ok(Self::TreatAsZero),
            other => Err(CoreError::Config(format!(
                "unknown failure policy '{other}' (expected 'skip' or 'zero')"
            ))),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip => write!(f, "skip"),
            Self::TreatAsZero => write!(f, "zero"),
        }
    }
}

/// Library used by the embedded probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddedBackend {
    /// Pure Rust ISO-BMFF reader (`mp4` crate). Reads the MP4 family only.
    Mp4,
    /// libavformat through `ffmpeg-next` (requires the `ffmpeg-lib` feature)
    Libav,
}

impl Default for EmbeddedBackend {
    /// libav when it was compiled in, since it reads every container ffprobe
    /// reads; the mp4 reader otherwise.
    fn default() -> Self {
        if cfg!(feature = "ffmpeg-lib") {
            Self::Libav
        } else {
            Self::Mp4
        }
    }
}

impl FromStr for EmbeddedBackend {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mp4" => Ok(Self::Mp4),
            "libav" | "ffmpeg" => Ok(Self::Libav),
            other => Err(CoreError::Config(format!(
                "unknown embedded backend '{other}' (expected 'mp4' or 'libav')"
            ))),
        }
    }
}

impl fmt::Display for EmbeddedBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mp4 => write!(f, "mp4"),
            Self::Libav => write!(f, "libav"),
        }
    }
}

/// Main configuration structure for a benchmark run.
///
/// Only the extension class is required; everything else has a default.
///
/// # Examples
///
/// ```rust
/// use probediff_core::config::ProbeConfigBuilder;
/// use probediff_core::ExtensionClass;
/// use std::time::Duration;
///
/// let config = ProbeConfigBuilder::new(ExtensionClass::AudioVideo)
///     .ffprobe_program("/usr/local/bin/ffprobe")
///     .output_timeout(Duration::from_secs(10))
///     .jobs(4)
///     .build();
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Extension class selected by the invocation mode
    pub class: ExtensionClass,

    /// Optional list file replacing the bundled extension list
    pub extensions_file: Option<PathBuf>,

    /// ffprobe command or path
    pub ffprobe_program: PathBuf,

    /// Upper bound for receiving ffprobe's complete output
    pub output_timeout: Duration,

    /// Upper bound for ffprobe to exit afterwards
    pub exit_timeout: Duration,

    /// Upper bound for one embedded analysis
    pub embedded_timeout: Duration,

    /// Number of files probed concurrently (1 = strictly sequential)
    pub jobs: usize,

    /// How backend failures take part in the comparison
    pub failure_policy: FailurePolicy,

    /// Library behind the embedded probe
    pub embedded_backend: EmbeddedBackend,
}

impl ProbeConfig {
    pub fn new(class: ExtensionClass) -> Self {
        Self {
            class,
            extensions_file: None,
            ffprobe_program: PathBuf::from(DEFAULT_FFPROBE_PROGRAM),
            output_timeout: DEFAULT_OUTPUT_TIMEOUT,
            exit_timeout: DEFAULT_EXIT_TIMEOUT,
            embedded_timeout: DEFAULT_EMBEDDED_TIMEOUT,
            jobs: DEFAULT_JOBS,
            failure_policy: FailurePolicy::default(),
            embedded_backend: EmbeddedBackend::default(),
        }
    }

    /// Checks the configuration for values a run cannot work with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.jobs == 0 {
            return Err(CoreError::Config("jobs must be at least 1".to_string()));
        }
        if self.output_timeout.is_zero() {
            return Err(CoreError::Config("output timeout must be non-zero".to_string()));
        }
        if self.exit_timeout.is_zero() {
            return Err(CoreError::Config("exit timeout must be non-zero".to_string()));
        }
        if self.embedded_timeout.is_zero() {
            return Err(CoreError::Config("embedded timeout must be non-zero".to_string()));
        }
        if self.ffprobe_program.as_os_str().is_empty() {
            return Err(CoreError::Config("ffprobe program must not be empty".to_string()));
        }
        if let Some(path) = &self.extensions_file {
            if !path.is_file() {
                return Err(CoreError::ExtensionList(format!(
                    "'{}' is not a readable file",
                    path.display()
                )));
            }
        }
        if self.embedded_backend == EmbeddedBackend::Libav && !cfg!(feature = "ffmpeg-lib") {
            return Err(CoreError::Config(
                "the libav embedded backend requires the 'ffmpeg-lib' feature".to_string(),
            ));
        }
        Ok(())
    }

    /// The extension set for this run: the configured list file, or the
    /// bundled list of the selected class.
    pub fn load_extensions(&self) -> CoreResult<ExtensionSet> {
        match &self.extensions_file {
            Some(path) => ExtensionSet::load(path),
            None => Ok(self.class.bundled_extensions().clone()),
        }
    }

    /// An ffprobe executor using the configured program and timeouts.
    pub fn ffprobe_executor(&self) -> FfprobeExecutor {
        FfprobeExecutor::new()
            .with_program(self.ffprobe_program.clone())
            .with_output_timeout(self.output_timeout)
            .with_exit_timeout(self.exit_timeout)
    }
}
