//! Common shape shared by both probe backends.
//!
//! Each backend reduces its view of a file to a [`StreamCounts`] triple. The
//! orchestrator only ever talks to backends through [`StreamProbe`], so a
//! backend-specific error never leaks past [`run_probe`].

use crate::error::CoreResult;

use serde::Serialize;

use std::fmt;
use std::path::Path;
use std::time::{Duration, Instant};

/// Number of video, audio and subtitle streams found in one file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct StreamCounts {
    pub video: u32,
    pub audio: u32,
    pub subtitle: u32,
}

impl StreamCounts {
    pub const ZERO: Self = Self::new(0, 0, 0);

    pub const fn new(video: u32, audio: u32, subtitle: u32) -> Self {
        Self {
            video,
            audio,
            subtitle,
        }
    }
}

impl fmt::Display for StreamCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}:a{}:s{}", self.video, self.audio, self.subtitle)
    }
}

/// The two probe backends being compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// In-process metadata library
    Embedded,
    /// External `ffprobe` process
    External,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embedded => write!(f, "embedded"),
            Self::External => write!(f, "external"),
        }
    }
}

/// A source of stream counts for a media file.
///
/// Implementations must be shareable across threads since the orchestrator
/// may probe several files concurrently.
pub trait StreamProbe: Send + Sync {
    /// Which side of the comparison this probe stands on.
    fn backend(&self) -> Backend;

    /// Short human readable name used in progress lines.
    fn name(&self) -> &str;

    /// Whether files with this normalized extension (".mkv") are in a format
    /// the backend can read at all.
    fn supports_extension(&self, _extension: &str) -> bool {
        true
    }

    /// Counts the streams of `path`.
    fn analyze(&self, path: &Path) -> CoreResult<StreamCounts>;
}

/// Result of one probe attempt with the failure kept explicit, so a file the
/// backend could not read is never mistaken for a file without streams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Counts(StreamCounts),
    Failed { reason: String },
}

impl ProbeOutcome {
    pub fn counts(&self) -> Option<StreamCounts> {
        match self {
            Self::Counts(counts) => Some(*counts),
            Self::Failed { .. } => None,
        }
    }

    /// Counts, or all zeros for a failed attempt.
    pub fn counts_or_zero(&self) -> StreamCounts {
        self.counts().unwrap_or(StreamCounts::ZERO)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Counts(_) => None,
            Self::Failed { reason } => Some(reason),
        }
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Counts(counts) => write!(f, "({counts})"),
            Self::Failed { .. } => write!(f, "failed"),
        }
    }
}

/// A probe outcome with the wall time the attempt took, failed or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedOutcome {
    pub outcome: ProbeOutcome,
    pub elapsed: Duration,
}

/// Runs `probe` against `path`, timing the attempt and containing any error.
pub fn run_probe(probe: &dyn StreamProbe, path: &Path) -> TimedOutcome {
    let start = Instant::now();
    let result = probe.analyze(path);
    let elapsed = start.elapsed();

    let outcome = match result {
        Ok(counts) => ProbeOutcome::Counts(counts),
        Err(e) => {
            log::debug!("{} probe failed for {}: {}", probe.name(), path.display(), e);
            ProbeOutcome::Failed {
                reason: e.to_string(),
            }
        }
    };

    TimedOutcome { outcome, elapsed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    struct Fixed(CoreResult<StreamCounts>);

    impl StreamProbe for Fixed {
        fn backend(&self) -> Backend {
            Backend::Embedded
        }

        fn name(&self) -> &str {
            "fixed"
        }

        fn analyze(&self, _path: &Path) -> CoreResult<StreamCounts> {
            match &self.0 {
                Ok(counts) => Ok(*counts),
                Err(e) => Err(CoreError::EmbeddedProbe(e.to_string())),
            }
        }
    }

    #[test]
    fn test_display_triple() {
        assert_eq!(StreamCounts::new(1, 2, 0).to_string(), "v1:a2:s0");
    }

    #[test]
    fn test_failure_is_distinct_from_zero_streams() {
        let empty = run_probe(&Fixed(Ok(StreamCounts::ZERO)), Path::new("empty.mp4"));
        let broken = run_probe(
            &Fixed(Err(CoreError::EmbeddedProbe("corrupt".into()))),
            Path::new("broken.mp4"),
        );

        assert_eq!(empty.outcome.counts(), Some(StreamCounts::ZERO));
        assert!(!empty.outcome.is_failure());

        assert!(broken.outcome.is_failure());
        assert_eq!(broken.outcome.counts(), None);
        assert_eq!(broken.outcome.counts_or_zero(), StreamCounts::ZERO);
        assert!(broken.outcome.failure_reason().unwrap().contains("corrupt"));
    }
}
