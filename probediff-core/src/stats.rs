//! Per-extension timing statistics.
//!
//! The aggregator is owned by the run and updated additively. A file is
//! counted by its embedded timing update only, so recording the external
//! timing of the same file never increments the count a second time.

use crate::probe::Backend;

use serde::Serialize;

use std::collections::BTreeMap;
use std::time::Duration;

/// Accumulated numbers for one extension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtensionStats {
    pub extension: String,
    pub file_count: u64,
    #[serde(serialize_with = "crate::report::serialize_secs")]
    pub embedded_time: Duration,
    #[serde(serialize_with = "crate::report::serialize_secs")]
    pub external_time: Duration,
}

impl ExtensionStats {
    pub fn new(extension: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            ..Default::default()
        }
    }

    pub fn total_time(&self, backend: Backend) -> Duration {
        match backend {
            Backend::Embedded => self.embedded_time,
            Backend::External => self.external_time,
        }
    }

    /// Files per second for `backend`, or `None` when no time was recorded.
    pub fn throughput(&self, backend: Backend) -> Option<f64> {
        let secs = self.total_time(backend).as_secs_f64();
        if secs > 0.0 {
            Some(self.file_count as f64 / secs)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatsAggregator {
    stats: BTreeMap<String, ExtensionStats>,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one timing for `extension`. The entry is created on first use.
    pub fn record(&mut self, extension: &str, backend: Backend, elapsed: Duration) {
        let entry = self
            .stats
            .entry(extension.to_string())
            .or_insert_with(|| ExtensionStats::new(extension));

        match backend {
            Backend::Embedded => {
                entry.file_count += 1;
                entry.embedded_time += elapsed;
            }
            Backend::External => entry.external_time += elapsed,
        }
    }

    pub fn get(&self, extension: &str) -> Option<&ExtensionStats> {
        self.stats.get(extension)
    }

    /// See [`ExtensionStats::throughput`]. Unknown extensions yield `None`.
    pub fn throughput(&self, extension: &str, backend: Backend) -> Option<f64> {
        self.get(extension).and_then(|s| s.throughput(backend))
    }

    pub fn total_files(&self) -> u64 {
        self.stats.values().map(|s| s.file_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn into_stats(self) -> BTreeMap<String, ExtensionStats> {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_counted_once_per_embedded_update() {
        let mut agg = StatsAggregator::new();
        agg.record(".mp4", Backend::Embedded, Duration::from_millis(20));
        agg.record(".mp4", Backend::External, Duration::from_millis(80));
        agg.record(".mp4", Backend::Embedded, Duration::from_millis(30));

        let stats = agg.get(".mp4").unwrap();
        assert_eq!(stats.file_count, 2);
        assert_eq!(stats.embedded_time, Duration::from_millis(50));
        assert_eq!(stats.external_time, Duration::from_millis(80));
        assert_eq!(agg.total_files(), 2);
    }

    #[test]
    fn test_throughput() {
        let mut agg = StatsAggregator::new();
        agg.record(".mkv", Backend::Embedded, Duration::from_millis(500));
        agg.record(".mkv", Backend::Embedded, Duration::from_millis(500));
        agg.record(".mkv", Backend::External, Duration::from_secs(4));

        let embedded = agg.throughput(".mkv", Backend::Embedded).unwrap();
        let external = agg.throughput(".mkv", Backend::External).unwrap();
        assert!((embedded - 2.0).abs() < 1e-9);
        assert!((external - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_zero_time_throughput_is_a_sentinel() {
        let mut agg = StatsAggregator::new();
        agg.record(".wav", Backend::Embedded, Duration::ZERO);

        assert_eq!(agg.get(".wav").unwrap().file_count, 1);
        assert_eq!(agg.throughput(".wav", Backend::Embedded), None);
        assert_eq!(agg.throughput(".wav", Backend::External), None);
        assert_eq!(agg.throughput(".unknown", Backend::Embedded), None);
    }
}
