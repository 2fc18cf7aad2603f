// ============================================================================
// probediff-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for ProbeConfig
//
// Fluent construction of ProbeConfig values with the library defaults filled
// in. The builder performs no validation itself; call ProbeConfig::validate
// on the result.

// ---- Standard library imports ----
use std::path::PathBuf;
use std::time::Duration;

// ---- Internal crate imports ----
use super::{EmbeddedBackend, FailurePolicy, ProbeConfig};
use crate::extensions::ExtensionClass;

/// Builder for creating ProbeConfig instances.
#[derive(Debug, Clone)]
pub struct ProbeConfigBuilder {
    config: ProbeConfig,
}

impl ProbeConfigBuilder {
    /// Creates a builder for `class` with every other field at its default.
    pub fn new(class: ExtensionClass) -> Self {
        Self {
            config: ProbeConfig::new(class),
        }
    }

    /// Replaces the bundled extension list with the given list file.
    pub fn extensions_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.extensions_file = Some(path.into());
        self
    }

    /// Sets the ffprobe command or path.
    pub fn ffprobe_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.config.ffprobe_program = program.into();
        self
    }

    /// Sets the upper bound for receiving ffprobe's output.
    pub fn output_timeout(mut self, timeout: Duration) -> Self {
        self.config.output_timeout = timeout;
        self
    }

    /// Sets the grace period for ffprobe to exit.
    pub fn exit_timeout(mut self, timeout: Duration) -> Self {
        self.config.exit_timeout = timeout;
        self
    }

    /// Sets the upper bound for one embedded analysis.
    pub fn embedded_timeout(mut self, timeout: Duration) -> Self {
        self.config.embedded_timeout = timeout;
        self
    }

    /// Sets the number of files probed concurrently.
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.config.jobs = jobs;
        self
    }

    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.config.failure_policy = policy;
        self
    }

    pub fn embedded_backend(mut self, backend: EmbeddedBackend) -> Self {
        self.config.embedded_backend = backend;
        self
    }

    /// Builds the ProbeConfig.
    pub fn build(self) -> ProbeConfig {
        self.config
    }
}
