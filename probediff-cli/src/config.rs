// probediff-cli/src/config.rs
//
// Default values used only by the CLI.

/// Prefix of log files created with --log-dir
pub const LOG_FILE_PREFIX: &str = "probediff_run";

/// Extension of log files created with --log-dir
pub const LOG_FILE_EXTENSION: &str = "log";
