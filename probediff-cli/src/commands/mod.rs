//! Command implementations for the CLI.

/// Runs one benchmark over a directory and returns its report.
pub mod run;
