// probediff-cli/src/lib.rs
//
// Library portion of the probediff CLI application.
// Contains argument definitions, command logic and report rendering.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;

// Re-export items needed by the binary or integration tests
pub use cli::Cli;
pub use commands::run::run_compare;
pub use error::{CliResult, exit_code};
