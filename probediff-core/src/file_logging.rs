//! Log4rs setup for runs that keep a log file.
//!
//! The run log gets the plain `{d} [{l}] {m}` pattern, the console gets the
//! same messages without the timestamp. Both appenders share one root level.

use anyhow::{Context, Result};
use log::LevelFilter;
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        file::FileAppender,
    },
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};

use std::path::Path;

/// Pattern used for every line written to the run log.
pub const FILE_LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} [{l}] {m}{n}";

const CONSOLE_LOG_PATTERN: &str = "{h({l:<5})} {m}{n}";

/// Builds the log4rs configuration for a console plus `log_file`.
///
/// Creates the log file's parent directory if needed. Kept separate from
/// [`setup_file_logging`] so the configuration can be checked without
/// installing a global logger.
pub fn build_file_logging_config(log_file: &Path, log_level: LevelFilter) -> Result<Config> {
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(FILE_LOG_PATTERN)))
        .build(log_file)
        .with_context(|| format!("failed to open log file {}", log_file.display()))?;

    let console_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(CONSOLE_LOG_PATTERN)))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("file", Box::new(file_appender)))
        .appender(Appender::builder().build("console", Box::new(console_appender)))
        .build(
            Root::builder()
                .appender("file")
                .appender("console")
                .build(log_level),
        )?;

    Ok(config)
}

/// Installs the global logger, writing to stderr and to `log_file`.
pub fn setup_file_logging(log_file: &Path, log_level: LevelFilter) -> Result<()> {
    let config = build_file_logging_config(log_file, log_level)?;
    log4rs::init_config(config).context("a global logger is already installed")?;
    log::debug!("Logging to {}", log_file.display());
    Ok(())
}
