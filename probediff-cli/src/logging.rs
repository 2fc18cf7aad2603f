// ============================================================================
// probediff-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: Console logging and the optional run log file
//
// Without a log file the CLI logs to stderr through env_logger. With
// --log-file or --log-dir the core's log4rs setup is used instead, which
// writes the same records to stderr and to the file.
//
// USAGE:
// The console level is info, or debug with -v. RUST_LOG overrides it when
// no log file is requested:
// - RUST_LOG=warn: Only failures and disagreements
// - RUST_LOG=debug: Detailed information for every file
// - RUST_LOG=trace: Also the exact ffprobe invocations

use crate::config::{LOG_FILE_EXTENSION, LOG_FILE_PREFIX};
use crate::error::CliResult;

use log::LevelFilter;
use probediff_core::CoreError;

use std::io::Write;
use std::path::{Path, PathBuf};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
///
/// # Example
/// ```
/// let name = format!("probediff_run_{}.log", probediff_cli::logging::get_timestamp());
/// assert!(name.starts_with("probediff_run_"));
/// ```
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Path of a timestamped log file inside `log_dir`.
pub fn timestamped_log_path(log_dir: &Path) -> PathBuf {
    log_dir.join(format!(
        "{}_{}.{}",
        LOG_FILE_PREFIX,
        get_timestamp(),
        LOG_FILE_EXTENSION
    ))
}

/// Checks if color should be used (respects NO_COLOR)
pub fn should_use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

/// Installs the global logger for this run.
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> CliResult<()> {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    if !should_use_color() {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    if let Some(path) = log_file {
        return probediff_core::setup_file_logging(path, level).map_err(|e| {
            CoreError::OperationFailed(format!("failed to set up log file: {e:#}"))
        });
    }

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            let level = match record.level() {
                log::Level::Error => console::style("ERROR").red().bold(),
                log::Level::Warn => console::style("WARN ").yellow(),
                log::Level::Info => console::style("INFO ").green(),
                log::Level::Debug => console::style("DEBUG").blue(),
                log::Level::Trace => console::style("TRACE").magenta(),
            }
            .for_stderr();
            writeln!(buf, "{} {}", level, record.args())
        })
        .try_init()
        .map_err(|e| CoreError::OperationFailed(format!("failed to set up logging: {e}")))?;

    log::debug!("Logger initialized with level: {}", level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_format() {
        let ts = get_timestamp();
        assert_eq!(ts.len(), 15);
        assert_eq!(&ts[8..9], "_");
        assert!(ts.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_timestamped_log_path() {
        let path = timestamped_log_path(Path::new("/var/log/probediff"));
        assert_eq!(path.parent(), Some(Path::new("/var/log/probediff")));
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("probediff_run_"));
        assert!(name.ends_with(".log"));
    }
}
