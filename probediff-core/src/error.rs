//! Error types for the probediff core library.
//!
//! Fatal errors (bad mode, missing directory, missing probe tool) abort a run
//! before any file is processed. Per-file errors are produced by the probe
//! adapters and are contained by the run orchestrator, which turns them into
//! failure records instead of propagating them.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// Custom error types for probediff
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Directory does not exist: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Did not understand mode '{0}' (expected 'images' or 'av')")]
    InvalidMode(String),

    #[error("Required dependency '{0}' not found")]
    DependencyNotFound(String),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, io::Error),

    #[error("Command '{0}' exited with {1}")]
    CommandFailed(String, ExitStatus),

    #[error("Command '{0}' produced no complete output within {1:?}")]
    CommandTimeout(String, Duration),

    #[error("JSON parse error: {0}")]
    JsonParseError(String),

    #[error("Embedded probe error: {0}")]
    EmbeddedProbe(String),

    #[error("Invalid extension list: {0}")]
    ExtensionList(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

/// Result type for probediff operations
pub type CoreResult<T> = Result<T, CoreError>;

pub(crate) fn command_start_error(cmd: impl Into<String>, err: io::Error) -> CoreError {
    let cmd = cmd.into();
    if err.kind() == io::ErrorKind::NotFound {
        CoreError::DependencyNotFound(cmd)
    } else {
        CoreError::CommandStart(cmd, err)
    }
}

pub(crate) fn command_failed_error(cmd: impl Into<String>, status: ExitStatus) -> CoreError {
    CoreError::CommandFailed(cmd.into(), status)
}
