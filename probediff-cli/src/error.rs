// ============================================================================
// probediff-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Result alias and exit codes
//
// The CLI works with the core library's error type directly. Fatal errors are
// mapped to the process exit code here; per-file problems never reach this
// point because the core keeps them in the run report.

use probediff_core::{CoreError, CoreResult};

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

// ============================================================================
// EXIT CODES
// ============================================================================

/// Wrong argument count, unknown option or unusable option value.
pub const EXIT_USAGE: i32 = 1;

/// MODE was neither images nor av.
pub const EXIT_INVALID_MODE: i32 = 2;

/// DIRECTORY does not exist.
pub const EXIT_DIRECTORY_MISSING: i32 = 3;

/// ffprobe could not be found or started.
pub const EXIT_PROBE_UNAVAILABLE: i32 = 4;

/// Maps a fatal error to the exit code the process ends with.
pub fn exit_code(error: &CoreError) -> i32 {
    match error {
        CoreError::InvalidMode(_) => EXIT_INVALID_MODE,
        CoreError::DirectoryNotFound(_) => EXIT_DIRECTORY_MISSING,
        CoreError::DependencyNotFound(_) | CoreError::CommandStart(_, _) => EXIT_PROBE_UNAVAILABLE,
        _ => EXIT_USAGE,
    }
}
