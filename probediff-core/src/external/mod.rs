// ============================================================================
// probediff-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: The ffprobe side of the comparison
//
// This module encapsulates everything that involves spawning the external
// probe process: the dependency check performed before a run, the scoped
// process guard, the ffprobe JSON wire format, and the executor that ties
// them together behind the StreamProbe trait.
//
// KEY COMPONENTS:
// - FfprobeExecutor: StreamProbe implementation backed by an ffprobe process
// - FfprobeOutput: the subset of ffprobe's JSON document that is consumed
// - ProcessGuard: kills and reaps the child on every exit path
// - check_dependency: up-front availability check for the probe command

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Contains the ffprobe process executor
pub mod ffprobe_executor;

/// Contains the deserialization types for ffprobe's JSON output
pub mod ffprobe_output;

/// Contains the scoped child process guard
pub mod process;

// ============================================================================
// RE-EXPORTS
// ============================================================================

pub use ffprobe_executor::FfprobeExecutor;
pub use ffprobe_output::{FfprobeOutput, FfprobeStream};
pub use process::{ExitWait, ProcessGuard};

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks that an external command can be started.
///
/// Runs `<cmd> -version` with all output discarded. Only the ability to
/// start the process matters, the exit status is not inspected.
///
/// # Returns
///
/// * `Ok(())` - The command was found and started
/// * `Err(CoreError::DependencyNotFound)` - The command is not on the path
/// * `Err(CoreError::CommandStart)` - The command exists but failed to start
pub fn check_dependency(cmd: &Path) -> CoreResult<()> {
    let cmd_name = cmd.display().to_string();

    let result = Command::new(cmd)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd_name);
            Ok(())
        }
        Err(e) => {
            if e.kind() == io::ErrorKind::NotFound {
                log::warn!("Dependency '{}' not found.", cmd_name);
                Err(CoreError::DependencyNotFound(cmd_name))
            } else {
                log::error!("Failed to start dependency check command '{}': {}", cmd_name, e);
                Err(CoreError::CommandStart(cmd_name, e))
            }
        }
    }
}
