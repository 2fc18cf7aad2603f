//! ffprobe process execution for stream counting.
//!
//! The executor launches ffprobe with a fixed argument list, deserializes its
//! JSON document straight from the stdout pipe on a reader thread, and bounds
//! both the read and the final wait for exit. Every path out of
//! [`FfprobeExecutor::probe_streams`] leaves no ffprobe process behind.

use crate::config::{DEFAULT_EXIT_TIMEOUT, DEFAULT_FFPROBE_PROGRAM, DEFAULT_OUTPUT_TIMEOUT};
use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use crate::external::ffprobe_output::FfprobeOutput;
use crate::external::process::{ExitWait, ProcessGuard};
use crate::probe::{Backend, StreamCounts, StreamProbe};

use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

/// StreamProbe backed by an external ffprobe process.
#[derive(Debug, Clone)]
pub struct FfprobeExecutor {
    program: PathBuf,
    output_timeout: Duration,
    exit_timeout: Duration,
}

impl Default for FfprobeExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl FfprobeExecutor {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_FFPROBE_PROGRAM),
            output_timeout: DEFAULT_OUTPUT_TIMEOUT,
            exit_timeout: DEFAULT_EXIT_TIMEOUT,
        }
    }

    /// Uses `program` instead of the `ffprobe` found on the path.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Upper bound for receiving a complete JSON document.
    pub fn with_output_timeout(mut self, timeout: Duration) -> Self {
        self.output_timeout = timeout;
        self
    }

    /// Upper bound for the process to exit once its output was handled.
    pub fn with_exit_timeout(mut self, timeout: Duration) -> Self {
        self.exit_timeout = timeout;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Builds the ffprobe invocation for `input`. Arguments are passed
    /// directly to the process, no shell is involved.
    pub fn build_command(&self, input: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(["-analyzeduration", "3000000", "-i"])
            .arg(input)
            .args([
                "-threads",
                "0",
                "-v",
                "warning",
                "-print_format",
                "json",
                "-show_streams",
                "-show_chapters",
                "-show_format",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        cmd
    }

    /// Runs ffprobe on `input` and returns its parsed stream list.
    ///
    /// # Errors
    ///
    /// * `CoreError::DependencyNotFound` / `CoreError::CommandStart` - spawn failed
    /// * `CoreError::JsonParseError` - stdout was not a complete JSON document
    /// * `CoreError::CommandTimeout` - no complete document within the output timeout
    /// * `CoreError::CommandFailed` - ffprobe exited unsuccessfully
    pub fn probe_streams(&self, input: &Path) -> CoreResult<FfprobeOutput> {
        let name = self.program.display().to_string();
        let mut cmd = self.build_command(input);
        log::trace!("Running: {:?}", cmd);

        let child = cmd.spawn().map_err(|e| command_start_error(name.clone(), e))?;
        let mut guard = ProcessGuard::new(child, name.clone());

        let stdout = guard.child_mut().stdout.take().ok_or_else(|| {
            CoreError::OperationFailed(format!("stdout of {name} was not captured"))
        })?;

        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("ffprobe-stdout".to_string())
            .spawn(move || {
                // Stop at the end of the first document; a process that lingers
                // after writing it must not hold the result back.
                let mut documents = serde_json::Deserializer::from_reader(BufReader::new(stdout))
                    .into_iter::<FfprobeOutput>();
                let parsed = match documents.next() {
                    Some(result) => result.map_err(|e| e.to_string()),
                    None => Err("no output".to_string()),
                };
                // The receiver is gone if the caller already gave up on us.
                let _ = tx.send(parsed);
            })?;

        let parsed = match rx.recv_timeout(self.output_timeout) {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => {
                guard.kill();
                Err(CoreError::JsonParseError(format!(
                    "ffprobe output for {}: {}",
                    input.display(),
                    e
                )))
            }
            Err(RecvTimeoutError::Timeout) => {
                guard.kill();
                Err(CoreError::CommandTimeout(name.clone(), self.output_timeout))
            }
            Err(RecvTimeoutError::Disconnected) => {
                guard.kill();
                Err(CoreError::OperationFailed(format!(
                    "reader for {name} stopped without a result"
                )))
            }
        };

        let exit = guard.wait_bounded(self.exit_timeout);
        let output = parsed?;

        match exit {
            ExitWait::Exited(status) if !status.success() => Err(command_failed_error(name, status)),
            ExitWait::Exited(_) => Ok(output),
            ExitWait::Killed => {
                log::warn!(
                    "{} delivered complete output for {} but did not exit in time",
                    name,
                    input.display()
                );
                Ok(output)
            }
        }
    }
}

impl StreamProbe for FfprobeExecutor {
    fn backend(&self) -> Backend {
        Backend::External
    }

    fn name(&self) -> &str {
        "ffprobe"
    }

    fn analyze(&self, path: &Path) -> CoreResult<StreamCounts> {
        self.probe_streams(path).map(|output| output.stream_counts())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_command_arguments() {
        let executor = FfprobeExecutor::new().with_program("/opt/ffmpeg/bin/ffprobe");
        let cmd = executor.build_command(Path::new("/media/a \"quoted\" file.mkv"));

        assert_eq!(cmd.get_program(), std::ffi::OsStr::new("/opt/ffmpeg/bin/ffprobe"));
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            args,
            vec![
                "-analyzeduration",
                "3000000",
                "-i",
                "/media/a \"quoted\" file.mkv",
                "-threads",
                "0",
                "-v",
                "warning",
                "-print_format",
                "json",
                "-show_streams",
                "-show_chapters",
                "-show_format",
            ]
        );
    }

    #[test]
    fn test_missing_program() {
        let executor = FfprobeExecutor::new().with_program("surely-not-an-installed-probe-42");
        let result = executor.probe_streams(Path::new("x.mp4"));
        assert!(matches!(result, Err(CoreError::DependencyNotFound(_))));
    }
}
