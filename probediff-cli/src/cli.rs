// probediff-cli/src/cli.rs
//
// Defines the command-line argument structure using clap.

use clap::Parser;
use probediff_core::config::{
    DEFAULT_EMBEDDED_TIMEOUT, DEFAULT_EXIT_TIMEOUT, DEFAULT_FFPROBE_PROGRAM, DEFAULT_JOBS,
    DEFAULT_OUTPUT_TIMEOUT,
};
use probediff_core::{EmbeddedBackend, FailurePolicy};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Probediff: benchmark and cross-check media stream probes",
    long_about = "Walks a directory, probes every selected file with an embedded \
                  library and with ffprobe, times both per extension and reports \
                  files on which the two disagree about the number of video, \
                  audio and subtitle streams.\n\n\
                  The report goes to stdout. Progress, warnings and fatal error \
                  messages (usage, mode, directory, missing ffprobe) go to \
                  stderr; the exit code tells them apart.\n\n\
                  Note: ffprobe must be on PATH or given with --ffprobe."
)]
pub struct Cli {
    /// Which files to select: 'images' or 'av' (audio and video).
    /// The legacy spellings '-images' and '-av' are accepted too.
    #[arg(value_name = "MODE", allow_hyphen_values = true)]
    pub mode: String,

    /// Directory to walk, including all subdirectories
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Newline-delimited extension list replacing the bundled list for MODE
    #[arg(long, value_name = "FILE", env = "PROBEDIFF_EXTENSIONS")]
    pub extensions: Option<PathBuf>,

    /// ffprobe command or path
    #[arg(long, value_name = "PATH", env = "PROBEDIFF_FFPROBE", default_value = DEFAULT_FFPROBE_PROGRAM)]
    pub ffprobe: PathBuf,

    /// Seconds ffprobe may take to deliver its complete output. A hung
    /// ffprobe costs up to this plus --exit-timeout per file.
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_OUTPUT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Milliseconds ffprobe may take to exit once its output was read
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_EXIT_TIMEOUT.as_millis() as u64)]
    pub exit_timeout: u64,

    /// Seconds one embedded analysis may take before the file is recorded
    /// as an embedded failure
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_EMBEDDED_TIMEOUT.as_secs())]
    pub embedded_timeout: u64,

    /// Number of files probed concurrently
    #[arg(short, long, value_name = "N", default_value_t = DEFAULT_JOBS)]
    pub jobs: usize,

    /// How a failed probe takes part in the comparison: 'skip' or 'zero'
    #[arg(long, value_name = "POLICY", default_value_t = FailurePolicy::Skip)]
    pub failure_policy: FailurePolicy,

    /// Embedded probe library. 'mp4' reads only the MP4 family (.mp4 .m4a
    /// .m4b .m4v .mov .3gp .3g2 .f4v ...); other files become embedded
    /// failures. 'libav' reads everything ffprobe reads and is the default
    /// when built with the ffmpeg-lib feature.
    #[arg(long, value_name = "BACKEND", default_value_t = EmbeddedBackend::default())]
    pub embedded: EmbeddedBackend,

    /// Print the final report as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Also write the log to this file
    #[arg(long, value_name = "PATH", conflicts_with = "log_dir")]
    pub log_file: Option<PathBuf>,

    /// Also write the log to a timestamped file in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log every file's details (debug level)
    #[arg(short, long)]
    pub verbose: bool,
}
