// probediff-core/tests/ffprobe_tests.rs
//
// Exercises the external probe against small shell scripts that behave like
// ffprobe: well-formed output, broken output, failing exits and hangs.
#![cfg(unix)]

use probediff_core::{
    Backend, CoreError, ExtensionClass, FfprobeExecutor, ProbeConfigBuilder, StreamCounts,
    StreamProbe, check_dependency, run_benchmark,
};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::{TempDir, tempdir};

const MOVIE_JSON: &str = r#"{
    "streams": [
        { "index": 0, "codec_type": "video", "codec_name": "h264", "disposition": { "default": 1, "attached_pic": 0 } },
        { "index": 1, "codec_type": "audio", "codec_name": "aac", "disposition": { "default": 1, "attached_pic": 0 } },
        { "index": 2, "codec_type": "audio", "codec_name": "ac3", "disposition": { "default": 0, "attached_pic": 0 } },
        { "index": 3, "codec_type": "subtitle", "codec_name": "subrip", "disposition": { "default": 0, "attached_pic": 0 } }
    ],
    "chapters": [],
    "format": { "filename": "movie.mkv", "nb_streams": 4 }
}"#;

const SONG_JSON: &str = r#"{
    "streams": [
        { "index": 0, "codec_type": "audio", "codec_name": "mp3" },
        { "index": 1, "codec_type": "video", "codec_name": "mjpeg", "disposition": { "attached_pic": 1 } }
    ]
}"#;

/// Writes an executable fake ffprobe into `dir`. The input path is the
/// fourth argument of the fixed argument list.
fn fake_ffprobe(dir: &Path, pidfile: &Path) -> PathBuf {
    let script = format!(
        r#"#!/bin/sh
if [ "$1" = "-version" ]; then
    echo "ffprobe version fake"
    exit 0
fi
case "$4" in
    *song*) cat <<'JSON'
{song}
JSON
    ;;
    *broken*) printf '{{ "streams": [ {{ "codec_type": ' ;;
    *garbage*) echo 'this is not json' ;;
    *failing*) echo '{{"streams": []}}'; exit 3 ;;
    *lingering*) echo '{{"streams": []}}'; exec sleep 30 ;;
    *hanging*) echo $$ > "{pidfile}"; exec sleep 30 ;;
    *) cat <<'JSON'
{movie}
JSON
    ;;
esac
"#,
        song = SONG_JSON,
        movie = MOVIE_JSON,
        pidfile = pidfile.display()
    );
    let path = dir.join("fake-ffprobe");
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

struct Fixture {
    dir: TempDir,
    program: PathBuf,
    pidfile: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        let bin = dir.path().join("bin");
        fs::create_dir(&bin).unwrap();
        let pidfile = dir.path().join("ffprobe.pid");
        let program = fake_ffprobe(&bin, &pidfile);
        Self { dir, program, pidfile }
    }

    fn executor(&self) -> FfprobeExecutor {
        FfprobeExecutor::new()
            .with_program(&self.program)
            .with_output_timeout(Duration::from_millis(500))
            .with_exit_timeout(Duration::from_millis(200))
    }

    fn media(&self, name: &str) -> PathBuf {
        let media = self.dir.path().join("media");
        fs::create_dir_all(&media).unwrap();
        let path = media.join(name);
        fs::write(&path, b"not really media").unwrap();
        path
    }
}

#[test]
fn test_counts_streams_from_json() {
    let fx = Fixture::new();
    let counts = fx.executor().analyze(&fx.media("movie.mkv")).unwrap();
    assert_eq!(counts, StreamCounts::new(1, 2, 1));
}

#[test]
fn test_cover_art_is_not_a_video_stream() {
    let fx = Fixture::new();
    let output = fx.executor().probe_streams(&fx.media("song.mp3")).unwrap();
    assert_eq!(output.streams.len(), 2);
    assert_eq!(output.attached_picture_count(), 1);
    assert_eq!(output.stream_counts(), StreamCounts::new(0, 1, 0));
}

#[test]
fn test_malformed_output_is_a_parse_error() {
    let fx = Fixture::new();
    for name in ["broken.mkv", "garbage.mkv"] {
        let result = fx.executor().analyze(&fx.media(name));
        assert!(
            matches!(result, Err(CoreError::JsonParseError(_))),
            "{name}: {result:?}"
        );
    }
}

#[test]
fn test_nonzero_exit_is_a_failure() {
    let fx = Fixture::new();
    let result = fx.executor().analyze(&fx.media("failing.mkv"));
    assert!(matches!(result, Err(CoreError::CommandFailed(_, _))), "{result:?}");
}

#[test]
fn test_complete_output_from_lingering_process_is_accepted() {
    let fx = Fixture::new();
    let start = Instant::now();
    let counts = fx.executor().analyze(&fx.media("lingering.mkv")).unwrap();
    assert_eq!(counts, StreamCounts::ZERO);
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_hanging_process_is_killed_within_bound() {
    let fx = Fixture::new();
    let start = Instant::now();
    let result = fx.executor().analyze(&fx.media("hanging.mkv"));
    let elapsed = start.elapsed();

    assert!(matches!(result, Err(CoreError::CommandTimeout(_, _))), "{result:?}");
    assert!(elapsed >= Duration::from_millis(500));
    assert!(elapsed < Duration::from_secs(5), "took {elapsed:?}");

    #[cfg(target_os = "linux")]
    {
        let pid = fs::read_to_string(&fx.pidfile).unwrap();
        let proc_entry = PathBuf::from(format!("/proc/{}", pid.trim()));
        assert!(!proc_entry.exists(), "ffprobe process {} was left behind", pid.trim());
    }
}

#[test]
fn test_dependency_check_accepts_fake_probe() {
    let fx = Fixture::new();
    check_dependency(&fx.program).unwrap();
    assert_eq!(fx.executor().backend(), Backend::External);
}

#[test]
fn test_run_with_only_unselected_files() -> Result<(), Box<dyn std::error::Error>> {
    let fx = Fixture::new();
    let root = fx.dir.path().join("docs");
    fs::create_dir(&root)?;
    fs::write(root.join("readme.txt"), "hello")?;
    fs::write(root.join("todo.txt"), "world")?;

    let config = ProbeConfigBuilder::new(ExtensionClass::AudioVideo)
        .ffprobe_program(&fx.program)
        .build();
    let report = run_benchmark(&config, &root)?;

    assert_eq!(report.files_processed, 0);
    assert_eq!(report.skipped_extensions, vec![".txt"]);
    assert_eq!(report.overall_throughput(), 0.0);
    assert!(report.disagreements.is_empty());
    Ok(())
}

#[test]
fn test_run_records_embedded_failure_without_disagreement() -> Result<(), Box<dyn std::error::Error>> {
    let fx = Fixture::new();
    let movie = fx.media("movie.mp4");
    fx.media("garbage.jpg");

    let config = ProbeConfigBuilder::new(ExtensionClass::AudioVideo)
        .ffprobe_program(&fx.program)
        .build();
    let report = run_benchmark(&config, movie.parent().unwrap())?;

    // The text payload is no ISO-BMFF file, so the embedded probe fails while
    // the fake ffprobe answers.
    assert_eq!(report.files_processed, 1);
    assert_eq!(report.skipped_extensions, vec![".jpg"]);
    assert_eq!(report.probe_failures.len(), 1);
    assert_eq!(report.probe_failures[0].backend, Backend::Embedded);
    assert!(report.disagreements.is_empty());
    assert_eq!(report.stats_for(".mp4").unwrap().file_count, 1);
    Ok(())
}

#[test]
fn test_run_with_missing_ffprobe_is_fatal() {
    let fx = Fixture::new();
    let root = fx.dir.path().join("media");
    fs::create_dir_all(&root).unwrap();

    let config = ProbeConfigBuilder::new(ExtensionClass::AudioVideo)
        .ffprobe_program("surely-not-an-installed-probe-42")
        .build();
    assert!(matches!(
        run_benchmark(&config, &root),
        Err(CoreError::DependencyNotFound(_))
    ));
}
