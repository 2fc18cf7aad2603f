//! Embedded probe for ISO base media files, built on the `mp4` crate.
//!
//! Tracks are classified by their handler: `vide` is video, `soun` is audio,
//! `sbtl` is subtitle. Other handlers (timed text chapters, hint and metadata
//! tracks) are not counted. Cover art lives in the `covr` metadata atom rather
//! than in a track, so it never shows up as a video stream here.

use super::library_error;
use crate::error::CoreResult;
use crate::probe::{Backend, StreamCounts, StreamProbe};

use mp4::{Mp4Reader, TrackType};

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Extensions of the ISO base media family this reader understands.
pub const ISO_BMFF_EXTENSIONS: &[&str] = &[
    ".mp4", ".m4a", ".m4b", ".m4p", ".m4r", ".m4v", ".mov", ".qt", ".3gp", ".3g2", ".f4v", ".f4a",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct Mp4Probe;

impl StreamProbe for Mp4Probe {
    fn backend(&self) -> Backend {
        Backend::Embedded
    }

    fn name(&self) -> &str {
        "mp4"
    }

    fn supports_extension(&self, extension: &str) -> bool {
        ISO_BMFF_EXTENSIONS.contains(&extension)
    }

    fn analyze(&self, path: &Path) -> CoreResult<StreamCounts> {
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        let reader = Mp4Reader::read_header(BufReader::new(file), size)
            .map_err(|e| library_error(path, e))?;

        let mut counts = StreamCounts::ZERO;
        for (id, track) in reader.tracks() {
            match track.track_type() {
                Ok(TrackType::Video) => counts.video += 1,
                Ok(TrackType::Audio) => counts.audio += 1,
                Ok(TrackType::Subtitle) => counts.subtitle += 1,
                Err(e) => log::trace!("{}: ignoring track {}: {}", path.display(), id, e),
            }
        }
        Ok(counts)
    }
}
