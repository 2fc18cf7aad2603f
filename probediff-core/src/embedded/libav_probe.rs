//! Embedded probe using libavformat in-process through `ffmpeg-next`.
//!
//! Streams are classified by codec medium. Video streams flagged as an
//! attached picture are left out, matching how the external probe is read.

use super::library_error;
use crate::error::{CoreError, CoreResult};
use crate::probe::{Backend, StreamCounts, StreamProbe};

use ffmpeg_next as ffmpeg;
use ffmpeg::format::stream::Disposition;
use once_cell::sync::OnceCell;

use std::path::Path;

static FFMPEG_INIT: OnceCell<Result<(), String>> = OnceCell::new();

fn ensure_initialized() -> CoreResult<()> {
    FFMPEG_INIT
        .get_or_init(|| {
            ffmpeg::init().map_err(|e| e.to_string())?;
            ffmpeg::util::log::set_level(ffmpeg::util::log::Level::Error);
            Ok(())
        })
        .clone()
        .map_err(|e| CoreError::EmbeddedProbe(format!("ffmpeg::init() failed: {e}")))
}

#[derive(Debug, Clone, Copy)]
pub struct LibavProbe;

impl LibavProbe {
    /// Initializes libav once per process.
    pub fn new() -> CoreResult<Self> {
        ensure_initialized()?;
        Ok(Self)
    }
}

impl StreamProbe for LibavProbe {
    fn backend(&self) -> Backend {
        Backend::Embedded
    }

    fn name(&self) -> &str {
        "libav"
    }

    fn analyze(&self, path: &Path) -> CoreResult<StreamCounts> {
        let context = ffmpeg::format::input(&path).map_err(|e| library_error(path, e))?;

        let mut counts = StreamCounts::ZERO;
        for stream in context.streams() {
            match stream.parameters().medium() {
                ffmpeg::media::Type::Video => {
                    if !stream.disposition().contains(Disposition::ATTACHED_PIC) {
                        counts.video += 1;
                    }
                }
                ffmpeg::media::Type::Audio => counts.audio += 1,
                ffmpeg::media::Type::Subtitle => counts.subtitle += 1,
                _ => {}
            }
        }
        Ok(counts)
    }
}
