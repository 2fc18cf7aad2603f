//! In-process probe backends.
//!
//! The embedded probe opens the file inside this process and lists its
//! tracks. Errors from the library (unsupported or corrupt containers) are
//! returned as `CoreError::EmbeddedProbe`; the orchestrator turns them into a
//! soft failure with zero counts. Every backend handed out by [`create_probe`]
//! runs behind a [`GuardedProbe`], so a library that loops or panics on a
//! corrupt file fails that file only.

use crate::config::EmbeddedBackend;
use crate::error::{CoreError, CoreResult};
use crate::probe::StreamProbe;

use std::sync::Arc;
use std::time::Duration;

mod guard;
mod mp4_probe;
#[cfg(feature = "ffmpeg-lib")]
mod libav_probe;

pub use guard::GuardedProbe;
pub use mp4_probe::{ISO_BMFF_EXTENSIONS, Mp4Probe};
#[cfg(feature = "ffmpeg-lib")]
pub use libav_probe::LibavProbe;

/// Creates the embedded probe for `backend`, with each analysis bounded by
/// `timeout`.
pub fn create_probe(backend: EmbeddedBackend, timeout: Duration) -> CoreResult<GuardedProbe> {
    let inner: Arc<dyn StreamProbe> = match backend {
        EmbeddedBackend::Mp4 => Arc::new(Mp4Probe),
        #[cfg(feature = "ffmpeg-lib")]
        EmbeddedBackend::Libav => Arc::new(LibavProbe::new()?),
        #[cfg(not(feature = "ffmpeg-lib"))]
        EmbeddedBackend::Libav => {
            return Err(CoreError::Config(
                "built without the 'ffmpeg-lib' feature, libav backend unavailable".to_string(),
            ));
        }
    };
    Ok(GuardedProbe::new(inner, timeout))
}

pub(crate) fn library_error(path: &std::path::Path, err: impl std::fmt::Display) -> CoreError {
    CoreError::EmbeddedProbe(format!("{}: {}", path.display(), err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::Backend;

    #[test]
    fn test_mp4_backend_is_always_available() {
        let probe = create_probe(EmbeddedBackend::Mp4, Duration::from_secs(2)).unwrap();
        assert_eq!(probe.backend(), Backend::Embedded);
        assert_eq!(probe.timeout(), Duration::from_secs(2));
        assert!(probe.supports_extension(".m4a"));
        assert!(!probe.supports_extension(".flac"));
    }

    #[cfg(not(feature = "ffmpeg-lib"))]
    #[test]
    fn test_libav_requires_feature() {
        assert!(matches!(
            create_probe(EmbeddedBackend::Libav, Duration::from_secs(2)),
            Err(CoreError::Config(_))
        ));
    }
}
