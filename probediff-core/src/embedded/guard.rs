// ============================================================================
// probediff-core/src/embedded/guard.rs
// ============================================================================
//
// BOUNDED EMBEDDED ANALYSIS
//
// Container libraries run inside this process, so a file that sends one into
// an endless loop or a panic would otherwise take the whole run with it. The
// guard runs each analysis on its own thread, catches a panic there and waits
// for the result at most `timeout`. A thread that misses the deadline cannot
// be stopped; it is detached and the file is recorded as an embedded failure.

use super::library_error;
use crate::error::CoreResult;
use crate::probe::{Backend, StreamCounts, StreamProbe};

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

/// Wraps an embedded probe so that a hang or panic inside the library turns
/// into a `CoreError::EmbeddedProbe` for that file.
#[derive(Clone)]
pub struct GuardedProbe {
    inner: Arc<dyn StreamProbe>,
    timeout: Duration,
}

impl GuardedProbe {
    pub fn new(inner: Arc<dyn StreamProbe>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl std::fmt::Debug for GuardedProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardedProbe")
            .field("inner", &self.inner.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl StreamProbe for GuardedProbe {
    fn backend(&self) -> Backend {
        self.inner.backend()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn supports_extension(&self, extension: &str) -> bool {
        self.inner.supports_extension(extension)
    }

    fn analyze(&self, path: &Path) -> CoreResult<StreamCounts> {
        let (tx, rx) = mpsc::channel();
        let inner = Arc::clone(&self.inner);
        let owned = path.to_path_buf();

        thread::Builder::new()
            .name("embedded-probe".to_string())
            .spawn(move || {
                let result = panic::catch_unwind(AssertUnwindSafe(|| inner.analyze(&owned)));
                // The receiver is gone once the deadline passed.
                tx.send(result).ok();
            })?;

        match rx.recv_timeout(self.timeout) {
            Ok(Ok(result)) => result,
            Ok(Err(payload)) => Err(library_error(
                path,
                format!("library panicked: {}", panic_message(&*payload)),
            )),
            Err(RecvTimeoutError::Timeout) => {
                log::warn!(
                    "{} probe still busy with {} after {:?}, abandoning it",
                    self.inner.name(),
                    path.display(),
                    self.timeout
                );
                Err(library_error(
                    path,
                    format!("no result within {:?}", self.timeout),
                ))
            }
            Err(RecvTimeoutError::Disconnected) => Err(library_error(
                path,
                "analysis thread stopped without a result",
            )),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
