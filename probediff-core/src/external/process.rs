//! Scoped ownership of a spawned child process.
//!
//! A [`ProcessGuard`] owns the `Child` for as long as the caller needs it and
//! guarantees that the process is terminated and reaped when the guard goes
//! away, whichever way the caller leaves (success, parse failure, timeout or
//! an early `?`).

use std::process::{Child, ExitStatus};
use std::thread;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// How a bounded wait for the child ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitWait {
    /// The child exited on its own within the bound.
    Exited(ExitStatus),
    /// The child was still running at the deadline and was killed.
    Killed,
}

#[derive(Debug)]
pub struct ProcessGuard {
    child: Child,
    name: String,
    reaped: bool,
}

impl ProcessGuard {
    pub fn new(child: Child, name: impl Into<String>) -> Self {
        Self {
            child,
            name: name.into(),
            reaped: false,
        }
    }

    pub fn id(&self) -> u32 {
        self.child.id()
    }

    pub fn child_mut(&mut self) -> &mut Child {
        &mut self.child
    }

    /// Forcibly terminates the child. Errors are only logged; the usual cause
    /// is that the process already exited.
    pub fn kill(&mut self) {
        if self.reaped {
            return;
        }
        if let Err(e) = self.child.kill() {
            log::debug!("kill of {} (pid {}) failed: {}", self.name, self.child.id(), e);
        }
    }

    /// Waits up to `timeout` for the child to exit. A child still running at
    /// the deadline is killed and reaped before returning.
    pub fn wait_bounded(&mut self, timeout: Duration) -> ExitWait {
        let start = Instant::now();
        loop {
            match self.child.try_wait() {
                Ok(Some(status)) => {
                    self.reaped = true;
                    return ExitWait::Exited(status);
                }
                Ok(None) => {
                    if start.elapsed() >= timeout {
                        break;
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    log::warn!("Error waiting for {}: {}", self.name, e);
                    break;
                }
            }
        }

        log::warn!(
            "{} (pid {}) still running after {:?}, terminating",
            self.name,
            self.child.id(),
            timeout
        );
        self.terminate();
        ExitWait::Killed
    }

    fn terminate(&mut self) {
        if self.reaped {
            return;
        }
        self.kill();
        if let Err(e) = self.child.wait() {
            log::warn!("Failed to reap {} (pid {}): {}", self.name, self.child.id(), e);
        }
        self.reaped = true;
    }
}

impl Drop for ProcessGuard {
    fn drop(&mut self) {
        self.terminate();
    }
}
