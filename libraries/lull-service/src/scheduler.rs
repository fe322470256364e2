//! Single-slot auto-stop timer
//!
//! At most one deadline is armed. Arming replaces the previous deadline, so
//! there is never a window in which two could fire.

use std::time::Instant;
use tracing::debug;

#[derive(Debug, Default)]
pub struct AutoStopScheduler {
    deadline: Option<Instant>,
}

impl AutoStopScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, deadline: Instant) {
        if self.deadline.replace(deadline).is_some() {
            debug!("replaced pending auto-stop");
        }
    }

    /// Drop the pending deadline, if any
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }

    /// Returns `true` exactly once when `now` reaches the deadline
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }
}
