//! Gain ramps
//!
//! Stopping a playing sound ramps its gain linearly to zero before the
//! engine handle is released, so sounds never cut off mid-wave.

use std::time::Duration;

/// Linear fade from a start gain down to silence
#[derive(Debug, Clone)]
pub struct FadeOut {
    /// Gain when the fade started
    from: f32,

    /// Total length of the fade
    duration: Duration,

    /// Time already faded
    elapsed: Duration,
}

impl FadeOut {
    pub fn new(from: f32, duration: Duration) -> Self {
        Self {
            from,
            duration,
            elapsed: Duration::ZERO,
        }
    }

    /// Advance the fade and return the gain to apply now
    pub fn advance(&mut self, dt: Duration) -> f32 {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.gain()
    }

    /// Gain at the current position
    pub fn gain(&self) -> f32 {
        if self.duration.is_zero() {
            return 0.0;
        }
        let progress = self.elapsed.as_secs_f32() / self.duration.as_secs_f32();
        (self.from * (1.0 - progress)).max(0.0)
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }
}
