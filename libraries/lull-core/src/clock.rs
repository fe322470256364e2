//! Default clock

use crate::traits::Clock;

/// Wall clock in milliseconds since the Unix epoch
///
/// Persisted auto-stop targets must stay meaningful across process restarts,
/// so the default clock is epoch based rather than process-relative.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}
