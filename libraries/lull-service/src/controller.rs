//! Command router
//!
//! Turns decoded commands into manager calls. Manager errors stop here: they
//! are logged and the command becomes a no-op.

use crate::command::Command;
use crate::scheduler::AutoStopScheduler;
use lull_core::{Clock, DeviceVolume};
use lull_playback::PlayerManager;
use lull_storage::settings::{scheduled_stop_time, set_scheduled_stop_time};
use lull_storage::KeyValueStore;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Routes commands to a [`PlayerManager`] and owns the auto-stop timer
pub struct PlaybackController {
    scheduler: AutoStopScheduler,
    device_volume: Box<dyn DeviceVolume>,
    settings: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl PlaybackController {
    pub fn new(
        device_volume: Box<dyn DeviceVolume>,
        settings: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            scheduler: AutoStopScheduler::new(),
            device_volume,
            settings,
            clock,
        }
    }

    /// Decode and run a raw request; unknown actions do nothing
    pub fn handle_request(&mut self, manager: &mut PlayerManager, request: &Value) {
        if let Some(command) = Command::decode(request) {
            self.handle(manager, command);
        }
    }

    pub fn handle(&mut self, manager: &mut PlayerManager, command: Command) {
        debug!(?command, "handling command");

        let result = match command {
            Command::ResumePlayback => {
                manager.resume();
                Ok(())
            }
            Command::PausePlayback => {
                manager.pause();
                Ok(())
            }
            Command::StopPlayback => {
                manager.stop();
                Ok(())
            }
            Command::PlaySound { sound_key } => manager.play(&sound_key),
            Command::StopSound { sound_key } => {
                manager.stop_sound(&sound_key);
                Ok(())
            }
            Command::PlayPreset {
                preset_id,
                device_volume,
            } => {
                // System volume first, so the mix is heard at the intended level
                if let Some(level) = device_volume.and_then(|v| u32::try_from(v).ok()) {
                    self.device_volume.set_media_volume(level);
                }
                manager.play_preset(&preset_id)
            }
            Command::PlayRandomPreset {
                tag,
                min_sounds,
                max_sounds,
            } => manager.play_random_preset(tag, min_sounds..=max_sounds),
            Command::ScheduleStopPlayback { at_uptime_millis } => {
                self.schedule_stop(at_uptime_millis);
                Ok(())
            }
            Command::SkipPreset { direction } => {
                manager.skip_preset(direction);
                Ok(())
            }
        };

        if let Err(e) = result {
            warn!("Command had no effect: {}", e);
        }
    }

    /// Arm the timer for `at_millis`, or clear it when that time has passed
    fn schedule_stop(&mut self, at_millis: i64) {
        if let Err(e) = set_scheduled_stop_time(self.settings.as_ref(), at_millis) {
            warn!("Failed to persist scheduled stop time: {}", e);
        }

        self.scheduler.cancel();
        let delay = at_millis.saturating_sub(self.clock.now_millis());
        match u64::try_from(delay) {
            Ok(ms) if ms > 0 => {
                self.scheduler
                    .arm(Instant::now() + Duration::from_millis(ms));
                info!(in_ms = ms, "auto-stop scheduled");
            }
            _ => info!("auto-stop cleared"),
        }
    }

    /// Pause the manager if the auto-stop deadline has passed
    pub fn poll_timer(&mut self, manager: &mut PlayerManager, now: Instant) -> bool {
        if !self.scheduler.poll(now) {
            return false;
        }

        info!("auto-stop reached, pausing playback");
        manager.pause();
        true
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Cancel the pending auto-stop without touching the persisted target
    pub fn clear_auto_stop_callback(&mut self) {
        if self.scheduler.cancel() {
            debug!("pending auto-stop cancelled");
        }
    }

    pub fn remaining_auto_stop(&self) -> Duration {
        remaining_auto_stop(self.settings.as_ref(), self.clock.as_ref())
    }
}

/// Time left until the persisted auto-stop target, zero if none or past
pub fn remaining_auto_stop(store: &dyn KeyValueStore, clock: &dyn Clock) -> Duration {
    scheduled_stop_time(store)
        .map(|at| at.saturating_sub(clock.now_millis()))
        .and_then(|ms| u64::try_from(ms).ok())
        .map_or(Duration::ZERO, Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lull_playback::test_support::ManualClock;
    use lull_storage::MemoryStore;

    #[test]
    fn remaining_is_never_negative() {
        let store = MemoryStore::new();
        let clock = ManualClock::new(5_000);
        assert_eq!(remaining_auto_stop(&store, &clock), Duration::ZERO);

        set_scheduled_stop_time(&store, 6_000).unwrap();
        assert_eq!(remaining_auto_stop(&store, &clock), Duration::from_secs(1));

        clock.advance(2_000);
        assert_eq!(remaining_auto_stop(&store, &clock), Duration::ZERO);
    }
}
