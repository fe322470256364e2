//! Playback commands
//!
//! Commands arrive as JSON objects naming an `action` plus its parameters:
//!
//! ```json
//! {"action": "PLAY_PRESET", "presetId": "2f6c...", "deviceVolume": 7}
//! ```
//!
//! Anything that does not decode into a known action is dropped.

use lull_core::{Clock, LullError, SoundTag};
use lull_playback::SkipDirection;
use lull_storage::settings::set_scheduled_stop_time;
use lull_storage::KeyValueStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// One request to the playback service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    ResumePlayback,
    PausePlayback,
    StopPlayback,

    #[serde(rename_all = "camelCase")]
    PlaySound { sound_key: String },

    #[serde(rename_all = "camelCase")]
    StopSound { sound_key: String },

    /// Play a saved preset, optionally setting the system volume first.
    /// A negative `device_volume` leaves the system volume alone.
    #[serde(rename_all = "camelCase")]
    PlayPreset {
        preset_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        device_volume: Option<i32>,
    },

    #[serde(rename_all = "camelCase")]
    PlayRandomPreset {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tag: Option<SoundTag>,
        min_sounds: usize,
        max_sounds: usize,
    },

    /// Pause everything at an absolute clock time; a time in the past
    /// clears the schedule
    #[serde(rename_all = "camelCase")]
    ScheduleStopPlayback { at_uptime_millis: i64 },

    SkipPreset { direction: SkipDirection },
}

impl Command {
    /// Decode a JSON request
    ///
    /// Returns `None` for a missing or unknown action, or malformed parameters.
    pub fn decode(request: &Value) -> Option<Command> {
        match Command::try_decode(request) {
            Ok(command) => Some(command),
            Err(e) => {
                debug!("ignoring request: {}", e);
                None
            }
        }
    }

    /// Decode a JSON request, naming the offending action on failure
    pub fn try_decode(request: &Value) -> lull_core::Result<Command> {
        Command::deserialize(request).map_err(|e| {
            let action = request
                .get("action")
                .and_then(Value::as_str)
                .unwrap_or("<none>");
            LullError::UnknownCommand(format!("{action} ({e})"))
        })
    }

    /// Decode one line of JSON
    pub fn parse(line: &str) -> Option<Command> {
        match serde_json::from_str::<Value>(line) {
            Ok(request) => Command::decode(&request),
            Err(e) => {
                debug!("ignoring malformed command line: {}", e);
                None
            }
        }
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    // ===== Builders =====

    pub fn resume() -> Self {
        Command::ResumePlayback
    }

    pub fn pause() -> Self {
        Command::PausePlayback
    }

    pub fn stop() -> Self {
        Command::StopPlayback
    }

    pub fn play_sound(sound_key: impl Into<String>) -> Self {
        Command::PlaySound {
            sound_key: sound_key.into(),
        }
    }

    pub fn stop_sound(sound_key: impl Into<String>) -> Self {
        Command::StopSound {
            sound_key: sound_key.into(),
        }
    }

    pub fn play_preset(preset_id: impl Into<String>) -> Self {
        Command::PlayPreset {
            preset_id: preset_id.into(),
            device_volume: None,
        }
    }

    /// Play a preset after setting the system output volume to `level`
    pub fn play_preset_with_volume(preset_id: impl Into<String>, level: u32) -> Self {
        Command::PlayPreset {
            preset_id: preset_id.into(),
            device_volume: Some(i32::try_from(level).unwrap_or(i32::MAX)),
        }
    }

    pub fn play_random_preset(tag: Option<SoundTag>, min_sounds: usize, max_sounds: usize) -> Self {
        Command::PlayRandomPreset {
            tag,
            min_sounds,
            max_sounds,
        }
    }

    pub fn skip_preset(direction: SkipDirection) -> Self {
        Command::SkipPreset { direction }
    }

    /// Pause playback `duration` from now
    ///
    /// The target is persisted right away so the remaining time can be read
    /// before the service handles the command.
    pub fn schedule_auto_stop(
        clock: &dyn Clock,
        store: &dyn KeyValueStore,
        duration: Duration,
    ) -> Self {
        let delay = i64::try_from(duration.as_millis()).unwrap_or(i64::MAX);
        let at_uptime_millis = clock.now_millis().saturating_add(delay);
        if let Err(e) = set_scheduled_stop_time(store, at_uptime_millis) {
            warn!("Failed to persist scheduled stop time: {}", e);
        }

        Command::ScheduleStopPlayback { at_uptime_millis }
    }

    /// Cancel a pending auto-stop
    pub fn clear_scheduled_auto_stop(clock: &dyn Clock) -> Self {
        Command::ScheduleStopPlayback {
            at_uptime_millis: clock.now_millis().saturating_sub(1),
        }
    }
}
