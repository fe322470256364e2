//! Core types for playback management

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Transport state of one sound player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    /// No engine handle held
    Stopped,

    /// Producing audio
    Playing,

    /// Handle held, output halted
    Paused,
}

/// Aggregate state of the whole mix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Mix is empty
    Stopped,

    /// At least one sound is playing
    Playing,

    /// Mix has sounds but none is playing
    Paused,
}

/// Audio focus as tracked by the manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusState {
    NoFocus,
    FocusGranted,
    FocusDelayed,
    FocusLostTransient,
    FocusLostPermanent,
}

/// Direction for skipping through saved presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipDirection {
    Prev,
    Next,
}

/// Configuration for the player manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Gain of a sound started on its own (default: 0.2)
    pub default_volume: f32,

    /// Fade-out length when a playing sound is stopped, 0 disables (default: 1000)
    pub fade_out_ms: u64,

    /// Gain bounds for random mixes (default: 0.2..=0.8)
    pub random_volume_min: f32,
    pub random_volume_max: f32,

    /// Repeat interval bounds for non-looping sounds in random mixes (default: 30..=300)
    pub min_time_period_secs: u32,
    pub max_time_period_secs: u32,

    /// Repeat interval of a sound started on its own (default: 60)
    pub default_time_period_secs: u32,
}

impl PlaybackConfig {
    pub fn fade_out(&self) -> Duration {
        Duration::from_millis(self.fade_out_ms)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            default_volume: 0.2,
            fade_out_ms: 1000,
            random_volume_min: 0.2,
            random_volume_max: 0.8,
            min_time_period_secs: 30,
            max_time_period_secs: 300,
            default_time_period_secs: 60,
        }
    }
}
