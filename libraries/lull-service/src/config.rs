//! Service configuration

use lull_playback::PlaybackConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Interval for fade and one-shot repeat updates (default: 100)
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    #[serde(default)]
    pub playback: PlaybackConfig,
}

fn default_tick_interval_ms() -> u64 {
    100
}

impl ServiceConfig {
    /// Tick interval, never shorter than one millisecond
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            playback: PlaybackConfig::default(),
        }
    }
}
