//! Null audio backend
//!
//! The daemon has no mixer of its own. Every engine, focus, and volume call
//! is written to the log so a session can be followed from the outside.

use lull_core::{
    DeviceVolume, EngineHandle, FocusArbiter, FocusRequestResult, PlaybackEngine, Result,
    SoundCatalog,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Engine whose streams only log what they would do
pub struct LoggingEngine {
    catalog: Arc<dyn SoundCatalog>,
}

impl LoggingEngine {
    pub fn new(catalog: Arc<dyn SoundCatalog>) -> Self {
        Self { catalog }
    }
}

impl PlaybackEngine for LoggingEngine {
    fn open(&self, sound_key: &str) -> Result<Box<dyn EngineHandle>> {
        let looping = self.catalog.get(sound_key).is_some_and(|s| s.is_looping);
        debug!(sound = sound_key, looping, "stream opened");
        Ok(Box::new(LoggingHandle {
            sound_key: sound_key.to_string(),
        }))
    }
}

struct LoggingHandle {
    sound_key: String,
}

impl EngineHandle for LoggingHandle {
    fn start(&mut self) {
        info!(sound = %self.sound_key, "start");
    }

    fn pause(&mut self) {
        info!(sound = %self.sound_key, "pause");
    }

    fn stop(&mut self) {
        info!(sound = %self.sound_key, "stop");
    }

    fn set_volume(&mut self, volume: f32) {
        debug!(sound = %self.sound_key, volume, "volume");
    }

    fn release(&mut self) {
        debug!(sound = %self.sound_key, "stream released");
    }
}

/// Focus arbiter for a host with no competing audio
#[derive(Debug, Default)]
pub struct GrantingFocus {
    held: bool,
}

impl FocusArbiter for GrantingFocus {
    fn request_focus(&mut self) -> FocusRequestResult {
        if !self.held {
            debug!("audio focus granted");
        }
        self.held = true;
        FocusRequestResult::Granted
    }

    fn abandon_focus(&mut self) {
        if self.held {
            debug!("audio focus abandoned");
        }
        self.held = false;
    }
}

/// Device volume that only records the requested level
#[derive(Debug, Default)]
pub struct LoggingDeviceVolume {
    level: Option<u32>,
}

impl LoggingDeviceVolume {
    pub fn level(&self) -> Option<u32> {
        self.level
    }
}

impl DeviceVolume for LoggingDeviceVolume {
    fn set_media_volume(&mut self, level: u32) {
        info!(level, "media volume set");
        self.level = Some(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lull_core::{Sound, StaticCatalog};

    #[test]
    fn engine_opens_any_key() {
        let catalog = Arc::new(StaticCatalog::new([Sound::looping("rain", &[])]));
        let engine = LoggingEngine::new(catalog);

        let mut handle = engine.open("rain").unwrap();
        handle.set_volume(0.5);
        handle.start();
        handle.release();
        assert!(engine.open("unlisted").is_ok());
    }

    #[test]
    fn focus_is_always_granted() {
        let mut focus = GrantingFocus::default();
        assert_eq!(focus.request_focus(), FocusRequestResult::Granted);
        assert_eq!(focus.request_focus(), FocusRequestResult::Granted);
        focus.abandon_focus();
        assert!(!focus.held);
    }

    #[test]
    fn device_volume_keeps_last_level() {
        let mut volume = LoggingDeviceVolume::default();
        assert_eq!(volume.level(), None);
        volume.set_media_volume(4);
        volume.set_media_volume(9);
        assert_eq!(volume.level(), Some(9));
    }
}
