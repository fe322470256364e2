//! Single-sound player
//!
//! Owns one engine handle and its transport state:
//!
//! ```text
//! Stopped --play--> Playing <--pause/play--> Paused
//!    ^                 |                        |
//!    +------stop-------+------------stop--------+
//! ```
//!
//! A fade-out is a sub-state of `Playing`: the gain ramps to zero and the
//! player stops itself when the ramp completes.

use crate::types::PlayerState;
use crate::volume::FadeOut;
use lull_core::{clamp_volume, EngineHandle, PlaybackEngine, PresetPlaybackState, Sound};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Shortest repeat interval of a one-shot sound, in seconds
pub const MIN_TIME_PERIOD_SECS: u32 = 1;

/// Playback state owner for one looping (or periodically repeated) sound
pub struct SoundPlayer {
    sound_key: String,
    is_looping: bool,
    volume: f32,

    /// Repeat interval in seconds for non-looping sounds
    time_period: u32,

    state: PlayerState,
    engine: Arc<dyn PlaybackEngine>,
    handle: Option<Box<dyn EngineHandle>>,
    fade: Option<FadeOut>,

    /// Time since a non-looping sound was last (re)started
    since_start: Duration,
}

impl SoundPlayer {
    pub fn new(
        sound: &Sound,
        volume: f32,
        time_period: u32,
        engine: Arc<dyn PlaybackEngine>,
    ) -> Self {
        Self {
            sound_key: sound.key.clone(),
            is_looping: sound.is_looping,
            volume: clamp_volume(volume),
            time_period: time_period.max(MIN_TIME_PERIOD_SECS),
            state: PlayerState::Stopped,
            engine,
            handle: None,
            fade: None,
            since_start: Duration::ZERO,
        }
    }

    pub fn sound_key(&self) -> &str {
        &self.sound_key
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn time_period(&self) -> u32 {
        self.time_period
    }

    pub fn is_looping(&self) -> bool {
        self.is_looping
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Start or resume output
    ///
    /// Returns `Ok(true)` on a transition, `Ok(false)` if already playing.
    ///
    /// # Errors
    /// Returns an error if the engine cannot open the sound
    pub fn play(&mut self) -> lull_core::Result<bool> {
        if self.state == PlayerState::Playing {
            return Ok(false);
        }

        if self.handle.is_none() {
            let mut handle = self.engine.open(&self.sound_key)?;
            handle.set_volume(self.volume);
            self.handle = Some(handle);
        }

        if let Some(handle) = self.handle.as_mut() {
            handle.start();
        }
        self.state = PlayerState::Playing;
        self.since_start = Duration::ZERO;
        debug!(sound = %self.sound_key, "player playing");
        Ok(true)
    }

    /// Halt output, keeping the handle and volume
    pub fn pause(&mut self) -> bool {
        if self.state != PlayerState::Playing {
            return false;
        }

        if let Some(handle) = self.handle.as_mut() {
            handle.pause();
        }
        self.state = PlayerState::Paused;
        debug!(sound = %self.sound_key, "player paused");
        true
    }

    /// Halt output and release the engine handle
    pub fn stop(&mut self) -> bool {
        if self.state == PlayerState::Stopped && self.handle.is_none() {
            return false;
        }

        if let Some(mut handle) = self.handle.take() {
            handle.stop();
            handle.release();
        }
        self.state = PlayerState::Stopped;
        self.fade = None;
        debug!(sound = %self.sound_key, "player stopped");
        true
    }

    /// Stop, ramping the gain down first when the sound is audible
    ///
    /// Returns `true` if a fade started; otherwise the player is already
    /// stopped when this returns.
    pub fn fade_out(&mut self, duration: Duration) -> bool {
        if self.state != PlayerState::Playing || duration.is_zero() {
            self.stop();
            return false;
        }

        self.fade = Some(FadeOut::new(self.volume, duration));
        true
    }

    /// Update gain live, no transition
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = clamp_volume(volume);
        if self.fade.is_none() {
            if let Some(handle) = self.handle.as_mut() {
                handle.set_volume(self.volume);
            }
        }
    }

    pub fn set_time_period(&mut self, seconds: u32) {
        self.time_period = seconds.max(MIN_TIME_PERIOD_SECS);
    }

    /// Advance fades and repeat timers by `dt`
    ///
    /// Returns `true` when a fade-out completed and the player stopped.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if let Some(fade) = self.fade.as_mut() {
            let gain = fade.advance(dt);
            let complete = fade.is_complete();
            if let Some(handle) = self.handle.as_mut() {
                handle.set_volume(gain);
            }
            if complete {
                self.stop();
            }
            return complete;
        }

        if self.state == PlayerState::Playing && !self.is_looping {
            self.since_start += dt;
            if self.since_start >= Duration::from_secs(u64::from(self.time_period)) {
                if let Some(handle) = self.handle.as_mut() {
                    handle.start();
                }
                self.since_start = Duration::ZERO;
                debug!(sound = %self.sound_key, "repeating one-shot sound");
            }
        }

        false
    }

    /// Settings of this player as stored in a preset
    pub fn to_playback_state(&self) -> PresetPlaybackState {
        PresetPlaybackState::new(self.sound_key.clone(), self.volume, self.time_period)
    }
}

impl Drop for SoundPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{EngineCall, RecordingEngine};

    fn player(engine: &RecordingEngine, sound: Sound) -> SoundPlayer {
        SoundPlayer::new(&sound, 0.5, 30, Arc::new(engine.clone()))
    }

    #[test]
    fn play_opens_once_and_is_idempotent() {
        let engine = RecordingEngine::new();
        let mut p = player(&engine, Sound::looping("rain", &[]));

        assert!(p.play().unwrap());
        assert!(!p.play().unwrap());
        assert_eq!(p.state(), PlayerState::Playing);
        assert_eq!(
            engine.calls(),
            vec![
                EngineCall::Open("rain".into()),
                EngineCall::SetVolume("rain".into(), 0.5),
                EngineCall::Start("rain".into()),
            ]
        );
    }

    #[test]
    fn pause_keeps_handle_and_resume_does_not_reopen() {
        let engine = RecordingEngine::new();
        let mut p = player(&engine, Sound::looping("rain", &[]));

        assert!(!p.pause());
        p.play().unwrap();
        assert!(p.pause());
        assert!(!p.pause());
        p.play().unwrap();

        assert_eq!(engine.count(|c| matches!(c, EngineCall::Open(_))), 1);
        assert_eq!(engine.count(|c| matches!(c, EngineCall::Start(_))), 2);
    }

    #[test]
    fn stop_releases_and_is_idempotent() {
        let engine = RecordingEngine::new();
        let mut p = player(&engine, Sound::looping("rain", &[]));

        assert!(!p.stop());
        p.play().unwrap();
        p.pause();
        assert!(p.stop());
        assert!(!p.stop());
        assert_eq!(p.state(), PlayerState::Stopped);
        assert_eq!(engine.count(|c| matches!(c, EngineCall::Release(_))), 1);
    }

    #[test]
    fn volume_is_clamped_and_applied_live() {
        let engine = RecordingEngine::new();
        let mut p = player(&engine, Sound::looping("rain", &[]));
        p.play().unwrap();

        p.set_volume(3.0);
        assert_eq!(p.volume(), 1.0);
        assert_eq!(p.state(), PlayerState::Playing);
        assert_eq!(
            engine.calls().last(),
            Some(&EngineCall::SetVolume("rain".into(), 1.0))
        );
    }

    #[test]
    fn fade_out_ramps_then_stops() {
        let engine = RecordingEngine::new();
        let mut p = player(&engine, Sound::looping("rain", &[]));
        p.play().unwrap();

        assert!(p.fade_out(Duration::from_millis(200)));
        assert!(p.is_fading());
        assert!(!p.advance(Duration::from_millis(100)));
        assert_eq!(p.state(), PlayerState::Playing);
        assert!(p.advance(Duration::from_millis(100)));
        assert_eq!(p.state(), PlayerState::Stopped);
        assert!(!p.is_fading());
        assert_eq!(engine.count(|c| matches!(c, EngineCall::Release(_))), 1);
    }

    #[test]
    fn fade_out_of_paused_player_stops_immediately() {
        let engine = RecordingEngine::new();
        let mut p = player(&engine, Sound::looping("rain", &[]));
        p.play().unwrap();
        p.pause();

        assert!(!p.fade_out(Duration::from_secs(1)));
        assert_eq!(p.state(), PlayerState::Stopped);
    }

    #[test]
    fn one_shot_repeats_every_time_period() {
        let engine = RecordingEngine::new();
        let mut p = player(&engine, Sound::one_shot("birds", &[]));
        p.play().unwrap();

        p.advance(Duration::from_secs(29));
        assert_eq!(engine.count(|c| matches!(c, EngineCall::Start(_))), 1);
        p.advance(Duration::from_secs(1));
        assert_eq!(engine.count(|c| matches!(c, EngineCall::Start(_))), 2);

        // Paused sounds do not repeat
        p.pause();
        p.advance(Duration::from_secs(60));
        assert_eq!(engine.count(|c| matches!(c, EngineCall::Start(_))), 2);
    }

    #[test]
    fn zero_time_period_repeats_at_most_once_a_second() {
        let engine = RecordingEngine::new();
        let sound = Sound::one_shot("birds", &[]);
        let mut p = SoundPlayer::new(&sound, 0.5, 0, Arc::new(engine.clone()));
        assert_eq!(p.time_period(), MIN_TIME_PERIOD_SECS);

        p.play().unwrap();
        for _ in 0..5 {
            p.advance(Duration::from_millis(100));
        }
        assert_eq!(engine.count(|c| matches!(c, EngineCall::Start(_))), 1);

        p.set_time_period(0);
        assert_eq!(p.time_period(), MIN_TIME_PERIOD_SECS);
        assert_eq!(p.to_playback_state().time_period, MIN_TIME_PERIOD_SECS);
    }

    #[test]
    fn open_failure_leaves_player_stopped() {
        let engine = RecordingEngine::new();
        engine.fail_open("broken");
        let mut p = player(&engine, Sound::looping("broken", &[]));

        assert!(p.play().is_err());
        assert_eq!(p.state(), PlayerState::Stopped);
    }
}
